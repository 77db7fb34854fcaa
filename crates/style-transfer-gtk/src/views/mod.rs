// SPDX-License-Identifier: AGPL-3.0
// Style Transfer GTK - Views module

mod studio;

pub use studio::StudioView;
