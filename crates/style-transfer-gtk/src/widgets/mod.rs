// SPDX-License-Identifier: AGPL-3.0
// Style Transfer GTK - Widgets module

mod slot_card;

pub use slot_card::SlotCard;
