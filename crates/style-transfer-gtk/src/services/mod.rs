// SPDX-License-Identifier: AGPL-3.0
// Style Transfer GTK - Services module

mod transfer_bridge;

pub use transfer_bridge::TransferBridge;
