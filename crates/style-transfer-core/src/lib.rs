// SPDX-License-Identifier: AGPL-3.0
// Style Transfer Core - Shared logic for all frontends
//
// This crate provides:
// - AppSettings and AppError types
// - SettingsStore for startup configuration
// - UploadSlot and the picker's ImageFileFilter
// - TransferController, the upload/transfer/result state machine
// - ResultView and ControlsView projections
// - StyleTransferClient for the remote processing service
//
// Frontend-specific code lives in separate crates.

pub mod client;
pub mod download;
pub mod settings;
pub mod slot;
pub mod transfer;
pub mod types;
pub mod view;

// Re-export commonly used items
pub use client::{ServiceHealth, StyleTransferClient};
pub use settings::SettingsStore;
pub use slot::{ImageFileFilter, PreviewHandle, SelectedFile, SlotKind, UploadSlot};
pub use transfer::{
    PendingTransfer, Resolution, ResultImage, TransferController, TransferPhase, TransferRequest,
    TransferState, TransferSuccess, TransferTicket,
};
pub use types::{AppError, AppSettings};
pub use view::{ControlsView, ResultView, DOWNLOAD_FILE_NAME};
