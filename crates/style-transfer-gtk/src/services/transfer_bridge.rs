// SPDX-License-Identifier: AGPL-3.0
// Style Transfer GTK - Transfer Bridge
//
// Bridges the async StyleTransferClient with GTK's main loop.

use async_channel::{Receiver, Sender};
use std::path::PathBuf;
use std::sync::Arc;
use style_transfer_core::{
    download, AppError, ResultImage, ServiceHealth, StyleTransferClient, TransferRequest,
    TransferSuccess,
};
use tokio::runtime::Runtime;

/// Commands that can be sent to the client task
#[derive(Debug)]
pub enum BridgeCommand {
    Transfer {
        request: TransferRequest,
        reply: Sender<Result<TransferSuccess, AppError>>,
    },
    CheckHealth {
        reply: Sender<Result<ServiceHealth, AppError>>,
    },
    LoadResult {
        image: ResultImage,
        reply: Sender<Result<Vec<u8>, AppError>>,
    },
    SaveResult {
        image: ResultImage,
        dir: PathBuf,
        reply: Sender<Result<PathBuf, AppError>>,
    },
}

/// Bridge between GTK UI and the async HTTP client
pub struct TransferBridge {
    command_tx: Sender<BridgeCommand>,
    _runtime: Arc<Runtime>,
}

impl TransferBridge {
    pub fn new(client: StyleTransferClient) -> Result<Self, AppError> {
        let (command_tx, command_rx) = async_channel::bounded::<BridgeCommand>(32);

        // Create tokio runtime
        let runtime = Arc::new(
            tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .map_err(|e| AppError::InvalidConfig(format!("Failed to create Tokio runtime: {}", e)))?,
        );

        // Spawn the command loop
        let rt = runtime.clone();
        runtime.spawn(async move {
            Self::run_client(client, command_rx).await;
        });

        Ok(Self {
            command_tx,
            _runtime: rt,
        })
    }

    async fn run_client(client: StyleTransferClient, command_rx: Receiver<BridgeCommand>) {
        // Each command runs on its own task so a health check is not stuck
        // behind a slow transfer.
        while let Ok(cmd) = command_rx.recv().await {
            let client = client.clone();
            tokio::spawn(async move {
                match cmd {
                    BridgeCommand::Transfer { request, reply } => {
                        let result = client.transfer(&request).await;
                        let _ = reply.send(result).await;
                    }
                    BridgeCommand::CheckHealth { reply } => {
                        let result = client.check_health().await;
                        let _ = reply.send(result).await;
                    }
                    BridgeCommand::LoadResult { image, reply } => {
                        let result = download::result_bytes(&client, &image).await;
                        let _ = reply.send(result).await;
                    }
                    BridgeCommand::SaveResult { image, dir, reply } => {
                        let result = download::save_result(&client, &image, &dir).await;
                        let _ = reply.send(result).await;
                    }
                }
            });
        }
        tracing::debug!("Bridge command channel closed");
    }

    /// Send a transfer request - outcome delivered via callback on the main loop
    pub fn transfer<F>(&self, request: TransferRequest, callback: F)
    where
        F: FnOnce(Result<TransferSuccess, AppError>) + 'static,
    {
        let (reply_tx, reply_rx) = async_channel::bounded(1);
        let tx = self.command_tx.clone();

        glib::spawn_future_local(async move {
            if tx
                .send(BridgeCommand::Transfer {
                    request,
                    reply: reply_tx,
                })
                .await
                .is_err()
            {
                callback(Err(AppError::Network("Transfer service stopped".to_string())));
                return;
            }

            let outcome = reply_rx
                .recv()
                .await
                .unwrap_or_else(|_| Err(AppError::Network("Transfer was dropped".to_string())));
            callback(outcome);
        });
    }

    /// Check service health - returns result via callback
    pub fn check_health<F>(&self, callback: F)
    where
        F: FnOnce(Result<ServiceHealth, AppError>) + 'static,
    {
        let (reply_tx, reply_rx) = async_channel::bounded(1);
        let tx = self.command_tx.clone();

        glib::spawn_future_local(async move {
            let _ = tx
                .send(BridgeCommand::CheckHealth { reply: reply_tx })
                .await;

            if let Ok(result) = reply_rx.recv().await {
                callback(result);
            }
        });
    }

    /// Fetch or decode a result image for display
    pub fn load_result<F>(&self, image: ResultImage, callback: F)
    where
        F: FnOnce(Result<Vec<u8>, AppError>) + 'static,
    {
        let (reply_tx, reply_rx) = async_channel::bounded(1);
        let tx = self.command_tx.clone();

        glib::spawn_future_local(async move {
            let _ = tx
                .send(BridgeCommand::LoadResult {
                    image,
                    reply: reply_tx,
                })
                .await;

            if let Ok(result) = reply_rx.recv().await {
                callback(result);
            }
        });
    }

    /// Save a result image into `dir` - returns the written path via callback
    pub fn save_result<F>(&self, image: ResultImage, dir: PathBuf, callback: F)
    where
        F: FnOnce(Result<PathBuf, AppError>) + 'static,
    {
        let (reply_tx, reply_rx) = async_channel::bounded(1);
        let tx = self.command_tx.clone();

        glib::spawn_future_local(async move {
            let _ = tx
                .send(BridgeCommand::SaveResult {
                    image,
                    dir,
                    reply: reply_tx,
                })
                .await;

            if let Ok(result) = reply_rx.recv().await {
                callback(result);
            }
        });
    }
}
