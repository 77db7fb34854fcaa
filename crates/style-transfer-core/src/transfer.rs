// SPDX-License-Identifier: AGPL-3.0
// Style Transfer Core - Transfer state machine
//
// The controller owns both upload slots and the transfer state. A submit
// hands out a ticket together with the request to send; the response is
// fed back through `resolve`, which ignores tickets from before the last
// reset or submit.

use crate::slot::{SelectedFile, SlotKind, UploadSlot};
use crate::types::AppError;

/// Discrete state of a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// The stylized image as returned by the service: a `data:` URI or a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultImage(String);

impl ResultImage {
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_data_uri(&self) -> bool {
        self.0.starts_with("data:")
    }
}

/// A well-formed success payload
#[derive(Debug, Clone, PartialEq)]
pub struct TransferSuccess {
    pub result_image: ResultImage,
    pub processing_time_secs: Option<f64>,
}

/// What the view layer reads; only the controller changes it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransferState {
    pub phase: TransferPhase,
    pub result_image: Option<ResultImage>,
    pub processing_time_secs: Option<f64>,
    pub error_message: Option<String>,
}

impl TransferState {
    pub fn is_submitting(&self) -> bool {
        self.phase == TransferPhase::Submitting
    }

    fn fail(&mut self, message: String) {
        self.phase = TransferPhase::Failed;
        self.result_image = None;
        self.processing_time_secs = None;
        self.error_message = Some(message);
    }
}

/// Both images for one outbound request
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub content: SelectedFile,
    pub style: SelectedFile,
}

impl TransferRequest {
    /// Only possible when both images are present
    pub fn new(content: Option<&SelectedFile>, style: Option<&SelectedFile>) -> Option<Self> {
        Some(Self {
            content: content?.clone(),
            style: style?.clone(),
        })
    }
}

/// Identifies which submit a response belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferTicket(u64);

/// A submitted transfer waiting for its outcome
#[derive(Debug)]
pub struct PendingTransfer {
    pub ticket: TransferTicket,
    pub request: TransferRequest,
}

/// Whether a resolution changed the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Stale,
}

/// Owns the upload slots and drives the transfer phases
#[derive(Debug, Default)]
pub struct TransferController {
    content: UploadSlot,
    style: UploadSlot,
    state: TransferState,
    generation: u64,
}

impl TransferController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TransferState {
        &self.state
    }

    /// Owned copy of the current state for rendering
    pub fn snapshot(&self) -> TransferState {
        self.state.clone()
    }

    pub fn slot(&self, kind: SlotKind) -> &UploadSlot {
        match kind {
            SlotKind::Content => &self.content,
            SlotKind::Style => &self.style,
        }
    }

    fn slot_mut(&mut self, kind: SlotKind) -> &mut UploadSlot {
        match kind {
            SlotKind::Content => &mut self.content,
            SlotKind::Style => &mut self.style,
        }
    }

    pub fn select(&mut self, kind: SlotKind, file: SelectedFile) {
        tracing::info!("Selected {:?} image: {}", kind, file.name());
        self.slot_mut(kind).select(file);
    }

    pub fn clear(&mut self, kind: SlotKind) {
        self.slot_mut(kind).clear();
    }

    pub fn has_both_images(&self) -> bool {
        !self.content.is_empty() && !self.style.is_empty()
    }

    /// Start a transfer with the current images.
    ///
    /// Fails without building a request when a transfer is already in
    /// flight, or when an image is missing (which also moves to `Failed`).
    pub fn submit(&mut self) -> Result<PendingTransfer, AppError> {
        if self.state.is_submitting() {
            tracing::warn!("Submit ignored, transfer already in progress");
            return Err(AppError::TransferInProgress);
        }

        let Some(request) = TransferRequest::new(self.content.file(), self.style.file()) else {
            let err = AppError::MissingImages;
            self.state.fail(err.banner_message());
            return Err(err);
        };

        self.generation += 1;
        self.state = TransferState {
            phase: TransferPhase::Submitting,
            ..TransferState::default()
        };

        tracing::info!(
            "Submitting transfer #{}: content={} style={}",
            self.generation,
            request.content.name(),
            request.style.name()
        );

        Ok(PendingTransfer {
            ticket: TransferTicket(self.generation),
            request,
        })
    }

    /// Apply the outcome of the request `ticket` was issued for
    pub fn resolve(
        &mut self,
        ticket: TransferTicket,
        outcome: Result<TransferSuccess, AppError>,
    ) -> Resolution {
        if ticket.0 != self.generation || !self.state.is_submitting() {
            tracing::warn!(
                "Ignoring stale response for transfer #{} (current #{})",
                ticket.0,
                self.generation
            );
            return Resolution::Stale;
        }

        match outcome {
            Ok(success) => {
                tracing::info!(
                    "Transfer #{} succeeded in {:?}s",
                    ticket.0,
                    success.processing_time_secs
                );
                self.state = TransferState {
                    phase: TransferPhase::Succeeded,
                    result_image: Some(success.result_image),
                    processing_time_secs: success.processing_time_secs,
                    error_message: None,
                };
            }
            Err(e) => {
                tracing::error!("Transfer #{} failed: {}", ticket.0, e);
                self.state.fail(e.banner_message());
            }
        }

        Resolution::Applied
    }

    /// Back to an empty `Idle` controller; in-flight responses become stale
    pub fn reset(&mut self) {
        tracing::info!("Resetting transfer state");
        self.content.clear();
        self.style.clear();
        self.state = TransferState::default();
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FALLBACK_ERROR_MESSAGE, MISSING_IMAGES_MESSAGE};

    fn image(name: &str) -> SelectedFile {
        SelectedFile::new(name, "image/png", b"png".to_vec())
    }

    fn filled() -> TransferController {
        let mut controller = TransferController::new();
        controller.select(SlotKind::Content, image("content.png"));
        controller.select(SlotKind::Style, image("style.png"));
        controller
    }

    fn success() -> TransferSuccess {
        TransferSuccess {
            result_image: ResultImage::new("data:image/png;base64,AAAA"),
            processing_time_secs: Some(3.2),
        }
    }

    fn assert_reset(controller: &TransferController) {
        assert_eq!(controller.state(), &TransferState::default());
        assert_eq!(controller.state().phase, TransferPhase::Idle);
        assert!(controller.slot(SlotKind::Content).is_empty());
        assert!(controller.slot(SlotKind::Style).is_empty());
    }

    #[test]
    fn test_initial_state_is_idle() {
        let controller = TransferController::new();
        assert_reset(&controller);
    }

    #[test]
    fn test_submit_requires_both_images() {
        let mut controller = TransferController::new();
        controller.select(SlotKind::Content, image("content.png"));

        let err = controller.submit().unwrap_err();
        assert!(matches!(err, AppError::MissingImages));
        assert_eq!(controller.state().phase, TransferPhase::Failed);
        assert_eq!(
            controller.state().error_message.as_deref(),
            Some(MISSING_IMAGES_MESSAGE)
        );

        let mut empty = TransferController::new();
        assert!(matches!(empty.submit(), Err(AppError::MissingImages)));
        assert!(!empty.state().is_submitting());
    }

    #[test]
    fn test_submit_enters_submitting_with_clean_state() {
        let mut controller = TransferController::new();
        controller.select(SlotKind::Style, image("style.png"));
        let _ = controller.submit();
        assert!(controller.state().error_message.is_some());

        controller.select(SlotKind::Content, image("content.png"));
        let pending = controller.submit().unwrap();

        let state = controller.state();
        assert_eq!(state.phase, TransferPhase::Submitting);
        assert_eq!(state.error_message, None);
        assert_eq!(state.result_image, None);
        assert_eq!(state.processing_time_secs, None);
        assert_eq!(pending.request.content.name(), "content.png");
        assert_eq!(pending.request.style.name(), "style.png");
    }

    #[test]
    fn test_second_submit_while_in_flight_is_rejected() {
        let mut controller = filled();
        let pending = controller.submit().unwrap();

        assert!(matches!(
            controller.submit(),
            Err(AppError::TransferInProgress)
        ));
        assert!(controller.state().is_submitting());

        assert_eq!(
            controller.resolve(pending.ticket, Ok(success())),
            Resolution::Applied
        );
    }

    #[test]
    fn test_success_sets_result_and_time() {
        let mut controller = filled();
        let pending = controller.submit().unwrap();
        controller.resolve(pending.ticket, Ok(success()));

        let state = controller.state();
        assert_eq!(state.phase, TransferPhase::Succeeded);
        assert_eq!(
            state.result_image.as_ref().map(|r| r.as_str()),
            Some("data:image/png;base64,AAAA")
        );
        assert_eq!(state.processing_time_secs, Some(3.2));
        assert_eq!(state.error_message, None);
    }

    #[test]
    fn test_service_error_message_is_shown() {
        let mut controller = filled();
        let pending = controller.submit().unwrap();
        controller.resolve(
            pending.ticket,
            Err(AppError::Service {
                status: 503,
                message: Some("model unavailable".to_string()),
            }),
        );

        let state = controller.state();
        assert_eq!(state.phase, TransferPhase::Failed);
        assert_eq!(state.error_message.as_deref(), Some("model unavailable"));
        assert_eq!(state.result_image, None);
    }

    #[test]
    fn test_transport_errors_use_fallback_message() {
        for err in [
            AppError::Timeout,
            AppError::Network("connection refused".to_string()),
            AppError::InvalidResponse("missing result_image".to_string()),
            AppError::Service {
                status: 500,
                message: None,
            },
        ] {
            let mut controller = filled();
            let pending = controller.submit().unwrap();
            controller.resolve(pending.ticket, Err(err));
            assert_eq!(controller.state().phase, TransferPhase::Failed);
            assert_eq!(
                controller.state().error_message.as_deref(),
                Some(FALLBACK_ERROR_MESSAGE)
            );
        }
    }

    #[test]
    fn test_failed_state_can_resubmit() {
        let mut controller = filled();
        let pending = controller.submit().unwrap();
        controller.resolve(pending.ticket, Err(AppError::Timeout));

        let retry = controller.submit().unwrap();
        assert!(controller.state().is_submitting());
        assert_eq!(controller.state().error_message, None);
        controller.resolve(retry.ticket, Ok(success()));
        assert_eq!(controller.state().phase, TransferPhase::Succeeded);
    }

    #[test]
    fn test_reset_from_every_phase() {
        // Idle
        let mut controller = filled();
        controller.reset();
        assert_reset(&controller);

        // Submitting
        let mut controller = filled();
        controller.submit().unwrap();
        controller.reset();
        assert_reset(&controller);

        // Succeeded
        let mut controller = filled();
        let pending = controller.submit().unwrap();
        controller.resolve(pending.ticket, Ok(success()));
        controller.reset();
        assert_reset(&controller);

        // Failed
        let mut controller = TransferController::new();
        let _ = controller.submit();
        controller.reset();
        assert_reset(&controller);
    }

    #[test]
    fn test_reset_releases_previews() {
        let mut controller = filled();
        let content = controller
            .slot(SlotKind::Content)
            .preview_path()
            .unwrap()
            .to_path_buf();
        let style = controller
            .slot(SlotKind::Style)
            .preview_path()
            .unwrap()
            .to_path_buf();

        controller.reset();
        assert!(!content.exists());
        assert!(!style.exists());
    }

    #[test]
    fn test_response_after_reset_is_ignored() {
        let mut controller = filled();
        let pending = controller.submit().unwrap();
        controller.reset();

        assert_eq!(
            controller.resolve(pending.ticket, Ok(success())),
            Resolution::Stale
        );
        assert_reset(&controller);
    }

    #[test]
    fn test_response_from_older_submit_is_ignored() {
        let mut controller = filled();
        let first = controller.submit().unwrap();
        controller.reset();
        controller.select(SlotKind::Content, image("content.png"));
        controller.select(SlotKind::Style, image("style.png"));
        let second = controller.submit().unwrap();

        assert_eq!(
            controller.resolve(first.ticket, Err(AppError::Timeout)),
            Resolution::Stale
        );
        assert!(controller.state().is_submitting());
        assert_eq!(controller.state().error_message, None);

        assert_eq!(
            controller.resolve(second.ticket, Ok(success())),
            Resolution::Applied
        );
        assert_eq!(controller.state().phase, TransferPhase::Succeeded);
    }

    #[test]
    fn test_resolving_twice_is_stale() {
        let mut controller = filled();
        let pending = controller.submit().unwrap();
        controller.resolve(pending.ticket, Ok(success()));
        assert_eq!(
            controller.resolve(pending.ticket, Err(AppError::Timeout)),
            Resolution::Stale
        );
        assert_eq!(controller.state().phase, TransferPhase::Succeeded);
    }

    #[test]
    fn test_validation_failure_clears_previous_result() {
        let mut controller = filled();
        let pending = controller.submit().unwrap();
        controller.resolve(pending.ticket, Ok(success()));

        controller.clear(SlotKind::Style);
        assert!(controller.submit().is_err());

        let state = controller.state();
        assert_eq!(state.phase, TransferPhase::Failed);
        assert_eq!(state.result_image, None);
        assert_eq!(state.processing_time_secs, None);
        assert_eq!(state.error_message.as_deref(), Some(MISSING_IMAGES_MESSAGE));
    }

    #[test]
    fn test_submitting_never_carries_result_or_error() {
        let mut controller = filled();
        let pending = controller.submit().unwrap();
        controller.resolve(pending.ticket, Ok(success()));
        controller.submit().unwrap();

        let state = controller.snapshot();
        assert!(state.is_submitting());
        assert!(state.result_image.is_none());
        assert!(state.error_message.is_none());
    }
}
