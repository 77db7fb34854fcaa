// SPDX-License-Identifier: AGPL-3.0
// Style Transfer Core - View projections
//
// Pure functions from controller state to what a frontend should show.

use crate::slot::SlotKind;
use crate::transfer::{ResultImage, TransferController, TransferState};

/// File name offered when downloading a result
pub const DOWNLOAD_FILE_NAME: &str = "stylized-image.png";

/// What the result area shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResultView<'a> {
    Hidden,
    Loading,
    Ready {
        image: &'a ResultImage,
        download_name: &'static str,
    },
}

impl<'a> ResultView<'a> {
    pub fn project(state: &'a TransferState) -> Self {
        if state.is_submitting() {
            return Self::Loading;
        }

        match &state.result_image {
            Some(image) => Self::Ready {
                image,
                download_name: DOWNLOAD_FILE_NAME,
            },
            None => Self::Hidden,
        }
    }
}

/// State of the action buttons, banner and readout
#[derive(Debug, Clone, PartialEq)]
pub struct ControlsView {
    pub submit_enabled: bool,
    pub submit_label: &'static str,
    pub reset_visible: bool,
    pub error_banner: Option<String>,
    pub processing_time_label: Option<String>,
}

impl ControlsView {
    pub fn project(controller: &TransferController) -> Self {
        let state = controller.state();
        let submitting = state.is_submitting();
        let any_image = !controller.slot(SlotKind::Content).is_empty()
            || !controller.slot(SlotKind::Style).is_empty();

        Self {
            submit_enabled: controller.has_both_images() && !submitting,
            submit_label: if submitting {
                "Processing..."
            } else {
                "Transfer Style"
            },
            reset_visible: any_image || state.result_image.is_some(),
            error_banner: state.error_message.clone(),
            processing_time_label: state
                .processing_time_secs
                .map(|secs| format!("Processed in {}s", secs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::SelectedFile;
    use crate::transfer::{TransferPhase, TransferSuccess};
    use crate::types::AppError;

    fn image(name: &str) -> SelectedFile {
        SelectedFile::new(name, "image/png", b"png".to_vec())
    }

    #[test]
    fn test_result_view_modes() {
        let idle = TransferState::default();
        assert_eq!(ResultView::project(&idle), ResultView::Hidden);

        let submitting = TransferState {
            phase: TransferPhase::Submitting,
            ..TransferState::default()
        };
        assert_eq!(ResultView::project(&submitting), ResultView::Loading);

        let failed = TransferState {
            phase: TransferPhase::Failed,
            error_message: Some("boom".to_string()),
            ..TransferState::default()
        };
        assert_eq!(ResultView::project(&failed), ResultView::Hidden);

        let result = ResultImage::new("data:image/png;base64,AAAA");
        let succeeded = TransferState {
            phase: TransferPhase::Succeeded,
            result_image: Some(result.clone()),
            processing_time_secs: Some(3.2),
            error_message: None,
        };
        assert_eq!(
            ResultView::project(&succeeded),
            ResultView::Ready {
                image: &result,
                download_name: "stylized-image.png",
            }
        );
    }

    #[test]
    fn test_controls_follow_controller() {
        let mut controller = TransferController::new();
        let controls = ControlsView::project(&controller);
        assert!(!controls.submit_enabled);
        assert!(!controls.reset_visible);
        assert_eq!(controls.submit_label, "Transfer Style");

        controller.select(SlotKind::Content, image("content.png"));
        let controls = ControlsView::project(&controller);
        assert!(!controls.submit_enabled);
        assert!(controls.reset_visible);

        controller.select(SlotKind::Style, image("style.png"));
        assert!(ControlsView::project(&controller).submit_enabled);

        let pending = controller.submit().unwrap();
        let controls = ControlsView::project(&controller);
        assert!(!controls.submit_enabled);
        assert_eq!(controls.submit_label, "Processing...");

        controller.resolve(
            pending.ticket,
            Ok(TransferSuccess {
                result_image: ResultImage::new("data:image/png;base64,AAAA"),
                processing_time_secs: Some(3.2),
            }),
        );
        let controls = ControlsView::project(&controller);
        assert!(controls.submit_enabled);
        assert_eq!(
            controls.processing_time_label.as_deref(),
            Some("Processed in 3.2s")
        );
        assert_eq!(controls.error_banner, None);
    }

    #[test]
    fn test_reset_visible_with_only_a_result() {
        let mut controller = TransferController::new();
        controller.select(SlotKind::Content, image("content.png"));
        controller.select(SlotKind::Style, image("style.png"));
        let pending = controller.submit().unwrap();
        controller.resolve(
            pending.ticket,
            Ok(TransferSuccess {
                result_image: ResultImage::new("https://cdn.example.com/out.png"),
                processing_time_secs: None,
            }),
        );
        controller.clear(SlotKind::Content);
        controller.clear(SlotKind::Style);

        let controls = ControlsView::project(&controller);
        assert!(controls.reset_visible);
        assert!(!controls.submit_enabled);
        assert_eq!(controls.processing_time_label, None);
    }

    #[test]
    fn test_error_banner() {
        let mut controller = TransferController::new();
        controller.select(SlotKind::Content, image("content.png"));
        controller.select(SlotKind::Style, image("style.png"));
        let pending = controller.submit().unwrap();
        controller.resolve(pending.ticket, Err(AppError::Timeout));

        let controls = ControlsView::project(&controller);
        assert_eq!(
            controls.error_banner.as_deref(),
            Some("Failed to process images. Please try again.")
        );
        assert!(controls.submit_enabled);
    }
}
