// SPDX-License-Identifier: AGPL-3.0
// Style Transfer GTK - Studio View
//
// The single screen of the app: two upload slots, the action row, the
// error banner and the result area. All state lives in the controller;
// widgets are refreshed from its projections after every change.

use crate::application::StyleTransferApplication;
use crate::widgets::SlotCard;
use gtk4::prelude::*;
use gtk4::subclass::prelude::*;
use libadwaita as adw;
use std::path::PathBuf;
use style_transfer_core::{
    ControlsView, ImageFileFilter, PendingTransfer, PreviewHandle, Resolution, ResultImage,
    ResultView, SlotKind, TransferController,
};

mod imp {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    pub struct StudioView {
        pub controller: RefCell<TransferController>,
        pub content_card: RefCell<Option<SlotCard>>,
        pub style_card: RefCell<Option<SlotCard>>,
        pub transfer_button: RefCell<Option<gtk4::Button>>,
        pub reset_button: RefCell<Option<gtk4::Button>>,
        pub error_label: RefCell<Option<gtk4::Label>>,
        pub result_box: RefCell<Option<gtk4::Box>>,
        pub loading_box: RefCell<Option<gtk4::Box>>,
        pub spinner: RefCell<Option<gtk4::Spinner>>,
        pub result_picture: RefCell<Option<gtk4::Picture>>,
        pub result_footer: RefCell<Option<gtk4::Box>>,
        pub time_label: RefCell<Option<gtk4::Label>>,
        pub download_button: RefCell<Option<gtk4::Button>>,
        pub notice_label: RefCell<Option<gtk4::Label>>,
        /// Result currently on screen and the temp file backing its picture
        pub shown_result: RefCell<Option<ResultImage>>,
        pub result_preview: RefCell<Option<PreviewHandle>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for StudioView {
        const NAME: &'static str = "StyleTransferStudioView";
        type Type = super::StudioView;
        type ParentType = gtk4::Box;
    }

    impl ObjectImpl for StudioView {
        fn constructed(&self) {
            self.parent_constructed();
            self.setup_ui();
            self.render();
        }
    }

    impl WidgetImpl for StudioView {}
    impl BoxImpl for StudioView {}

    impl StudioView {
        fn setup_ui(&self) {
            let obj = self.obj();
            obj.set_orientation(gtk4::Orientation::Vertical);

            let clamp = adw::Clamp::new();
            clamp.set_maximum_size(960);
            clamp.set_margin_top(24);
            clamp.set_margin_bottom(24);
            clamp.set_margin_start(24);
            clamp.set_margin_end(24);

            let content = gtk4::Box::new(gtk4::Orientation::Vertical, 24);

            // Upload slots
            let slots_box = gtk4::Box::new(gtk4::Orientation::Horizontal, 24);
            slots_box.set_homogeneous(true);

            let content_card = self.build_card(SlotKind::Content);
            let style_card = self.build_card(SlotKind::Style);
            slots_box.append(&content_card);
            slots_box.append(&style_card);
            content.append(&slots_box);

            // Actions
            let actions_box = gtk4::Box::new(gtk4::Orientation::Horizontal, 12);
            actions_box.set_halign(gtk4::Align::Center);

            let transfer_button = gtk4::Button::with_label("Transfer Style");
            transfer_button.add_css_class("suggested-action");
            transfer_button.add_css_class("pill");
            transfer_button.connect_clicked(glib::clone!(
                #[weak(rename_to = this)]
                self,
                move |_| {
                    this.submit();
                }
            ));
            actions_box.append(&transfer_button);

            let reset_button = gtk4::Button::with_label("Reset");
            reset_button.add_css_class("pill");
            reset_button.connect_clicked(glib::clone!(
                #[weak(rename_to = this)]
                self,
                move |_| {
                    this.reset();
                }
            ));
            actions_box.append(&reset_button);
            content.append(&actions_box);

            let error_label = gtk4::Label::new(None);
            error_label.add_css_class("error");
            error_label.set_wrap(true);
            error_label.set_justify(gtk4::Justification::Center);
            error_label.set_visible(false);
            content.append(&error_label);

            // Result
            let result_box = gtk4::Box::new(gtk4::Orientation::Vertical, 12);
            result_box.set_visible(false);

            let result_title = gtk4::Label::new(Some("Result"));
            result_title.add_css_class("title-3");
            result_title.set_halign(gtk4::Align::Start);
            result_box.append(&result_title);

            let loading_box = gtk4::Box::new(gtk4::Orientation::Vertical, 12);
            loading_box.set_halign(gtk4::Align::Center);
            loading_box.set_margin_top(24);
            loading_box.set_margin_bottom(24);

            let spinner = gtk4::Spinner::new();
            spinner.set_size_request(32, 32);
            loading_box.append(&spinner);

            let loading_label = gtk4::Label::new(Some("Applying style transfer..."));
            loading_label.add_css_class("dim-label");
            loading_box.append(&loading_label);
            result_box.append(&loading_box);

            let result_picture = gtk4::Picture::new();
            result_picture.set_can_shrink(true);
            result_picture.set_height_request(360);
            result_picture.add_css_class("card");
            result_box.append(&result_picture);

            let result_footer = gtk4::Box::new(gtk4::Orientation::Horizontal, 12);

            let time_label = gtk4::Label::new(None);
            time_label.add_css_class("dim-label");
            time_label.set_halign(gtk4::Align::Start);
            time_label.set_hexpand(true);
            result_footer.append(&time_label);

            let download_button = gtk4::Button::with_label("Download");
            download_button.add_css_class("pill");
            download_button.connect_clicked(glib::clone!(
                #[weak(rename_to = this)]
                self,
                move |_| {
                    this.download();
                }
            ));
            result_footer.append(&download_button);
            result_box.append(&result_footer);

            let notice_label = gtk4::Label::new(None);
            notice_label.add_css_class("dim-label");
            notice_label.set_halign(gtk4::Align::Start);
            notice_label.set_wrap(true);
            notice_label.set_selectable(true);
            notice_label.set_visible(false);
            result_box.append(&notice_label);

            content.append(&result_box);

            clamp.set_child(Some(&content));
            obj.append(&clamp);

            *self.content_card.borrow_mut() = Some(content_card);
            *self.style_card.borrow_mut() = Some(style_card);
            *self.transfer_button.borrow_mut() = Some(transfer_button);
            *self.reset_button.borrow_mut() = Some(reset_button);
            *self.error_label.borrow_mut() = Some(error_label);
            *self.result_box.borrow_mut() = Some(result_box);
            *self.loading_box.borrow_mut() = Some(loading_box);
            *self.spinner.borrow_mut() = Some(spinner);
            *self.result_picture.borrow_mut() = Some(result_picture);
            *self.result_footer.borrow_mut() = Some(result_footer);
            *self.time_label.borrow_mut() = Some(time_label);
            *self.download_button.borrow_mut() = Some(download_button);
            *self.notice_label.borrow_mut() = Some(notice_label);
        }

        fn build_card(&self, kind: SlotKind) -> SlotCard {
            let card = SlotCard::new(kind);
            card.connect_picked(glib::clone!(
                #[weak(rename_to = this)]
                self,
                move |paths| {
                    this.pick(kind, paths);
                }
            ));
            card.connect_removed(glib::clone!(
                #[weak(rename_to = this)]
                self,
                move || {
                    this.controller.borrow_mut().clear(kind);
                    this.render();
                }
            ));
            card
        }

        fn card(&self, kind: SlotKind) -> Option<SlotCard> {
            match kind {
                SlotKind::Content => self.content_card.borrow().clone(),
                SlotKind::Style => self.style_card.borrow().clone(),
            }
        }

        fn pick(&self, kind: SlotKind, paths: Vec<PathBuf>) {
            let Some(card) = self.card(kind) else {
                return;
            };

            match ImageFileFilter::default().pick(&paths) {
                Ok(file) => {
                    tracing::info!("Selected {} for {:?}", file.name(), kind);
                    card.show_rejection(None);
                    self.controller.borrow_mut().select(kind, file);
                }
                Err(e) => {
                    tracing::warn!("Rejected pick for {:?}: {}", kind, e);
                    card.show_rejection(Some(&e.pick_message()));
                }
            }

            self.render();
        }

        fn submit(&self) {
            let Some(app) = self.obj().get_app() else {
                return;
            };
            let Some(bridge) = app.transfer_bridge() else {
                return;
            };

            let submitted = self.controller.borrow_mut().submit();
            match submitted {
                Ok(PendingTransfer { ticket, request }) => {
                    bridge.transfer(
                        request,
                        glib::clone!(
                            #[weak(rename_to = this)]
                            self,
                            move |outcome| {
                                let resolution =
                                    this.controller.borrow_mut().resolve(ticket, outcome);
                                if resolution == Resolution::Applied {
                                    this.render();
                                }
                            }
                        ),
                    );
                }
                Err(e) => {
                    tracing::debug!("Transfer not started: {}", e);
                }
            }

            self.render();
        }

        fn reset(&self) {
            self.controller.borrow_mut().reset();
            for kind in [SlotKind::Content, SlotKind::Style] {
                if let Some(card) = self.card(kind) {
                    card.show_rejection(None);
                }
            }
            self.render();
        }

        fn download(&self) {
            let Some(image) = self.controller.borrow().state().result_image.clone() else {
                return;
            };
            let Some(app) = self.obj().get_app() else {
                return;
            };
            let Some(bridge) = app.transfer_bridge() else {
                return;
            };
            let dir = app.settings().download_dir;

            if let Some(button) = self.download_button.borrow().as_ref() {
                button.set_sensitive(false);
            }

            bridge.save_result(
                image,
                dir,
                glib::clone!(
                    #[weak(rename_to = this)]
                    self,
                    move |result| {
                        if let Some(button) = this.download_button.borrow().as_ref() {
                            button.set_sensitive(true);
                        }
                        match result {
                            Ok(path) => {
                                tracing::info!("Saved result to {}", path.display());
                                this.show_notice(Some(&format!("Saved to {}", path.display())));
                            }
                            Err(e) => {
                                tracing::error!("Failed to save result: {}", e);
                                this.show_notice(Some(&format!("Could not save image: {}", e)));
                            }
                        }
                    }
                ),
            );
        }

        fn show_notice(&self, text: Option<&str>) {
            if let Some(label) = self.notice_label.borrow().as_ref() {
                label.set_text(text.unwrap_or_default());
                label.set_visible(text.is_some());
            }
        }

        /// Refresh every widget from the controller
        fn render(&self) {
            let controller = self.controller.borrow();
            let controls = ControlsView::project(&controller);

            for kind in [SlotKind::Content, SlotKind::Style] {
                if let Some(card) = self.card(kind) {
                    let slot = controller.slot(kind);
                    card.show_file(slot.display_name(), slot.preview_path());
                }
            }

            if let Some(button) = self.transfer_button.borrow().as_ref() {
                button.set_sensitive(controls.submit_enabled);
                button.set_label(controls.submit_label);
            }
            if let Some(button) = self.reset_button.borrow().as_ref() {
                button.set_visible(controls.reset_visible);
            }
            if let Some(label) = self.error_label.borrow().as_ref() {
                label.set_text(controls.error_banner.as_deref().unwrap_or_default());
                label.set_visible(controls.error_banner.is_some());
            }
            if let Some(label) = self.time_label.borrow().as_ref() {
                label.set_text(controls.processing_time_label.as_deref().unwrap_or_default());
            }

            let result = ResultView::project(controller.state());
            let (visible, loading) = match result {
                ResultView::Hidden => (false, false),
                ResultView::Loading => (true, true),
                ResultView::Ready { .. } => (true, false),
            };

            if let Some(result_box) = self.result_box.borrow().as_ref() {
                result_box.set_visible(visible);
            }
            if let Some(loading_box) = self.loading_box.borrow().as_ref() {
                loading_box.set_visible(loading);
            }
            if let Some(spinner) = self.spinner.borrow().as_ref() {
                spinner.set_spinning(loading);
            }
            if let Some(picture) = self.result_picture.borrow().as_ref() {
                picture.set_visible(visible && !loading);
            }
            if let Some(footer) = self.result_footer.borrow().as_ref() {
                footer.set_visible(visible && !loading);
            }

            match result {
                ResultView::Ready {
                    image,
                    download_name,
                } => {
                    if let Some(button) = self.download_button.borrow().as_ref() {
                        button.set_tooltip_text(Some(&format!("Save as {}", download_name)));
                    }
                    let already_shown = self.shown_result.borrow().as_ref() == Some(image);
                    if !already_shown {
                        self.show_result(image.clone());
                    }
                }
                _ => self.clear_result(),
            }
        }

        fn clear_result(&self) {
            self.shown_result.replace(None);
            if let Some(picture) = self.result_picture.borrow().as_ref() {
                picture.set_paintable(None::<&gtk4::gdk::Paintable>);
            }
            self.result_preview.replace(None);
            self.show_notice(None);
        }

        fn show_result(&self, image: ResultImage) {
            self.clear_result();
            self.shown_result.replace(Some(image.clone()));

            let Some(app) = self.obj().get_app() else {
                return;
            };
            let Some(bridge) = app.transfer_bridge() else {
                return;
            };

            bridge.load_result(
                image.clone(),
                glib::clone!(
                    #[weak(rename_to = this)]
                    self,
                    move |result| {
                        // A newer result or a reset replaced this one
                        if this.shown_result.borrow().as_ref() != Some(&image) {
                            return;
                        }
                        match result.and_then(|bytes| PreviewHandle::from_bytes(&bytes, Some("png")))
                        {
                            Ok(handle) => {
                                if let Some(picture) = this.result_picture.borrow().as_ref() {
                                    picture.set_filename(Some(handle.path()));
                                }
                                this.result_preview.replace(Some(handle));
                            }
                            Err(e) => {
                                tracing::warn!("Failed to display result: {}", e);
                                this.show_notice(Some("The result image could not be displayed."));
                            }
                        }
                    }
                ),
            );
        }
    }
}

glib::wrapper! {
    pub struct StudioView(ObjectSubclass<imp::StudioView>)
        @extends gtk4::Box, gtk4::Widget,
        @implements gtk4::Accessible, gtk4::Buildable, gtk4::ConstraintTarget, gtk4::Orientable;
}

impl StudioView {
    pub fn new() -> Self {
        glib::Object::new()
    }

    fn get_app(&self) -> Option<StyleTransferApplication> {
        self.root()
            .and_then(|r| r.downcast::<gtk4::Window>().ok())
            .and_then(|w| w.application())
            .and_then(|a| a.downcast::<StyleTransferApplication>().ok())
    }
}

impl Default for StudioView {
    fn default() -> Self {
        Self::new()
    }
}
