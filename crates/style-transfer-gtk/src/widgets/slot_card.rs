// SPDX-License-Identifier: AGPL-3.0
// Style Transfer GTK - Upload slot card
//
// Click-or-drop target for one image. The card only reports picked paths;
// the studio view validates them and tells the card what to show.

use gtk4::gdk;
use gtk4::gio;
use gtk4::prelude::*;
use gtk4::subclass::prelude::*;
use std::path::{Path, PathBuf};
use style_transfer_core::slot::ALLOWED_EXTENSIONS;
use style_transfer_core::SlotKind;

type PickedHandler = Box<dyn Fn(Vec<PathBuf>)>;
type RemovedHandler = Box<dyn Fn()>;

mod imp {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    pub struct SlotCard {
        pub title: RefCell<Option<gtk4::Label>>,
        pub prompt: RefCell<Option<gtk4::Label>>,
        pub stack: RefCell<Option<gtk4::Stack>>,
        pub picture: RefCell<Option<gtk4::Picture>>,
        pub info_box: RefCell<Option<gtk4::Box>>,
        pub name_label: RefCell<Option<gtk4::Label>>,
        pub rejection_label: RefCell<Option<gtk4::Label>>,
        pub on_picked: RefCell<Option<PickedHandler>>,
        pub on_removed: RefCell<Option<RemovedHandler>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for SlotCard {
        const NAME: &'static str = "StyleTransferSlotCard";
        type Type = super::SlotCard;
        type ParentType = gtk4::Box;
    }

    impl ObjectImpl for SlotCard {
        fn constructed(&self) {
            self.parent_constructed();
            self.setup_ui();
        }
    }

    impl WidgetImpl for SlotCard {}
    impl BoxImpl for SlotCard {}

    impl SlotCard {
        fn setup_ui(&self) {
            let obj = self.obj();
            obj.set_orientation(gtk4::Orientation::Vertical);
            obj.set_spacing(8);
            obj.set_hexpand(true);

            let title = gtk4::Label::new(None);
            title.add_css_class("title-3");
            title.set_halign(gtk4::Align::Start);
            obj.append(&title);

            // Drop zone: placeholder or preview
            let stack = gtk4::Stack::new();
            stack.set_transition_type(gtk4::StackTransitionType::Crossfade);
            stack.set_height_request(260);
            stack.add_css_class("card");
            stack.set_cursor_from_name(Some("pointer"));

            let placeholder = gtk4::Box::new(gtk4::Orientation::Vertical, 8);
            placeholder.set_valign(gtk4::Align::Center);
            placeholder.set_halign(gtk4::Align::Center);

            let icon = gtk4::Image::from_icon_name("document-send-symbolic");
            icon.set_pixel_size(48);
            icon.add_css_class("dim-label");
            placeholder.append(&icon);

            let prompt = gtk4::Label::new(None);
            prompt.add_css_class("heading");
            placeholder.append(&prompt);

            let hint = gtk4::Label::new(Some("PNG, JPG, JPEG, WEBP (max 10MB)"));
            hint.add_css_class("dim-label");
            hint.add_css_class("caption");
            placeholder.append(&hint);

            stack.add_named(&placeholder, Some("empty"));

            let picture = gtk4::Picture::new();
            picture.set_can_shrink(true);
            picture.set_tooltip_text(Some("Click to change"));
            stack.add_named(&picture, Some("preview"));
            stack.set_visible_child_name("empty");

            let click = gtk4::GestureClick::new();
            click.connect_released(glib::clone!(
                #[weak(rename_to = this)]
                self,
                #[weak]
                stack,
                move |_, _, _, _| {
                    this.show_file_chooser(stack.upcast_ref());
                }
            ));
            stack.add_controller(click);

            let drop_target =
                gtk4::DropTarget::new(gdk::FileList::static_type(), gdk::DragAction::COPY);
            drop_target.connect_drop(glib::clone!(
                #[weak(rename_to = this)]
                self,
                #[upgrade_or]
                false,
                move |_, value, _, _| {
                    let Ok(file_list) = value.get::<gdk::FileList>() else {
                        return false;
                    };
                    let paths: Vec<PathBuf> =
                        file_list.files().iter().filter_map(|f| f.path()).collect();
                    this.emit_picked(paths);
                    true
                }
            ));
            stack.add_controller(drop_target);

            obj.append(&stack);

            // File name and remove button
            let info_box = gtk4::Box::new(gtk4::Orientation::Horizontal, 8);
            info_box.set_visible(false);

            let name_label = gtk4::Label::new(None);
            name_label.set_halign(gtk4::Align::Start);
            name_label.set_hexpand(true);
            name_label.set_ellipsize(gtk4::pango::EllipsizeMode::Middle);
            info_box.append(&name_label);

            let remove_button = gtk4::Button::from_icon_name("window-close-symbolic");
            remove_button.set_tooltip_text(Some("Remove image"));
            remove_button.add_css_class("flat");
            remove_button.add_css_class("circular");
            remove_button.connect_clicked(glib::clone!(
                #[weak(rename_to = this)]
                self,
                move |_| {
                    if let Some(handler) = this.on_removed.borrow().as_ref() {
                        handler();
                    }
                }
            ));
            info_box.append(&remove_button);
            obj.append(&info_box);

            let rejection_label = gtk4::Label::new(None);
            rejection_label.add_css_class("error");
            rejection_label.set_halign(gtk4::Align::Start);
            rejection_label.set_wrap(true);
            rejection_label.set_visible(false);
            obj.append(&rejection_label);

            *self.title.borrow_mut() = Some(title);
            *self.prompt.borrow_mut() = Some(prompt);
            *self.stack.borrow_mut() = Some(stack);
            *self.picture.borrow_mut() = Some(picture);
            *self.info_box.borrow_mut() = Some(info_box);
            *self.name_label.borrow_mut() = Some(name_label);
            *self.rejection_label.borrow_mut() = Some(rejection_label);
        }

        fn emit_picked(&self, paths: Vec<PathBuf>) {
            if let Some(handler) = self.on_picked.borrow().as_ref() {
                handler(paths);
            }
        }

        fn show_file_chooser(&self, widget: &gtk4::Widget) {
            let window = widget
                .root()
                .and_then(|r| r.downcast::<gtk4::Window>().ok());

            let dialog = gtk4::FileChooserDialog::new(
                Some("Select Image"),
                window.as_ref(),
                gtk4::FileChooserAction::Open,
                &[
                    ("Cancel", gtk4::ResponseType::Cancel),
                    ("Select", gtk4::ResponseType::Accept),
                ],
            );
            dialog.set_modal(true);
            dialog.set_select_multiple(false);

            let filter = gtk4::FileFilter::new();
            filter.set_name(Some("Images"));
            for ext in ALLOWED_EXTENSIONS {
                filter.add_pattern(&format!("*.{}", ext));
                filter.add_pattern(&format!("*.{}", ext.to_uppercase()));
            }
            dialog.add_filter(&filter);

            dialog.connect_response(glib::clone!(
                #[weak(rename_to = this)]
                self,
                move |dialog, response| {
                    if response == gtk4::ResponseType::Accept {
                        if let Some(path) = dialog.file().and_then(|f: gio::File| f.path()) {
                            this.emit_picked(vec![path]);
                        }
                    }
                    dialog.close();
                }
            ));

            dialog.show();
        }
    }
}

glib::wrapper! {
    pub struct SlotCard(ObjectSubclass<imp::SlotCard>)
        @extends gtk4::Box, gtk4::Widget,
        @implements gtk4::Accessible, gtk4::Buildable, gtk4::ConstraintTarget, gtk4::Orientable;
}

impl SlotCard {
    pub fn new(kind: SlotKind) -> Self {
        let card: Self = glib::Object::new();
        let imp = card.imp();
        if let Some(title) = imp.title.borrow().as_ref() {
            title.set_text(kind.title());
        }
        if let Some(prompt) = imp.prompt.borrow().as_ref() {
            prompt.set_text(kind.prompt());
        }
        card
    }

    /// Called with the paths from a click-pick or a drop
    pub fn connect_picked<F: Fn(Vec<PathBuf>) + 'static>(&self, handler: F) {
        *self.imp().on_picked.borrow_mut() = Some(Box::new(handler));
    }

    /// Called when the remove button is pressed
    pub fn connect_removed<F: Fn() + 'static>(&self, handler: F) {
        *self.imp().on_removed.borrow_mut() = Some(Box::new(handler));
    }

    /// Show the slot's current file, or the placeholder when empty
    pub fn show_file(&self, name: Option<&str>, preview: Option<&Path>) {
        let imp = self.imp();

        if let Some(picture) = imp.picture.borrow().as_ref() {
            match preview {
                Some(path) => picture.set_filename(Some(path)),
                None => picture.set_paintable(None::<&gdk::Paintable>),
            }
        }
        if let Some(stack) = imp.stack.borrow().as_ref() {
            stack.set_visible_child_name(if name.is_some() { "preview" } else { "empty" });
        }
        if let Some(label) = imp.name_label.borrow().as_ref() {
            label.set_text(name.unwrap_or_default());
        }
        if let Some(info_box) = imp.info_box.borrow().as_ref() {
            info_box.set_visible(name.is_some());
        }
    }

    /// Explain why the last pick was turned down; `None` hides the message
    pub fn show_rejection(&self, reason: Option<&str>) {
        if let Some(label) = self.imp().rejection_label.borrow().as_ref() {
            label.set_text(reason.unwrap_or_default());
            label.set_visible(reason.is_some());
        }
    }
}
