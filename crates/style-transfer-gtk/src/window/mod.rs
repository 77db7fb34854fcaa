// SPDX-License-Identifier: AGPL-3.0
// Style Transfer GTK - Main Window

mod imp;

use crate::application::StyleTransferApplication;
use gtk4::subclass::prelude::ObjectSubclassIsExt;
use libadwaita as adw;

glib::wrapper! {
    pub struct StyleTransferWindow(ObjectSubclass<imp::StyleTransferWindow>)
        @extends adw::ApplicationWindow, gtk4::ApplicationWindow, gtk4::Window, gtk4::Widget,
        @implements gtk4::Accessible, gtk4::Buildable, gtk4::ConstraintTarget,
                    gtk4::Native, gtk4::Root, gtk4::ShortcutManager;
}

impl StyleTransferWindow {
    pub fn new(app: &StyleTransferApplication) -> Self {
        glib::Object::builder().property("application", app).build()
    }

    pub fn setup_service_status(&self, app: &StyleTransferApplication) {
        self.imp().setup_service_status(app);
    }
}
