// SPDX-License-Identifier: AGPL-3.0
// Style Transfer GTK - Application

use crate::services::TransferBridge;
use crate::window::StyleTransferWindow;
use gtk4::gio;
use gtk4::prelude::*;
use gtk4::subclass::prelude::ObjectSubclassIsExt;
use libadwaita as adw;
use std::cell::OnceCell;
use style_transfer_core::{AppError, AppSettings, SettingsStore, StyleTransferClient};

mod imp {
    use super::*;
    use gtk4::subclass::prelude::*;
    use libadwaita::subclass::prelude::*;

    #[derive(Default)]
    pub struct StyleTransferApplication {
        pub settings_store: OnceCell<SettingsStore>,
        pub transfer_bridge: OnceCell<TransferBridge>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for StyleTransferApplication {
        const NAME: &'static str = "StyleTransferApplication";
        type Type = super::StyleTransferApplication;
        type ParentType = adw::Application;
    }

    impl ObjectImpl for StyleTransferApplication {}

    impl ApplicationImpl for StyleTransferApplication {
        fn activate(&self) {
            let app = self.obj();

            // Initialize services if not already done
            if self.settings_store.get().is_none() {
                if let Err(e) = app.init_services() {
                    tracing::error!("Failed to start: {}", e);
                    app.quit();
                    return;
                }
            }

            // Create window
            let window = StyleTransferWindow::new(&app);

            // Start health polling after window is fully constructed
            window.setup_service_status(&app);

            window.present();
        }

        fn startup(&self) {
            self.parent_startup();

            // Set up application actions
            let app = self.obj();
            app.setup_actions();
        }
    }

    impl GtkApplicationImpl for StyleTransferApplication {}
    impl AdwApplicationImpl for StyleTransferApplication {}
}

glib::wrapper! {
    pub struct StyleTransferApplication(ObjectSubclass<imp::StyleTransferApplication>)
        @extends gio::Application, gtk4::Application, adw::Application,
        @implements gio::ActionGroup, gio::ActionMap;
}

impl StyleTransferApplication {
    pub fn new(app_id: &str) -> Self {
        glib::Object::builder()
            .property("application-id", app_id)
            .property("flags", gio::ApplicationFlags::default())
            .build()
    }

    fn init_services(&self) -> Result<(), AppError> {
        let imp = self.imp();

        // Settings and client
        let settings_store = SettingsStore::new()?;
        let settings = settings_store.get();
        let client = StyleTransferClient::new(&settings)?;
        let transfer_bridge = TransferBridge::new(client)?;

        tracing::info!("Using processing service at {}", settings.api_base_url);

        let _ = imp.settings_store.set(settings_store);
        let _ = imp.transfer_bridge.set(transfer_bridge);

        self.apply_theme(&settings.theme);
        Ok(())
    }

    fn setup_actions(&self) {
        // Quit action
        let quit_action = gio::SimpleAction::new("quit", None);
        quit_action.connect_activate(glib::clone!(
            #[weak(rename_to = app)]
            self,
            move |_, _| {
                app.quit();
            }
        ));
        self.add_action(&quit_action);

        // About action
        let about_action = gio::SimpleAction::new("about", None);
        about_action.connect_activate(glib::clone!(
            #[weak(rename_to = app)]
            self,
            move |_, _| {
                app.show_about_dialog();
            }
        ));
        self.add_action(&about_action);

        // Set up keyboard shortcuts
        self.set_accels_for_action("app.quit", &["<Control>q"]);
    }

    fn show_about_dialog(&self) {
        let window = self.active_window();

        let dialog = adw::AboutWindow::builder()
            .application_name("Style Transfer")
            .application_icon("applications-graphics-symbolic")
            .version(env!("CARGO_PKG_VERSION"))
            .developer_name("Style Transfer Contributors")
            .license_type(gtk4::License::Agpl30)
            .comments("Apply the style of one image to the content of another.")
            .build();

        if let Some(win) = window {
            dialog.set_transient_for(Some(&win));
        }
        dialog.present();
    }

    pub fn apply_theme(&self, theme: &str) {
        let style_manager = adw::StyleManager::default();

        let color_scheme = match theme {
            "dark" => adw::ColorScheme::ForceDark,
            "light" => adw::ColorScheme::ForceLight,
            _ => adw::ColorScheme::Default,
        };

        style_manager.set_color_scheme(color_scheme);
    }

    pub fn transfer_bridge(&self) -> Option<&TransferBridge> {
        self.imp().transfer_bridge.get()
    }

    pub fn settings(&self) -> AppSettings {
        self.imp()
            .settings_store
            .get()
            .map(|store| store.get())
            .unwrap_or_default()
    }
}
