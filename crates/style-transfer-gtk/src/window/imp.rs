// SPDX-License-Identifier: AGPL-3.0
// Style Transfer GTK - Main Window Implementation

use crate::application::StyleTransferApplication;
use crate::views::StudioView;
use gtk4::prelude::*;
use gtk4::subclass::prelude::*;
use gtk4::CompositeTemplate;
use libadwaita as adw;
use libadwaita::subclass::prelude::*;
use std::cell::RefCell;
use style_transfer_core::ServiceHealth;

/// Seconds between service health checks
const HEALTH_POLL_SECS: u32 = 30;

#[derive(Debug, Default, CompositeTemplate)]
#[template(string = r#"
<?xml version="1.0" encoding="UTF-8"?>
<interface>
  <menu id="primary_menu">
    <section>
      <item>
        <attribute name="label">About Style Transfer</attribute>
        <attribute name="action">app.about</attribute>
      </item>
      <item>
        <attribute name="label">Quit</attribute>
        <attribute name="action">app.quit</attribute>
      </item>
    </section>
  </menu>
  <template class="StyleTransferWindow" parent="AdwApplicationWindow">
    <property name="default-width">1024</property>
    <property name="default-height">860</property>
    <property name="title">Style Transfer</property>
    <property name="content">
      <object class="AdwToolbarView">
        <child type="top">
          <object class="AdwHeaderBar">
            <property name="title-widget">
              <object class="AdwWindowTitle">
                <property name="title">Style Transfer</property>
                <property name="subtitle">Transform your images with artistic styles</property>
              </object>
            </property>
            <child type="start">
              <object class="GtkBox" id="status_box">
                <property name="orientation">horizontal</property>
                <property name="spacing">8</property>
                <property name="margin-start">8</property>
                <child>
                  <object class="GtkBox" id="status_indicator">
                    <property name="width-request">8</property>
                    <property name="height-request">8</property>
                    <property name="valign">center</property>
                    <style>
                      <class name="status-dot"/>
                    </style>
                  </object>
                </child>
                <child>
                  <object class="GtkLabel" id="status_label">
                    <property name="label">Connecting…</property>
                    <style>
                      <class name="dim-label"/>
                    </style>
                  </object>
                </child>
              </object>
            </child>
            <child type="end">
              <object class="GtkMenuButton">
                <property name="icon-name">open-menu-symbolic</property>
                <property name="menu-model">primary_menu</property>
              </object>
            </child>
          </object>
        </child>
        <property name="content">
          <object class="GtkScrolledWindow" id="content_scroller">
            <property name="hexpand">true</property>
            <property name="vexpand">true</property>
            <property name="hscrollbar-policy">never</property>
          </object>
        </property>
      </object>
    </property>
  </template>
</interface>
"#)]
pub struct StyleTransferWindow {
    #[template_child]
    pub content_scroller: TemplateChild<gtk4::ScrolledWindow>,
    #[template_child]
    pub status_label: TemplateChild<gtk4::Label>,
    #[template_child]
    pub status_indicator: TemplateChild<gtk4::Box>,

    pub studio_view: RefCell<Option<StudioView>>,
}

#[glib::object_subclass]
impl ObjectSubclass for StyleTransferWindow {
    const NAME: &'static str = "StyleTransferWindow";
    type Type = super::StyleTransferWindow;
    type ParentType = adw::ApplicationWindow;

    fn class_init(klass: &mut Self::Class) {
        klass.bind_template();
    }

    fn instance_init(obj: &glib::subclass::InitializingObject<Self>) {
        obj.init_template();
    }
}

impl StyleTransferWindow {
    fn setup_styles(&self) {
        let css_provider = gtk4::CssProvider::new();
        css_provider.load_from_data(
            r#"
            .status-dot {
                border-radius: 4px;
                background-color: @insensitive_fg_color;
            }
            .status-dot.online {
                background-color: @success_color;
            }
            .status-dot.loading {
                background-color: @warning_color;
            }
            .status-dot.offline {
                background-color: @error_color;
            }
            "#,
        );
        gtk4::style_context_add_provider_for_display(
            &self.obj().display(),
            &css_provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }

    fn setup_views(&self) {
        let studio_view = StudioView::new();
        self.content_scroller.set_child(Some(&studio_view));
        *self.studio_view.borrow_mut() = Some(studio_view);
    }

    /// Reflect the latest health check in the header
    pub fn update_service_status(&self, health: Option<&ServiceHealth>) {
        for class in ["online", "loading", "offline"] {
            self.status_indicator.remove_css_class(class);
        }

        let (class, text) = match health {
            Some(h) if h.is_healthy() && h.model_loaded => ("online", "Service ready"),
            Some(h) if h.is_healthy() => ("loading", "Model loading"),
            Some(_) => ("offline", "Service degraded"),
            None => ("offline", "Service unreachable"),
        };

        self.status_indicator.add_css_class(class);
        self.status_label.set_text(text);
        if let Some(status) = health.and_then(|h| h.model_status.as_deref()) {
            self.status_label.set_tooltip_text(Some(status));
        }
    }

    pub fn setup_service_status(&self, app: &StyleTransferApplication) {
        let settings = app.settings();
        self.status_box_tooltip(&settings.api_base_url);

        self.poll_health(app);

        let app_weak = app.downgrade();
        glib::timeout_add_seconds_local(
            HEALTH_POLL_SECS,
            glib::clone!(
                #[weak(rename_to = this)]
                self,
                #[upgrade_or]
                glib::ControlFlow::Break,
                move || {
                    let Some(app) = app_weak.upgrade() else {
                        return glib::ControlFlow::Break;
                    };
                    this.poll_health(&app);
                    glib::ControlFlow::Continue
                }
            ),
        );
    }

    fn status_box_tooltip(&self, api_base_url: &str) {
        self.status_indicator
            .set_tooltip_text(Some(&format!("Processing service: {}", api_base_url)));
    }

    fn poll_health(&self, app: &StyleTransferApplication) {
        let Some(bridge) = app.transfer_bridge() else {
            return;
        };

        bridge.check_health(glib::clone!(
            #[weak(rename_to = this)]
            self,
            move |result| match result {
                Ok(health) => {
                    tracing::debug!("Service health: {:?}", health);
                    this.update_service_status(Some(&health));
                }
                Err(e) => {
                    tracing::warn!("Health check failed: {}", e);
                    this.update_service_status(None);
                }
            }
        ));
    }
}

impl ObjectImpl for StyleTransferWindow {
    fn constructed(&self) {
        self.parent_constructed();
        self.setup_styles();
        self.setup_views();
        // Note: setup_service_status is called from application.rs after window is fully constructed
    }
}

impl WidgetImpl for StyleTransferWindow {}
impl WindowImpl for StyleTransferWindow {}
impl ApplicationWindowImpl for StyleTransferWindow {}
impl AdwApplicationWindowImpl for StyleTransferWindow {}
