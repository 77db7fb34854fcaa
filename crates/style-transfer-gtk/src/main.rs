// SPDX-License-Identifier: AGPL-3.0
// Style Transfer GTK - GTK4/Libadwaita frontend

mod application;
mod services;
mod views;
mod widgets;
mod window;

use gtk4::prelude::*;
use tracing_subscriber::EnvFilter;

const APP_ID: &str = "com.styletransfer.Client";

fn main() -> glib::ExitCode {
    // Initialize logging
    let mut filter = EnvFilter::from_default_env();
    for directive in ["style_transfer_gtk=info", "style_transfer_core=info"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting Style Transfer GTK v{}", env!("CARGO_PKG_VERSION"));

    // Create and run application
    let app = application::StyleTransferApplication::new(APP_ID);
    app.run()
}
