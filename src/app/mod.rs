//! App module - contains the main application state and logic

mod controller;
mod render;
mod requests;
mod views;

pub use controller::{Event, Status};

use controller::Controller;
use render::ProfileListState;

use crate::api::{ApiError, HttpScrapeApi};
use crate::constants::DEFAULT_SERVER_URL;
use crate::settings::Settings;
use crate::theme;
use eframe::egui;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    // View-model
    pub(crate) controller: Controller,
    pub(crate) profiles: ProfileListState,
    // Networking
    pub(crate) api: Arc<HttpScrapeApi>,
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) events_tx: UnboundedSender<Event>,
    pub(crate) events_rx: UnboundedReceiver<Event>,
    pub(crate) page_loaded: bool,
    // Settings
    pub(crate) settings: Settings,
    pub(crate) data_dir: PathBuf,
    pub(crate) show_settings: bool,
    pub(crate) server_url_input: String,
    pub(crate) settings_error: Option<String>,
    // Window
    pub(crate) logo_texture: Option<egui::TextureHandle>,
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    /// `server_url` is the url for this session; it may come from the
    /// environment instead of `settings`.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        server_url: String,
        data_dir: PathBuf,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        let runtime = tokio::runtime::Runtime::new()?;
        let api = resolve_api(&server_url, &settings)?;
        info!(server = %api.base_url(), "Scrape server configured");

        let (events_tx, events_rx) = unbounded_channel();

        Ok(Self {
            controller: Controller::default(),
            profiles: ProfileListState::default(),
            server_url_input: api.base_url().to_string(),
            api: Arc::new(api),
            runtime,
            events_tx,
            events_rx,
            page_loaded: false,
            settings,
            data_dir,
            show_settings: false,
            settings_error: None,
            logo_texture: None,
            window_pos: None,
            window_size: None,
            needs_center: false,
        })
    }

    /// Point subsequent requests at a new server. Requests already in flight
    /// keep the client they were issued with.
    pub(crate) fn apply_server_url(&mut self, server_url: &str) -> Result<(), ApiError> {
        let api = HttpScrapeApi::new(server_url, self.settings.request_timeout())?;
        info!(server = %api.base_url(), "Scrape server changed");
        self.settings.server_url = api.base_url().to_string();
        self.server_url_input = api.base_url().to_string();
        self.api = Arc::new(api);
        Ok(())
    }

    pub fn save_settings(&mut self) {
        self.settings.window_x = self.window_pos.map(|p| p.x);
        self.settings.window_y = self.window_pos.map(|p| p.y);
        self.settings.window_w = self.window_size.map(|s| s.x);
        self.settings.window_h = self.window_size.map(|s| s.y);
        self.settings.save(&self.data_dir);
    }
}

/// Build the client for the session url, falling back to the saved url and
/// then to the built-in default when a candidate does not parse.
fn resolve_api(server_url: &str, settings: &Settings) -> Result<HttpScrapeApi, ApiError> {
    let timeout = settings.request_timeout();
    HttpScrapeApi::new(server_url, timeout)
        .or_else(|e| {
            warn!(error = %e, fallback = %settings.server_url, "Invalid server url, using saved url");
            HttpScrapeApi::new(&settings.server_url, timeout)
        })
        .or_else(|e| {
            warn!(error = %e, fallback = DEFAULT_SERVER_URL, "Invalid saved url, using default");
            HttpScrapeApi::new(DEFAULT_SERVER_URL, timeout)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with(url: &str) -> Settings {
        Settings {
            server_url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn session_url_wins_when_valid() {
        let api = resolve_api("http://env:9000/", &settings_with("http://saved:5000")).unwrap();
        assert_eq!(api.base_url(), "http://env:9000");
    }

    #[test]
    fn bad_session_url_falls_back_to_saved() {
        let api = resolve_api("not a url", &settings_with("http://saved:5000")).unwrap();
        assert_eq!(api.base_url(), "http://saved:5000");
    }

    #[test]
    fn default_is_last_resort() {
        let api = resolve_api("not a url", &settings_with("ftp://saved")).unwrap();
        assert_eq!(api.base_url(), DEFAULT_SERVER_URL);
    }
}
