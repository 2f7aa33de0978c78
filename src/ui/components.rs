//! Reusable UI components
//!
//! This module contains standalone UI components that can be used
//! throughout the application.

use crate::app::Status;
use crate::constants::VIEW_PROFILE_LABEL;
use crate::theme;
use crate::types::Profile;
use eframe::egui;
use tracing::{debug, warn};

/// Text color for the status label
pub fn status_color(status: &Status) -> egui::Color32 {
    match status {
        Status::Idle => theme::TEXT_MUTED,
        Status::Scraping => theme::STATUS_WARNING,
        Status::Complete => theme::STATUS_SUCCESS,
        Status::Error(_) => theme::STATUS_ERROR,
    }
}

/// "1 profile", "12 profiles"
pub fn profile_count_label(count: usize) -> String {
    if count == 1 {
        "1 profile".to_string()
    } else {
        format!("{} profiles", count)
    }
}

/// Status label, with a spinner while requests are outstanding
pub fn status_label(ui: &mut egui::Ui, status: &Status, in_flight: usize) {
    ui.horizontal(|ui| {
        if in_flight > 0 {
            ui.add(egui::Spinner::new().size(theme::FONT_BODY).color(theme::ACCENT));
        }
        ui.add(
            egui::Label::new(
                egui::RichText::new(status.text())
                    .size(theme::FONT_BODY)
                    .color(status_color(status)),
            )
            .selectable(true),
        );
    });
}

/// Name cell and link cell for one profile row. Opens the url in the
/// system browser when the link is clicked.
pub fn profile_row(row: &mut egui_extras::TableRow<'_, '_>, profile: &Profile) {
    row.col(|ui| {
        ui.add(
            egui::Label::new(
                egui::RichText::new(&profile.name)
                    .size(theme::FONT_BODY)
                    .color(theme::TEXT_PRIMARY),
            )
            .truncate(),
        );
    });
    row.col(|ui| {
        let link = ui
            .link(
                egui::RichText::new(format!(
                    "{}  {}",
                    egui_phosphor::regular::ARROW_SQUARE_OUT,
                    VIEW_PROFILE_LABEL
                ))
                .size(theme::FONT_LABEL),
            )
            .on_hover_text(&profile.url);
        if link.clicked() {
            open_profile(&profile.url);
        }
    });
}

fn open_profile(url: &str) {
    debug!(url = %url, "Opening profile");
    if let Err(e) = open::that_detached(url) {
        warn!(error = %e, url = %url, "Failed to open profile url");
    }
}
