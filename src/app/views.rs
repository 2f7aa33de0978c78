//! View rendering (header, profile list, settings window)

use super::controller::Event;
use super::App;
use crate::constants::APP_NAME;
use crate::theme;
use crate::ui::components::{profile_count_label, profile_row, status_label};
use crate::utils;
use eframe::egui;
use tracing::warn;

impl App {
    pub(crate) fn render_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header")
            .exact_height(theme::HEADER_HEIGHT)
            .show_separator_line(false)
            .frame(theme::header_frame())
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    if self.logo_texture.is_none() {
                        self.logo_texture = utils::rasterize_icon(theme::LOGO_SIZE as u32 * 2).map(
                            |(pixels, w, h)| {
                                ctx.load_texture(
                                    "logo",
                                    egui::ColorImage::from_rgba_unmultiplied(
                                        [w as usize, h as usize],
                                        &pixels,
                                    ),
                                    egui::TextureOptions::LINEAR,
                                )
                            },
                        );
                    }
                    if let Some(texture) = &self.logo_texture {
                        ui.image(egui::load::SizedTexture::new(
                            texture.id(),
                            egui::vec2(theme::LOGO_SIZE, theme::LOGO_SIZE),
                        ));
                    }
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(APP_NAME.to_uppercase())
                                .size(theme::FONT_TITLE)
                                .color(theme::TEXT_PRIMARY),
                        )
                        .selectable(false),
                    );
                    ui.add_space(theme::SPACING_XL);

                    // No guard against clicking again while a scrape is running
                    let start = ui.add_sized(
                        [140.0, theme::BUTTON_HEIGHT],
                        theme::button_accent(format!(
                            "{}  Start Scrape",
                            egui_phosphor::regular::PLAY
                        )),
                    );
                    if start.clicked() {
                        self.dispatch(Event::StartScrapeClicked, ctx);
                    }

                    ui.add_space(theme::SPACING_MD);
                    status_label(ui, self.controller.status(), self.controller.in_flight());

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let gear = ui
                            .add(theme::button(egui_phosphor::regular::GEAR_SIX))
                            .on_hover_text("Settings");
                        if gear.clicked() {
                            self.server_url_input = self.api.base_url().to_string();
                            self.settings_error = None;
                            self.show_settings = true;
                        }
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(profile_count_label(self.profiles.len()))
                                    .size(theme::FONT_LABEL)
                                    .color(theme::TEXT_DIM),
                            )
                            .selectable(false),
                        );
                    });
                });
            });
    }

    pub(crate) fn render_profile_list(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::same(theme::SPACING_XL as i8)),
            )
            .show(ctx, |ui| {
                if self.profiles.is_empty() {
                    ui.centered_and_justified(|ui| {
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new("No profiles yet. Start a scrape to collect some.")
                                    .size(theme::FONT_BODY)
                                    .color(theme::TEXT_DIM),
                            )
                            .selectable(false),
                        );
                    });
                    return;
                }

                use egui_extras::{Column, TableBuilder};

                theme::section_frame().show(ui, |ui| {
                    TableBuilder::new(ui)
                        .striped(true)
                        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                        .column(Column::initial(320.0).at_least(160.0).resizable(true).clip(true))
                        .column(Column::remainder().at_least(120.0))
                        .header(theme::ROW_HEIGHT * 0.75, |mut header| {
                            for title in ["NAME", "PROFILE"] {
                                header.col(|ui| {
                                    ui.label(
                                        egui::RichText::new(title)
                                            .size(theme::FONT_SMALL)
                                            .color(theme::TEXT_DIM),
                                    );
                                });
                            }
                        })
                        .body(|body| {
                            let items = self.profiles.items();
                            body.rows(theme::ROW_HEIGHT, items.len(), |mut row| {
                                let profile = &items[row.index()];
                                profile_row(&mut row, profile);
                            });
                        });
                });
            });
    }

    pub(crate) fn render_settings_window(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }

        let modal = egui::Modal::new(egui::Id::new("settings_modal"))
            .frame(theme::modal_frame())
            .show(ctx, |ui| {
                ui.set_width(theme::SETTINGS_WIDTH);
                ui.label(
                    egui::RichText::new("Settings")
                        .size(theme::FONT_TITLE)
                        .color(theme::TEXT_PRIMARY),
                );
                ui.add_space(theme::SPACING_LG);
                ui.label(
                    egui::RichText::new("SERVER URL")
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_DIM),
                );
                let input = ui.add(
                    egui::TextEdit::singleline(&mut self.server_url_input)
                        .hint_text("http://127.0.0.1:5000")
                        .desired_width(f32::INFINITY),
                );
                let submitted = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                if let Some(err) = &self.settings_error {
                    ui.add_space(theme::SPACING_SM);
                    ui.label(
                        egui::RichText::new(err)
                            .size(theme::FONT_LABEL)
                            .color(theme::STATUS_ERROR),
                    );
                }

                ui.add_space(theme::SPACING_LG);
                ui.horizontal(|ui| {
                    let save = ui.add(theme::button_accent("Save")).clicked();
                    let cancel = ui.add(theme::button("Cancel")).clicked();
                    (save || submitted, cancel)
                })
                .inner
            });

        let (save, cancel) = modal.inner;
        if save {
            let url = self.server_url_input.clone();
            match self.apply_server_url(&url) {
                Ok(()) => {
                    self.settings_error = None;
                    self.show_settings = false;
                    self.save_settings();
                }
                Err(e) => {
                    warn!(error = %e, "Rejected server url");
                    self.settings_error = Some(e.to_string());
                }
            }
        } else if cancel || modal.should_close() {
            self.show_settings = false;
        }
    }
}
