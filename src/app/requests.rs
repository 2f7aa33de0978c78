//! Issuing controller requests on the tokio runtime

use super::controller::Event;
use super::App;
use crate::api::ScrapeApi;
use crate::types::{Request, RequestKind};
use eframe::egui;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

/// Run one request against `api` and wrap the outcome as a response event.
pub async fn execute<A: ScrapeApi>(api: &A, request: Request) -> Event {
    let result = match request.kind {
        RequestKind::StartScrape => api.start_scrape().await,
        RequestKind::ListProfiles => api.list_profiles().await,
    };
    debug!(seq = request.seq, kind = request.kind.label(), ok = result.is_ok(), "Request finished");
    Event::Response {
        seq: request.seq,
        kind: request.kind,
        result,
    }
}

/// Spawn a request and post its response back to the UI thread.
fn spawn_request<A: ScrapeApi + 'static>(
    api: Arc<A>,
    request: Request,
    events: UnboundedSender<Event>,
    ctx: egui::Context,
    runtime: &tokio::runtime::Runtime,
) {
    runtime.spawn(async move {
        let event = execute(api.as_ref(), request).await;
        // The receiver only goes away when the app is shutting down
        let _ = events.send(event);
        ctx.request_repaint();
    });
}

impl App {
    /// Feed an event through the controller and issue whatever it asks for.
    pub(crate) fn dispatch(&mut self, event: Event, ctx: &egui::Context) {
        if let Some(request) = self.controller.update(event, &mut self.profiles) {
            spawn_request(
                self.api.clone(),
                request,
                self.events_tx.clone(),
                ctx.clone(),
                &self.runtime,
            );
        }
    }

    /// Drain responses that arrived since the last frame.
    pub(crate) fn poll_responses(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.dispatch(event, ctx);
        }
    }
}
