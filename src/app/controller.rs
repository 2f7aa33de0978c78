//! Scrape controller: turns UI and network events into view-model updates
//!
//! `Controller::update` is the only place the status label and the profile list
//! change. It never touches the network itself; instead it hands back the
//! `Request` that should be issued, and the result comes back later as
//! `Event::Response`.
//!
//! Every request gets a sequence number. A response older than the last one
//! that was applied is dropped, so a slow early reply can never overwrite the
//! result of a later one.

use super::render::{render_profiles, ProfileList};
use crate::api::ApiError;
use crate::constants::*;
use crate::types::{Envelope, Request, RequestKind};
use tracing::{debug, info, warn};

/// What the status label shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Idle,
    Scraping,
    Complete,
    Error(String),
}

impl Status {
    pub fn text(&self) -> String {
        match self {
            Status::Idle => STATUS_IDLE_TEXT.to_string(),
            Status::Scraping => STATUS_SCRAPING_TEXT.to_string(),
            Status::Complete => STATUS_COMPLETE_TEXT.to_string(),
            Status::Error(message) => format!("{}{}", STATUS_ERROR_PREFIX, message),
        }
    }
}

#[derive(Debug)]
pub enum Event {
    /// First frame of the window
    PageLoaded,
    StartScrapeClicked,
    Response {
        seq: u64,
        kind: RequestKind,
        result: Result<Envelope, ApiError>,
    },
}

pub struct Controller {
    status: Status,
    next_seq: u64,
    last_applied_seq: u64,
    in_flight: usize,
}

impl Default for Controller {
    fn default() -> Self {
        Self {
            status: Status::Idle,
            next_seq: 1,
            last_applied_seq: 0,
            in_flight: 0,
        }
    }
}

impl Controller {
    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    #[cfg(test)]
    pub fn last_applied_seq(&self) -> u64 {
        self.last_applied_seq
    }

    /// Apply one event. Returns the request to issue, if the event calls for one.
    pub fn update<L: ProfileList + ?Sized>(&mut self, event: Event, list: &mut L) -> Option<Request> {
        match event {
            Event::PageLoaded => Some(self.issue(RequestKind::ListProfiles)),
            Event::StartScrapeClicked => {
                self.status = Status::Scraping;
                Some(self.issue(RequestKind::StartScrape))
            }
            Event::Response { seq, kind, result } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                if seq < self.last_applied_seq {
                    debug!(
                        seq = seq,
                        last_applied = self.last_applied_seq,
                        kind = kind.label(),
                        "Discarding stale response"
                    );
                    return None;
                }
                let applied = match kind {
                    RequestKind::StartScrape => self.apply_scrape_result(result, list),
                    RequestKind::ListProfiles => self.apply_profiles_result(result, list),
                };
                if applied {
                    self.last_applied_seq = seq;
                }
                None
            }
        }
    }

    fn issue(&mut self, kind: RequestKind) -> Request {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.in_flight += 1;
        info!(seq = seq, kind = kind.label(), "Issuing request");
        Request { seq, kind }
    }

    fn apply_scrape_result<L: ProfileList + ?Sized>(
        &mut self,
        result: Result<Envelope, ApiError>,
        list: &mut L,
    ) -> bool {
        match result {
            Ok(envelope) if envelope.is_success() => match envelope.profiles {
                Some(profiles) => {
                    info!(count = profiles.len(), "Scrape complete");
                    self.status = Status::Complete;
                    render_profiles(list, profiles);
                }
                None => {
                    warn!("Scrape succeeded without a profiles list");
                    self.status = Status::Error(ApiError::MissingProfiles.to_string());
                }
            },
            Ok(envelope) => {
                let message = envelope.failure_message();
                warn!(status = %envelope.status, message = %message, "Scrape failed on server");
                self.status = Status::Error(message);
            }
            Err(e) => {
                warn!(error = %e, "Scrape request failed");
                self.status = Status::Error(e.to_string());
            }
        }
        true
    }

    /// Failures here are only logged; the status label is left alone.
    fn apply_profiles_result<L: ProfileList + ?Sized>(
        &mut self,
        result: Result<Envelope, ApiError>,
        list: &mut L,
    ) -> bool {
        match result {
            Ok(Envelope {
                ref status,
                profiles: Some(profiles),
                ..
            }) if status == STATUS_SUCCESS => {
                debug!(count = profiles.len(), "Loaded stored profiles");
                render_profiles(list, profiles);
                true
            }
            Ok(envelope) => {
                debug!(status = %envelope.status, "Profile list not loaded");
                false
            }
            Err(e) => {
                debug!(error = %e, "Profile list request failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::render::ProfileListState;
    use crate::types::Profile;

    fn response(req: Request, result: Result<Envelope, ApiError>) -> Event {
        Event::Response {
            seq: req.seq,
            kind: req.kind,
            result,
        }
    }

    fn profile_a() -> Profile {
        Profile::new("A", "http://a")
    }

    #[test]
    fn starts_idle() {
        let c = Controller::default();
        assert_eq!(c.status().text(), "Status: Idle");
        assert_eq!(c.in_flight(), 0);
    }

    #[test]
    fn page_load_requests_profile_list() {
        let mut c = Controller::default();
        let mut list = ProfileListState::default();
        let req = c.update(Event::PageLoaded, &mut list).unwrap();
        assert_eq!(req.kind, RequestKind::ListProfiles);
        assert_eq!(c.status(), &Status::Idle);
    }

    #[test]
    fn click_sets_scraping_before_response() {
        let mut c = Controller::default();
        let mut list = ProfileListState::default();
        let req = c.update(Event::StartScrapeClicked, &mut list).unwrap();
        assert_eq!(req.kind, RequestKind::StartScrape);
        assert_eq!(c.status().text(), "Status: Scraping...");
        assert_eq!(c.in_flight(), 1);
    }

    #[test]
    fn successful_scrape_completes_and_renders() {
        let mut c = Controller::default();
        let mut list = ProfileListState::default();
        let req = c.update(Event::StartScrapeClicked, &mut list).unwrap();
        let next = c.update(
            response(req, Ok(Envelope::success(vec![profile_a()]))),
            &mut list,
        );

        assert!(next.is_none());
        assert_eq!(c.status().text(), "Status: Scraping Complete!");
        assert_eq!(list.items(), &[profile_a()]);
        assert_eq!(c.in_flight(), 0);
    }

    #[test]
    fn server_error_embeds_message_and_keeps_list() {
        let mut c = Controller::default();
        let mut list = ProfileListState::default();
        render_profiles(&mut list, vec![profile_a()]);

        let req = c.update(Event::StartScrapeClicked, &mut list).unwrap();
        c.update(
            response(req, Ok(Envelope::failure("error", Some("boom")))),
            &mut list,
        );

        assert!(c.status().text().starts_with("Status: Error - "));
        assert!(c.status().text().contains("boom"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn structured_server_message_is_shown() {
        let mut c = Controller::default();
        let mut list = ProfileListState::default();
        let req = c.update(Event::StartScrapeClicked, &mut list).unwrap();
        let envelope: Envelope =
            serde_json::from_str(r#"{"status":"error","message":["quota","exceeded"]}"#).unwrap();
        c.update(response(req, Ok(envelope)), &mut list);

        assert_eq!(c.status().text(), r#"Status: Error - ["quota","exceeded"]"#);
    }

    #[test]
    fn network_failure_embeds_error_message() {
        let mut c = Controller::default();
        let mut list = ProfileListState::default();
        let req = c.update(Event::StartScrapeClicked, &mut list).unwrap();
        c.update(
            response(req, Err(ApiError::Network("timeout".to_string()))),
            &mut list,
        );

        assert_eq!(c.status(), &Status::Error("timeout".to_string()));
        assert!(c.status().text().contains("timeout"));
    }

    #[test]
    fn success_without_profiles_is_an_error() {
        let mut c = Controller::default();
        let mut list = ProfileListState::default();
        let req = c.update(Event::StartScrapeClicked, &mut list).unwrap();
        c.update(
            response(req, Ok(Envelope::failure(STATUS_SUCCESS, None))),
            &mut list,
        );

        assert_eq!(
            c.status().text(),
            "Status: Error - response is missing the profiles list"
        );
    }

    #[test]
    fn failed_profile_list_changes_nothing() {
        let mut c = Controller::default();
        let mut list = ProfileListState::default();
        render_profiles(&mut list, vec![profile_a()]);

        let req = c.update(Event::PageLoaded, &mut list).unwrap();
        c.update(response(req, Ok(Envelope::failure("error", None))), &mut list);

        assert_eq!(c.status(), &Status::Idle);
        assert_eq!(list.items(), &[profile_a()]);
        assert_eq!(c.last_applied_seq(), 0);
    }

    #[test]
    fn profile_list_transport_error_is_swallowed() {
        let mut c = Controller::default();
        let mut list = ProfileListState::default();
        let req = c.update(Event::PageLoaded, &mut list).unwrap();
        c.update(
            response(req, Err(ApiError::Network("connection refused".to_string()))),
            &mut list,
        );
        assert_eq!(c.status(), &Status::Idle);
        assert!(list.is_empty());
    }

    #[test]
    fn successful_profile_list_renders_without_status_change() {
        let mut c = Controller::default();
        let mut list = ProfileListState::default();
        let req = c.update(Event::PageLoaded, &mut list).unwrap();
        c.update(
            response(req, Ok(Envelope::success(vec![profile_a(), Profile::new("B", "http://b")]))),
            &mut list,
        );
        assert_eq!(c.status(), &Status::Idle);
        assert_eq!(list.len(), 2);
        assert_eq!(list.items()[1].name, "B");
    }

    #[test]
    fn late_page_load_response_does_not_overwrite_scrape() {
        let mut c = Controller::default();
        let mut list = ProfileListState::default();
        let load = c.update(Event::PageLoaded, &mut list).unwrap();
        let scrape = c.update(Event::StartScrapeClicked, &mut list).unwrap();
        assert!(scrape.seq > load.seq);

        c.update(
            response(scrape, Ok(Envelope::success(vec![Profile::new("new", "http://new")]))),
            &mut list,
        );
        c.update(
            response(load, Ok(Envelope::success(vec![Profile::new("old", "http://old")]))),
            &mut list,
        );

        assert_eq!(list.items(), &[Profile::new("new", "http://new")]);
        assert_eq!(c.status(), &Status::Complete);
        assert_eq!(c.in_flight(), 0);
    }

    #[test]
    fn stale_scrape_error_is_discarded() {
        let mut c = Controller::default();
        let mut list = ProfileListState::default();
        let first = c.update(Event::StartScrapeClicked, &mut list).unwrap();
        let second = c.update(Event::StartScrapeClicked, &mut list).unwrap();

        c.update(response(second, Ok(Envelope::success(vec![profile_a()]))), &mut list);
        c.update(
            response(first, Err(ApiError::Network("timeout".to_string()))),
            &mut list,
        );

        assert_eq!(c.status(), &Status::Complete);
        assert_eq!(list.items(), &[profile_a()]);
        assert_eq!(c.last_applied_seq(), second.seq);
    }

    #[test]
    fn in_order_responses_all_apply() {
        let mut c = Controller::default();
        let mut list = ProfileListState::default();
        let first = c.update(Event::StartScrapeClicked, &mut list).unwrap();
        let second = c.update(Event::StartScrapeClicked, &mut list).unwrap();

        c.update(response(first, Ok(Envelope::success(vec![profile_a()]))), &mut list);
        assert_eq!(list.items(), &[profile_a()]);

        c.update(
            response(second, Ok(Envelope::failure("error", Some("boom")))),
            &mut list,
        );
        assert_eq!(c.status(), &Status::Error("boom".to_string()));
        assert_eq!(list.items(), &[profile_a()]);
    }

    #[test]
    fn retry_after_failure_is_allowed() {
        let mut c = Controller::default();
        let mut list = ProfileListState::default();
        let req = c.update(Event::StartScrapeClicked, &mut list).unwrap();
        c.update(response(req, Err(ApiError::Network("timeout".to_string()))), &mut list);

        let retry = c.update(Event::StartScrapeClicked, &mut list).unwrap();
        assert_eq!(c.status(), &Status::Scraping);
        c.update(response(retry, Ok(Envelope::success(vec![]))), &mut list);
        assert_eq!(c.status(), &Status::Complete);
        assert!(list.is_empty());
    }
}
