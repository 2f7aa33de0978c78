//! Common types and data structures

use crate::constants::STATUS_SUCCESS;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A scraped profile as returned by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub url: String,
}

#[cfg(test)]
impl Profile {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Response wrapper shared by every API endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "RawEnvelope")]
pub struct Envelope {
    pub status: String,
    pub profiles: Option<Vec<Profile>>,
    /// Whatever the server put under `message`, not necessarily a string
    pub message: Option<Value>,
}

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    profiles: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

impl TryFrom<RawEnvelope> for Envelope {
    type Error = serde_json::Error;

    /// `profiles` is only typed when the status is "success"; a failed
    /// envelope keeps its message even if the rest of the body is off.
    fn try_from(raw: RawEnvelope) -> Result<Self, Self::Error> {
        let profiles = match raw.profiles {
            Some(Value::Null) | None => None,
            Some(value) if raw.status == STATUS_SUCCESS => Some(serde_json::from_value(value)?),
            Some(_) => None,
        };
        Ok(Self {
            status: raw.status,
            profiles,
            message: raw.message,
        })
    }
}

#[cfg(test)]
impl Envelope {
    pub fn success(profiles: Vec<Profile>) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            profiles: Some(profiles),
            message: None,
        }
    }

    pub fn failure(status: impl Into<String>, message: Option<&str>) -> Self {
        Self {
            status: status.into(),
            profiles: None,
            message: message.map(|m| Value::String(m.to_string())),
        }
    }
}

impl Envelope {
    /// Only the literal "success" counts; anything else is a failure
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Server message for a failed envelope, or a placeholder when none was sent.
    /// Strings are shown bare, other JSON values in their compact form.
    pub fn failure_message(&self) -> String {
        match &self.message {
            Some(Value::String(message)) => message.clone(),
            None | Some(Value::Null) => "unknown error".to_string(),
            Some(other) => other.to_string(),
        }
    }
}

/// Which endpoint a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    StartScrape,
    ListProfiles,
}

impl RequestKind {
    pub fn label(self) -> &'static str {
        match self {
            RequestKind::StartScrape => "start-scrape",
            RequestKind::ListProfiles => "list-profiles",
        }
    }
}

/// A request the controller wants issued, tagged with its sequence number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub seq: u64,
    pub kind: RequestKind,
}
