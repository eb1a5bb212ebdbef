use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::datetime;

/// Address key for events whose `src_ip` is missing, empty, or not a string.
pub const UNKNOWN_ADDRESS: &str = "UNKNOWN";

pub const LOGIN_SUCCESS_EVENT_ID: &str = "cowrie.login.success";

/// A parsed event timestamp. Unparsable timestamps collapse to [`EventInstant::ZERO`],
/// which orders before every real instant.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct EventInstant(OffsetDateTime);

impl EventInstant {
    pub const ZERO: Self = Self(datetime!(0001-01-01 0:00 UTC));

    pub fn new(value: OffsetDateTime) -> Self {
        Self(value)
    }

    pub fn to_rfc3339(self) -> String {
        self.0
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.0.to_string())
    }
}

impl Default for EventInstant {
    fn default() -> Self {
        Self::ZERO
    }
}

/// One decoded line of a Cowrie JSON log.
///
/// Only string-valued fields are picked up; a known field holding any other
/// JSON type reads as absent. Unrecognized fields are dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct CowrieEvent {
    pub line_no: usize,
    pub instant: EventInstant,
    pub src_ip: Option<String>,
    pub timestamp: Option<String>,
    pub eventid: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub input: Option<String>,
    pub message: Option<String>,
}

impl CowrieEvent {
    pub fn is_login_success(&self) -> bool {
        self.eventid.as_deref() == Some(LOGIN_SUCCESS_EVENT_ID)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AddressSummary {
    pub address: String,
    pub first_seen: EventInstant,
    pub last_seen: EventInstant,
    pub login_succeeded: bool,
    pub events: Vec<CowrieEvent>,
}

/// Address summaries ordered by address string.
pub type AggregatedModel = Vec<AddressSummary>;
