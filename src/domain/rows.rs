use crate::domain::AddressSummary;
use serde::Serialize;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SummaryRow {
    pub address: String,
    pub first_seen: String,
    pub last_seen: String,
    pub login_succeeded: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DetailRow {
    #[serde(rename = "line")]
    pub line_no: usize,
    pub timestamp: String,
    pub eventid: String,
    pub identity: String,
    pub input: String,
    pub message: String,
}

pub fn summary_rows(addresses: &[AddressSummary]) -> Vec<SummaryRow> {
    addresses
        .iter()
        .map(|summary| SummaryRow {
            address: summary.address.clone(),
            first_seen: summary.first_seen.to_rfc3339(),
            last_seen: summary.last_seen.to_rfc3339(),
            login_succeeded: summary.login_succeeded,
        })
        .collect()
}

pub fn detail_rows(summary: &AddressSummary) -> Vec<DetailRow> {
    summary
        .events
        .iter()
        .map(|event| DetailRow {
            line_no: event.line_no,
            timestamp: event.timestamp.clone().unwrap_or_default(),
            eventid: event.eventid.clone().unwrap_or_default(),
            identity: format_identity(event.username.as_deref(), event.password.as_deref()),
            input: event.input.clone().unwrap_or_default(),
            message: event.message.clone().unwrap_or_default(),
        })
        .collect()
}

/// `username/password`, or an empty string when both are missing or empty.
pub fn format_identity(username: Option<&str>, password: Option<&str>) -> String {
    let username = username.unwrap_or_default();
    let password = password.unwrap_or_default();
    if username.is_empty() && password.is_empty() {
        return String::new();
    }
    format!("{username}/{password}")
}
