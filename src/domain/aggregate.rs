use crate::domain::{
    AddressSummary, AggregatedModel, CowrieEvent, EventInstant, UNKNOWN_ADDRESS,
};
use std::collections::BTreeMap;

pub fn address_key(event: &CowrieEvent) -> &str {
    match event.src_ip.as_deref() {
        Some(address) if !address.is_empty() => address,
        _ => UNKNOWN_ADDRESS,
    }
}

/// Groups events (in file order) by address key.
///
/// Each group is stably sorted by instant, so events sharing a timestamp keep
/// their file order. Groups come back ordered by address string.
pub fn aggregate_events(events: Vec<CowrieEvent>) -> AggregatedModel {
    let mut grouped: BTreeMap<String, Vec<CowrieEvent>> = BTreeMap::new();
    for event in events {
        let key = address_key(&event).to_string();
        grouped.entry(key).or_default().push(event);
    }

    grouped
        .into_iter()
        .map(|(address, events)| summarize_address(address, events))
        .collect()
}

fn summarize_address(address: String, mut events: Vec<CowrieEvent>) -> AddressSummary {
    events.sort_by_key(|event| event.instant);

    let first_seen = events
        .first()
        .map(|event| event.instant)
        .unwrap_or(EventInstant::ZERO);
    let last_seen = events
        .last()
        .map(|event| event.instant)
        .unwrap_or(EventInstant::ZERO);
    let login_succeeded = events.iter().any(CowrieEvent::is_login_success);

    AddressSummary {
        address,
        first_seen,
        last_seen,
        login_succeeded,
        events,
    }
}
