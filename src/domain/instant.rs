use crate::domain::EventInstant;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Parses an RFC3339 timestamp such as `2024-12-17T14:38:20.918891Z`.
/// Anything else becomes [`EventInstant::ZERO`].
pub fn normalize_timestamp(raw: &str) -> EventInstant {
    OffsetDateTime::parse(raw, &Rfc3339)
        .map(EventInstant::new)
        .unwrap_or(EventInstant::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn parses_fractional_utc_timestamps() {
        assert_eq!(
            normalize_timestamp("2024-12-17T14:38:20.918891Z"),
            EventInstant::new(datetime!(2024-12-17 14:38:20.918891 UTC))
        );
    }

    #[test]
    fn offsets_compare_by_instant() {
        assert_eq!(
            normalize_timestamp("2024-12-17T16:38:20+02:00"),
            normalize_timestamp("2024-12-17T14:38:20Z")
        );
    }

    #[test]
    fn unparsable_input_yields_zero_instant() {
        assert_eq!(normalize_timestamp(""), EventInstant::ZERO);
        assert_eq!(normalize_timestamp("yesterday"), EventInstant::ZERO);
        assert_eq!(normalize_timestamp("2024-12-17 14:38:20"), EventInstant::ZERO);
    }

    #[test]
    fn zero_instant_sorts_before_real_instants() {
        let real = normalize_timestamp("1970-01-01T00:00:00Z");
        assert!(EventInstant::ZERO < real);
        assert_eq!(EventInstant::default(), EventInstant::ZERO);
    }

    #[test]
    fn zero_instant_renders_as_year_one() {
        assert_eq!(EventInstant::ZERO.to_rfc3339(), "0001-01-01T00:00:00Z");
    }

    #[test]
    fn orders_by_instant_not_text() {
        let earlier = normalize_timestamp("2024-12-17T14:38:20.5Z");
        let later = normalize_timestamp("2024-12-17T14:38:20.918891Z");
        assert!(earlier < later);
    }
}
