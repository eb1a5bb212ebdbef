use crate::domain::DEFAULT_COWRIE_HOME;

pub const COWRIE_HOME_ENV: &str = "COWRIE_HOME";

/// Base directory used for `bin/playlog` and TTY log paths.
pub fn resolve_cowrie_home() -> String {
    cowrie_home_from(std::env::var(COWRIE_HOME_ENV).ok())
}

fn cowrie_home_from(value: Option<String>) -> String {
    match value {
        Some(home) if !home.trim().is_empty() => home,
        _ => DEFAULT_COWRIE_HOME.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_home() {
        assert_eq!(cowrie_home_from(None), DEFAULT_COWRIE_HOME);
        assert_eq!(cowrie_home_from(Some("  ".to_string())), DEFAULT_COWRIE_HOME);
    }

    #[test]
    fn uses_override_when_set() {
        assert_eq!(cowrie_home_from(Some("/srv/cowrie".to_string())), "/srv/cowrie");
    }
}
