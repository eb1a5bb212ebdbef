pub const TTY_LOG_CLOSED_PREFIX: &str = "Closing TTY Log: ";
pub const DEFAULT_COWRIE_HOME: &str = "/cowrie/cowrie-git";

const DURATION_DELIMITER: &str = " after ";

pub fn is_replay_eligible(message: &str) -> bool {
    message.starts_with(TTY_LOG_CLOSED_PREFIX)
}

/// Returns the TTY log path from a `Closing TTY Log: <path> after <n> seconds`
/// message. Everything from the last `" after "` onward is dropped.
pub fn extract_tty_log_path(message: &str) -> Option<&str> {
    let rest = message.strip_prefix(TTY_LOG_CLOSED_PREFIX)?;
    let path = match rest.rfind(DURATION_DELIMITER) {
        Some(index) => &rest[..index],
        None => rest,
    };
    Some(path)
}

/// Builds the `playlog` command for a TTY-log-closed message, or `None` when
/// the message is not one.
pub fn build_replay_command(message: &str, cowrie_home: &str) -> Option<String> {
    let path = extract_tty_log_path(message)?;
    let home = cowrie_home.trim_end_matches('/');
    Some(format!("{home}/bin/playlog {home}/{path}"))
}
