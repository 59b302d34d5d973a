//! Input guards that suppress mention completion entirely

/// Command prefixes whose arguments can look like a community trigger
const GUARDED_COMMANDS: &[&str] = &["/join", "/leave"];

/// Whether completion should be skipped for this composer text
///
/// Checked against the raw text before any trigger extraction. Case-sensitive
/// and anchored at the start, so `/Join` or ` /join` are not guarded.
pub fn is_guarded_command(raw_text: &str) -> bool {
    GUARDED_COMMANDS
        .iter()
        .any(|command| raw_text.starts_with(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_and_leave_are_guarded() {
        assert!(is_guarded_command("/join +abc:example.org"));
        assert!(is_guarded_command("/leave"));
        assert!(is_guarded_command("/joinx"));
    }

    #[test]
    fn test_other_text_is_not_guarded() {
        assert!(!is_guarded_command("+abc"));
        assert!(!is_guarded_command("/me waves at +abc"));
        assert!(!is_guarded_command(" /join +abc"));
        assert!(!is_guarded_command("/Join +abc"));
        assert!(!is_guarded_command(""));
    }
}
