//! Marker matching helpers used to detect a tag split across chunk boundaries

/// Return the longest prefix of `marker` that `chunk` ends with.
///
/// Only the tail of `chunk` is inspected. The full marker counts as a
/// candidate, but only when it is literally the last thing in `chunk`.
///
/// ```text
/// ends_in_partial_match("Hello <options>", "<options>")     -> Some("<options>")
/// ends_in_partial_match("Hello <", "<options>")             -> Some("<")
/// ends_in_partial_match("Hello <option>", "<options>")      -> None
/// ends_in_partial_match("Hello <options>asdf", "<options>") -> None
/// ```
pub fn ends_in_partial_match<'m>(chunk: &str, marker: &'m str) -> Option<&'m str> {
    // Candidate prefix ends, longest first, at char boundaries only
    marker
        .char_indices()
        .map(|(idx, c)| idx + c.len_utf8())
        .rev()
        .map(|end| &marker[..end])
        .find(|prefix| chunk.ends_with(prefix))
}

/// Extend an already matched `partial` prefix of `marker` with `new_input`.
///
/// Walks `new_input` one character at a time and returns the leading slice
/// that keeps `partial + slice` a prefix of `marker` at every step. The whole
/// of `new_input` is returned when no character breaks the match, meaning the
/// match is still open. Returns `None` when `partial` is not a prefix of
/// `marker` to begin with.
///
/// ```text
/// continue_partial_match("<", "options> asdf", "<options>") -> Some("options>")
/// continue_partial_match("<opt", "ions>foo", "<options>")   -> Some("ions>")
/// continue_partial_match("<opt", "ics>", "<options>")       -> Some("i")
/// continue_partial_match("<x", "yz", "<options>")           -> None
/// ```
pub fn continue_partial_match<'a>(
    partial: &str,
    new_input: &'a str,
    marker: &str,
) -> Option<&'a str> {
    let remaining = marker.strip_prefix(partial)?;
    let mut expected = remaining.chars();
    let mut consumed = 0;

    for c in new_input.chars() {
        match expected.next() {
            Some(m) if m == c => consumed += c.len_utf8(),
            _ => break,
        }
    }

    Some(&new_input[..consumed])
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = "<options>";

    #[test]
    fn test_ends_in_partial_match_full_marker_at_tail() {
        assert_eq!(
            ends_in_partial_match("Hello <options>", MARKER),
            Some("<options>")
        );
    }

    #[test]
    fn test_ends_in_partial_match_single_char() {
        assert_eq!(ends_in_partial_match("Hello <", MARKER), Some("<"));
    }

    #[test]
    fn test_ends_in_partial_match_prefers_longest() {
        assert_eq!(ends_in_partial_match("a <b <opti", MARKER), Some("<opti"));
    }

    #[test]
    fn test_ends_in_partial_match_rejects_other_tag() {
        assert_eq!(ends_in_partial_match("Hello <option>", MARKER), None);
    }

    #[test]
    fn test_ends_in_partial_match_marker_followed_by_text() {
        assert_eq!(ends_in_partial_match("Hello <options>asdf", MARKER), None);
    }

    #[test]
    fn test_ends_in_partial_match_short_and_empty_input() {
        assert_eq!(ends_in_partial_match("<o", MARKER), Some("<o"));
        assert_eq!(ends_in_partial_match("", MARKER), None);
    }

    #[test]
    fn test_ends_in_partial_match_multibyte() {
        assert_eq!(ends_in_partial_match("grüße «ma", "«mark»"), Some("«ma"));
        assert_eq!(ends_in_partial_match("grüße", "«mark»"), None);
    }

    #[test]
    fn test_continue_partial_match_completes_marker() {
        assert_eq!(
            continue_partial_match("<", "options> asdf", MARKER),
            Some("options>")
        );
        assert_eq!(
            continue_partial_match("<opt", "ions>foo", MARKER),
            Some("ions>")
        );
    }

    #[test]
    fn test_continue_partial_match_breaks_midway() {
        assert_eq!(continue_partial_match("<opt", "ics>", MARKER), Some("i"));
        assert_eq!(continue_partial_match("<op", "ening", MARKER), Some(""));
        assert_eq!(continue_partial_match("<", "optx", MARKER), Some("opt"));
    }

    #[test]
    fn test_continue_partial_match_consumes_whole_input() {
        assert_eq!(continue_partial_match("<", "opt", MARKER), Some("opt"));
        assert_eq!(continue_partial_match("<opt", "", MARKER), Some(""));
    }

    #[test]
    fn test_continue_partial_match_invalid_partial() {
        assert_eq!(continue_partial_match("<x", "yz", MARKER), None);
        assert_eq!(continue_partial_match("options", ">", MARKER), None);
    }
}
