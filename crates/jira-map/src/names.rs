//! Display-name parsing.

use tracing::warn;

const SUFFIXES: [&str; 5] = ["jr", "sr", "i", "ii", "iii"];

/// Splits a display name into `(first, last)`.
///
/// Handles shapes like `First M. Last Jr (Admin) [X]` and `Last Sr, First M.`:
/// markers, single-letter initials, and suffixes are dropped, and exactly two
/// tokens must remain. Compound names (`Ann Marie Smith`) are rejected.
pub fn split_display_name(display_name: &str, last_name_first: bool) -> Option<(String, String)> {
    let tokens: Vec<&str> = display_name
        .split(|ch: char| ch == ',' || ch == '.' || ch.is_whitespace())
        .filter(|token| !token.is_empty() && !is_noise(token))
        .collect();

    let [first, second] = tokens.as_slice() else {
        warn!(
            display_name,
            remaining = ?tokens,
            "display name does not reduce to a first and last name"
        );
        return None;
    };

    let (first, last) = if last_name_first {
        (second, first)
    } else {
        (first, second)
    };
    Some(((*first).to_string(), (*last).to_string()))
}

fn is_noise(token: &str) -> bool {
    token.eq_ignore_ascii_case("[x]")
        || token.eq_ignore_ascii_case("(admin)")
        || (token.len() == 1 && token.chars().all(|ch| ch.is_ascii_alphabetic()))
        || SUFFIXES
            .iter()
            .any(|suffix| token.eq_ignore_ascii_case(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(name: &str, last_first: bool) -> Option<(String, String)> {
        split_display_name(name, last_first)
    }

    fn pair(first: &str, last: &str) -> Option<(String, String)> {
        Some((first.to_string(), last.to_string()))
    }

    #[test]
    fn first_last_with_markers() {
        assert_eq!(split("John M. Doe Jr (Admin) [X]", false), pair("John", "Doe"));
        assert_eq!(split("Jane Roe III", false), pair("Jane", "Roe"));
    }

    #[test]
    fn last_first_with_comma() {
        assert_eq!(split("Doe Sr, John M.", true), pair("John", "Doe"));
        assert_eq!(split("Doe, John", true), pair("John", "Doe"));
    }

    #[test]
    fn compound_names_are_rejected() {
        assert_eq!(split("Ann Marie Smith", false), None);
        assert_eq!(split("Madonna", false), None);
        assert_eq!(split("", false), None);
    }
}
