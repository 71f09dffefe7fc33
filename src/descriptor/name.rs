//! Filesystem naming for per-item library directories.
//!
//! Titles come from an external catalog and may contain anything; the
//! directory name must be safe on Windows, macOS and Linux while keeping
//! normal punctuation and international characters readable.

const MAX_NAME_LEN: usize = 255;

/// Directory (and file stem) name for an item: `"Title (Year)"`,
/// sanitized and length-capped.
pub fn sanitized_dir_name(title: &str, year: Option<i32>) -> String {
    let title = sanitize_component(title);
    let suffix = match year {
        Some(y) => format!(" ({y})"),
        None => " (Unknown)".to_string(),
    };

    let budget = MAX_NAME_LEN.saturating_sub(suffix.len());
    let title = truncate_chars(&title, budget);
    format!("{}{suffix}", title.trim_end_matches([' ', '.']))
}

fn sanitize_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_was_space = false;
    for c in raw.chars() {
        let mapped = match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => continue,
            c if c.is_control() => continue,
            // Zero-width and directional marks
            '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2060}'..='\u{206F}'
            | '\u{FEFF}' => continue,
            c if c.is_whitespace() => ' ',
            c => c,
        };
        if mapped == ' ' {
            if last_was_space {
                continue;
            }
            last_was_space = true;
        } else {
            last_was_space = false;
        }
        out.push(mapped);
    }

    let trimmed = out.trim().trim_end_matches('.').trim_end();
    if trimmed.is_empty() {
        "Unknown".to_string()
    } else {
        trimmed.to_string()
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_title_gets_year_suffix() {
        assert_eq!(sanitized_dir_name("Playtime", Some(1967)), "Playtime (1967)");
    }

    #[test]
    fn missing_year_is_marked_unknown() {
        assert_eq!(sanitized_dir_name("Playtime", None), "Playtime (Unknown)");
    }

    #[test]
    fn dangerous_characters_are_stripped() {
        assert_eq!(
            sanitized_dir_name("What? A/B: \"Test\" <Cut>", Some(2000)),
            "What AB Test Cut (2000)"
        );
    }

    #[test]
    fn punctuation_and_unicode_survive() {
        assert_eq!(
            sanitized_dir_name("Amélie & the 東京 story!", Some(2001)),
            "Amélie & the 東京 story! (2001)"
        );
    }

    #[test]
    fn whitespace_collapses_and_trailing_dots_go() {
        assert_eq!(
            sanitized_dir_name("  Spaced   out...  ", Some(1999)),
            "Spaced out (1999)"
        );
    }

    #[test]
    fn empty_title_never_yields_empty_name() {
        assert_eq!(sanitized_dir_name("???", Some(2020)), "Unknown (2020)");
        assert_eq!(sanitized_dir_name("", None), "Unknown (Unknown)");
    }

    #[test]
    fn long_titles_are_capped() {
        let long = "x".repeat(500);
        let name = sanitized_dir_name(&long, Some(2020));
        assert!(name.chars().count() <= 255);
        assert!(name.ends_with("(2020)"));
    }
}
