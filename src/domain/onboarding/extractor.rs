//! Extraction of the `<config>` block from assistant text.
//!
//! Two delimiter pairs travel inside free text:
//!
//! - `<config>…</config>` carries a configuration fragment emitted by the model
//! - `<stations>…</stations>` carries read-only context we inject into the first turn
//!
//! Only the first `<config>` block is decoded. Every block of either kind is
//! stripped from the text shown to the actor.

use super::fragment::{ConfigFragment, FragmentError};

pub const CONFIG_OPEN: &str = "<config>";
pub const CONFIG_CLOSE: &str = "</config>";
pub const STATIONS_OPEN: &str = "<stations>";
pub const STATIONS_CLOSE: &str = "</stations>";

/// Result of scanning one assistant turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Text with every delimited block removed.
    pub display_text: String,
    /// The decoded fragment, when the first block was valid.
    pub fragment: Option<ConfigFragment>,
    /// Why the first block was discarded, when it was.
    pub malformed: Option<FragmentError>,
}

impl Extraction {
    pub fn has_fragment(&self) -> bool {
        self.fragment.is_some()
    }
}

/// Returns the inner text of the first complete `open…close` block.
pub fn first_block<'a>(text: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = text.find(open)? + open.len();
    let end = text[start..].find(close)? + start;
    Some(&text[start..end])
}

/// Removes every `open…close` block. An opener with no closer is removed
/// together with everything after it, which covers truncated model output.
pub fn strip_blocks(text: &str, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(open) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + open.len()..];
        match after_open.find(close) {
            Some(end) => rest = &after_open[end + close.len()..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Removes both kinds of delimited block and tidies the surrounding whitespace.
pub fn display_text(text: &str) -> String {
    let without_config = strip_blocks(text, CONFIG_OPEN, CONFIG_CLOSE);
    let without_stations = strip_blocks(&without_config, STATIONS_OPEN, STATIONS_CLOSE);
    collapse_blank_lines(without_stations.trim())
}

fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines() {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(line.trim_end());
    }
    out
}

/// Scans assistant text for a configuration fragment.
///
/// Never fails: a block that does not decode or validate is reported in
/// `malformed` and the fragment is `None`.
pub fn extract(text: &str) -> Extraction {
    let (fragment, malformed) = match first_block(text, CONFIG_OPEN, CONFIG_CLOSE) {
        Some(inner) => match ConfigFragment::parse(inner) {
            Ok(fragment) => (Some(fragment), None),
            Err(err) => (None, Some(err)),
        },
        None => (None, None),
    };

    Extraction {
        display_text: display_text(text),
        fragment,
        malformed,
    }
}

/// Wraps serialized station context in its delimiter pair.
pub fn wrap_stations(json: &str) -> String {
    format!("{}{}{}", STATIONS_OPEN, json, STATIONS_CLOSE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::onboarding::draft::MemberRole;

    mod blocks {
        use super::*;

        #[test]
        fn first_block_finds_inner_text() {
            let text = "a <config>{\"x\":1}</config> b <config>{}</config>";
            assert_eq!(first_block(text, CONFIG_OPEN, CONFIG_CLOSE), Some("{\"x\":1}"));
        }

        #[test]
        fn first_block_requires_closer() {
            assert_eq!(first_block("a <config>{", CONFIG_OPEN, CONFIG_CLOSE), None);
        }

        #[test]
        fn strip_removes_every_block() {
            let text = "one<config>a</config>two<config>b</config>three";
            assert_eq!(strip_blocks(text, CONFIG_OPEN, CONFIG_CLOSE), "onetwothree");
        }

        #[test]
        fn strip_drops_unterminated_tail() {
            let text = "Hello!\n<config>{\"members\": [";
            assert_eq!(strip_blocks(text, CONFIG_OPEN, CONFIG_CLOSE), "Hello!\n");
        }

        #[test]
        fn stations_and_config_are_not_confused() {
            let text = "<stations>[{\"id\":\"S1\"}]</stations>Hi<config>{\"settings\":{}}</config>";
            assert_eq!(
                first_block(text, CONFIG_OPEN, CONFIG_CLOSE),
                Some("{\"settings\":{}}")
            );
            assert_eq!(
                first_block(text, STATIONS_OPEN, STATIONS_CLOSE),
                Some("[{\"id\":\"S1\"}]")
            );
            assert_eq!(display_text(text), "Hi");
        }
    }

    mod extraction {
        use super::*;

        #[test]
        fn text_without_block_has_no_fragment() {
            let result = extract("How many aircraft does the club operate?");
            assert!(result.fragment.is_none());
            assert!(result.malformed.is_none());
            assert_eq!(result.display_text, "How many aircraft does the club operate?");
        }

        #[test]
        fn valid_block_is_decoded_and_hidden() {
            let text = "Great, noted.\n\n<config>\n{\"members\":[{\"role\":\"PILOT\"}]}\n</config>";
            let result = extract(text);

            assert_eq!(result.display_text, "Great, noted.");
            let members = result.fragment.unwrap().members.unwrap();
            assert_eq!(members[0].role, MemberRole::Pilot);
        }

        #[test]
        fn malformed_block_is_swallowed_but_still_hidden() {
            let result = extract("Thanks!<config>{not json}</config>");

            assert!(result.fragment.is_none());
            assert!(result.malformed.is_some());
            assert_eq!(result.display_text, "Thanks!");
        }

        #[test]
        fn only_first_block_is_decoded() {
            let text = "<config>{\"settings\":{\"a\":1}}</config><config>{\"settings\":{\"b\":2}}</config>";
            let fragment = extract(text).fragment.unwrap();
            assert!(fragment.settings.unwrap().contains_key("a"));
        }

        #[test]
        fn blank_lines_left_by_blocks_are_collapsed() {
            let text = "Line one\n\n<config>{}</config>\n\nLine two";
            assert_eq!(extract(text).display_text, "Line one\n\nLine two");
        }
    }

    #[test]
    fn wrap_stations_uses_station_delimiters() {
        assert_eq!(wrap_stations("[]"), "<stations>[]</stations>");
    }
}
