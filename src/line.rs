//! Log line formatting
//!
//! A `LogLine` is the exact datagram payload: formatted once on the caller
//! thread, then moved through the queue untouched.
//!
//! - Tagged: `"<tag>: <message>\n"`
//! - Untagged (or empty tag): `"<message>\n"`
//!
//! The terminator is always appended, even if the message already ends
//! with one.

use crate::constants::{LINE_TERMINATOR, TAG_SEPARATOR};
use bytes::Bytes;
use std::fmt;

/// A fully formatted, immutable log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine(Bytes);

impl LogLine {
    /// Format a line with an optional tag
    pub fn new(tag: Option<&str>, message: &str) -> Self {
        let tag = tag.filter(|t| !t.is_empty());
        let extra = tag.map_or(0, |t| t.len() + TAG_SEPARATOR.len());

        let mut line = String::with_capacity(extra + message.len() + 1);
        if let Some(tag) = tag {
            line.push_str(tag);
            line.push_str(TAG_SEPARATOR);
        }
        line.push_str(message);
        line.push(LINE_TERMINATOR);

        Self(Bytes::from(line))
    }

    /// `"<tag>: <message>\n"`
    pub fn tagged(tag: &str, message: &str) -> Self {
        Self::new(Some(tag), message)
    }

    /// `"<message>\n"`
    pub fn untagged(message: &str) -> Self {
        Self::new(None, message)
    }

    /// Datagram payload
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Built from &str pieces only
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tagged_line() {
        let line = LogLine::tagged("RNCK:UdpLog", "hello");
        assert_eq!(line.as_bytes(), b"RNCK:UdpLog: hello\n");
    }

    #[test]
    fn test_untagged_line() {
        let line = LogLine::untagged("hello");
        assert_eq!(line.as_bytes(), b"hello\n");
    }

    #[test]
    fn test_empty_tag_is_omitted() {
        assert_eq!(LogLine::tagged("", "hello"), LogLine::untagged("hello"));
    }

    #[test]
    fn test_terminator_always_appended() {
        let line = LogLine::untagged("already\n");
        assert_eq!(line.as_bytes(), b"already\n\n");
    }

    #[test]
    fn test_empty_message() {
        assert_eq!(LogLine::untagged("").as_bytes(), b"\n");
        assert_eq!(LogLine::tagged("T", "").as_bytes(), b"T: \n");
    }

    #[test]
    fn test_utf8_preserved() {
        let line = LogLine::tagged("tag", "appel entrant ☎");
        assert_eq!(line.to_string(), "tag: appel entrant ☎\n");
    }

    proptest! {
        #[test]
        fn prop_tagged_layout(tag in "[^\n]{1,16}", msg in ".*") {
            let line = LogLine::tagged(&tag, &msg);
            let text = std::str::from_utf8(line.as_bytes()).unwrap();
            prop_assert!(text.ends_with('\n'));
            prop_assert_eq!(text, format!("{}: {}\n", tag, msg));
            prop_assert_eq!(line.len(), tag.len() + 2 + msg.len() + 1);
        }

        #[test]
        fn prop_untagged_is_message_plus_newline(msg in ".*") {
            let line = LogLine::untagged(&msg);
            prop_assert_eq!(&line.as_bytes()[..msg.len()], msg.as_bytes());
            prop_assert_eq!(line.as_bytes()[msg.len()], b'\n');
        }
    }
}
