//! Structured notification messages.
//!
//! A [`Message`] is the formatter output handed to a sink: optional header,
//! ordered context key/values, ordered body sections, an optional hyperlink,
//! and optional action buttons. Messages are built fresh per event, rendered
//! to the sink's wire format at send time, and discarded after send.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Maximum rendered header length in characters.
pub const MAX_HEADER_LEN: usize = 150;

/// Maximum rendered body section length in characters.
pub const MAX_SECTION_LEN: usize = 3000;

/// Placeholder rendered in place of an over-length section.
pub const SECTION_OMITTED: &str = "(section omitted: too long)";

/// Placeholder rendered in place of an empty section.
pub const SECTION_EMPTY: &str = "(empty)";

/// A hyperlink attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Display text.
    pub text: String,
    /// Target URL.
    pub url: String,
}

/// An interactive button carrying an opaque action payload.
///
/// The payload is base64-encoded so sinks can pass it through verbatim
/// without caring about its structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionButton {
    /// Button label shown to the operator.
    pub label: String,
    /// Base64-encoded opaque action payload.
    pub payload: String,
}

impl ActionButton {
    /// Build a button, encoding the raw payload bytes as base64.
    pub fn new(label: impl Into<String>, raw_payload: &[u8]) -> Self {
        ActionButton {
            label: label.into(),
            payload: STANDARD.encode(raw_payload),
        }
    }
}

/// Structured notification payload produced by a formatter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Optional header text. Truncated to [`MAX_HEADER_LEN`] on render.
    pub header: Option<String>,
    /// Ordered context key/value pairs shown above the body.
    pub context: Vec<(String, String)>,
    /// Ordered body sections. Over-length or empty sections render as
    /// placeholders rather than being dropped.
    pub sections: Vec<String>,
    /// Optional single hyperlink.
    pub link: Option<Link>,
    /// Optional interactive buttons.
    pub actions: Vec<ActionButton>,
}

impl Message {
    pub fn new() -> Self {
        Message::default()
    }

    pub fn header(mut self, text: impl Into<String>) -> Self {
        self.header = Some(text.into());
        self
    }

    pub fn context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }

    pub fn section(mut self, text: impl Into<String>) -> Self {
        self.sections.push(text.into());
        self
    }

    pub fn link(mut self, text: impl Into<String>, url: impl Into<String>) -> Self {
        self.link = Some(Link {
            text: text.into(),
            url: url.into(),
        });
        self
    }

    pub fn action(mut self, button: ActionButton) -> Self {
        self.actions.push(button);
        self
    }

    /// The header as rendered: truncated to [`MAX_HEADER_LEN`] characters.
    pub fn rendered_header(&self) -> Option<String> {
        self.header.as_deref().map(|h| truncate_chars(h, MAX_HEADER_LEN))
    }

    /// Body sections as rendered, in order and one-for-one with
    /// [`Message::sections`].
    ///
    /// An over-length section is replaced by [`SECTION_OMITTED`], an empty
    /// one by [`SECTION_EMPTY`]. Sections are never dropped: the rendered
    /// count always equals the source count. Pure and idempotent.
    pub fn rendered_sections(&self) -> Vec<String> {
        self.sections
            .iter()
            .map(|s| {
                if s.trim().is_empty() {
                    SECTION_EMPTY.to_string()
                } else if s.chars().count() > MAX_SECTION_LEN {
                    SECTION_OMITTED.to_string()
                } else {
                    s.clone()
                }
            })
            .collect()
    }

    /// Flatten to a plain-text summary for sinks without rich formatting.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        if let Some(header) = self.rendered_header() {
            out.push_str(&header);
            out.push('\n');
        }
        for (key, value) in &self.context {
            out.push_str(&format!("{key}: {value}\n"));
        }
        for section in self.rendered_sections() {
            out.push_str(&section);
            out.push('\n');
        }
        if let Some(link) = &self.link {
            out.push_str(&format!("{} <{}>\n", link.text, link.url));
        }
        out
    }
}

/// Truncate to at most `max` characters (not bytes), on a char boundary.
fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}
