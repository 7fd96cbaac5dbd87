//! Tolerant tag and attribute scanning.
//!
//! Input documents are not guaranteed to be well-formed, so nothing here
//! builds a tree. Each function looks at a text window and answers one
//! question (where are the `<task>` occurrences, what is the `id` attribute,
//! what number is this) and never fails: no match means `None` or an empty
//! list.
//!
//! Tags are matched prefix-agnostically (`<task>`, `<bpmn:task>` and
//! `<semantic:task>` are the same tag) and may be paired or self-closing.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::collections::HashMap;

use crate::vocabulary::{ElementKind, CUSTOM_TAGS};

/// Tags scanned on every conversion. Scanners for these are compiled once.
const STRUCTURAL_TAGS: &[&str] = &[
    "definitions",
    "process",
    "sequenceFlow",
    "conditionExpression",
    "incoming",
    "outgoing",
    "BPMNShape",
    "Bounds",
];

static SCANNERS: Lazy<HashMap<&'static str, TagScanner>> = Lazy::new(|| {
    let vocabulary = ElementKind::ALL.iter().map(|kind| kind.tag_name());
    let custom = CUSTOM_TAGS.iter().map(|(tag, _)| *tag);
    STRUCTURAL_TAGS
        .iter()
        .copied()
        .chain(vocabulary)
        .chain(custom)
        .filter_map(|tag| TagScanner::new(tag).ok().map(|scanner| (tag, scanner)))
        .collect()
});

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([\w.:-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("attribute pattern")
});

static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|amp|lt|gt|quot|apos);").expect("entity pattern")
});

/// One occurrence of a tag inside a text window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence<'a> {
    /// Byte offset of the opening `<` within the scanned window.
    pub offset: usize,
    /// Raw attribute text of the opening tag, without a trailing `/`.
    pub attrs: &'a str,
    /// Text between the opening and closing tag; `None` when self-closing.
    pub body: Option<&'a str>,
}

impl<'a> Occurrence<'a> {
    pub fn is_self_closing(&self) -> bool {
        self.body.is_none()
    }

    /// Attribute lookup on this occurrence's opening tag.
    pub fn attribute(&self, name: &str) -> Option<String> {
        attribute(self.attrs, name)
    }
}

/// Finds the occurrences of a single tag name.
#[derive(Debug, Clone)]
pub struct TagScanner {
    open: Regex,
    close: Regex,
}

impl TagScanner {
    pub fn new(tag: &str) -> Result<Self, regex::Error> {
        let tag = regex::escape(tag);
        let open = Regex::new(&format!(r"<(?:[\w.-]+:)?{tag}(\s[^>]*|/)?>"))?;
        let close = Regex::new(&format!(r"</(?:[\w.-]+:)?{tag}\s*>"))?;
        Ok(Self { open, close })
    }

    /// Scans `text` left to right.
    ///
    /// An opening tag whose attribute text ends in `/` is self-closing and is
    /// never paired with a later closing tag. A paired occurrence closes at
    /// the nearest matching closing tag. An opening tag that never closes is
    /// skipped and scanning resumes right after it.
    pub fn occurrences<'a>(&self, text: &'a str) -> Vec<Occurrence<'a>> {
        let mut found = Vec::new();
        let mut pos = 0;
        while let Some(caps) = self.open.captures_at(text, pos) {
            let Some(whole) = caps.get(0) else { break };
            let raw = caps.get(1).map_or("", |m| m.as_str());
            let trimmed = raw.trim_end();

            if let Some(attrs) = trimmed.strip_suffix('/') {
                found.push(Occurrence {
                    offset: whole.start(),
                    attrs,
                    body: None,
                });
                pos = whole.end();
                continue;
            }

            match self.close.find_at(text, whole.end()) {
                Some(close) => {
                    found.push(Occurrence {
                        offset: whole.start(),
                        attrs: raw,
                        body: Some(&text[whole.end()..close.start()]),
                    });
                    pos = close.end();
                }
                None => {
                    tracing::debug!(at = whole.start(), "skipping unclosed tag");
                    pos = whole.end();
                }
            }
        }
        found
    }

    /// Attribute text of the first opening tag, paired or not.
    pub fn first_open_tag<'a>(&self, text: &'a str) -> Option<&'a str> {
        let caps = self.open.captures(text)?;
        let raw = caps.get(1).map_or("", |m| m.as_str()).trim_end();
        Some(raw.strip_suffix('/').unwrap_or(raw))
    }
}

fn with_scanner<T>(tag: &str, default: T, f: impl FnOnce(&TagScanner) -> T) -> T {
    if let Some(scanner) = SCANNERS.get(tag) {
        return f(scanner);
    }
    match TagScanner::new(tag) {
        Ok(scanner) => f(&scanner),
        Err(err) => {
            tracing::warn!(tag, error = %err, "cannot build scanner");
            default
        }
    }
}

/// All occurrences of `tag` in `text`, paired and self-closing, in order.
pub fn occurrences<'a>(text: &'a str, tag: &str) -> Vec<Occurrence<'a>> {
    with_scanner(tag, Vec::new(), |scanner| scanner.occurrences(text))
}

/// Only the paired occurrences of `tag`.
pub fn paired<'a>(text: &'a str, tag: &str) -> Vec<Occurrence<'a>> {
    occurrences(text, tag)
        .into_iter()
        .filter(|occurrence| !occurrence.is_self_closing())
        .collect()
}

/// Attribute text of the first opening `tag` in `text`.
pub fn open_tag_attrs<'a>(text: &'a str, tag: &str) -> Option<&'a str> {
    with_scanner(tag, None, |scanner| scanner.first_open_tag(text))
}

/// Looks up an attribute value by name.
///
/// Accepts either quote style and whitespace around `=`. A prefixed
/// attribute (`bpmn:id`) answers a lookup for its local name (`id`). The
/// first matching attribute wins. Entities in the value are decoded.
pub fn attribute(attrs: &str, name: &str) -> Option<String> {
    ATTRIBUTE.captures_iter(attrs).find_map(|caps| {
        let key = caps.get(1)?.as_str();
        let local = key.rsplit(':').next().unwrap_or(key);
        if key != name && local != name {
            return None;
        }
        let value = caps.get(2).or_else(|| caps.get(3))?.as_str();
        Some(decode_entities(value).into_owned())
    })
}

/// Like [`attribute`], but an empty value counts as absent.
pub fn non_empty_attribute(attrs: &str, name: &str) -> Option<String> {
    attribute(attrs, name).filter(|value| !value.is_empty())
}

/// Attribute parsed as an integer, see [`parse_int`].
pub fn int_attribute(attrs: &str, name: &str) -> Option<i64> {
    attribute(attrs, name).as_deref().and_then(parse_int)
}

/// Parses numeric text permissively.
///
/// Decimal fractions and exponents are accepted and truncated toward zero.
/// Empty, unparsable and non-finite values yield `None`, and so do values
/// outside the `i32` range, which keeps layout arithmetic far from overflow.
pub fn parse_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value = trimmed.parse::<f64>().ok()?.trunc();
    let range = f64::from(i32::MIN)..=f64::from(i32::MAX);
    range.contains(&value).then_some(value as i64)
}

/// Trimmed, decoded text of every paired `tag` inside `body`.
pub fn inner_texts(body: &str, tag: &str) -> Vec<String> {
    paired(body, tag)
        .into_iter()
        .filter_map(|occurrence| occurrence.body)
        .map(|text| decode_entities(text.trim()).into_owned())
        .collect()
}

/// Trimmed, decoded text of the first paired `tag` inside `body`.
pub fn first_inner_text(body: &str, tag: &str) -> Option<String> {
    paired(body, tag)
        .into_iter()
        .find_map(|occurrence| occurrence.body)
        .map(|text| decode_entities(text.trim()).into_owned())
}

/// Decodes the predefined XML entities and numeric character references.
///
/// Unknown entities and references to characters XML 1.0 does not allow
/// (control characters, surrogates, `U+FFFE`, `U+FFFF`) are left untouched.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    ENTITY.replace_all(text, |caps: &Captures| {
        let entity = &caps[1];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
                .map(|hex| u32::from_str_radix(hex, 16))
                .unwrap_or_else(|| entity[1..].parse::<u32>())
                .ok()
                .and_then(char::from_u32)
                .filter(|c| is_xml_char(*c)),
        };
        match decoded {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    })
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}
