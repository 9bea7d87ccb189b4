//! A small tag-level view over HTML documents.
//!
//! Modlist exports and search engine result pages are both scanned through the
//! [`DocumentParser`] trait, so callers only ever see flat [`Element`]s with
//! their attributes and the byte range of their content. [`TagScanner`] is the
//! bundled implementation; it tolerates unclosed and misnested tags the way
//! real-world markup needs it to.

mod scanner;

pub use scanner::TagScanner;

use std::ops::Range;

/// Turns raw markup into a [`Document`].
pub trait DocumentParser: Send + Sync {
    fn parse_document(&self, html: &str) -> Document;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    offset: usize,
    content: Range<usize>,
}

impl Element {
    pub fn new(
        name: impl Into<String>,
        attributes: Vec<(String, String)>,
        offset: usize,
        content: Range<usize>,
    ) -> Self {
        Self {
            name: name.into(),
            attributes,
            offset,
            content,
        }
    }

    /// Lower-cased tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    fn encloses(&self, other: &Element) -> bool {
        other.offset > self.offset && other.offset < self.content.end
    }

    pub(crate) fn set_content_end(&mut self, end: usize) {
        self.content.end = end;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compare {
    Exact,
    StartsWith,
}

/// Attribute predicate used by the `find*` family.
#[derive(Debug, Clone, Copy)]
pub struct AttrFilter<'a> {
    key: &'a str,
    value: &'a str,
    compare: Compare,
}

impl<'a> AttrFilter<'a> {
    pub fn exact(key: &'a str, value: &'a str) -> Self {
        Self {
            key,
            value,
            compare: Compare::Exact,
        }
    }

    pub fn starts_with(key: &'a str, value: &'a str) -> Self {
        Self {
            key,
            value,
            compare: Compare::StartsWith,
        }
    }

    fn matches(&self, element: &Element) -> bool {
        match element.attr(self.key) {
            Some(actual) => match self.compare {
                Compare::Exact => actual == self.value,
                Compare::StartsWith => actual.starts_with(self.value),
            },
            None => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    source: String,
    elements: Vec<Element>,
}

impl Document {
    /// `elements` must be ordered by offset.
    pub fn new(source: String, elements: Vec<Element>) -> Self {
        Self { source, elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn find(&self, name: &str, filters: &[AttrFilter]) -> Option<&Element> {
        self.elements.iter().find(|e| Self::matches(e, name, filters))
    }

    pub fn find_all(&self, name: &str, filters: &[AttrFilter]) -> Vec<&Element> {
        self.elements
            .iter()
            .filter(|e| Self::matches(e, name, filters))
            .collect()
    }

    /// Matching elements nested anywhere inside `parent`.
    pub fn find_all_within(
        &self,
        parent: &Element,
        name: &str,
        filters: &[AttrFilter],
    ) -> Vec<&Element> {
        self.elements
            .iter()
            .filter(|e| parent.encloses(e))
            .filter(|e| Self::matches(e, name, filters))
            .collect()
    }

    pub fn find_within(
        &self,
        parent: &Element,
        name: &str,
        filters: &[AttrFilter],
    ) -> Option<&Element> {
        self.elements
            .iter()
            .filter(|e| parent.encloses(e))
            .find(|e| Self::matches(e, name, filters))
    }

    /// Visible text of `element` with tags stripped, entities decoded and
    /// whitespace collapsed.
    pub fn text(&self, element: &Element) -> String {
        let end = element.content.end.min(self.source.len());
        let start = element.content.start.min(end);
        let raw = &self.source[start..end];

        let mut stripped = String::with_capacity(raw.len());
        let mut in_tag = false;
        for c in raw.chars() {
            match c {
                '<' => {
                    in_tag = true;
                    stripped.push(' ');
                }
                '>' if in_tag => in_tag = false,
                _ if !in_tag => stripped.push(c),
                _ => {}
            }
        }

        decode_entities(&stripped)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn matches(element: &Element, name: &str, filters: &[AttrFilter]) -> bool {
        element.name.eq_ignore_ascii_case(name) && filters.iter().all(|f| f.matches(element))
    }
}

/// Decodes the handful of entities that show up in exported modlists and
/// search snippets. Unknown entities are left untouched.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&tail[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let number = entity.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Escapes text for use inside element content or a double-quoted attribute.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(decode_entities("&#39;quoted&#x27;"), "'quoted'");
        assert_eq!(decode_entities("a &unknown; b"), "a &unknown; b");
        assert_eq!(decode_entities("dangling &"), "dangling &");
    }

    #[test]
    fn test_escape_is_undone_by_decode() {
        let text = r#"Create: "Steam & Rails" <1.20>"#;
        assert_eq!(decode_entities(&escape(text)), text);
    }

    #[test]
    fn test_find_within_stays_inside_parent() {
        let html = r#"<div class="a"><span id="x">in</span></div><span id="y">out</span>"#;
        let doc = TagScanner.parse_document(html);
        let parent = doc.find("div", &[AttrFilter::exact("class", "a")]).unwrap();

        let inner = doc.find_all_within(parent, "span", &[]);
        assert_eq!(inner.len(), 1);
        assert_eq!(inner[0].attr("id"), Some("x"));
        assert!(doc
            .find_within(parent, "span", &[AttrFilter::exact("id", "y")])
            .is_none());
    }

    #[test]
    fn test_attr_filters() {
        let html = r#"<div class="result results_links web-result">hit</div><div class="other">miss</div>"#;
        let doc = TagScanner.parse_document(html);

        let found = doc.find_all("div", &[AttrFilter::starts_with("class", "result results_links")]);
        assert_eq!(found.len(), 1);
        assert_eq!(doc.text(found[0]), "hit");
        assert!(doc
            .find("div", &[AttrFilter::exact("class", "result")])
            .is_none());
    }
}
