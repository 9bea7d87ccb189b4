use super::{decode_entities, Document, DocumentParser, Element};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

/// Single-pass tag scanner.
///
/// Elements left open at the end of the input extend to the end of the
/// document. A closing tag closes the nearest open element with the same name
/// and everything opened after it.
#[derive(Debug, Default, Clone, Copy)]
pub struct TagScanner;

impl DocumentParser for TagScanner {
    fn parse_document(&self, html: &str) -> Document {
        let mut elements: Vec<Element> = Vec::new();
        let mut open: Vec<usize> = Vec::new();
        let mut pos = 0;

        while let Some(found) = html[pos..].find('<') {
            let start = pos + found;
            let rest = &html[start..];

            if rest.starts_with("<!--") {
                pos = rest.find("-->").map_or(html.len(), |end| start + end + 3);
                continue;
            }
            if rest.starts_with("<!") || rest.starts_with("<?") {
                pos = skip_past_gt(html, start);
                continue;
            }
            if let Some(closing) = rest.strip_prefix("</") {
                let name = read_name(closing).to_ascii_lowercase();
                if let Some(depth) = open.iter().rposition(|&i| elements[i].name() == name) {
                    for &i in &open[depth..] {
                        elements[i].set_content_end(start);
                    }
                    open.truncate(depth);
                }
                pos = skip_past_gt(html, start);
                continue;
            }

            let name = read_name(&rest[1..]);
            if name.is_empty() {
                pos = start + 1;
                continue;
            }
            let (attributes, tag_end, self_closing) = read_attributes(html, start + 1 + name.len());
            let name = name.to_ascii_lowercase();
            let index = elements.len();

            if self_closing || VOID_ELEMENTS.contains(&name.as_str()) {
                elements.push(Element::new(name, attributes, start, tag_end..tag_end));
                pos = tag_end;
                continue;
            }

            if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
                let close = find_ignore_case(html, tag_end, &format!("</{name}"));
                let content_end = close.unwrap_or(html.len());
                elements.push(Element::new(name, attributes, start, tag_end..content_end));
                pos = match close {
                    Some(close) => skip_past_gt(html, close),
                    None => html.len(),
                };
                continue;
            }

            elements.push(Element::new(name, attributes, start, tag_end..html.len()));
            open.push(index);
            pos = tag_end;
        }

        Document::new(html.to_string(), elements)
    }
}

fn read_name(s: &str) -> &str {
    let end = s
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == ':' || c == '_'))
        .unwrap_or(s.len());
    &s[..end]
}

fn skip_past_gt(html: &str, from: usize) -> usize {
    html[from..].find('>').map_or(html.len(), |gt| from + gt + 1)
}

fn find_ignore_case(html: &str, from: usize, needle: &str) -> Option<usize> {
    html[from..]
        .to_ascii_lowercase()
        .find(&needle.to_ascii_lowercase())
        .map(|i| from + i)
}

/// Reads attributes starting right after the tag name. Returns the attributes,
/// the offset just past the closing `>` and whether the tag was self-closing.
fn read_attributes(html: &str, mut i: usize) -> (Vec<(String, String)>, usize, bool) {
    let bytes = html.as_bytes();
    let mut attributes = Vec::new();

    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            return (attributes, bytes.len(), false);
        }
        match bytes[i] {
            b'>' => return (attributes, i + 1, false),
            b'/' if bytes.get(i + 1) == Some(&b'>') => return (attributes, i + 2, true),
            b'/' => {
                i += 1;
                continue;
            }
            _ => {}
        }

        let key_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && !matches!(bytes[i], b'=' | b'>' | b'/')
        {
            i += 1;
        }
        if i == key_start {
            i += 1;
            continue;
        }
        let key = html[key_start..i].to_ascii_lowercase();

        let mut j = i;
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if bytes.get(j) != Some(&b'=') {
            attributes.push((key, String::new()));
            continue;
        }
        i = j + 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let value = match bytes.get(i) {
            Some(&quote) if quote == b'"' || quote == b'\'' => {
                let value_start = i + 1;
                let value_end = html[value_start..]
                    .find(quote as char)
                    .map_or(html.len(), |end| value_start + end);
                i = (value_end + 1).min(html.len());
                &html[value_start..value_end]
            }
            _ => {
                let value_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                    i += 1;
                }
                &html[value_start..i]
            }
        };
        attributes.push((key, decode_entities(value)));
    }
}
