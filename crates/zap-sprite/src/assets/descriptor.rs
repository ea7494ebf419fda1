//! Atlas descriptor parsing.
//!
//! A descriptor lists the named sub-regions packed into a sprite sheet. Two
//! encodings are accepted:
//!
//! ```text
//! <TextureAtlas imagePath="hero.png">
//!     <SubTexture name="run_0.png" x="0" y="0" width="32" height="48" ox="0" oy="0"/>
//! </TextureAtlas>
//! ```
//!
//! and the equivalent JSON document
//! `{ "imagePath": "hero.png", "SubTexture": [ { "name": "run_0.png", "x": 0, ... } ] }`.
//!
//! `name`, `x`, `y`, `width` and `height` are required on every entry; `ox`/`oy`
//! (the pivot) default to zero. An entry that fails validation is dropped and
//! reported in [`ParsedDescriptor::warnings`]; the rest of the document is kept.

use std::path::Path;

use glam::UVec2;
use serde::Deserialize;

use crate::error::DescriptorError;

/// Element name of an entry in the XML form, and the array key in the JSON form.
pub const ENTRY_ELEMENT: &str = "SubTexture";

/// One region record, exactly as the descriptor states it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRegion {
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub pivot_x: i32,
    pub pivot_y: i32,
}

impl RawRegion {
    /// Region covering a whole texture, named after the file stem of `path`.
    /// Used when a sheet comes without a descriptor.
    pub fn whole_texture(path: &str, size: UVec2) -> Self {
        let name = Path::new(path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(path)
            .to_string();
        Self {
            name,
            x: 0,
            y: 0,
            width: size.x,
            height: size.y,
            pivot_x: 0,
            pivot_y: 0,
        }
    }
}

/// Result of parsing a descriptor document.
#[derive(Debug, Default)]
pub struct ParsedDescriptor {
    /// `imagePath` declared on the root, if any.
    pub image_path: Option<String>,
    /// Valid regions in document order.
    pub regions: Vec<RawRegion>,
    /// Entry-level problems; each one cost exactly one entry.
    pub warnings: Vec<DescriptorError>,
}

/// Parse descriptor text. The JSON form is chosen when the first non-blank
/// character is `{`.
pub fn parse_descriptor(text: &str) -> Result<ParsedDescriptor, DescriptorError> {
    let parsed = if text.trim_start().starts_with('{') {
        parse_json(text)?
    } else {
        parse_xml(text)?
    };
    for warning in &parsed.warnings {
        log::warn!("atlas descriptor: {warning}; entry skipped");
    }
    Ok(parsed)
}

/// Serialize regions into the XML form accepted by [`parse_descriptor`].
pub fn write_descriptor(image_path: &str, regions: &[RawRegion]) -> String {
    let mut out = String::with_capacity(64 + regions.len() * 96);
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!("<TextureAtlas imagePath=\"{}\">\n", escape(image_path)));
    for r in regions {
        out.push_str(&format!(
            "    <{ENTRY_ELEMENT} name=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" ox=\"{}\" oy=\"{}\"/>\n",
            escape(&r.name),
            r.x,
            r.y,
            r.width,
            r.height,
            r.pivot_x,
            r.pivot_y,
        ));
    }
    out.push_str("</TextureAtlas>\n");
    out
}

// -- XML --

fn parse_xml(text: &str) -> Result<ParsedDescriptor, DescriptorError> {
    let mut out = ParsedDescriptor::default();
    let mut saw_root = false;
    let mut entry = 0;
    let mut pos = 0;

    while let Some(rel) = text[pos..].find('<') {
        let start = pos + rel;
        let rest = &text[start..];

        if rest.starts_with("<!--") {
            let end = rest
                .find("-->")
                .ok_or(DescriptorError::UnterminatedTag { offset: start })?;
            pos = start + end + 3;
            continue;
        }

        let end = find_tag_end(rest).ok_or(DescriptorError::UnterminatedTag { offset: start })?;
        pos = start + end + 1;

        let body = rest[1..end].trim_end_matches('/');
        if body.starts_with('?') || body.starts_with('!') || body.starts_with('/') {
            continue;
        }

        let (tag, attr_text) = match body.find(char::is_whitespace) {
            Some(i) => (&body[..i], &body[i..]),
            None => (body, ""),
        };
        let attrs = parse_attributes(attr_text);

        if !saw_root {
            saw_root = true;
            out.image_path = lookup(&attrs, "imagePath").map(str::to_string);
            continue;
        }

        if tag != ENTRY_ELEMENT {
            continue;
        }

        match region_from_attributes(entry, &attrs) {
            Ok(region) => out.regions.push(region),
            Err(e) if e.is_entry_level() => out.warnings.push(e),
            Err(e) => return Err(e),
        }
        entry += 1;
    }

    if !saw_root {
        return Err(DescriptorError::MissingRoot);
    }
    Ok(out)
}

/// Byte index of the `>` closing the tag that starts `s`, skipping quoted
/// attribute values.
fn find_tag_end(s: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '>') => return Some(i),
            _ => {}
        }
    }
    None
}

/// Lenient `key="value"` scanner. Stops at the first syntax error and keeps
/// what it already read; validation of required keys happens later.
fn parse_attributes(s: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    let mut rest = s.trim_start();

    while !rest.is_empty() {
        let Some(eq) = rest.find('=') else { break };
        let key = rest[..eq].trim();
        if key.is_empty() || key.contains(char::is_whitespace) {
            break;
        }
        let after = rest[eq + 1..].trim_start();
        let Some(quote) = after.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            break;
        };
        let Some(close) = after[1..].find(quote) else { break };
        attrs.push((key.to_string(), unescape(&after[1..1 + close])));
        rest = after[close + 2..].trim_start();
    }

    attrs
}

fn unescape(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

// -- JSON --

#[derive(Deserialize)]
struct JsonDescriptor {
    #[serde(rename = "imagePath", default)]
    image_path: Option<String>,
    #[serde(rename = "SubTexture", default)]
    entries: Vec<serde_json::Value>,
}

fn parse_json(text: &str) -> Result<ParsedDescriptor, DescriptorError> {
    let doc: JsonDescriptor = serde_json::from_str(text)?;
    let mut out = ParsedDescriptor {
        image_path: doc.image_path,
        ..Default::default()
    };

    for (entry, value) in doc.entries.iter().enumerate() {
        // same key/string pairs as the XML path
        let attrs: Vec<(String, String)> = match value.as_object() {
            Some(map) => map
                .iter()
                .map(|(k, v)| {
                    let text = match v {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (k.clone(), text)
                })
                .collect(),
            None => Vec::new(),
        };
        match region_from_attributes(entry, &attrs) {
            Ok(region) => out.regions.push(region),
            Err(e) if e.is_entry_level() => out.warnings.push(e),
            Err(e) => return Err(e),
        }
    }

    Ok(out)
}

// -- Shared validation --

fn lookup<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn required<T: std::str::FromStr>(
    attrs: &[(String, String)],
    entry: usize,
    attribute: &'static str,
) -> Result<T, DescriptorError> {
    let value = lookup(attrs, attribute)
        .ok_or(DescriptorError::MissingAttribute { entry, attribute })?;
    number(value, entry, attribute)
}

fn optional<T: std::str::FromStr + Default>(
    attrs: &[(String, String)],
    entry: usize,
    attribute: &'static str,
) -> Result<T, DescriptorError> {
    match lookup(attrs, attribute) {
        Some(value) => number(value, entry, attribute),
        None => Ok(T::default()),
    }
}

fn number<T: std::str::FromStr>(
    value: &str,
    entry: usize,
    attribute: &'static str,
) -> Result<T, DescriptorError> {
    value
        .trim()
        .parse()
        .map_err(|_| DescriptorError::InvalidNumber {
            entry,
            attribute,
            value: value.to_string(),
        })
}

fn region_from_attributes(
    entry: usize,
    attrs: &[(String, String)],
) -> Result<RawRegion, DescriptorError> {
    let name = lookup(attrs, "name")
        .filter(|n| !n.is_empty())
        .ok_or(DescriptorError::MissingAttribute { entry, attribute: "name" })?;

    Ok(RawRegion {
        name: name.to_string(),
        x: required(attrs, entry, "x")?,
        y: required(attrs, entry, "y")?,
        width: required(attrs, entry, "width")?,
        height: required(attrs, entry, "height")?,
        pivot_x: optional(attrs, entry, "ox")?,
        pivot_y: optional(attrs, entry, "oy")?,
    })
}
