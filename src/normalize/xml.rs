//! XML normalization.
//!
//! Decodes XML text into a [`TreeValue`] tree matching JSON's shape:
//!
//! - every element becomes a mapping of child names to values;
//! - attributes are merged into the same mapping under `@_`-prefixed keys so
//!   they cannot collide with same-named child elements;
//! - attribute and leaf-text values are type-coerced (`"42"` becomes a
//!   number, `"true"` a boolean) and whitespace-trimmed on both sides;
//! - an element with only text collapses to the coerced scalar, while mixed
//!   content keeps its text under the `#text` key.
//!
//! Repeated child tags become a sequence once a second instance appears. The
//! two tags in [`FORCED_SEQUENCE_TAGS`] are the exception: they are ALWAYS a
//! sequence, even for a single occurrence, because their consumers expect
//! list semantics regardless of cardinality. That asymmetry is deliberate and
//! limited to the allow-list; it is not a general "always array" rule.

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{ParseError, ParseResult};
use crate::types::TreeValue;

/// Tag names that always normalize to a sequence, regardless of how many
/// instances the document contains.
pub const FORCED_SEQUENCE_TAGS: [&str; 2] = ["facility", "establishment"];

/// Reserved key prefix that keeps attributes from colliding with child
/// element names in the same mapping.
pub const ATTRIBUTE_PREFIX: &str = "@_";

/// Key under which element text is stored when the element also carries
/// attributes or child elements.
pub const TEXT_KEY: &str = "#text";

/// Decode XML text into a [`TreeValue`] tree.
///
/// A cheap structural sniff runs first: trimmed input must start with
/// `<?xml` or `<`, otherwise this fails fast without invoking the decoder.
/// Any decoder failure is folded into an `Err` with the standard
/// message/preview shape.
pub fn normalize_xml(input: &str) -> ParseResult<TreeValue> {
    let trimmed = input.trim();
    if !trimmed.starts_with("<?xml") && !trimmed.starts_with('<') {
        return Err(ParseError::with_preview(
            "Invalid XML format: File does not appear to be valid XML",
            input,
        ));
    }

    build_tree(trimmed)
        .map_err(|e| ParseError::with_preview(format!("Failed to parse XML: {e}"), input))
}

/// An element whose end tag has not been seen yet.
struct PendingElement {
    name: String,
    map: BTreeMap<String, TreeValue>,
    text: String,
}

fn build_tree(xml: &str) -> Result<TreeValue, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut root: BTreeMap<String, TreeValue> = BTreeMap::new();
    let mut stack: Vec<PendingElement> = Vec::new();

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(start) => stack.push(open_element(&start)?),
            Event::Empty(start) => {
                let (name, value) = close_element(open_element(&start)?);
                attach_child(parent_map(&mut stack, &mut root), name, value);
            }
            Event::End(_) => {
                let element = stack.pop().ok_or("unexpected closing tag")?;
                let (name, value) = close_element(element);
                attach_child(parent_map(&mut stack, &mut root), name, value);
            }
            Event::Text(text) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text.unescape().map_err(|e| e.to_string())?);
                }
            }
            Event::CData(cdata) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                }
            }
            Event::Eof => break,
            // Declarations, doctypes, comments and processing instructions
            // carry no normalized content.
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(format!("unexpected end of document inside <{}>", open.name));
    }

    Ok(TreeValue::Mapping(root))
}

/// The mapping new children are attached to: the innermost open element, or
/// the document root outside any element.
fn parent_map<'a>(
    stack: &'a mut [PendingElement],
    root: &'a mut BTreeMap<String, TreeValue>,
) -> &'a mut BTreeMap<String, TreeValue> {
    match stack.last_mut() {
        Some(parent) => &mut parent.map,
        None => root,
    }
}

fn open_element(start: &BytesStart<'_>) -> Result<PendingElement, String> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

    let mut map = BTreeMap::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = format!(
            "{ATTRIBUTE_PREFIX}{}",
            String::from_utf8_lossy(attr.key.as_ref())
        );
        let value = attr.unescape_value().map_err(|e| e.to_string())?;
        map.insert(key, coerce_scalar(value.trim()));
    }

    Ok(PendingElement {
        name,
        map,
        text: String::new(),
    })
}

/// Finalize a fully-read element into its normalized value.
fn close_element(element: PendingElement) -> (String, TreeValue) {
    let PendingElement { name, mut map, text } = element;
    let text = text.trim();

    let value = if map.is_empty() {
        // Text-only (or fully empty) element collapses to a scalar.
        coerce_scalar(text)
    } else {
        if !text.is_empty() {
            map.insert(TEXT_KEY.to_string(), coerce_scalar(text));
        }
        TreeValue::Mapping(map)
    };

    (name, value)
}

/// Insert a completed child into its parent mapping, applying the
/// forced-sequence allow-list and the default repeated-tag promotion.
fn attach_child(parent: &mut BTreeMap<String, TreeValue>, name: String, value: TreeValue) {
    match parent.get_mut(&name) {
        Some(TreeValue::Sequence(items)) => items.push(value),
        Some(existing) => {
            // Second occurrence of a non-forced tag: promote to a sequence.
            let first = std::mem::replace(existing, TreeValue::Null);
            *existing = TreeValue::Sequence(vec![first, value]);
        }
        None => {
            let value = if FORCED_SEQUENCE_TAGS.contains(&name.as_str()) {
                TreeValue::Sequence(vec![value])
            } else {
                value
            };
            parent.insert(name, value);
        }
    }
}

/// Coerce attribute and leaf-text strings into typed scalars where the text
/// is a boolean or numeric literal; everything else stays a string.
fn coerce_scalar(text: &str) -> TreeValue {
    match text {
        "true" => return TreeValue::Bool(true),
        "false" => return TreeValue::Bool(false),
        _ => {}
    }

    if let Ok(n) = text.parse::<i64>() {
        return TreeValue::Number(n.into());
    }
    if looks_numeric(text) {
        if let Ok(f) = text.parse::<f64>() {
            if let Some(n) = serde_json::Number::from_f64(f) {
                return TreeValue::Number(n);
            }
        }
    }

    TreeValue::String(text.to_string())
}

/// Digits plus sign/decimal/exponent characters only. Keeps `f64::from_str`
/// extras like "inf" and "NaN" from being coerced.
fn looks_numeric(text: &str) -> bool {
    !text.is_empty()
        && text.bytes().any(|b| b.is_ascii_digit())
        && text
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'+' | b'-' | b'.' | b'e' | b'E'))
}
