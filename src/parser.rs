//! XML-to-tree parsing with per-leaf type conversion
//!
//! [`Parser`] builds the nested ordered-map/array structure for a
//! document: branch elements become ordered maps keyed by tag, repeated
//! sibling tags collapse into arrays, and each leaf's trimmed text is
//! handed to the [`TypeConverter`] together with the element's resolved
//! type attribute. Namespace detection runs first, so the type-indicating
//! attribute is found under whatever prefix the document actually bound.

use crate::error::{Error, Result};
use crate::namespaces::{prefix_matches, split_qname, NamespaceOverrides};
use crate::type_converter::TypeConverter;
use crate::values::{Value, ValueMap};
use indexmap::map::Entry;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Key under which a leaf's converted text lands when attributes coexist
const TEXT_KEY: &str = "$";

/// Prefix for attribute keys in the output map
const ATTR_PREFIX: &str = "@";

/// An element as read from the tokenizer, before conversion
#[derive(Debug, Clone, Default)]
struct RawElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<RawElement>,
}

impl RawElement {
    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// XML parser producing typed value trees
#[derive(Debug, Clone, Default)]
pub struct Parser {
    type_converter: TypeConverter,
    overrides: NamespaceOverrides,
}

impl Parser {
    /// Parser with the builtin converters and default namespace URIs
    pub fn new() -> Self {
        Self::default()
    }

    /// Parser using a caller-configured type converter
    pub fn with_type_converter(type_converter: TypeConverter) -> Self {
        Self {
            type_converter,
            overrides: NamespaceOverrides::default(),
        }
    }

    /// Replace the target namespace URIs
    pub fn with_overrides(mut self, overrides: NamespaceOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Parse a document into a typed value tree
    ///
    /// The result wraps the root element: `{ root_tag: value }`. A
    /// document with no root element parses to an empty map. A converter
    /// failure aborts the whole parse with the converter's original
    /// error; no partial result is produced.
    pub fn parse(&mut self, xml: &str) -> Result<Value> {
        self.type_converter
            .detect_namespaces(xml, &self.overrides);

        let mut map = ValueMap::new();
        if let Some(root) = build_tree(xml)? {
            let value = self.convert_element(&root)?;
            map.insert(root.name.clone(), value);
        }
        Ok(Value::Map(map))
    }

    fn convert_element(&self, element: &RawElement) -> Result<Value> {
        let attr_prefix = self.type_converter.attribute_prefix();
        let mut type_attr = None;
        let mut extras = Vec::new();

        for (name, value) in &element.attributes {
            let (_, local) = split_qname(name);
            if prefix_matches(attr_prefix, name) && local == "type" {
                type_attr = Some(value.as_str());
            } else if prefix_matches(attr_prefix, name) && local == "nil" && value == "true" {
                return Ok(Value::Null);
            } else {
                extras.push((name.as_str(), value.as_str()));
            }
        }

        if element.is_leaf() {
            let text = element.text.trim();
            let converted = self.type_converter.convert_leaf(text, type_attr)?;
            if extras.is_empty() {
                return Ok(converted);
            }
            let mut map = ValueMap::new();
            for (name, value) in extras {
                map.insert(
                    format!("{}{}", ATTR_PREFIX, name),
                    Value::Text(value.to_string()),
                );
            }
            if !text.is_empty() || type_attr.is_some() {
                map.insert(TEXT_KEY.to_string(), converted);
            }
            return Ok(Value::Map(map));
        }

        let mut map = ValueMap::new();
        for (name, value) in extras {
            map.insert(
                format!("{}{}", ATTR_PREFIX, name),
                Value::Text(value.to_string()),
            );
        }
        // Mixed content: text alongside children lands under the text key
        let text = element.text.trim();
        if !text.is_empty() {
            map.insert(TEXT_KEY.to_string(), Value::Text(text.to_string()));
        }
        for child in &element.children {
            let value = self.convert_element(child)?;
            match map.entry(child.name.clone()) {
                Entry::Occupied(mut slot) => {
                    // Repeated sibling tags collapse into an array
                    let existing = slot.get_mut();
                    if let Value::Array(items) = existing {
                        items.push(value);
                    } else {
                        let first = std::mem::replace(existing, Value::Null);
                        *existing = Value::Array(vec![first, value]);
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
            }
        }
        Ok(Value::Map(map))
    }
}

/// Build the raw element tree for a document
///
/// Returns `None` when the document has no root element.
fn build_tree(xml: &str) -> Result<Option<RawElement>> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.trim_text(true);

    let mut element_stack: Vec<RawElement> = Vec::new();
    let mut root = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                element_stack.push(parse_element(&e)?);
            }
            Ok(Event::End(_)) => {
                if let Some(current) = element_stack.pop() {
                    if let Some(parent) = element_stack.last_mut() {
                        parent.children.push(current);
                    } else {
                        root = Some(current);
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                let element = parse_element(&e)?;
                if let Some(parent) = element_stack.last_mut() {
                    parent.children.push(element);
                } else if root.is_none() {
                    root = Some(element);
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(current) = element_stack.last_mut() {
                    let text = e
                        .unescape()
                        .map_err(|e| Error::xml(format!("failed to unescape text: {}", e)))?;
                    current.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(current) = element_stack.last_mut() {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    current.text.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::xml(format!(
                    "error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {} // Ignore declarations, comments and processing instructions
        }
        buf.clear();
    }

    if !element_stack.is_empty() {
        return Err(Error::xml("unexpected end of document"));
    }

    Ok(root)
}

/// Read name and attributes from a start tag
fn parse_element(start: &BytesStart) -> Result<RawElement> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| Error::xml(format!("invalid element name: {}", e)))?
        .to_string();

    let mut element = RawElement {
        name,
        ..Default::default()
    };

    for attr_result in start.attributes() {
        let attr =
            attr_result.map_err(|e| Error::xml(format!("failed to parse attribute: {}", e)))?;

        let attr_name = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| Error::xml(format!("invalid attribute name: {}", e)))?;

        // Namespace declarations are scoping information, not data
        if attr_name == "xmlns" || attr_name.starts_with("xmlns:") {
            continue;
        }

        let attr_value = attr
            .unescape_value()
            .map_err(|e| Error::xml(format!("failed to unescape attribute value: {}", e)))?
            .into_owned();

        element
            .attributes
            .push((attr_name.to_string(), attr_value));
    }

    Ok(element)
}
