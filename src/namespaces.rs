//! Namespace prefix detection and matching
//!
//! SOAP-style servers pick their own prefixes for the XML-Schema and
//! XML-Schema-instance namespaces. This module resolves which prefixes a
//! document actually bound to those target URIs (looking only at the root
//! element's opening tag) and provides the prefix-matching rule used when
//! dispatching on a qualified type name.
//!
//! An absent prefix is a distinct state from an explicitly empty one: a
//! name without a colon has no prefix at all, while `":bar"` carries an
//! empty prefix. The two never collapse into one another.

use crate::{XSD_NAMESPACE, XSI_NAMESPACE};
use quick_xml::events::Event;
use quick_xml::Reader;

/// One namespace declaration found on the root element
///
/// A bare `xmlns="<uri>"` default declaration binds the explicitly empty
/// prefix, which is a real prefix here - not the same as no binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceBinding {
    /// Declared prefix (empty for a default `xmlns=` declaration)
    pub prefix: String,
    /// Bound namespace URI
    pub uri: String,
}

/// Target URIs the detector resolves prefixes for
///
/// Defaults to the canonical XML-Schema URI for types and the
/// XML-Schema-instance URI for the type-indicating attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceOverrides {
    type_namespace: String,
    attribute_namespace: String,
}

impl NamespaceOverrides {
    /// Create overrides with the canonical default URIs
    pub fn new() -> Self {
        Self {
            type_namespace: XSD_NAMESPACE.to_string(),
            attribute_namespace: XSI_NAMESPACE.to_string(),
        }
    }

    /// Replace the type namespace URI
    pub fn with_type_namespace(mut self, uri: impl Into<String>) -> Self {
        self.type_namespace = uri.into();
        self
    }

    /// Replace the attribute namespace URI
    pub fn with_attribute_namespace(mut self, uri: impl Into<String>) -> Self {
        self.attribute_namespace = uri.into();
        self
    }

    /// The URI whose prefix qualifies type names
    pub fn type_namespace(&self) -> &str {
        &self.type_namespace
    }

    /// The URI whose prefix qualifies the type-indicating attribute
    pub fn attribute_namespace(&self) -> &str {
        &self.attribute_namespace
    }
}

impl Default for NamespaceOverrides {
    fn default() -> Self {
        Self::new()
    }
}

/// Prefixes bound to the target namespaces, computed once per document
///
/// A field is `None` when the document binds no prefix to that target URI.
/// `None` is never used as a "not found" stand-in for an empty string;
/// an empty string would be an explicitly declared prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedNamespaces {
    attribute_prefix: Option<String>,
    type_prefix: Option<String>,
}

impl ResolvedNamespaces {
    /// Prefix bound to the attribute namespace, if any
    pub fn attribute_prefix(&self) -> Option<&str> {
        self.attribute_prefix.as_deref()
    }

    /// Prefix bound to the type namespace, if any
    pub fn type_prefix(&self) -> Option<&str> {
        self.type_prefix.as_deref()
    }
}

/// Collect the namespace declarations on the document's root element
///
/// Covers both prefixed `xmlns:*` declarations and the bare `xmlns=`
/// default declaration (which binds the empty prefix).
/// Tolerates empty input, a missing XML declaration, trailing malformed
/// content and the complete absence of a root element; anything that
/// cannot be read simply contributes no bindings.
pub fn root_bindings(document: &str) -> Vec<NamespaceBinding> {
    let mut reader = Reader::from_reader(document.as_bytes());
    let mut bindings = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                for attr in e.attributes().flatten() {
                    let Ok(key) = std::str::from_utf8(attr.key.as_ref()) else {
                        continue;
                    };
                    let prefix = if key == "xmlns" {
                        // Default declaration: an explicitly empty prefix
                        ""
                    } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                        prefix
                    } else {
                        continue;
                    };
                    let Ok(uri) = attr.unescape_value() else {
                        continue;
                    };
                    bindings.push(NamespaceBinding {
                        prefix: prefix.to_string(),
                        uri: uri.into_owned(),
                    });
                }
                break;
            }
            // No root element reached
            Ok(Event::Eof) | Err(_) => break,
            // Declarations, comments, PIs, whitespace before the root
            Ok(_) => {}
        }
        buf.clear();
    }

    bindings
}

/// Resolve the prefixes a document binds to the target namespaces
///
/// Selection is by exact URI match, never substring. Non-match for either
/// target yields `None` for that field; detection never fails.
pub fn detect(document: &str, overrides: &NamespaceOverrides) -> ResolvedNamespaces {
    let mut resolved = ResolvedNamespaces::default();

    for binding in root_bindings(document) {
        if resolved.type_prefix.is_none() && binding.uri == overrides.type_namespace {
            resolved.type_prefix = Some(binding.prefix.clone());
        }
        if resolved.attribute_prefix.is_none() && binding.uri == overrides.attribute_namespace {
            resolved.attribute_prefix = Some(binding.prefix);
        }
    }

    resolved
}

/// Split a qualified name at its first colon
///
/// Returns `(None, name)` when no colon exists; the prefix is absent, not
/// empty. A leading colon yields `(Some(""), rest)` - an explicitly empty
/// prefix.
pub fn split_qname(qualified_name: &str) -> (Option<&str>, &str) {
    match qualified_name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qualified_name),
    }
}

/// Test whether a qualified name's prefix matches an expected prefix
///
/// An expected prefix of `None` or `Some("")` matches only names with no
/// colon at all; a name carrying an explicit empty prefix (`":bar"`) is a
/// stricter, different qualification and does not match. A non-empty
/// expected prefix matches only an exactly equal actual prefix.
pub fn prefix_matches(expected: Option<&str>, qualified_name: &str) -> bool {
    let (actual, _) = split_qname(qualified_name);
    match expected {
        None | Some("") => actual.is_none(),
        Some(expected) => actual == Some(expected),
    }
}
