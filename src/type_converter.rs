//! Per-leaf conversion facade
//!
//! [`TypeConverter`] is the contract point the tree builder calls once per
//! leaf node. It couples a [`ConverterRegistry`] with the namespace
//! prefixes detected for the current document: the detection step must
//! complete before any leaf is converted, and the instance is read-only
//! afterward. One instance serves one in-flight parse; the registry
//! itself is freely shared.

use crate::converters::ConverterRegistry;
use crate::error::Result;
use crate::namespaces::{
    detect, prefix_matches, split_qname, NamespaceOverrides, ResolvedNamespaces,
};
use crate::values::Value;

/// Namespace-aware dispatcher from typed leaf text to native values
#[derive(Debug, Clone, Default)]
pub struct TypeConverter {
    registry: ConverterRegistry,
    namespaces: ResolvedNamespaces,
}

impl TypeConverter {
    /// Converter using only the builtin registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Converter using a caller-assembled registry
    pub fn with_registry(registry: ConverterRegistry) -> Self {
        Self {
            registry,
            namespaces: ResolvedNamespaces::default(),
        }
    }

    /// Detect the document's namespace prefixes
    ///
    /// One-time initialization for a document; must complete before any
    /// [`convert_leaf`](Self::convert_leaf) call for it. Re-invoking
    /// re-detects and overwrites the prior state.
    pub fn detect_namespaces(&mut self, document: &str, overrides: &NamespaceOverrides) {
        self.namespaces = detect(document, overrides);
    }

    /// Prefix bound to the attribute namespace, if any
    pub fn attribute_prefix(&self) -> Option<&str> {
        self.namespaces.attribute_prefix()
    }

    /// Prefix bound to the type namespace, if any
    pub fn type_prefix(&self) -> Option<&str> {
        self.namespaces.type_prefix()
    }

    /// Convert one leaf node's text according to its type attribute
    ///
    /// An absent type attribute means passthrough. Otherwise the attribute
    /// value is split at its first colon; when a type prefix was detected
    /// the qualified name must match it to have its prefix stripped - on
    /// mismatch the entire original value, colon included, is treated as
    /// an opaque local type name with no further namespace filtering.
    /// Unmatched local names fall back to passthrough; a converter error
    /// propagates unchanged.
    pub fn convert_leaf(&self, text: &str, type_attribute_value: Option<&str>) -> Result<Value> {
        let Some(qualified) = type_attribute_value else {
            return self.registry.passthrough().convert(text);
        };

        let (_, local) = split_qname(qualified);
        let local_name = match self.namespaces.type_prefix() {
            Some(expected) if !prefix_matches(Some(expected), qualified) => qualified,
            _ => local,
        };

        self.registry.resolve(local_name).convert(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::SharedConverter;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    const XSD_XSI_DOC: &str = r#"<root
        xmlns:xsd="http://www.w3.org/2001/XMLSchema"
        xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"/>"#;

    fn detected(document: &str) -> TypeConverter {
        let mut converter = TypeConverter::new();
        converter.detect_namespaces(document, &NamespaceOverrides::new());
        converter
    }

    #[test]
    fn test_absent_type_attribute_is_passthrough() {
        let converter = detected(XSD_XSI_DOC);
        assert_eq!(
            converter.convert_leaf(" text ", None).unwrap(),
            Value::Text("text".to_string())
        );
    }

    #[test]
    fn test_qualified_type_with_matching_prefix() {
        let converter = detected(XSD_XSI_DOC);
        assert_eq!(
            converter.convert_leaf("42", Some("xsd:int")).unwrap(),
            Value::Integer(42)
        );
    }

    #[test]
    fn test_unqualified_type_without_detected_prefix() {
        let converter = detected("<root/>");
        assert_eq!(
            converter.convert_leaf("true", Some("boolean")).unwrap(),
            Value::Boolean(true)
        );
    }

    #[test]
    fn test_mismatched_prefix_becomes_opaque_name() {
        // "other:int" does not match the detected prefix, so the whole
        // value is looked up as a local name and misses every builtin.
        let converter = detected(XSD_XSI_DOC);
        assert_eq!(
            converter.convert_leaf("42", Some("other:int")).unwrap(),
            Value::Text("42".to_string())
        );
    }

    #[test]
    fn test_opaque_name_can_be_registered() {
        let custom: SharedConverter = Arc::new(|text: &str| -> Result<Value> {
            Ok(Value::Text(text.to_uppercase()))
        });
        let registry = ConverterRegistry::with_converters([("other:shout", custom)]);
        let mut converter = TypeConverter::with_registry(registry);
        converter.detect_namespaces(XSD_XSI_DOC, &NamespaceOverrides::new());

        assert_eq!(
            converter.convert_leaf("hi", Some("other:shout")).unwrap(),
            Value::Text("HI".to_string())
        );
    }

    #[test]
    fn test_default_declaration_drives_empty_prefix_dispatch() {
        // xmlns= binds the empty prefix to the type namespace, so only
        // unqualified type names qualify; prefixed ones go opaque.
        let converter = detected(r#"<root xmlns="http://www.w3.org/2001/XMLSchema"/>"#);
        assert_eq!(converter.type_prefix(), Some(""));

        assert_eq!(
            converter.convert_leaf("42", Some("int")).unwrap(),
            Value::Integer(42)
        );
        assert_eq!(
            converter.convert_leaf("42", Some("xsd:int")).unwrap(),
            Value::Text("42".to_string())
        );
    }

    #[test]
    fn test_unregistered_local_name_falls_back() {
        let converter = detected(XSD_XSI_DOC);
        assert_eq!(
            converter.convert_leaf("raw", Some("xsd:mysteryType")).unwrap(),
            Value::Text("raw".to_string())
        );
    }

    #[test]
    fn test_empty_text_with_builtin_is_null() {
        let converter = detected(XSD_XSI_DOC);
        assert_eq!(converter.convert_leaf("", Some("xsd:int")).unwrap(), Value::Null);
        assert_eq!(converter.convert_leaf("", Some("xsd:date")).unwrap(), Value::Null);
        // Passthrough keeps the empty string
        assert_eq!(
            converter.convert_leaf("", None).unwrap(),
            Value::Text(String::new())
        );
    }

    #[test]
    fn test_redetection_overwrites() {
        let mut converter = detected(XSD_XSI_DOC);
        assert_eq!(converter.type_prefix(), Some("xsd"));

        converter.detect_namespaces("<root/>", &NamespaceOverrides::new());
        assert_eq!(converter.type_prefix(), None);
        assert_eq!(converter.attribute_prefix(), None);
    }
}
