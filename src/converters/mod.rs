//! Converter capability and registry
//!
//! A [`Converter`] turns the raw text of one leaf node into a native
//! [`Value`]. The [`ConverterRegistry`] maps local XML-Schema type names
//! to converters: builtins are registered first, caller-supplied entries
//! replace them for the same local name, and lookup is total - an
//! unmatched name always resolves to the passthrough converter.

mod builtins;

pub use builtins::{
    Passthrough, ToBoolean, ToDate, ToDateTime, ToDecimal, ToFloat, ToInteger, ToTime,
};

use crate::error::Result;
use crate::values::Value;
use indexmap::IndexMap;
use std::sync::Arc;

/// Capability for converting one leaf node's text into a native value
///
/// Implementations may reject their input; the error propagates unchanged
/// to the top-level caller and aborts the enclosing parse.
pub trait Converter: Send + Sync {
    /// Convert raw text into a native value
    fn convert(&self, text: &str) -> Result<Value>;
}

impl<F> Converter for F
where
    F: Fn(&str) -> Result<Value> + Send + Sync,
{
    fn convert(&self, text: &str) -> Result<Value> {
        self(text)
    }
}

/// Shared, immutable converter handle
pub type SharedConverter = Arc<dyn Converter>;

/// Mapping from local type names to converters, immutable after construction
///
/// Constructed from `(pattern, converter)` pairs where a pattern lists
/// alternative local type names separated by `|` (exact, case-sensitive
/// token match, no wildcards). Safe to share read-only across unlimited
/// concurrent parses.
#[derive(Clone)]
pub struct ConverterRegistry {
    entries: IndexMap<String, SharedConverter>,
}

impl ConverterRegistry {
    /// Registry holding only the builtin converters
    pub fn builtin() -> Self {
        let mut entries = IndexMap::new();
        for (pattern, converter) in builtins::table() {
            Self::insert_pattern(&mut entries, pattern, Arc::clone(converter));
        }
        Self { entries }
    }

    /// Registry merging caller-supplied converters over the builtins
    ///
    /// Caller entries take precedence over builtins sharing a local name,
    /// regardless of registration order: overrides replace, not append.
    pub fn with_converters<I, S>(converters: I) -> Self
    where
        I: IntoIterator<Item = (S, SharedConverter)>,
        S: AsRef<str>,
    {
        let mut registry = Self::builtin();
        for (pattern, converter) in converters {
            Self::insert_pattern(&mut registry.entries, pattern.as_ref(), converter);
        }
        registry
    }

    fn insert_pattern(
        entries: &mut IndexMap<String, SharedConverter>,
        pattern: &str,
        converter: SharedConverter,
    ) {
        for name in pattern.split('|') {
            entries.insert(name.to_string(), Arc::clone(&converter));
        }
    }

    /// Resolve a local type name to its converter
    ///
    /// Lookup never fails; unmatched names resolve to the passthrough
    /// converter.
    pub fn resolve(&self, local_type_name: &str) -> &dyn Converter {
        self.entries
            .get(local_type_name)
            .map(Arc::as_ref)
            .unwrap_or(self.passthrough())
    }

    /// The fallback passthrough converter
    pub fn passthrough(&self) -> &'static dyn Converter {
        static PASSTHROUGH: Passthrough = Passthrough;
        &PASSTHROUGH
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("local_names", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_resolution() {
        let registry = ConverterRegistry::builtin();
        assert_eq!(registry.resolve("int").convert("42").unwrap(), Value::Integer(42));
        assert_eq!(
            registry.resolve("boolean").convert("true").unwrap(),
            Value::Boolean(true)
        );
    }

    #[test]
    fn test_unmatched_name_falls_back_to_passthrough() {
        let registry = ConverterRegistry::builtin();
        let value = registry.resolve("noSuchType").convert("  raw text  ").unwrap();
        assert_eq!(value, Value::Text("raw text".to_string()));
    }

    #[test]
    fn test_pipe_pattern_registers_each_alternative() {
        let converter: SharedConverter =
            Arc::new(|_: &str| -> Result<Value> { Ok(Value::Integer(7)) });
        let registry = ConverterRegistry::with_converters([("alpha|beta|gamma", converter)]);

        for name in ["alpha", "beta", "gamma"] {
            assert_eq!(registry.resolve(name).convert("x").unwrap(), Value::Integer(7));
        }
        // No substring or case-insensitive matching
        assert_eq!(
            registry.resolve("Alpha").convert("x").unwrap(),
            Value::Text("x".to_string())
        );
    }

    #[test]
    fn test_caller_entry_replaces_builtin() {
        let converter: SharedConverter = Arc::new(|text: &str| -> Result<Value> {
            Ok(Value::Text(format!("custom:{}", text)))
        });
        let registry = ConverterRegistry::with_converters([("int|integer", converter)]);

        assert_eq!(
            registry.resolve("int").convert("42").unwrap(),
            Value::Text("custom:42".to_string())
        );
        // Other builtins are untouched
        assert_eq!(registry.resolve("long").convert("42").unwrap(), Value::Integer(42));
    }

    #[test]
    fn test_converter_error_propagates() {
        let registry = ConverterRegistry::builtin();
        assert!(registry.resolve("boolean").convert("maybe").is_err());
    }
}
