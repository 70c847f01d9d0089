//! # xmltyped
//!
//! Namespace-aware XML type conversion for SOAP-style response handling.
//!
//! XML documents produced by SOAP-style services encode scalar values as
//! text annotated with an XML-Schema type through a (possibly
//! namespace-prefixed) attribute, commonly `xsi:type`. This library turns
//! those annotated leaves into native values (integers, booleans, dates,
//! or caller-supplied custom types) without hardcoding the namespace
//! prefixes a particular server happened to choose.
//!
//! ## Example
//!
//! ```rust
//! use xmltyped::{Parser, Value};
//!
//! let xml = r#"
//!     <response xmlns:xsd="http://www.w3.org/2001/XMLSchema"
//!               xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
//!         <count xsi:type="xsd:int">42</count>
//!     </response>
//! "#;
//!
//! let mut parser = Parser::new();
//! let value = parser.parse(xml).unwrap();
//! assert_eq!(value["response"]["count"], Value::Integer(42));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules - foundation
pub mod error;
pub mod values;

// Namespace detection and prefix matching
pub mod namespaces;

// Converter trait, builtins and registry
pub mod converters;

// Per-leaf dispatch facade
pub mod type_converter;

// Tree builder
pub mod parser;

// Re-exports for convenience
pub use converters::{Converter, ConverterRegistry};
pub use error::{Error, Result};
pub use namespaces::{detect, prefix_matches, NamespaceOverrides, ResolvedNamespaces};
pub use parser::Parser;
pub use type_converter::TypeConverter;
pub use values::Value;

/// Version of the xmltyped library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XML Schema namespace (the default type namespace)
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// XML Schema instance namespace (the default attribute namespace)
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
