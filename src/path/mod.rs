//! # Path Module
//!
//! Translation of routing rules such as `/users/<int(min=1):user_id>` into OpenAPI
//! paths (`/users/{user_id}`) and path parameter descriptors.
//!
//! ## Converter table
//!
//! | converter | schema |
//! |-----------|--------|
//! | `any(a, b)` | `{"type": "array", "items": {"type": "string", "enum": ["a", "b"]}}` |
//! | `int(min=, max=)` | `{"type": "integer", "format": "int32", "minimum": .., "maximum": ..}` |
//! | `float` | `{"type": "number", "format": "float"}` |
//! | `uuid` | `{"type": "string", "format": "uuid"}` |
//! | `path` | `{"type": "string", "format": "path"}` |
//! | `string(length=, minLength=, maxLength=)` | `{"type": "string", ..}` |
//! | `<name>` (default) | `{"type": "string"}` |
//!
//! Unknown converters are logged and documented as `{"type": "string"}` unless the
//! translator is strict. Text that does not form a complete token stays literal. Applications can document their own converters with
//! [`PathTranslator::with_converter`].
//!
//! ## Example
//!
//! ```rust
//! use specgate::path::PathTranslator;
//!
//! let spec = PathTranslator::new().translate("/users/<int(min=1):id>").unwrap();
//! assert_eq!(spec.normalized, "/users/{id}");
//! assert_eq!(spec.parameters[0].schema["minimum"], 1);
//! ```

mod parse;
mod translate;


pub use parse::{parse_converter_args, tokenize, ConverterArgs, PathToken, DEFAULT_CONVERTER};
pub use translate::{PathSpec, PathTranslator, TranslateError};
