//! Path selectors for parameter trees.
//!
//! A path addresses a node by position from the tree root: record fields by
//! name, list elements by index and dictionary entries by key. Paths are used
//! for lookup and debugging; edits never travel by path.
//!
//! The pointer form follows RFC 6901 escaping, so a key containing `/` or `~`
//! survives a format/parse round trip.
//!
//! # Example
//!
//! ```
//! use paramtree_path::{format_path, parse_pointer, PathStep};
//!
//! let path = vec![
//!     PathStep::Field("cars".to_string()),
//!     PathStep::Index(0),
//!     PathStep::Field("price".to_string()),
//! ];
//! assert_eq!(format_path(&path), "/cars/0/price");
//! assert_eq!(parse_pointer("/cars/0/price").unwrap(), vec!["cars", "0", "price"]);
//! ```

use thiserror::Error;

pub mod types;
pub use types::{Path, PathStep};

pub mod validate;
pub use validate::{validate_depth, validate_pointer, PointerError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("invalid pointer: {0}")]
    Invalid(#[from] PointerError),
}

/// Unescapes a pointer component.
///
/// `~1` is replaced with `/` and `~0` is replaced with `~`.
///
/// # Example
///
/// ```
/// use paramtree_path::unescape_component;
///
/// assert_eq!(unescape_component("a~0b"), "a~b");
/// assert_eq!(unescape_component("c~1d"), "c/d");
/// ```
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    // ~1 before ~0, otherwise "~01" would decode to "/"
    component.replace("~1", "/").replace("~0", "~")
}

/// Escapes a pointer component.
///
/// # Example
///
/// ```
/// use paramtree_path::escape_component;
///
/// assert_eq!(escape_component("a~b"), "a~0b");
/// assert_eq!(escape_component("c/d"), "c~1d");
/// ```
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Parse a pointer string into unescaped components.
///
/// The empty pointer addresses the root and yields no components. Whether a
/// component is a field, an index or a key is decided by the tree it is
/// resolved against, not by the parser.
///
/// # Errors
///
/// Returns [`PathError::Invalid`] if the pointer fails [`validate_pointer`]
/// or has more than [`validate::MAX_DEPTH`] components.
pub fn parse_pointer(pointer: &str) -> Result<Vec<String>, PathError> {
    validate_pointer(pointer)?;
    let Some(rest) = pointer.strip_prefix('/') else {
        return Ok(Vec::new());
    };
    let components: Vec<String> = rest.split('/').map(unescape_component).collect();
    validate_depth(components.len())?;
    Ok(components)
}

/// Format path steps into a pointer string.
///
/// Returns an empty string for the root path.
pub fn format_path(path: &[PathStep]) -> String {
    let mut out = String::new();
    for step in path {
        out.push('/');
        out.push_str(&escape_component(&step.component()));
    }
    out
}

/// Check if a string is a canonical non-negative list index.
///
/// # Example
///
/// ```
/// use paramtree_path::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("42"));
/// assert!(!is_valid_index("01"));
/// assert!(!is_valid_index("-1"));
/// ```
pub fn is_valid_index(index: &str) -> bool {
    if index.is_empty() {
        return false;
    }
    let bytes = index.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_root() {
        assert_eq!(parse_pointer("").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_parse_relative_is_rejected() {
        assert_eq!(
            parse_pointer("cars/0"),
            Err(PathError::Invalid(PointerError::NotAbsolute("cars/0".into())))
        );
    }

    #[test]
    fn test_format_escapes_keys() {
        let path = vec![
            PathStep::Field("properties".into()),
            PathStep::Key("a/b~c".into()),
        ];
        let pointer = format_path(&path);
        assert_eq!(pointer, "/properties/a~1b~0c");
        assert_eq!(parse_pointer(&pointer).unwrap(), vec!["properties", "a/b~c"]);
    }

    #[test]
    fn test_parse_too_deep() {
        let pointer = "/a".repeat(validate::MAX_DEPTH + 1);
        assert!(matches!(
            parse_pointer(&pointer),
            Err(PathError::Invalid(PointerError::TooDeep(_)))
        ));
    }
}
