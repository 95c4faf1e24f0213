//! Limits on pointers accepted by tree lookup.

use thiserror::Error;

/// Longest pointer string accepted, in bytes.
pub const MAX_POINTER_LEN: usize = 1024;

/// Deepest path accepted, in steps.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("pointer `{0}` must be empty or start with `/`")]
    NotAbsolute(String),
    #[error("pointer of {0} bytes exceeds the limit of 1024")]
    TooLong(usize),
    #[error("path of {0} steps exceeds the limit of 256")]
    TooDeep(usize),
}

/// Check the shape of a pointer string before it is split.
///
/// # Example
///
/// ```
/// use paramtree_path::validate_pointer;
///
/// assert!(validate_pointer("").is_ok());
/// assert!(validate_pointer("/cars/0/price").is_ok());
/// assert!(validate_pointer("cars").is_err());
/// ```
pub fn validate_pointer(pointer: &str) -> Result<(), PointerError> {
    if pointer.len() > MAX_POINTER_LEN {
        return Err(PointerError::TooLong(pointer.len()));
    }
    if !pointer.is_empty() && !pointer.starts_with('/') {
        return Err(PointerError::NotAbsolute(pointer.to_string()));
    }
    Ok(())
}

/// Check the number of steps in a path.
pub fn validate_depth(depth: usize) -> Result<(), PointerError> {
    if depth > MAX_DEPTH {
        return Err(PointerError::TooDeep(depth));
    }
    Ok(())
}
