//! Validation error codes.

/// Why a candidate value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCode {
    Bool = 0,
    Num,
    Int,
    Str,
    Arr,
    Map,
    Record,
    Gt,
    Gte,
    Lt,
    Lte,
    StrLen,
    ArrLen,
    Key,
    Missing,
    Validation,
}

impl ErrorCode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "BOOL",
            Self::Num => "NUM",
            Self::Int => "INT",
            Self::Str => "STR",
            Self::Arr => "ARR",
            Self::Map => "MAP",
            Self::Record => "RECORD",
            Self::Gt => "GT",
            Self::Gte => "GTE",
            Self::Lt => "LT",
            Self::Lte => "LTE",
            Self::StrLen => "STR_LEN",
            Self::ArrLen => "ARR_LEN",
            Self::Key => "KEY",
            Self::Missing => "MISSING",
            Self::Validation => "VALIDATION",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Bool => "Not a boolean.",
            Self::Num => "Not a finite number.",
            Self::Int => "Not an integer.",
            Self::Str => "Not a string.",
            Self::Arr => "Not a list.",
            Self::Map => "Not a dictionary.",
            Self::Record => "Not a record of the declared type.",
            Self::Gt => "Value is too small.",
            Self::Gte => "Value is too small.",
            Self::Lt => "Value is too large.",
            Self::Lte => "Value is too large.",
            Self::StrLen => "Invalid string length.",
            Self::ArrLen => "Invalid list length.",
            Self::Key => "Unknown field.",
            Self::Missing => "Missing required field.",
            Self::Validation => "Custom validator failed.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_dense() {
        assert_eq!(ErrorCode::Bool as u8, 0);
        assert_eq!(ErrorCode::Validation as u8, 15);
        assert_eq!(ErrorCode::StrLen.name(), "STR_LEN");
    }
}
