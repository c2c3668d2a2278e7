use thiserror::Error;

/// Returned whenever a payload cannot be decoded: the reader ran out of
/// bytes, a flag byte held something other than 0/1, a packed integer was
/// too long, or a value did not fit the target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Failed to deserialize value from byte stream")]
pub struct SerdeErr;
