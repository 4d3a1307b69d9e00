//! Error kinds

use strum_macros::{Display, IntoStaticStr};

use crate::ErrorStatus;

/// What went wrong, independent of where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    Unexpected,
    InvalidArgument,
    /// Style file or AWS settings are unusable.
    ConfigInvalid,

    // =========================================================================
    // Describe calls
    // =========================================================================
    /// Credentials are missing, expired or rejected.
    AuthFailed,
    /// Credentials work but the describe call is not allowed.
    PermissionDenied,
    Throttled,
    /// Any other provider-side failure.
    ApiFailed,
    /// The AWS CLI could not be started.
    CommandNotFound,

    // =========================================================================
    // Data and output
    // =========================================================================
    /// A response or snapshot does not have the expected shape.
    InvalidFormat,
    SerializationFailed,
    DeserializationFailed,
    RenderFailed,
    FileNotFound,
    IoFailed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Status an error of this kind starts with.
    pub fn default_status(&self) -> ErrorStatus {
        match self {
            ErrorKind::Throttled | ErrorKind::IoFailed => ErrorStatus::Temporary,
            _ => ErrorStatus::Permanent,
        }
    }
}
