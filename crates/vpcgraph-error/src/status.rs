//! Error status

use strum_macros::{Display, IntoStaticStr};

/// Whether the failure could go away on its own.
///
/// vpcgraph never retries; a temporary status only tells the user that
/// running again later may succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ErrorStatus {
    /// Needs a change on the user's side: credentials, IAM policy, input.
    #[default]
    Permanent,
    /// Throttling or a transient I/O problem.
    Temporary,
}

impl ErrorStatus {
    pub fn is_retryable(&self) -> bool {
        *self == ErrorStatus::Temporary
    }
}
