//! # vpcgraph-error
//!
//! One error type shared by the fetch, build and render stages.
//!
//! - **ErrorKind**: what failed (`AuthFailed`, `Throttled`, `RenderFailed`, ...)
//! - **ErrorStatus**: whether running again later may help
//! - **operation / context**: where it failed and for which resource category
//!
//! ```rust
//! use vpcgraph_error::{Error, ErrorKind};
//!
//! let err = Error::auth_failed("subnet", "Unable to locate credentials")
//!     .with_operation("aws_cli::describe");
//! assert_eq!(err.kind(), ErrorKind::AuthFailed);
//! assert_eq!(err.context_value("category"), Some("subnet"));
//! ```
//!
//! Per-record problems (malformed records, dangling references) are not
//! errors; the graph builder handles them itself.

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

pub type Result<T> = std::result::Result<T, Error>;
