use std::fmt;
use std::io;

use crate::{ErrorKind, ErrorStatus};

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error returned by every vpcgraph crate.
///
/// `operation` names the innermost function that failed; wrapping it again
/// with [`Error::with_operation`] pushes the old name into the context as
/// `called`, so the chain survives to the final message.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: String,
    status: ErrorStatus,
    operation: &'static str,
    context: Vec<(&'static str, String)>,
    source: Option<BoxedSource>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: kind.default_status(),
            operation: "",
            context: Vec::new(),
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> ErrorStatus {
        self.status
    }

    pub fn is_retryable(&self) -> bool {
        self.status.is_retryable()
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    /// First context value stored under `key`.
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find_map(|(k, v)| (*k == key).then_some(v.as_str()))
    }

    pub fn with_operation(mut self, operation: &'static str) -> Self {
        if !self.operation.is_empty() {
            let previous = std::mem::replace(&mut self.operation, operation);
            self.context.push(("called", previous.to_string()));
        } else {
            self.operation = operation;
        }
        self
    }

    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    /// Attach the lower-level error. Only one source is kept.
    pub fn set_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        debug_assert!(self.source.is_none(), "source error already set");
        self.source = Some(Box::new(source));
        self
    }
}

/// `AuthFailed at fetch::describe [category=network]: Unable to locate
/// credentials`, with ` (temporary)` appended when a rerun may help.
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.as_str())?;
        if !self.operation.is_empty() {
            write!(f, " at {}", self.operation)?;
        }
        if !self.context.is_empty() {
            let pairs: Vec<String> = self
                .context
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            write!(f, " [{}]", pairs.join(", "))?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if self.status.is_retryable() {
            f.write_str(" (temporary)")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IoFailed,
        };
        Error::new(kind, err.to_string()).set_source(err)
    }
}

// Constructors for the kinds raised in more than one place.
impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Credentials missing or rejected while describing `category`.
    pub fn auth_failed(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthFailed, message).with_context("category", category)
    }

    pub fn permission_denied(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PermissionDenied, message).with_context("category", category)
    }

    pub fn throttled(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Throttled, message).with_context("category", category)
    }

    pub fn api_failed(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ApiFailed, message).with_context("category", category)
    }

    pub fn command_not_found(program: impl Into<String>) -> Self {
        let program = program.into();
        Self::new(ErrorKind::CommandNotFound, format!("could not run '{program}'"))
            .with_context("program", program)
    }

    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidFormat, message)
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(ErrorKind::FileNotFound, format!("'{path}' does not exist"))
            .with_context("path", path)
    }

    pub fn render_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RenderFailed, message)
    }
}
