//! Fetcher backed by the AWS CLI.

use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;
use tracing::{debug, warn};

use vpcgraph_core::{Category, RawRecord};
use vpcgraph_error::{Error, ErrorKind, Result};

use crate::ResourceFetcher;

/// Program looked up on `PATH` when no explicit CLI path is configured.
pub const DEFAULT_CLI: &str = "aws";

/// Connection settings passed to every describe call.
#[derive(Debug, Clone)]
pub struct AwsConfig {
    /// Overrides the CLI's default region when set.
    pub region: Option<String>,
    /// Named profile from the shared config/credentials files.
    pub profile: Option<String>,
    pub cli_path: PathBuf,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: None,
            profile: None,
            cli_path: PathBuf::from(DEFAULT_CLI),
        }
    }
}

impl AwsConfig {
    /// Region from `AWS_REGION`, falling back to `AWS_DEFAULT_REGION`.
    pub fn region_from_env() -> Option<String> {
        ["AWS_REGION", "AWS_DEFAULT_REGION"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.trim().is_empty())
    }

    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = region.filter(|r| !r.trim().is_empty());
        self
    }

    pub fn with_profile(mut self, profile: Option<String>) -> Self {
        self.profile = profile.filter(|p| !p.trim().is_empty());
        self
    }

    pub fn with_cli_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cli_path = path.into();
        self
    }
}

/// Runs `aws ec2 describe-*` once per category.
#[derive(Debug, Clone)]
pub struct AwsCliFetcher {
    config: AwsConfig,
}

impl AwsCliFetcher {
    pub fn new(config: AwsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AwsConfig {
        &self.config
    }

    fn command(&self, subcommand: &str) -> Command {
        let mut cmd = Command::new(&self.config.cli_path);
        cmd.args(["ec2", subcommand, "--output", "json"]);
        if let Some(region) = &self.config.region {
            cmd.args(["--region", region.as_str()]);
        }
        if let Some(profile) = &self.config.profile {
            cmd.args(["--profile", profile.as_str()]);
        }
        // Keep CLI v2 from piping output through a pager.
        cmd.env("AWS_PAGER", "");
        cmd
    }
}

impl ResourceFetcher for AwsCliFetcher {
    fn describe_source(&self) -> String {
        format!(
            "aws-cli region={} profile={}",
            self.config.region.as_deref().unwrap_or("<default>"),
            self.config.profile.as_deref().unwrap_or("<default>")
        )
    }

    fn describe(&self, category: Category) -> Result<Vec<RawRecord>> {
        let Some(subcommand) = category.describe_command() else {
            return Err(Error::invalid_argument(format!(
                "category '{category}' has no describe call"
            )));
        };

        debug!(%category, subcommand, "running describe call");
        let output = self.command(subcommand).output().map_err(|err| {
            Error::command_not_found(self.config.cli_path.display().to_string())
                .with_operation("aws_cli::describe")
                .with_context("category", category.as_str())
                .set_source(err)
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_failure(category, stderr.trim())
                .with_operation("aws_cli::describe")
                .with_context("command", subcommand));
        }

        parse_response(category, &output.stdout)
            .map_err(|e| e.with_operation("aws_cli::describe"))
    }
}

/// Map a failed describe call's stderr onto an error kind.
pub fn classify_failure(category: Category, stderr: &str) -> Error {
    const AUTH: [&str; 7] = [
        "Unable to locate credentials",
        "AuthFailure",
        "InvalidClientTokenId",
        "ExpiredToken",
        "RequestExpired",
        "SignatureDoesNotMatch",
        "The security token included in the request is invalid",
    ];
    const DENIED: [&str; 2] = ["UnauthorizedOperation", "AccessDenied"];
    const THROTTLED: [&str; 3] = ["Throttling", "RequestLimitExceeded", "Rate exceeded"];
    const CONFIG: [&str; 2] = ["You must specify a region", "could not be found"];

    let message = if stderr.is_empty() {
        "describe call failed without output".to_string()
    } else {
        stderr.to_string()
    };

    let category = category.as_str();
    if mentions(stderr, &AUTH) {
        Error::auth_failed(category, message)
    } else if mentions(stderr, &DENIED) {
        Error::permission_denied(category, message)
    } else if mentions(stderr, &THROTTLED) {
        Error::throttled(category, message)
    } else if mentions(stderr, &CONFIG) {
        Error::config_invalid(message).with_context("category", category)
    } else {
        Error::api_failed(category, message)
    }
}

fn mentions(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Pull the record list for `category` out of a describe response body.
///
/// Entries that are not JSON objects are dropped with a warning.
pub fn parse_response(category: Category, body: &[u8]) -> Result<Vec<RawRecord>> {
    let key = category.response_key().ok_or_else(|| {
        Error::invalid_argument(format!("category '{category}' has no response key"))
    })?;

    let value: Value = serde_json::from_slice(body).map_err(|err| {
        Error::new(ErrorKind::DeserializationFailed, "describe response is not valid JSON")
            .with_context("category", category.as_str())
            .set_source(err)
    })?;

    let Some(items) = value.get(key) else {
        return Err(
            Error::invalid_format(format!("describe response has no '{key}' field"))
                .with_context("category", category.as_str()),
        );
    };
    let Value::Array(items) = items else {
        return Err(
            Error::invalid_format(format!("'{key}' is not a list"))
                .with_context("category", category.as_str()),
        );
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item {
            Value::Object(map) => records.push(map.clone()),
            other => warn!(%category, index, value = %other, "ignoring non-object record"),
        }
    }
    Ok(records)
}
