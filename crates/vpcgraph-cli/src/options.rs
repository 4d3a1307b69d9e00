//! Command-line option groups shared by the binary and tests.

use std::path::PathBuf;

use clap::Args;

use vpcgraph_fetch::{AwsConfig, DEFAULT_CLI};
use vpcgraph_render::RenderFormat;

/// Where records come from.
#[derive(Args, Debug, Clone)]
pub struct SourceOptions {
    /// AWS region to describe (falls back to AWS_DEFAULT_REGION, then the
    /// CLI's configured default).
    #[arg(long, value_name = "REGION", env = "AWS_REGION")]
    pub region: Option<String>,

    /// Named AWS profile.
    #[arg(long, value_name = "PROFILE", env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Path to the AWS CLI executable.
    #[arg(long = "aws-cli", value_name = "PATH", default_value = DEFAULT_CLI)]
    pub aws_cli: PathBuf,

    /// Build from a saved JSON snapshot instead of calling AWS.
    #[arg(long, value_name = "SNAPSHOT")]
    pub input: Option<PathBuf>,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            region: None,
            profile: None,
            aws_cli: PathBuf::from(DEFAULT_CLI),
            input: None,
        }
    }
}

impl SourceOptions {
    pub fn from_snapshot(path: impl Into<PathBuf>) -> Self {
        Self {
            input: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn aws_config(&self) -> AwsConfig {
        let region = self
            .region
            .clone()
            .filter(|r| !r.trim().is_empty())
            .or_else(AwsConfig::region_from_env);
        AwsConfig::default()
            .with_region(region)
            .with_profile(self.profile.clone())
            .with_cli_path(&self.aws_cli)
    }
}

/// What gets written.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputOptions {
    /// Output format; inferred from the output extension when omitted.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<RenderFormat>,

    /// TOML file overriding colors, shapes and page settings.
    #[arg(long, value_name = "FILE")]
    pub style: Option<PathBuf>,

    /// Also save the fetched records as a snapshot.
    #[arg(long, value_name = "FILE")]
    pub dump: Option<PathBuf>,
}
