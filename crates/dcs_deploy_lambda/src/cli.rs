use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use dcs_deploy_core::contract::{
    DeploymentRequest, Environment, ValidationError, DEFAULT_MEMORY_MB, DEFAULT_TIMEOUT_SECS,
    DEFAULT_VPC_CONFIG,
};

use crate::handlers::settle::SettlePolicy;
use crate::logging::LogFormat;

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name = "upsert_lambda",
    about = "Create or update a DCS API lambda from a single handler file",
    long_about = "Packages lambdas/<path>/lambda_function.py into an in-memory zip and\n\
                  creates the dcs-<env>-v1-<path> function, or refreshes its layer and code\n\
                  when it already exists. Credentials and region come from the AWS\n\
                  default provider chain."
)]
pub struct UpsertArgs {
    /// Handler file, e.g. lambdas/somewhere/get/lambda_function.py
    #[arg(short = 'f', long = "file_name", env = "DCS_DEPLOY_FILE_NAME")]
    pub file_name: PathBuf,

    /// Deployment tier; anything other than `production` deploys as staging,
    /// but the executor role is always named after this value
    #[arg(
        short = 'e',
        long = "environment",
        env = "DCS_DEPLOY_ENVIRONMENT",
        default_value = "staging"
    )]
    pub environment: String,

    /// Function timeout in seconds (used on create)
    #[arg(short = 't', long = "timeout", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u32,

    /// Function memory in MB (used on create)
    #[arg(short = 'm', long = "memory", default_value_t = DEFAULT_MEMORY_MB)]
    pub memory: u32,

    /// JSON VPC placement, e.g. '{"SubnetIds": [...], "SecurityGroupIds": [...]}'
    #[arg(long = "vpc_config", visible_alias = "vpc-config", default_value = DEFAULT_VPC_CONFIG)]
    pub vpc_config: String,

    /// Upper bound on waiting for a layer change to settle
    #[arg(long, default_value_t = 45)]
    pub settle_timeout_secs: u64,

    /// Interval between settle status checks
    #[arg(long, default_value_t = 5)]
    pub settle_poll_secs: u64,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl UpsertArgs {
    /// Parses process arguments, accepting the single-dash `-vpc` spelling.
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_legacy_flags(std::env::args_os()))
    }

    pub fn deployment_request(&self) -> Result<DeploymentRequest, ValidationError> {
        let environment = Environment::from_flag(&self.environment);
        if environment.as_str() != self.environment {
            tracing::warn!(
                requested = %self.environment,
                effective = %environment,
                "unrecognized environment, deploying as staging with its own executor role"
            );
        }

        DeploymentRequest::new(
            self.file_name.clone(),
            environment,
            self.timeout,
            self.memory,
            &self.vpc_config,
        )?
        .with_role_environment(&self.environment)
    }

    pub fn settle_policy(&self) -> SettlePolicy {
        SettlePolicy {
            max_wait: Duration::from_secs(self.settle_timeout_secs),
            poll_interval: Duration::from_secs(self.settle_poll_secs),
        }
    }
}

// ── helpers ────────────────────────────────────────────────────────

/// Rewrites `-vpc VALUE` and `-vpc=VALUE` to `--vpc_config`, which clap would
/// otherwise read as the clustered short flags `-v -p -c`.
pub fn normalize_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| match arg.to_str() {
            Some("-vpc") => OsString::from("--vpc_config"),
            Some(text) if text.starts_with("-vpc=") => {
                OsString::from(format!("--vpc_config={}", &text["-vpc=".len()..]))
            }
            _ => arg,
        })
        .collect()
}
