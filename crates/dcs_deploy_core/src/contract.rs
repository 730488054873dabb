use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const FUNCTION_VERSION_TAG: &str = "v1";
pub const FUNCTION_NAME_PREFIX: &str = "dcs";
pub const FUNCTION_RUNTIME: &str = "python3.8";
pub const FUNCTION_HANDLER: &str = "lambda_function.lambda_handler";
pub const FUNCTION_DESCRIPTION: &str = "calls python code in dcs-api-endpoints";
pub const ARCHIVE_ENTRY_NAME: &str = "lambda_function.py";
pub const LAYER_NAME_PREFIX: &str = "dcs-api";
pub const DEFAULT_VPC_CONFIG: &str = "{}";
pub const DEFAULT_TIMEOUT_SECS: u32 = 30;
pub const DEFAULT_MEMORY_MB: u32 = 128;
pub const MIN_TIMEOUT_SECS: u32 = 1;
pub const MAX_TIMEOUT_SECS: u32 = 900;
pub const MIN_MEMORY_MB: u32 = 128;
pub const MAX_MEMORY_MB: u32 = 10_240;

/// Deployment tier. Only `production` is special; every other flag value
/// deploys as staging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Staging,
    Production,
}

impl Environment {
    pub fn from_flag(value: &str) -> Self {
        if value == "production" {
            Self::Production
        } else {
            Self::Staging
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Staging => "stg",
            Self::Production => "prod",
        }
    }

    /// Value of the `ENV` variable exposed to the deployed function.
    pub fn env_tag(self) -> &'static str {
        match self {
            Self::Staging => "STG",
            Self::Production => "PROD",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network placement for the function, in the provider's key casing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct VpcConfig {
    #[serde(rename = "SubnetIds", default)]
    pub subnet_ids: Vec<String>,
    #[serde(rename = "SecurityGroupIds", default)]
    pub security_group_ids: Vec<String>,
    #[serde(
        rename = "Ipv6AllowedForDualStack",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub ipv6_allowed_for_dual_stack: Option<bool>,
}

impl VpcConfig {
    pub fn is_empty(&self) -> bool {
        self.subnet_ids.is_empty()
            && self.security_group_ids.is_empty()
            && self.ipv6_allowed_for_dual_stack.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    pub file_name: PathBuf,
    pub environment: Environment,
    /// Raw environment flag; names the executor role verbatim.
    pub role_environment: String,
    pub timeout_secs: u32,
    pub memory_mb: u32,
    pub vpc_config: VpcConfig,
}

impl DeploymentRequest {
    pub fn new(
        file_name: impl Into<PathBuf>,
        environment: Environment,
        timeout_secs: u32,
        memory_mb: u32,
        vpc_config_json: &str,
    ) -> Result<Self, ValidationError> {
        let file_name = file_name.into();
        if file_name.as_os_str().is_empty() {
            return Err(ValidationError::new("file_name cannot be empty"));
        }

        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&timeout_secs) {
            return Err(ValidationError::new(format!(
                "timeout must be between {MIN_TIMEOUT_SECS} and {MAX_TIMEOUT_SECS} seconds, got {timeout_secs}"
            )));
        }

        if !(MIN_MEMORY_MB..=MAX_MEMORY_MB).contains(&memory_mb) {
            return Err(ValidationError::new(format!(
                "memory must be between {MIN_MEMORY_MB} and {MAX_MEMORY_MB} MB, got {memory_mb}"
            )));
        }

        Ok(Self {
            file_name,
            environment,
            role_environment: environment.as_str().to_string(),
            timeout_secs,
            memory_mb,
            vpc_config: parse_vpc_config(vpc_config_json)?,
        })
    }

    /// Keeps the operator's flag for the role name when it is not one of the
    /// two canonical tiers.
    pub fn with_role_environment(mut self, flag: &str) -> Result<Self, ValidationError> {
        if flag.is_empty()
            || !flag
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ValidationError::new(format!(
                "environment '{flag}' cannot be used in a role name"
            )));
        }
        self.role_environment = flag.to_string();
        Ok(self)
    }

    pub fn file_name(&self) -> &Path {
        &self.file_name
    }
}

pub fn parse_vpc_config(text: &str) -> Result<VpcConfig, ValidationError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|error| ValidationError::new(format!("vpc_config is not valid JSON: {error}")))?;

    if !value.is_object() {
        return Err(ValidationError::new("vpc_config must be a JSON object"));
    }

    let config: VpcConfig = serde_json::from_value(value)
        .map_err(|error| ValidationError::new(format!("Malformed vpc_config: {error}")))?;

    if config
        .subnet_ids
        .iter()
        .chain(&config.security_group_ids)
        .any(|id| id.trim().is_empty())
    {
        return Err(ValidationError::new(
            "vpc_config ids must be non-empty strings",
        ));
    }

    Ok(config)
}

pub fn layer_name(environment: Environment) -> String {
    format!("{LAYER_NAME_PREFIX}-{}", environment.abbreviation())
}

/// The executor role is provisioned outside this tool and only referenced.
/// `environment` is the flag as given, not the normalised tier.
pub fn execution_role_arn(account_id: &str, environment: &str) -> String {
    format!("arn:aws:iam::{account_id}:role/dcs-api-lambda-{environment}-executor")
}

pub fn function_environment_variables(environment: Environment) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("ENV".to_string(), environment.env_tag().to_string()),
        (
            "YM_JOB_ENVIRONMENT".to_string(),
            environment.as_str().to_string(),
        ),
    ])
}
