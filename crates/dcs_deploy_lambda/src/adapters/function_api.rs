use std::collections::BTreeMap;

use dcs_deploy_core::archive::CodeArchive;
use dcs_deploy_core::contract::VpcConfig;
use dcs_deploy_core::layers::LayerVersion;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("{resource} was not found")]
    NotFound { resource: String },

    #[error("{operation} failed: {message}")]
    Request {
        operation: &'static str,
        message: String,
    },

    #[error("{operation} response is missing {field}")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },
}

impl ProviderError {
    pub fn request(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Request {
            operation,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Progress of the most recent configuration or code change on a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    Successful,
    InProgress,
    Failed { reason: Option<String> },
    /// The provider did not report a status.
    Unknown,
}

/// The parts of an existing function the update path compares against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFunction {
    pub layer_arns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerVersionPage {
    pub versions: Vec<LayerVersion>,
    pub next_marker: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFunctionInput {
    pub function_name: String,
    pub runtime: &'static str,
    pub role: String,
    pub handler: &'static str,
    pub description: &'static str,
    pub code: CodeArchive,
    pub timeout_secs: u32,
    pub memory_mb: u32,
    pub publish: bool,
    pub vpc_config: VpcConfig,
    pub environment_variables: BTreeMap<String, String>,
    pub layers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCodeInput {
    pub function_name: String,
    pub code: CodeArchive,
    pub publish: bool,
    pub dry_run: bool,
}

/// What the provider reports back after a publishing write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishedFunction {
    pub function_arn: Option<String>,
    pub version: Option<String>,
}

/// Function-management calls the deployer needs. Implemented over the AWS
/// SDK in `adapters::aws` and by in-memory fakes in tests.
pub trait FunctionApi {
    /// Returns `ProviderError::NotFound` when no function has this name.
    fn get_function(&self, function_name: &str) -> Result<RemoteFunction, ProviderError>;

    fn create_function(
        &self,
        input: &CreateFunctionInput,
    ) -> Result<PublishedFunction, ProviderError>;

    fn update_function_configuration(
        &self,
        function_name: &str,
        layers: &[String],
    ) -> Result<(), ProviderError>;

    fn update_function_code(
        &self,
        input: &UpdateCodeInput,
    ) -> Result<PublishedFunction, ProviderError>;

    fn list_layer_versions(
        &self,
        layer_name: &str,
        compatible_runtime: &str,
        marker: Option<&str>,
    ) -> Result<LayerVersionPage, ProviderError>;

    fn last_update_status(&self, function_name: &str) -> Result<UpdateStatus, ProviderError>;
}
