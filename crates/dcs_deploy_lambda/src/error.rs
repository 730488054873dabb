//! Error type for a single create-or-update run.

use dcs_deploy_core::archive::ArchiveError;
use dcs_deploy_core::contract::ValidationError;
use dcs_deploy_core::naming::NamingError;
use thiserror::Error;

use crate::adapters::function_api::ProviderError;

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("invalid deployment request: {0}")]
    Validation(#[from] ValidationError),

    #[error("cannot derive function name: {0}")]
    Naming(#[from] NamingError),

    #[error("cannot package function code: {0}")]
    Archive(#[from] ArchiveError),

    #[error("provider call failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("layer '{layer_name}' has no versions compatible with {runtime}")]
    NoLayerVersions {
        layer_name: String,
        runtime: &'static str,
    },

    #[error("configuration update of '{function_name}' failed: {reason}")]
    UpdateFailed {
        function_name: String,
        reason: String,
    },
}
