use dcs_deploy_core::archive::build_archive;
use dcs_deploy_core::contract::{
    execution_role_arn, function_environment_variables, layer_name, DeploymentRequest,
    Environment, FUNCTION_DESCRIPTION, FUNCTION_HANDLER, FUNCTION_RUNTIME,
};
use dcs_deploy_core::layers::{attached_layer_arns, latest_layer_version, LayerVersion};
use dcs_deploy_core::naming::{resolve_name, FunctionName};

use crate::adapters::function_api::{
    CreateFunctionInput, FunctionApi, PublishedFunction, RemoteFunction, UpdateCodeInput,
};
use crate::adapters::identity::IdentityApi;
use crate::error::DeployError;
use crate::handlers::settle::{wait_for_settle, SettleOutcome, SettlePolicy, Sleeper};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerChange {
    pub before: Vec<String>,
    pub after: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created {
        function_name: FunctionName,
        layer_arn: String,
        published: PublishedFunction,
    },
    Updated {
        function_name: FunctionName,
        layer_change: Option<LayerChange>,
        settle: SettleOutcome,
        published: PublishedFunction,
    },
}

impl UpsertOutcome {
    pub fn function_name(&self) -> &FunctionName {
        match self {
            Self::Created { function_name, .. } | Self::Updated { function_name, .. } => {
                function_name
            }
        }
    }

    pub fn published(&self) -> &PublishedFunction {
        match self {
            Self::Created { published, .. } | Self::Updated { published, .. } => published,
        }
    }
}

/// Creates the function if it does not exist yet, otherwise refreshes its
/// layer and code. Only a not-found answer from the existence check is
/// handled; every other error propagates.
pub fn upsert(
    functions: &impl FunctionApi,
    identity: &impl IdentityApi,
    sleeper: &impl Sleeper,
    request: &DeploymentRequest,
    settle_policy: &SettlePolicy,
) -> Result<UpsertOutcome, DeployError> {
    let function_name = resolve_name(request.file_name(), request.environment)?;

    let existing = match functions.get_function(function_name.as_str()) {
        Ok(function) => Some(function),
        Err(error) if error.is_not_found() => None,
        Err(error) => return Err(error.into()),
    };

    match existing {
        Some(function) => {
            tracing::info!(function_name = %function_name, "running update");
            update_function(
                functions,
                sleeper,
                function_name,
                &function,
                request,
                settle_policy,
            )
        }
        None => {
            tracing::info!(function_name = %function_name, "running create");
            create_function(functions, identity, function_name, request)
        }
    }
}

/// Walks every page of the layer listing and returns the highest version.
pub fn resolve_latest_layer(
    functions: &impl FunctionApi,
    environment: Environment,
) -> Result<LayerVersion, DeployError> {
    let layer_name = layer_name(environment);
    let mut versions = Vec::new();
    let mut marker: Option<String> = None;
    loop {
        let page =
            functions.list_layer_versions(&layer_name, FUNCTION_RUNTIME, marker.as_deref())?;
        versions.extend(page.versions);
        match page.next_marker {
            Some(next) if !next.is_empty() => marker = Some(next),
            _ => break,
        }
    }

    let latest = latest_layer_version(&versions)
        .cloned()
        .ok_or_else(|| DeployError::NoLayerVersions {
            layer_name: layer_name.clone(),
            runtime: FUNCTION_RUNTIME,
        })?;

    tracing::debug!(
        layer_name = %layer_name,
        candidates = versions.len(),
        layer_version_arn = %latest.layer_version_arn,
        "resolved latest layer version"
    );
    Ok(latest)
}

fn update_function(
    functions: &impl FunctionApi,
    sleeper: &impl Sleeper,
    function_name: FunctionName,
    current: &RemoteFunction,
    request: &DeploymentRequest,
    settle_policy: &SettlePolicy,
) -> Result<UpsertOutcome, DeployError> {
    let latest = resolve_latest_layer(functions, request.environment)?;
    let layers = vec![latest.layer_version_arn];

    // A function carries at most one layer.
    let current_layers = attached_layer_arns(current.layer_arns.clone());

    let layer_change = if current_layers != layers {
        functions.update_function_configuration(function_name.as_str(), &layers)?;
        tracing::info!(
            function_name = %function_name,
            before = ?current_layers,
            after = ?layers,
            "updated function layer"
        );
        Some(LayerChange {
            before: current_layers,
            after: layers,
        })
    } else {
        None
    };

    // Code goes second: a pending code update blocks layer changes.
    let settle = wait_for_settle(functions, sleeper, function_name.as_str(), settle_policy)?;

    let code = build_archive(request.file_name())?;
    tracing::info!(
        function_name = %function_name,
        archive_bytes = code.len(),
        archive_sha256 = %code.fingerprint(),
        "pushing function code"
    );
    let published = functions.update_function_code(&UpdateCodeInput {
        function_name: function_name.to_string(),
        code,
        publish: true,
        dry_run: false,
    })?;

    Ok(UpsertOutcome::Updated {
        function_name,
        layer_change,
        settle,
        published,
    })
}

fn create_function(
    functions: &impl FunctionApi,
    identity: &impl IdentityApi,
    function_name: FunctionName,
    request: &DeploymentRequest,
) -> Result<UpsertOutcome, DeployError> {
    let account_id = identity.caller_account_id()?;
    let role = execution_role_arn(&account_id, &request.role_environment);
    let environment_variables = function_environment_variables(request.environment);

    let code = build_archive(request.file_name())?;
    let latest = resolve_latest_layer(functions, request.environment)?;

    tracing::info!(
        function_name = %function_name,
        role = %role,
        layer_version_arn = %latest.layer_version_arn,
        archive_sha256 = %code.fingerprint(),
        "creating function"
    );
    let published = functions.create_function(&CreateFunctionInput {
        function_name: function_name.to_string(),
        runtime: FUNCTION_RUNTIME,
        role,
        handler: FUNCTION_HANDLER,
        description: FUNCTION_DESCRIPTION,
        code,
        timeout_secs: request.timeout_secs,
        memory_mb: request.memory_mb,
        publish: true,
        vpc_config: request.vpc_config.clone(),
        environment_variables,
        layers: vec![latest.layer_version_arn.clone()],
    })?;

    Ok(UpsertOutcome::Created {
        function_name,
        layer_arn: latest.layer_version_arn,
        published,
    })
}
