use std::future::Future;

use aws_config::SdkConfig;
use aws_sdk_lambda::error::DisplayErrorContext;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::{
    Environment as FunctionEnvironment, FunctionCode, LastUpdateStatus, PackageType, Runtime,
    VpcConfig as FunctionVpcConfig,
};
use dcs_deploy_core::layers::LayerVersion;
use tokio::runtime::Handle;

use crate::adapters::function_api::{
    CreateFunctionInput, FunctionApi, LayerVersionPage, ProviderError, PublishedFunction,
    RemoteFunction, UpdateCodeInput, UpdateStatus,
};
use crate::adapters::identity::IdentityApi;

/// Lambda control-plane adapter. Calls block on the given runtime handle, so
/// methods must not be invoked from inside an async task.
pub struct AwsFunctionApi {
    client: aws_sdk_lambda::Client,
    runtime: Handle,
}

impl AwsFunctionApi {
    pub fn new(config: &SdkConfig, runtime: Handle) -> Self {
        Self {
            client: aws_sdk_lambda::Client::new(config),
            runtime,
        }
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

impl FunctionApi for AwsFunctionApi {
    fn get_function(&self, function_name: &str) -> Result<RemoteFunction, ProviderError> {
        let client = self.client.clone();
        let name = function_name.to_string();
        let output = self
            .block_on(async move { client.get_function().function_name(name).send().await })
            .map_err(|error| {
                let not_found = error
                    .as_service_error()
                    .map(|service| service.is_resource_not_found_exception())
                    .unwrap_or(false);
                if not_found {
                    ProviderError::NotFound {
                        resource: format!("function '{function_name}'"),
                    }
                } else {
                    request_error("GetFunction", &error)
                }
            })?;

        let configuration = output
            .configuration()
            .ok_or(ProviderError::MissingField {
                operation: "GetFunction",
                field: "Configuration",
            })?;

        Ok(RemoteFunction {
            layer_arns: configuration
                .layers()
                .iter()
                .filter_map(|layer| layer.arn())
                .map(str::to_string)
                .collect(),
        })
    }

    fn create_function(
        &self,
        input: &CreateFunctionInput,
    ) -> Result<PublishedFunction, ProviderError> {
        let timeout = to_i32("CreateFunction", "Timeout", input.timeout_secs)?;
        let memory_size = to_i32("CreateFunction", "MemorySize", input.memory_mb)?;
        let vpc_config = FunctionVpcConfig::builder()
            .set_subnet_ids(Some(input.vpc_config.subnet_ids.clone()))
            .set_security_group_ids(Some(input.vpc_config.security_group_ids.clone()))
            .set_ipv6_allowed_for_dual_stack(input.vpc_config.ipv6_allowed_for_dual_stack)
            .build();
        let environment = FunctionEnvironment::builder()
            .set_variables(Some(
                input
                    .environment_variables
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
            ))
            .build();
        let code = FunctionCode::builder()
            .zip_file(Blob::new(input.code.as_bytes().to_vec()))
            .build();

        let request = self
            .client
            .create_function()
            .function_name(&input.function_name)
            .runtime(Runtime::from(input.runtime))
            .role(&input.role)
            .handler(input.handler)
            .code(code)
            .description(input.description)
            .timeout(timeout)
            .memory_size(memory_size)
            .publish(input.publish)
            .vpc_config(vpc_config)
            .package_type(PackageType::Zip)
            .environment(environment)
            .set_layers(Some(input.layers.clone()));

        let output = self
            .block_on(async move { request.send().await })
            .map_err(|error| request_error("CreateFunction", &error))?;

        Ok(PublishedFunction {
            function_arn: output.function_arn().map(str::to_string),
            version: output.version().map(str::to_string),
        })
    }

    fn update_function_configuration(
        &self,
        function_name: &str,
        layers: &[String],
    ) -> Result<(), ProviderError> {
        let request = self
            .client
            .update_function_configuration()
            .function_name(function_name)
            .set_layers(Some(layers.to_vec()));

        self.block_on(async move { request.send().await })
            .map(|_| ())
            .map_err(|error| request_error("UpdateFunctionConfiguration", &error))
    }

    fn update_function_code(
        &self,
        input: &UpdateCodeInput,
    ) -> Result<PublishedFunction, ProviderError> {
        let request = self
            .client
            .update_function_code()
            .function_name(&input.function_name)
            .zip_file(Blob::new(input.code.as_bytes().to_vec()))
            .publish(input.publish)
            .dry_run(input.dry_run);

        let output = self
            .block_on(async move { request.send().await })
            .map_err(|error| request_error("UpdateFunctionCode", &error))?;

        Ok(PublishedFunction {
            function_arn: output.function_arn().map(str::to_string),
            version: output.version().map(str::to_string),
        })
    }

    fn list_layer_versions(
        &self,
        layer_name: &str,
        compatible_runtime: &str,
        marker: Option<&str>,
    ) -> Result<LayerVersionPage, ProviderError> {
        let request = self
            .client
            .list_layer_versions()
            .layer_name(layer_name)
            .compatible_runtime(Runtime::from(compatible_runtime))
            .set_marker(marker.map(str::to_string));

        let output = self
            .block_on(async move { request.send().await })
            .map_err(|error| request_error("ListLayerVersions", &error))?;

        let mut versions = Vec::with_capacity(output.layer_versions().len());
        for item in output.layer_versions() {
            let arn = item
                .layer_version_arn()
                .ok_or(ProviderError::MissingField {
                    operation: "ListLayerVersions",
                    field: "LayerVersionArn",
                })?;
            versions.push(LayerVersion {
                layer_version_arn: arn.to_string(),
                version: item.version(),
            });
        }

        Ok(LayerVersionPage {
            versions,
            next_marker: output.next_marker().map(str::to_string),
        })
    }

    fn last_update_status(&self, function_name: &str) -> Result<UpdateStatus, ProviderError> {
        let request = self
            .client
            .get_function_configuration()
            .function_name(function_name);

        let output = self
            .block_on(async move { request.send().await })
            .map_err(|error| request_error("GetFunctionConfiguration", &error))?;

        Ok(update_status(
            output.last_update_status(),
            output.last_update_status_reason(),
        ))
    }
}

/// STS-backed account lookup.
pub struct AwsIdentityApi {
    client: aws_sdk_sts::Client,
    runtime: Handle,
}

impl AwsIdentityApi {
    pub fn new(config: &SdkConfig, runtime: Handle) -> Self {
        Self {
            client: aws_sdk_sts::Client::new(config),
            runtime,
        }
    }
}

impl IdentityApi for AwsIdentityApi {
    fn caller_account_id(&self) -> Result<String, ProviderError> {
        let request = self.client.get_caller_identity();
        let output = self
            .runtime
            .block_on(async move { request.send().await })
            .map_err(|error| request_error("GetCallerIdentity", &error))?;

        output
            .account()
            .map(str::to_string)
            .ok_or(ProviderError::MissingField {
                operation: "GetCallerIdentity",
                field: "Account",
            })
    }
}

fn update_status(status: Option<&LastUpdateStatus>, reason: Option<&str>) -> UpdateStatus {
    match status {
        Some(LastUpdateStatus::Successful) => UpdateStatus::Successful,
        Some(LastUpdateStatus::InProgress) => UpdateStatus::InProgress,
        Some(LastUpdateStatus::Failed) => UpdateStatus::Failed {
            reason: reason.map(str::to_string),
        },
        _ => UpdateStatus::Unknown,
    }
}

fn request_error(operation: &'static str, error: &impl std::error::Error) -> ProviderError {
    ProviderError::request(operation, DisplayErrorContext(error).to_string())
}

fn to_i32(operation: &'static str, field: &str, value: u32) -> Result<i32, ProviderError> {
    i32::try_from(value)
        .map_err(|_| ProviderError::request(operation, format!("{field} {value} is out of range")))
}
