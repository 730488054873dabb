#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{Cursor, Read};
use std::sync::Mutex;
use std::time::Duration;

use dcs_deploy_core::layers::LayerVersion;
use dcs_deploy_lambda::adapters::function_api::{
    CreateFunctionInput, FunctionApi, LayerVersionPage, ProviderError, PublishedFunction,
    RemoteFunction, UpdateCodeInput, UpdateStatus,
};
use dcs_deploy_lambda::adapters::identity::IdentityApi;
use dcs_deploy_lambda::handlers::settle::Sleeper;

pub const SAMPLE_SOURCE: &str = "lambdas/somewhere/get/lambda_function.py";
pub const ACCOUNT_ID: &str = "123456789012";

pub fn layer_arn(environment_abbreviation: &str, version: i64) -> String {
    format!(
        "arn:aws:lambda:eu-west-1:{ACCOUNT_ID}:layer:dcs-api-{environment_abbreviation}:{version}"
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetFunction(String),
    CreateFunction(CreateFunctionInput),
    UpdateConfiguration {
        function_name: String,
        layers: Vec<String>,
    },
    UpdateCode(UpdateCodeInput),
    ListLayerVersions {
        layer_name: String,
        runtime: String,
        marker: Option<String>,
    },
    LastUpdateStatus(String),
}

/// In-memory provider that records every call.
pub struct FakeFunctionApi {
    existing: Option<RemoteFunction>,
    get_error: Option<ProviderError>,
    create_error: Option<ProviderError>,
    configuration_error: Option<ProviderError>,
    code_error: Option<ProviderError>,
    layer_pages: Vec<Vec<i64>>,
    environment_abbreviation: &'static str,
    statuses: Mutex<VecDeque<UpdateStatus>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeFunctionApi {
    pub fn missing(environment_abbreviation: &'static str) -> Self {
        Self {
            existing: None,
            get_error: None,
            create_error: None,
            configuration_error: None,
            code_error: None,
            layer_pages: vec![vec![1, 3, 2]],
            environment_abbreviation,
            statuses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn existing(
        environment_abbreviation: &'static str,
        layer_arns: Vec<String>,
    ) -> Self {
        Self {
            existing: Some(RemoteFunction { layer_arns }),
            ..Self::missing(environment_abbreviation)
        }
    }

    pub fn with_get_error(mut self, error: ProviderError) -> Self {
        self.get_error = Some(error);
        self
    }

    pub fn with_create_error(mut self, error: ProviderError) -> Self {
        self.create_error = Some(error);
        self
    }

    pub fn with_configuration_error(mut self, error: ProviderError) -> Self {
        self.configuration_error = Some(error);
        self
    }

    pub fn with_code_error(mut self, error: ProviderError) -> Self {
        self.code_error = Some(error);
        self
    }

    /// Each inner list is one page of layer version numbers.
    pub fn with_layer_pages(mut self, pages: Vec<Vec<i64>>) -> Self {
        self.layer_pages = pages;
        self
    }

    /// Statuses returned by successive status checks; `Successful` once drained.
    pub fn with_statuses(self, statuses: Vec<UpdateStatus>) -> Self {
        *self.statuses.lock().expect("poisoned mutex") = statuses.into();
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("poisoned mutex").clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("poisoned mutex").push(call);
    }

    pub fn creates(&self) -> Vec<CreateFunctionInput> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::CreateFunction(input) => Some(input),
                _ => None,
            })
            .collect()
    }

    pub fn code_updates(&self) -> Vec<UpdateCodeInput> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::UpdateCode(input) => Some(input),
                _ => None,
            })
            .collect()
    }

    pub fn configuration_updates(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::UpdateConfiguration { layers, .. } => Some(layers),
                _ => None,
            })
            .collect()
    }
}

impl FunctionApi for FakeFunctionApi {
    fn get_function(&self, function_name: &str) -> Result<RemoteFunction, ProviderError> {
        self.record(Call::GetFunction(function_name.to_string()));
        if let Some(error) = &self.get_error {
            return Err(error.clone());
        }
        self.existing.clone().ok_or_else(|| ProviderError::NotFound {
            resource: format!("function '{function_name}'"),
        })
    }

    fn create_function(
        &self,
        input: &CreateFunctionInput,
    ) -> Result<PublishedFunction, ProviderError> {
        self.record(Call::CreateFunction(input.clone()));
        if let Some(error) = &self.create_error {
            return Err(error.clone());
        }
        Ok(PublishedFunction {
            function_arn: Some(format!(
                "arn:aws:lambda:eu-west-1:{ACCOUNT_ID}:function:{}",
                input.function_name
            )),
            version: Some("1".to_string()),
        })
    }

    fn update_function_configuration(
        &self,
        function_name: &str,
        layers: &[String],
    ) -> Result<(), ProviderError> {
        self.record(Call::UpdateConfiguration {
            function_name: function_name.to_string(),
            layers: layers.to_vec(),
        });
        match &self.configuration_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn update_function_code(
        &self,
        input: &UpdateCodeInput,
    ) -> Result<PublishedFunction, ProviderError> {
        self.record(Call::UpdateCode(input.clone()));
        if let Some(error) = &self.code_error {
            return Err(error.clone());
        }
        Ok(PublishedFunction {
            function_arn: None,
            version: Some("7".to_string()),
        })
    }

    fn list_layer_versions(
        &self,
        layer_name: &str,
        compatible_runtime: &str,
        marker: Option<&str>,
    ) -> Result<LayerVersionPage, ProviderError> {
        self.record(Call::ListLayerVersions {
            layer_name: layer_name.to_string(),
            runtime: compatible_runtime.to_string(),
            marker: marker.map(str::to_string),
        });

        let index = match marker {
            None => 0,
            Some(value) => value
                .strip_prefix("page-")
                .and_then(|index| index.parse::<usize>().ok())
                .ok_or_else(|| ProviderError::request("ListLayerVersions", "bad marker"))?,
        };
        let versions = self
            .layer_pages
            .get(index)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|version| LayerVersion {
                layer_version_arn: layer_arn(self.environment_abbreviation, version),
                version,
            })
            .collect();
        let next_marker =
            (index + 1 < self.layer_pages.len()).then(|| format!("page-{}", index + 1));

        Ok(LayerVersionPage {
            versions,
            next_marker,
        })
    }

    fn last_update_status(&self, function_name: &str) -> Result<UpdateStatus, ProviderError> {
        self.record(Call::LastUpdateStatus(function_name.to_string()));
        Ok(self
            .statuses
            .lock()
            .expect("poisoned mutex")
            .pop_front()
            .unwrap_or(UpdateStatus::Successful))
    }
}

pub struct FakeIdentity;

impl IdentityApi for FakeIdentity {
    fn caller_account_id(&self) -> Result<String, ProviderError> {
        Ok(ACCOUNT_ID.to_string())
    }
}

/// Identity lookup that always fails, e.g. expired credentials.
pub struct FailingIdentity(pub ProviderError);

impl IdentityApi for FailingIdentity {
    fn caller_account_id(&self) -> Result<String, ProviderError> {
        Err(self.0.clone())
    }
}

/// Records requested sleeps without blocking.
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().expect("poisoned mutex").clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().expect("poisoned mutex").push(duration);
    }
}

/// Entries of a zip as `(name, bytes)`.
pub fn unzip(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("archive should open");
    let mut entries = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).expect("entry should exist");
        let mut body = Vec::new();
        entry.read_to_end(&mut body).expect("entry should read");
        entries.push((entry.name().to_string(), body));
    }
    entries
}
