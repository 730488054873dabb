use std::process::ExitCode;

use dcs_deploy_lambda::adapters::aws::{AwsFunctionApi, AwsIdentityApi};
use dcs_deploy_lambda::cli::UpsertArgs;
use dcs_deploy_lambda::handlers::settle::ThreadSleeper;
use dcs_deploy_lambda::handlers::upsert::{upsert, UpsertOutcome};
use dcs_deploy_lambda::logging::init_logging;

fn run(args: &UpsertArgs) -> Result<UpsertOutcome, Box<dyn std::error::Error>> {
    let request = args.deployment_request()?;

    let runtime = tokio::runtime::Runtime::new()?;
    let aws_config =
        runtime.block_on(aws_config::load_defaults(aws_config::BehaviorVersion::latest()));
    let functions = AwsFunctionApi::new(&aws_config, runtime.handle().clone());
    let identity = AwsIdentityApi::new(&aws_config, runtime.handle().clone());

    let outcome = upsert(
        &functions,
        &identity,
        &ThreadSleeper,
        &request,
        &args.settle_policy(),
    )?;
    Ok(outcome)
}

fn main() -> ExitCode {
    let args = UpsertArgs::parse_normalized();
    init_logging(args.log_format, args.verbose);

    match run(&args) {
        Ok(outcome) => {
            if let UpsertOutcome::Created { layer_arn, .. } = &outcome {
                tracing::info!(layer_version_arn = %layer_arn, "attached layer to new function");
            }
            let published = outcome.published();
            tracing::info!(
                function_name = %outcome.function_name(),
                function_arn = published.function_arn.as_deref().unwrap_or("-"),
                version = published.version.as_deref().unwrap_or("-"),
                created = matches!(outcome, UpsertOutcome::Created { .. }),
                "deployment finished"
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!(error = %error, "deployment failed");
            ExitCode::FAILURE
        }
    }
}
