use dcs_deploy_lambda::handlers::query::{lambda_handler, HandlerResponse, InvocationContext};
use dcs_deploy_lambda::logging::{init_logging, LogFormat};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::{json, Value};

async fn handle_request(event: LambdaEvent<Value>) -> Result<HandlerResponse, Error> {
    let context = InvocationContext {
        request_id: event.context.request_id.clone(),
    };
    Ok(lambda_handler(&event.payload, &context, None))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // `query_lambda --debug` prints the response for an empty event.
    if std::env::args().skip(1).any(|arg| arg == "--debug") {
        init_logging(LogFormat::Pretty, true);
        let response = lambda_handler(&json!({}), &InvocationContext::local(), Some("debug"));
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    init_logging(LogFormat::Json, false);
    lambda_runtime::run(service_fn(handle_request)).await
}
