//! Provider-free deployment primitives for DCS API lambdas.
//!
//! This crate owns deterministic naming, code packaging, layer selection and
//! the deployment request contract. It intentionally excludes AWS SDK and
//! Lambda runtime concerns, which live in `dcs_deploy_lambda`.

pub mod archive;
pub mod contract;
pub mod layers;
pub mod naming;
