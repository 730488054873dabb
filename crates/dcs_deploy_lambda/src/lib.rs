//! AWS-facing side of DCS lambda deployment.
//!
//! Owns the provider capability traits and their AWS SDK adapters, the
//! create-or-update orchestration, and the placeholder query handler that
//! deployed functions are modelled on. Naming, packaging and request
//! validation come from `dcs_deploy_core`.

pub mod adapters;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod logging;
