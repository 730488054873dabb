pub mod aws;
pub mod function_api;
pub mod identity;
