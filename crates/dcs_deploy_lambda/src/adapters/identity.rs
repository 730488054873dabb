use crate::adapters::function_api::ProviderError;

/// Looks up the account the ambient credentials belong to.
pub trait IdentityApi {
    fn caller_account_id(&self) -> Result<String, ProviderError>;
}
