/// A published version of a shared dependency layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerVersion {
    pub layer_version_arn: String,
    pub version: i64,
}

/// Marker used when a function has no layer attached, so any resolved layer
/// compares as a change.
pub const NO_LAYER_SENTINEL: &str = "-1";

pub fn latest_layer_version(versions: &[LayerVersion]) -> Option<&LayerVersion> {
    versions.iter().max_by_key(|layer| layer.version)
}

/// Layer list as the provider reports it, with the sentinel standing in for
/// "nothing attached".
pub fn attached_layer_arns(arns: Vec<String>) -> Vec<String> {
    if arns.is_empty() {
        vec![NO_LAYER_SENTINEL.to_string()]
    } else {
        arns
    }
}
