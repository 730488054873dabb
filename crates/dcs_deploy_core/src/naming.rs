use std::path::{Component, Path};

use crate::contract::{
    Environment, ARCHIVE_ENTRY_NAME, FUNCTION_NAME_PREFIX, FUNCTION_VERSION_TAG,
};

pub const SOURCE_ROOT: &str = "lambdas";
pub const MAX_FUNCTION_NAME_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamingError {
    #[error("source path '{path}' must be relative and start with 'lambdas/'")]
    OutsideSourceRoot { path: String },

    #[error("source path '{path}' must end with '/lambda_function.py'")]
    UnexpectedFileName { path: String },

    #[error("source path '{path}' has no directories between 'lambdas/' and the handler file")]
    EmptySlug { path: String },

    #[error("source path '{path}' has invalid segment '{segment}'")]
    InvalidSegment { path: String, segment: String },

    #[error("function name '{name}' exceeds 64 characters")]
    NameTooLong { name: String },
}

/// Deterministic provider-side name, the idempotence key for upserts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionName(String);

impl FunctionName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FunctionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FunctionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Maps `lambdas/<a>/<b>/lambda_function.py` to `dcs-<env>-v1-<a>-<b>`.
pub fn resolve_name(
    file_name: &Path,
    environment: Environment,
) -> Result<FunctionName, NamingError> {
    let slug = path_slug(file_name)?;
    let name = format!(
        "{FUNCTION_NAME_PREFIX}-{}-{FUNCTION_VERSION_TAG}-{slug}",
        environment.abbreviation()
    );

    if name.len() > MAX_FUNCTION_NAME_LEN {
        return Err(NamingError::NameTooLong { name });
    }

    Ok(FunctionName(name))
}

fn path_slug(file_name: &Path) -> Result<String, NamingError> {
    let display = file_name.display().to_string();
    let mut segments = Vec::new();
    for component in file_name.components() {
        match component {
            Component::CurDir if segments.is_empty() => {}
            Component::Normal(segment) => match segment.to_str() {
                Some(value) => segments.push(value),
                None => {
                    return Err(NamingError::InvalidSegment {
                        path: display,
                        segment: segment.to_string_lossy().into_owned(),
                    })
                }
            },
            _ => return Err(NamingError::OutsideSourceRoot { path: display }),
        }
    }

    let Some((&root, rest)) = segments.split_first() else {
        return Err(NamingError::OutsideSourceRoot { path: display });
    };
    if root != SOURCE_ROOT {
        return Err(NamingError::OutsideSourceRoot { path: display });
    }

    let Some((&file, directories)) = rest.split_last() else {
        return Err(NamingError::UnexpectedFileName { path: display });
    };
    if file != ARCHIVE_ENTRY_NAME {
        return Err(NamingError::UnexpectedFileName { path: display });
    }

    if directories.is_empty() {
        return Err(NamingError::EmptySlug { path: display });
    }

    if let Some(segment) = directories.iter().find(|segment| !is_valid_segment(segment)) {
        return Err(NamingError::InvalidSegment {
            path: display,
            segment: segment.to_string(),
        });
    }

    Ok(directories.join("-"))
}

fn is_valid_segment(segment: &str) -> bool {
    segment
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}
