use crate::models::SortingConfig;
use sortlink_core::ordering::DESCENDING_MARKER;
use thiserror::Error;

/// A configuration that parsed but cannot be used.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must not be empty")]
    EmptyParam { key: &'static str },

    #[error("sort_param and dir_param are both {name:?}")]
    DuplicateParam { name: String },

    #[error("path_separator must not be empty")]
    EmptySeparator,

    #[error(
        "path_separator {separator:?} must not contain whitespace or the \
         descending marker '{}'",
        DESCENDING_MARKER
    )]
    InvalidSeparator { separator: String },
}

impl SortingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sort_param.trim().is_empty() {
            return Err(ConfigError::EmptyParam { key: "sort_param" });
        }
        if self.dir_param.trim().is_empty() {
            return Err(ConfigError::EmptyParam { key: "dir_param" });
        }
        if self.sort_param == self.dir_param {
            return Err(ConfigError::DuplicateParam {
                name: self.sort_param.clone(),
            });
        }
        if self.path_separator.is_empty() {
            return Err(ConfigError::EmptySeparator);
        }
        if self
            .path_separator
            .chars()
            .any(|c| c == DESCENDING_MARKER || c.is_whitespace())
        {
            return Err(ConfigError::InvalidSeparator {
                separator: self.path_separator.clone(),
            });
        }
        Ok(())
    }
}
