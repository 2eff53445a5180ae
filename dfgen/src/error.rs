//! Custom error types for dfgen.
//!
//! Every variant is fatal: it aborts the enrichment pipeline and the
//! invocation. Non-fatal conditions are reported as
//! [`PassWarning`](crate::passes::PassWarning)s instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DfgenError {
    #[error("Failed to load config {path}: {reason}")]
    ConfigLoad { path: String, reason: String },

    #[error("Config '{name}' not found. Searched: {}", searched.join(", "))]
    ConfigNotFound { name: String, searched: Vec<String> },

    #[error("Template not available: {reason}")]
    MissingTemplate { reason: String },

    #[error("External package {file} ({kind}) needs a destinationPath")]
    MissingPath { file: String, kind: &'static str },

    #[error("Invalid symlinks section: {message}")]
    InvalidSymlinkSpec { message: String },

    #[error("packagesPerLine must be at least 1, got {value}")]
    InvalidPackagesPerLine { value: i64 },

    #[error("Invalid package list file {path}: {message}")]
    PackageList { path: String, message: String },

    #[error("Missing required config field '{field}'")]
    MissingField { field: &'static str },

    #[error("Template error: {message}")]
    Template { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_lists_searched_paths() {
        let err = DfgenError::ConfigNotFound {
            name: "ubu18".to_string(),
            searched: vec!["./conf/ubu18".to_string(), "./ubu18".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Config 'ubu18' not found. Searched: ./conf/ubu18, ./ubu18"
        );
    }

    #[test]
    fn test_missing_path_display() {
        let err = DfgenError::MissingPath {
            file: "libfoo.so.1".to_string(),
            kind: "shared object",
        };
        assert!(err.to_string().contains("libfoo.so.1"));
        assert!(err.to_string().contains("destinationPath"));
    }
}
