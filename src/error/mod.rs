mod codes;

pub use codes::ExitCode;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::rules::{RuleError, RuleStoreError};
use crate::scanner::ScannerError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Target directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Episode catalogue is empty: {path}")]
    CatalogEmpty { path: PathBuf },

    #[error("Catalogue error: {message}")]
    CatalogError { message: String },

    #[error("Rule error: {message}")]
    RuleError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("{failed} of {total} renames failed")]
    RenameFailures { failed: usize, total: usize },

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            AppError::DirectoryNotFound { .. } => ExitCode::DirectoryNotFound,
            AppError::NotADirectory { .. } => ExitCode::DirectoryNotFound,
            AppError::PermissionDenied { .. } => ExitCode::PermissionError,
            AppError::CatalogEmpty { .. } => ExitCode::CatalogError,
            AppError::CatalogError { .. } => ExitCode::CatalogError,
            AppError::RuleError { .. } => ExitCode::RuleError,
            AppError::ConfigError { .. } => ExitCode::ConfigError,
            AppError::RenameFailures { .. } => ExitCode::RenameFailures,
            AppError::InvalidArguments(_) => ExitCode::InvalidArguments,
            AppError::Other(_) => ExitCode::GeneralError,
        }
    }

    pub fn detailed_message(&self) -> String {
        match self {
            AppError::DirectoryNotFound { path } => {
                format!(
                    "The specified directory does not exist:\n  {}\n\n\
                     Please verify the path and try again.",
                    path.display()
                )
            }

            AppError::NotADirectory { path } => {
                format!(
                    "The specified path is not a directory:\n  {}\n\n\
                     Please provide a valid directory path.",
                    path.display()
                )
            }

            AppError::PermissionDenied { path } => {
                format!(
                    "Permission denied when accessing:\n  {}\n\n\
                     Please check file permissions or run with appropriate privileges.",
                    path.display()
                )
            }

            AppError::CatalogEmpty { path } => {
                format!(
                    "No episodes in the catalogue:\n  {}\n\n\
                     Import one first with --import-catalog <FILE>.",
                    path.display()
                )
            }

            AppError::CatalogError { message } => {
                format!(
                    "Catalogue error:\n  {}\n\n\
                     Fix or re-import the catalogue with --import-catalog <FILE>.",
                    message
                )
            }

            AppError::RuleError { message } => {
                format!(
                    "Rule error:\n  {}\n\n\
                     Use --list-rules to see the configured rules.",
                    message
                )
            }

            AppError::ConfigError { message } => {
                format!(
                    "Configuration error:\n  {}\n\n\
                     Check the EPISODE_RENAMER_* environment variables and command-line flags.",
                    message
                )
            }

            AppError::RenameFailures { failed, total } => {
                format!(
                    "{} of {} renames failed.\n\n\
                     The other files were processed. Run with -v for details.",
                    failed, total
                )
            }

            AppError::InvalidArguments(message) => message.clone(),

            AppError::Other(message) => message.clone(),
        }
    }
}

impl From<ScannerError> for AppError {
    fn from(err: ScannerError) -> Self {
        match err {
            ScannerError::PathNotFound(path) => AppError::DirectoryNotFound { path },
            ScannerError::NotADirectory(path) => AppError::NotADirectory { path },
            ScannerError::PermissionDenied(path) => AppError::PermissionDenied { path },
            ScannerError::IoError(e) => AppError::Other(format!("I/O error: {}", e)),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError::CatalogError {
            message: err.to_string(),
        }
    }
}

impl From<RuleError> for AppError {
    fn from(err: RuleError) -> Self {
        AppError::RuleError {
            message: err.to_string(),
        }
    }
}

impl From<RuleStoreError> for AppError {
    fn from(err: RuleStoreError) -> Self {
        AppError::RuleError {
            message: err.to_string(),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::ConfigError {
            message: err.to_string(),
        }
    }
}
