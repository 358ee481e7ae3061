//! Error handling for the weather aggregator
//!
//! Client-facing errors come from a JSON catalog that maps an error kind to
//! an HTTP status and message. The catalog is loaded once at startup and
//! shared read-only between requests.

use std::collections::HashMap;
use std::path::Path;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error kinds the catalog must define
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingCoordinates,
    InvalidCoordinates,
    InvalidThresholds,
    InvalidDate,
    UnsupportedFormat,
    MissingSearchQuery,
    GeocodingFailed,
    InternalError,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 8] = [
        ErrorKind::MissingCoordinates,
        ErrorKind::InvalidCoordinates,
        ErrorKind::InvalidThresholds,
        ErrorKind::InvalidDate,
        ErrorKind::UnsupportedFormat,
        ErrorKind::MissingSearchQuery,
        ErrorKind::GeocodingFailed,
        ErrorKind::InternalError,
    ];

    /// Key used in the catalog file and in error responses
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MissingCoordinates => "MISSING_COORDINATES",
            ErrorKind::InvalidCoordinates => "INVALID_COORDINATES",
            ErrorKind::InvalidThresholds => "INVALID_THRESHOLDS",
            ErrorKind::InvalidDate => "INVALID_DATE",
            ErrorKind::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            ErrorKind::MissingSearchQuery => "MISSING_SEARCH_QUERY",
            ErrorKind::GeocodingFailed => "GEOCODING_FAILED",
            ErrorKind::InternalError => "INTERNAL_ERROR",
        }
    }
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorSpec {
    #[serde(rename = "HTTP_ERR_CODE")]
    pub http_err_code: u16,
    #[serde(rename = "ERR_MESSAGE")]
    pub err_message: String,
}

/// Why the catalog could not be loaded. Fatal at startup.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read error catalog {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed error catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("error catalog is missing entry {0}")]
    MissingEntry(&'static str),

    #[error("error catalog entry {code} has invalid status {status}")]
    InvalidStatus { code: &'static str, status: u16 },
}

/// Immutable lookup table from error kind to status and message
#[derive(Debug, Clone)]
pub struct ErrorCatalog {
    entries: HashMap<ErrorKind, (StatusCode, String)>,
}

impl ErrorCatalog {
    /// Load the catalog from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Parse the catalog, requiring an entry for every [`ErrorKind`]
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let mut specs: HashMap<String, ErrorSpec> = serde_json::from_str(raw)?;
        let mut entries = HashMap::with_capacity(ErrorKind::ALL.len());

        for kind in ErrorKind::ALL {
            let spec = specs
                .remove(kind.code())
                .ok_or(CatalogError::MissingEntry(kind.code()))?;
            let status = StatusCode::from_u16(spec.http_err_code).map_err(|_| {
                CatalogError::InvalidStatus {
                    code: kind.code(),
                    status: spec.http_err_code,
                }
            })?;
            entries.insert(kind, (status, spec.err_message));
        }

        if !specs.is_empty() {
            tracing::debug!("Ignoring {} unknown error catalog entries", specs.len());
        }

        Ok(Self { entries })
    }

    /// Build the client-facing error for `kind`
    pub fn error(&self, kind: ErrorKind) -> AppError {
        let (status, message) = self
            .entries
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| (StatusCode::INTERNAL_SERVER_ERROR, kind.code().to_string()));
        AppError::Catalogued {
            kind,
            status,
            message,
        }
    }

    /// Log a server-side failure and replace it with the catalogued
    /// `INTERNAL_ERROR` response
    pub fn internal(&self, err: AppError) -> AppError {
        if matches!(err, AppError::Catalogued { .. }) {
            return err;
        }
        tracing::error!("Internal failure: {}", err);
        self.error(ErrorKind::InternalError)
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Client errors resolved through the catalog
    #[error("{message}")]
    Catalogued {
        kind: ErrorKind,
        status: StatusCode,
        message: String,
    },

    // External service errors
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Export error: {0}")]
    Export(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Catalogued {
                kind,
                status,
                message,
            } => (
                *status,
                ErrorDetail {
                    code: kind.code().to_string(),
                    message: message.clone(),
                },
            ),
            AppError::Provider(_) | AppError::Export(_) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: ErrorKind::InternalError.code().to_string(),
                    message: "An internal server error occurred".to_string(),
                },
            ),
        };

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Client error: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
