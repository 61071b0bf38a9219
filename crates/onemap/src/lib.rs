use std::error;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

pub mod client;
pub mod model;

pub use client::{OneMapClient, OneMapCredentials};

/// Capability to resolve a postal code to a WGS84 coordinate.
///
/// The pipeline only depends on this trait, so tests can substitute a
/// deterministic table instead of reaching the live OneMap service.
#[async_trait]
pub trait Geocoder {
    async fn resolve(&self, postal: &str) -> Result<(f64, f64), ApiError>;
}

#[derive(Debug, Clone)]
pub enum ApiError {
    MissingCredentials(&'static str),
    AuthRejected {
        status_code: reqwest::StatusCode,
    },
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
    NoResult(String),
}

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::MissingCredentials(var) => {
                write!(f, "{} must be set in the environment", var)
            }
            ApiError::AuthRejected { status_code } => {
                write!(f, "OneMap rejected the credentials ({})", status_code)
            }
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ApiError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, url, text)
                }
                None => write!(f, "Invalid Response ({}) {}", status_code, url),
            },
            ApiError::NoResult(postal) => {
                write!(f, "No geocode result for postal {}", postal)
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::JsonError(Arc::new(e))
    }
}
