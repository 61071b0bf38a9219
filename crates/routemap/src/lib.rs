use std::error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use onemap::ApiError;

pub mod cache;
pub mod customers;
pub mod map;
pub mod render;
pub mod resolver;
pub mod routes;

#[derive(Debug)]
pub enum PipelineError {
    MalformedInput(String),
    Io {
        path: PathBuf,
        source: io::Error,
    },
    CacheCorrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    Api(ApiError),
    Resolution {
        postal: String,
        source: ApiError,
    },
    /// A render-time coordinate lookup miss. The resolver guarantees
    /// prior resolution, so hitting this is a bug, not bad input.
    MissingCoordinate(String),
}

impl PipelineError {
    pub fn malformed<S: Into<String>>(why: S) -> Self {
        Self::MalformedInput(why.into())
    }
}

impl error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            PipelineError::Io { source, .. } => Some(source),
            PipelineError::CacheCorrupt { source, .. } => Some(source),
            PipelineError::Api(source) => Some(source),
            PipelineError::Resolution { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PipelineError::MalformedInput(why) => write!(f, "{}", why),
            PipelineError::Io { path, source } => {
                write!(f, "{}: {}", path.display(), source)
            }
            PipelineError::CacheCorrupt { path, source } => {
                write!(f, "corrupt geocode cache {}: {}", path.display(), source)
            }
            PipelineError::Api(source) => write!(f, "{}", source),
            PipelineError::Resolution { postal, source } => {
                write!(f, "could not resolve postal {}: {}", postal, source)
            }
            PipelineError::MissingCoordinate(postal) => {
                write!(f, "postal {} has no resolved coordinate", postal)
            }
        }
    }
}

impl From<ApiError> for PipelineError {
    fn from(e: ApiError) -> Self {
        PipelineError::Api(e)
    }
}

pub type PipelineResult<O> = Result<O, PipelineError>;
