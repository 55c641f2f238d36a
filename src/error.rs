//! Error taxonomy for discovery, loading and registration.
//!
//! # Design Decisions
//! - Every failure propagates to the caller of `register_routes`/`serve`
//! - Nothing is retried or swallowed internally
//! - Errors raised by user code (constructors, conditions, module
//!   factories) are carried as `BoxError` sources

use crate::config::loader::ConfigError;

/// Boxed error produced by component code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Crate-wide result alias.
pub type Result<T, E = LatticeError> = std::result::Result<T, E>;

/// Failure to turn a discovered path into a component descriptor.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Nothing in the linkage table answers to this path.
    #[error("no component is linked for `{path}`")]
    NotLinked { path: String },

    /// The module factory ran and failed.
    #[error("component module `{path}` failed to load: {source}")]
    Evaluation {
        path: String,
        #[source]
        source: BoxError,
    },
}

impl LoadError {
    /// Path of the offending module.
    pub fn path(&self) -> &str {
        match self {
            LoadError::NotLinked { path } | LoadError::Evaluation { path, .. } => path,
        }
    }
}

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum LatticeError {
    #[error("invalid discovery pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("failed to construct component `{component}`: {source}")]
    Construction {
        component: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("binding condition for `{component}` at `{path}` failed: {source}")]
    BindingCondition {
        component: &'static str,
        path: String,
        #[source]
        source: BoxError,
    },

    #[error("service `{0}` is not provided in the injection scope")]
    MissingService(&'static str),

    #[error("failed to bind listener on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// An earlier `register_routes` call failed; the router may be partly
    /// filled and is never served.
    #[error("route registration already failed: {0}")]
    RegistrationFailed(String),

    #[error("server task failed: {0}")]
    Server(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_names_offending_path() {
        let err = LoadError::Evaluation {
            path: "mock/x.controller.rs".into(),
            source: "boom".into(),
        };
        assert_eq!(err.path(), "mock/x.controller.rs");
        assert!(err.to_string().contains("mock/x.controller.rs"));
        assert!(err.to_string().contains("boom"));

        let wrapped: LatticeError = err.into();
        assert!(matches!(wrapped, LatticeError::Load(_)));
    }
}
