//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Only plain data lives here; hooks that need code (`transform_paths`,
//! pre-registered middleware) are set on `LatticeBuilder`.

use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

/// Default discovery pattern, relative to `dir`.
pub const DEFAULT_GLOB: &str = "**/*.{controller,middleware}.rs";

/// Root configuration for a lattice application.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Discovery root. Patterns are matched relative to it.
    pub dir: PathBuf,

    /// One or more discovery patterns. Accepts `glob = "..."` or
    /// `globs = [...]`.
    #[serde(alias = "glob", deserialize_with = "one_or_many")]
    pub globs: Vec<String>,

    /// Listen host.
    pub host: String,

    /// Listen port. `0` asks the OS for a free port.
    pub port: u16,

    /// Gzip responses when the client accepts it.
    pub compress: bool,

    /// Where discovery looks for component paths.
    pub discovery: DiscoverySource,

    /// Prometheus exporter address (e.g. "127.0.0.1:9000"). Binary only.
    pub metrics_address: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            globs: vec![DEFAULT_GLOB.to_string()],
            host: "0.0.0.0".to_string(),
            port: 8080,
            compress: true,
            discovery: DiscoverySource::default(),
            metrics_address: None,
        }
    }
}

impl AppConfig {
    /// Config rooted at `dir`, everything else defaulted.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    /// Discovery patterns, falling back to [`DEFAULT_GLOB`] when none are set.
    pub fn patterns(&self) -> Vec<String> {
        let patterns: Vec<String> = self
            .globs
            .iter()
            .filter(|g| !g.trim().is_empty())
            .cloned()
            .collect();

        if patterns.is_empty() {
            vec![DEFAULT_GLOB.to_string()]
        } else {
            patterns
        }
    }

    /// "host:port" string used for binding.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Source of discoverable component paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoverySource {
    /// Walk `dir` on disk.
    #[default]
    Filesystem,
    /// Match patterns against the loader's linkage table.
    Linked,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(glob) => vec![glob],
        OneOrMany::Many(globs) => globs,
    })
}
