//! Component loading.
//!
//! # Responsibilities
//! - Resolve a discovered path to its component descriptor
//! - Load a whole ordered path list, concurrently, preserving order
//!
//! # Design Decisions
//! - Loading is a swappable capability (`ComponentLoader`); the shipped
//!   implementation is a static linkage table since compiled binaries have
//!   no runtime module import
//! - Table keys are paths relative to the loader root, `/`-separated, so
//!   the same table serves absolute and relative discovery results
//! - The first failure fails the whole load; nothing is registered

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component as PathComponent, Path, PathBuf};
use std::sync::Arc;

use futures_util::future::{self, BoxFuture, FutureExt};
use globset::GlobBuilder;

use crate::component::descriptor::ComponentDescriptor;
use crate::discovery::PathMatcher;
use crate::error::{BoxError, LatticeError, LoadError, Result};

/// Resolves a discovered path to a component descriptor.
pub trait ComponentLoader: Send + Sync {
    fn load<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<ComponentDescriptor, LoadError>>;
}

/// Factory run when a linked module is loaded.
pub type ModuleFactory = Arc<dyn Fn() -> Result<ComponentDescriptor, BoxError> + Send + Sync>;

/// Static linkage table from module paths to components.
#[derive(Clone)]
pub struct StaticLoader {
    root: PathBuf,
    modules: BTreeMap<String, ModuleFactory>,
}

impl StaticLoader {
    /// Create an empty table whose keys are relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            modules: BTreeMap::new(),
        }
    }

    /// Link a declared component under `key` (e.g. `"users.controller.rs"`).
    pub fn link(self, key: &str, descriptor: ComponentDescriptor) -> Self {
        self.link_with(key, move || Ok(descriptor.clone()))
    }

    /// Link a factory that produces the descriptor when loaded. The factory
    /// may fail, which fails the load of that path.
    pub fn link_with<F>(mut self, key: &str, factory: F) -> Self
    where
        F: Fn() -> Result<ComponentDescriptor, BoxError> + Send + Sync + 'static,
    {
        self.modules.insert(normalize_key(Path::new(key)), Arc::new(factory));
        self
    }

    /// Loader root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Linked keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// Table key for a discovered path.
    pub fn key_for(&self, path: &str) -> String {
        let path = Path::new(path);
        normalize_key(path.strip_prefix(&self.root).unwrap_or(path))
    }

    fn resolve(&self, path: &str) -> Result<ComponentDescriptor, LoadError> {
        let key = self.key_for(path);
        let factory = self.modules.get(&key).ok_or_else(|| LoadError::NotLinked {
            path: path.to_string(),
        })?;

        let descriptor = factory().map_err(|source| LoadError::Evaluation {
            path: path.to_string(),
            source,
        })?;

        tracing::debug!(path, key = %key, component = descriptor.name(), "Component loaded");
        Ok(descriptor)
    }
}

impl ComponentLoader for StaticLoader {
    fn load<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<ComponentDescriptor, LoadError>> {
        future::ready(self.resolve(path)).boxed()
    }
}

/// Linked discovery: patterns are matched against the table keys instead
/// of the filesystem.
impl PathMatcher for StaticLoader {
    fn find(&self, dir: &Path, pattern: &str) -> Result<Vec<String>> {
        let matcher = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|source| LatticeError::Pattern {
                pattern: pattern.to_string(),
                source,
            })?
            .compile_matcher();

        Ok(self
            .keys()
            .filter(|key| matcher.is_match(key))
            .map(|key| dir.join(key).display().to_string())
            .collect())
    }
}

impl fmt::Debug for StaticLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticLoader")
            .field("root", &self.root)
            .field("modules", &self.modules.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Load every path, concurrently, returning descriptors in input order.
pub async fn load_components(
    loader: &dyn ComponentLoader,
    paths: &[String],
) -> Result<Vec<ComponentDescriptor>> {
    let descriptors = future::try_join_all(paths.iter().map(|path| loader.load(path))).await?;
    tracing::debug!(count = descriptors.len(), "Components loaded");
    Ok(descriptors)
}

fn normalize_key(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            PathComponent::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
