//! Static content routing
//!
//! The router resolves a request path against the website root, picks a
//! loader from the [`ExtensionRegistry`] by the path's extension, and returns
//! what the loader produced.
//!
//! ```text
//!   /css/site.css  →  <root>/css/site.css          (text)
//!   /img/logo.png  →  <root>/img/logo.png          (binary)
//!   /about         →  <root>/Pages/about.html      (page)
//!   /              →  same as /index.html
//! ```

pub mod descriptor;
pub mod loader;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ServerError;
use crate::http::mime::{ExtensionRegistry, extension_of};
use descriptor::ResponseDescriptor;

#[derive(Debug, Clone)]
pub struct Router {
    website_root: PathBuf,
    registry: ExtensionRegistry,
}

impl Router {
    /// Router over `website_root` with the built-in extension table.
    pub fn new(website_root: impl Into<PathBuf>) -> Self {
        Self::with_registry(website_root, ExtensionRegistry::builtin())
    }

    pub fn with_registry(website_root: impl Into<PathBuf>, registry: ExtensionRegistry) -> Self {
        Self {
            website_root: website_root.into(),
            registry,
        }
    }

    pub fn website_root(&self) -> &Path {
        &self.website_root
    }

    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    /// Resolves `path` to content.
    ///
    /// `Ok(None)` means no extension entry matches (or the path tries to climb
    /// out of the root); the caller answers that with a 404. Read failures
    /// are returned as errors without any recovery here.
    pub fn route(
        &self,
        method: &str,
        path: &str,
        params: &HashMap<String, String>,
    ) -> Result<Option<ResponseDescriptor>, ServerError> {
        let ext = extension_of(path);

        let Some(entry) = self.registry.lookup(ext) else {
            debug!(method, path, ext, "no extension entry");
            return Ok(None);
        };

        let Some(full_path) = self.resolve(path) else {
            debug!(method, path, "path escapes website root");
            return Ok(None);
        };

        debug!(
            method,
            path,
            loader = ?entry.loader,
            params = params.len(),
            full_path = %full_path.display(),
            "routing request"
        );

        entry.loader.load(self, full_path, ext, entry).map(Some)
    }

    /// Joins a `/`-separated request path onto the website root using the
    /// host separator. Parent segments are refused.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let mut full_path = self.website_root.clone();
        for segment in path.split('/').filter(|s| !s.is_empty() && *s != ".") {
            if segment == ".." || segment.contains('\\') {
                return None;
            }
            full_path.push(segment);
        }
        Some(full_path)
    }
}
