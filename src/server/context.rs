use anyhow::{Context, Result};

use crate::config::Config;
use crate::router::Router;
use crate::session::SessionStore;

/// State shared by the acceptor loops and every connection handler.
///
/// Built once at startup. The router and config are read-only afterwards;
/// the session store does its own locking.
#[derive(Debug)]
pub struct ServerContext {
    pub config: Config,
    pub router: Router,
    pub sessions: SessionStore,
}

impl ServerContext {
    /// Resolves the website root to an absolute path and builds the parts.
    pub fn new(config: Config) -> Result<Self> {
        let root = std::fs::canonicalize(&config.website.root).with_context(|| {
            format!("website root {} is not accessible", config.website.root.display())
        })?;
        anyhow::ensure!(root.is_dir(), "website root {} is not a directory", root.display());

        let router = Router::new(root);
        let sessions = SessionStore::new(config.session.validation_token_name.clone());

        Ok(Self {
            config,
            router,
            sessions,
        })
    }
}
