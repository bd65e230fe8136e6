//! Server lifecycle
//!
//! [`start`] binds the listeners and spawns the acceptor loop; the returned
//! [`ServerHandle`] reports where the server listens and stops it.

pub mod context;
pub mod listener;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::sync::{Semaphore, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::Config;
use context::ServerContext;
use listener::{ConnectionAcceptor, listen_addrs, stopped};

pub struct ServerHandle {
    ctx: Arc<ServerContext>,
    local_addrs: Vec<SocketAddr>,
    permits: Arc<Semaphore>,
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

/// Starts serving according to `config`.
///
/// Failing to bind loopback is fatal; a discovered address that cannot be
/// bound is logged and skipped.
pub async fn start(config: Config) -> Result<ServerHandle> {
    config.validate()?;
    let ctx = Arc::new(ServerContext::new(config)?);
    let server_cfg = &ctx.config.server;

    let mut listeners = Vec::new();
    for addr in listen_addrs(server_cfg) {
        match TcpListener::bind(addr).await {
            Ok(listener) => listeners.push(listener),
            Err(e) if !addr.ip().is_loopback() => {
                warn!(addr = %addr, error = %e, "skipping address");
            }
            Err(e) => return Err(e).with_context(|| format!("binding {}", addr)),
        }
    }

    let mut local_addrs = Vec::with_capacity(listeners.len());
    for listener in &listeners {
        let addr = listener.local_addr()?;
        info!("Listening on http://{}/", addr);
        local_addrs.push(addr);
    }

    let permits = Arc::new(Semaphore::new(server_cfg.max_simultaneous_connections));
    let (shutdown, shutdown_rx) = watch::channel(false);

    let acceptor =
        ConnectionAcceptor::new(listeners, permits.clone(), ctx.clone(), shutdown_rx.clone());
    let mut tasks = vec![tokio::spawn(acceptor.run())];

    if let Some(interval) = ctx.config.session.sweep_interval_secs {
        tasks.push(tokio::spawn(sweep_sessions(
            ctx.clone(),
            Duration::from_secs(interval),
            shutdown_rx.clone(),
        )));
    }

    info!(
        root = %ctx.router.website_root().display(),
        permits = server_cfg.max_simultaneous_connections,
        release = ?server_cfg.permit_release,
        "server started"
    );

    Ok(ServerHandle {
        ctx,
        local_addrs,
        permits,
        shutdown,
        tasks,
    })
}

impl ServerHandle {
    pub fn local_addrs(&self) -> &[SocketAddr] {
        &self.local_addrs
    }

    pub fn context(&self) -> &Arc<ServerContext> {
        &self.ctx
    }

    /// Permits not currently held by a pending accept or a handler.
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Stops accepting and waits for the acceptor loop to exit.
    ///
    /// Connections already being handled run to completion.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "server task ended abnormally");
            }
        }
        info!("server stopped");
    }
}

async fn sweep_sessions(
    ctx: Arc<ServerContext>,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(every);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = stopped(&mut shutdown) => break,
            _ = ticker.tick() => {
                ctx.sessions
                    .sweep_expired(ctx.config.session.expiration_secs)
                    .await;
            }
        }
    }
}
