//! Connection acceptor
//!
//! One acceptor loop serves every bound listener from a single permit pool:
//!
//! ```text
//!   Listening ──permit acquired──▶ Accepting ──connection──▶ Dispatching ──▶ Listening
//! ```
//!
//! The loop never waits on an accept itself. Every permit spawns one
//! outstanding accept that races all listeners, so the pool bounds how many
//! accepts are pending at once and no address is left without one. With
//! [`PermitRelease::OnAccept`] the permit returns as soon as the connection is
//! established; with [`PermitRelease::OnCompletion`] it is held until the
//! handler finishes, which bounds in-flight requests instead.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use futures::future::select_all;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{OwnedSemaphorePermit, Semaphore, watch};
use tracing::{debug, error, info, warn};

use crate::config::{PermitRelease, ServerConfig};
use crate::http::connection::Connection;
use crate::server::context::ServerContext;

/// Pause after a failed accept before the permit goes back.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

pub struct ConnectionAcceptor {
    listeners: Arc<Vec<TcpListener>>,
    permits: Arc<Semaphore>,
    ctx: Arc<ServerContext>,
    release: PermitRelease,
    shutdown: watch::Receiver<bool>,
}

impl ConnectionAcceptor {
    pub fn new(
        listeners: Vec<TcpListener>,
        permits: Arc<Semaphore>,
        ctx: Arc<ServerContext>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let release = ctx.config.server.permit_release;
        Self {
            listeners: Arc::new(listeners),
            permits,
            ctx,
            release,
            shutdown,
        }
    }

    /// Runs until shutdown is signalled.
    pub async fn run(mut self) {
        if self.listeners.is_empty() {
            warn!("acceptor has no listeners");
            return;
        }

        loop {
            let permit = tokio::select! {
                biased;
                _ = stopped(&mut self.shutdown) => break,
                permit = self.permits.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            tokio::spawn(accept_one(
                self.listeners.clone(),
                permit,
                self.ctx.clone(),
                self.release,
                self.shutdown.clone(),
            ));
        }

        info!(listeners = self.listeners.len(), "acceptor stopped");
    }
}

/// Waits for the next connection on whichever listener gets one first.
async fn accept_any(listeners: &[TcpListener]) -> std::io::Result<(TcpStream, SocketAddr)> {
    let (accepted, _, _) = select_all(listeners.iter().map(|l| Box::pin(l.accept()))).await;
    accepted
}

async fn accept_one(
    listeners: Arc<Vec<TcpListener>>,
    permit: OwnedSemaphorePermit,
    ctx: Arc<ServerContext>,
    release: PermitRelease,
    mut shutdown: watch::Receiver<bool>,
) {
    let accepted = tokio::select! {
        res = accept_any(&listeners) => res,
        _ = stopped(&mut shutdown) => return,
    };

    match accepted {
        Ok((socket, peer)) => {
            info!("Accepted connection from {}", peer);
            let held = match release {
                PermitRelease::OnAccept => {
                    drop(permit);
                    None
                }
                PermitRelease::OnCompletion => Some(permit),
            };
            tokio::spawn(handle_connection(socket, peer, ctx, held));
        }
        Err(e) => {
            error!(error = %e, "accept failed");
            tokio::time::sleep(ACCEPT_BACKOFF).await;
        }
    }
}

async fn handle_connection(
    socket: TcpStream,
    peer: SocketAddr,
    ctx: Arc<ServerContext>,
    _permit: Option<OwnedSemaphorePermit>,
) {
    let mut conn = Connection::new(socket, peer, ctx);
    if let Err(e) = conn.run().await {
        warn!("Connection error from {}: {}", peer, e);
    }
}

/// Resolves once shutdown has been signalled. Never resolves if the
/// sender is gone without signalling.
pub(crate) async fn stopped(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Loopback plus, when enabled, each local IPv4 interface address.
pub fn listen_addrs(cfg: &ServerConfig) -> Vec<SocketAddr> {
    let mut addrs = vec![SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), cfg.port)];

    if cfg.bind_local_addresses {
        for ip in local_ipv4_addrs() {
            let addr = SocketAddr::new(IpAddr::V4(ip), cfg.port);
            if !addrs.contains(&addr) {
                addrs.push(addr);
            }
        }
    }

    addrs
}

/// IPv4 addresses of every local interface except loopback.
pub fn local_ipv4_addrs() -> Vec<Ipv4Addr> {
    let interfaces = match if_addrs::get_if_addrs() {
        Ok(interfaces) => interfaces,
        Err(e) => {
            debug!(error = %e, "could not enumerate network interfaces");
            return Vec::new();
        }
    };

    let mut addrs = Vec::new();
    for iface in interfaces {
        if let IpAddr::V4(ip) = iface.ip() {
            if !ip.is_loopback() && !addrs.contains(&ip) {
                debug!(interface = %iface.name, ip = %ip, "found local address");
                addrs.push(ip);
            }
        }
    }
    addrs
}
