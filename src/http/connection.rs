use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::error::ServerError;
use crate::http::parser::{ParseError, parse_http_request};
use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::router::descriptor::ResponseDescriptor;
use crate::server::context::ServerContext;

/// One accepted client connection. Serves a single request, then closes.
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    ctx: Arc<ServerContext>,
    buffer: Vec<u8>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

impl Connection {
    pub fn new(stream: TcpStream, peer: SocketAddr, ctx: Arc<ServerContext>) -> Self {
        Self {
            stream,
            peer,
            ctx,
            buffer: Vec::with_capacity(4096),
            state: ConnectionState::Reading,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await {
                        Ok(Some(req)) => ConnectionState::Processing(req),
                        Ok(None) => ConnectionState::Closed,
                        Err(e) => {
                            warn!(peer = %self.peer, error = ?e, "malformed request");
                            let response = Response::status_page(e.status());
                            ConnectionState::Writing(ResponseWriter::new(&response))
                        }
                    };
                }

                ConnectionState::Processing(req) => {
                    let response = self.respond(&req).await;
                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => break,
            }
        }

        Ok(())
    }

    /// Reads until one full request is buffered.
    ///
    /// `Ok(None)` when the client hangs up first.
    pub async fn read_request(&mut self) -> Result<Option<Request>, ParseError> {
        loop {
            match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    self.buffer.drain(..consumed);
                    return Ok(Some(request));
                }
                Err(ParseError::Incomplete) => {}
                Err(e) => return Err(e),
            }

            let mut temp = [0u8; 1024];
            let n = match self.stream.read(&mut temp).await {
                Ok(n) => n,
                Err(e) => {
                    debug!(peer = %self.peer, error = %e, "read failed");
                    return Ok(None);
                }
            };

            if n == 0 {
                return Ok(None);
            }

            self.buffer.extend_from_slice(&temp[..n]);
        }
    }

    async fn respond(&self, req: &Request) -> Response {
        match self.handle(req).await {
            Ok(desc) => {
                info!(
                    peer = %self.peer,
                    method = req.method.as_str(),
                    path = %req.path,
                    status = desc.status.as_u16(),
                    bytes = desc.data.len(),
                    "served"
                );
                desc.into()
            }
            Err(err) => {
                warn!(
                    peer = %self.peer,
                    method = req.method.as_str(),
                    path = %req.path,
                    status = err.status().as_u16(),
                    error = %err,
                    "request failed"
                );
                Response::from_error(&err)
            }
        }
    }

    async fn handle(&self, req: &Request) -> Result<ResponseDescriptor, ServerError> {
        let (path, params) = req.route_target();
        let session_cfg = &self.ctx.config.session;

        let session = self.ctx.sessions.get_session(self.peer.ip()).await;
        {
            let mut session = session.write().await;
            if session.is_expired(session_cfg.expiration_secs) {
                debug!(peer = %self.peer, "session expired, de-authorizing");
                session.expire();
            }
            session.update_last_connection_time();

            if session_cfg.validate_tokens && req.method != Method::GET {
                let sent = params.get(&session_cfg.validation_token_name);
                if !session.validate_token(sent.map(String::as_str)) {
                    return Err(ServerError::Validation(format!(
                        "missing or stale {}",
                        session_cfg.validation_token_name
                    )));
                }
            }
        }

        let ctx = self.ctx.clone();
        let method = req.method.as_str();
        let route_path = path.clone();
        let routed = tokio::task::spawn_blocking(move || {
            ctx.router.route(method, &route_path, &params)
        })
        .await
        .map_err(|e| ServerError::ServerFault(format!("routing task failed: {}", e)))?;

        routed?.ok_or(ServerError::RouteNotFound { path })
    }
}
