//! One-shot HTTP/1.1 exchanges with the Argo server.
//!
//! Each request opens a TCP connection, optionally wraps it in TLS, performs
//! a hyper handshake and sends a single request. The whole exchange runs
//! under the configured timeout.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderValue, Method, Request, StatusCode, header};
use http_body_util::{BodyExt, Full};
use hyper_util::rt::TokioIo;
use rustls::pki_types::ServerName;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::debug;

use crate::config::ServiceConfig;
use crate::error::{ClientError, ClientResult};

const USER_AGENT: &str = concat!("argonaut/", env!("CARGO_PKG_VERSION"));

/// Status and body of a completed exchange.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl HttpResponse {
    /// Turn non-2xx responses into [`ClientError::Http`], body untouched.
    pub fn error_for_status(self) -> ClientResult<Self> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(ClientError::Http {
                status: self.status,
                body: String::from_utf8_lossy(&self.body).into_owned(),
            })
        }
    }
}

pub(crate) struct Transport {
    /// `host:port` to dial.
    addr: String,
    /// Host header.
    host: String,
    /// TLS server name: the host without port or IPv6 brackets.
    server_name: String,
    tls: Option<TlsConnector>,
    timeout: Duration,
}

impl Transport {
    pub(crate) fn new(config: &ServiceConfig) -> ClientResult<Self> {
        let default_port = if config.insecure { 80 } else { 443 };
        let (host, port) = split_authority(&config.domain, default_port)?;
        let tls = if config.insecure {
            None
        } else {
            Some(tls_connector()?)
        };

        Ok(Self {
            addr: format!("{host}:{port}"),
            server_name: host.trim_start_matches('[').trim_end_matches(']').to_string(),
            host: config.domain.clone(),
            tls,
            timeout: config.timeout_duration()?,
        })
    }

    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        authorization: HeaderValue,
        body: Option<Vec<u8>>,
    ) -> ClientResult<HttpResponse> {
        let mut builder = Request::builder()
            .method(method.clone())
            .uri(path)
            .header(header::HOST, &self.host)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, "application/json")
            .header(header::AUTHORIZATION, authorization);
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        let request = builder
            .body(Full::new(Bytes::from(body.unwrap_or_default())))
            .map_err(|e| ClientError::InvalidUri(format!("{path}: {e}")))?;

        debug!(%method, addr = %self.addr, path, "sending request");

        match tokio::time::timeout(self.timeout, self.round_trip(request)).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Timeout {
                uri: path.to_string(),
                timeout_ms: self.timeout.as_millis(),
            }),
        }
    }

    async fn round_trip(&self, request: Request<Full<Bytes>>) -> ClientResult<HttpResponse> {
        let stream = TcpStream::connect(&self.addr)
            .await
            .map_err(|source| ClientError::Connect {
                addr: self.addr.clone(),
                source,
            })?;

        match &self.tls {
            Some(connector) => {
                let server_name = ServerName::try_from(self.server_name.clone())
                    .map_err(|e| ClientError::Tls(format!("invalid server name: {e}")))?;
                let tls = connector
                    .connect(server_name, stream)
                    .await
                    .map_err(|e| ClientError::Tls(e.to_string()))?;
                exchange(TokioIo::new(tls), request).await
            }
            None => exchange(TokioIo::new(stream), request).await,
        }
    }
}

async fn exchange<I>(io: I, request: Request<Full<Bytes>>) -> ClientResult<HttpResponse>
where
    I: hyper::rt::Read + hyper::rt::Write + Unpin + Send + 'static,
{
    let (mut sender, conn) = hyper::client::conn::http1::handshake(io).await?;

    // Drive the connection in the background.
    tokio::spawn(async move {
        if let Err(e) = conn.await {
            debug!(error = %e, "connection closed with error");
        }
    });

    let response = sender.send_request(request).await?;
    let status = response.status();
    let body = response.into_body().collect().await?.to_bytes();
    debug!(%status, bytes = body.len(), "received response");

    Ok(HttpResponse { status, body })
}

/// Mozilla roots, HTTP/1.1 only.
fn tls_connector() -> ClientResult<TlsConnector> {
    let mut root_store = rustls::RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let mut config = rustls::ClientConfig::builder_with_provider(
        rustls::crypto::ring::default_provider().into(),
    )
    .with_safe_default_protocol_versions()
    .map_err(|e| ClientError::Tls(format!("tls protocol version error: {e}")))?
    .with_root_certificates(root_store)
    .with_no_client_auth();
    config.alpn_protocols = vec![b"http/1.1".to_vec()];

    Ok(TlsConnector::from(Arc::new(config)))
}

/// Split `host[:port]`, falling back to `default_port`. IPv6 hosts must be
/// bracketed (`[::1]:2746`) and keep their brackets.
fn split_authority(domain: &str, default_port: u16) -> ClientResult<(String, u16)> {
    if domain.starts_with('[') {
        let end = domain
            .find(']')
            .ok_or_else(|| ClientError::InvalidUri(format!("unterminated IPv6 host in {domain}")))?;
        let (host, rest) = domain.split_at(end + 1);
        return match rest.strip_prefix(':') {
            Some(port) => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| ClientError::InvalidUri(format!("invalid port in {domain}")))?;
                Ok((host.to_string(), port))
            }
            None if rest.is_empty() => Ok((host.to_string(), default_port)),
            None => Err(ClientError::InvalidUri(format!("invalid authority {domain}"))),
        };
    }
    match domain.rsplit_once(':') {
        Some((host, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| ClientError::InvalidUri(format!("invalid port in {domain}")))?;
            Ok((host.to_string(), port))
        }
        None => Ok((domain.to_string(), default_port)),
    }
}
