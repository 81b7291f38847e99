//! argonaut-client — thin client for the Argo workflow service.
//!
//! Forwards fully built [`argonaut_core::Workflow`] manifests to the Argo
//! server with a bearer token, and surfaces HTTP failures unchanged.
//!
//! # Components
//!
//! - **`config`** — `argonaut.toml` parsing and defaults
//! - **`auth`** — bearer credential
//! - **`transport`** — hyper HTTP/1.1 over TCP or TLS
//! - **`service`** — submit / delete / link

pub mod auth;
pub mod config;
pub mod error;
pub mod service;
pub mod transport;

pub use auth::BearerToken;
pub use config::{DEFAULT_NAMESPACE, ServiceConfig, TOKEN_ENV_VAR};
pub use error::{ClientError, ClientResult};
pub use service::{DeleteResponse, WorkflowService};
pub use transport::HttpResponse;
