//! JSON-RPC API Layer
//!
//! Exposes the prediction service as JSON-RPC 2.0 over HTTP (optionally
//! guarded by a bearer token) or over newline-delimited stdio.

pub mod auth;
pub mod error;
pub mod handler;
pub mod server;
pub mod stdio;
pub mod types;

pub use server::{RpcServer, RpcServerConfig};
