//! Domain core for the cinedex movie API.
//!
//! Everything in this crate is pure logic plus the storage contract: no
//! HTTP, no SQL. The `db` crate provides the Postgres collaborator and the
//! `api` crate exposes the operations in [`service`] over HTTP.

pub mod decode;
pub mod error;
pub mod filters;
pub mod memory;
pub mod movie;
pub mod runtime;
pub mod service;
pub mod store;
pub mod types;
pub mod validator;
