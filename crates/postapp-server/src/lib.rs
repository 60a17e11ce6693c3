//! # postapp-server
//!
//! Hosted backend for PostApp: a REST API (axum) over the posts table of a
//! `postapp-store` database. It is the remote data service that the client's
//! HTTP backend talks to.

pub mod api;
pub mod config;
pub mod error;
