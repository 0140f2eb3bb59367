//! # camguard-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Accept raw JPEG uploads from camera devices, with the sensor document
//!   carried in `X-*` headers and/or the query string
//! - Serve a JSON API for browsing and deleting recorded violations
//!   (`/api/violations`, `/api/violations/recent`, …)
//! - Describe the available endpoints at `/`
//! - Map application results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `camguard-app` (for port traits and services) and
//! `camguard-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod error;
pub mod info;
pub mod router;
pub mod state;
