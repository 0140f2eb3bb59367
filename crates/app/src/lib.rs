//! # camguard-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **port trait** the storage adapter must implement:
//!   - `ViolationRepository` — create, query, and delete violations
//! - Define the **driving port** as a use-case struct:
//!   - `ViolationService` — upload, list, get, recent, by-type, delete
//! - Orchestrate domain objects without knowing *how* persistence works
//!
//! ## Dependency rule
//! Depends on `camguard-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
