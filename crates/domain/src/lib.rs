//! # camguard-domain
//!
//! Pure domain model for the camguard violation recorder.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Violations** (a captured JPEG plus the sensor document that
//!   describes the detected event)
//! - Define the **image payload** rules (non-empty, JPEG, size-bounded)
//! - Define **pagination** bounds shared by every listing use-case
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod image;
pub mod pagination;
pub mod violation;
