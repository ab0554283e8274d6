//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are interfaces that the domain core depends on, but whose
//! implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IDocumentStore`] - Named document persistence behind the save workflow

pub mod document_store;

pub use document_store::IDocumentStore;
