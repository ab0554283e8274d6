//! docsave Core - Domain logic for the document save workflow
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `SaveRequest`, `ResolutionState`, `Decision`, `DocumentName`, `NameSnapshot`
//! - **Port definitions** - Traits for adapters: `IDocumentStore`
//! - **Configuration** - YAML settings and host-based environment resolution
//!
//! # Architecture
//!
//! The domain module contains pure business logic with no I/O.
//! Ports define trait interfaces that adapter crates implement.

pub mod config;
pub mod domain;
pub mod ports;
