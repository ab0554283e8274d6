//! docsave Conflict - Save-name conflict detection and resolution
//!
//! Provides:
//! - The save/confirm/rename/abort state machine
//! - Alternative name suggestions (`Report (3)`)
//! - Policies for answering collisions without a prompt
//! - An event-driven adapter for dialog front ends
//! - Use cases that persist committed names through a document store

pub mod dialog;
pub mod error;
pub mod namer;
pub mod policy;
pub mod resolver;
pub mod use_cases;

pub use dialog::{DialogView, SaveDialog, SaveEvent};
pub use error::ConflictError;
pub use namer::ConflictNamer;
pub use policy::ConflictPolicy;
pub use resolver::ConflictResolver;
pub use use_cases::{SaveDocumentUseCase, SaveReceipt};
