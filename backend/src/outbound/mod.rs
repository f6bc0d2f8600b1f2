//! Outbound adapters implementing domain ports.
//!
//! - **memory**: mutex-guarded in-process storage for the user aggregate,
//!   honouring the relational schema's column widths.
//!
//! Adapters are thin translators between domain types and storage
//! records. They contain no business logic.

pub mod memory;
