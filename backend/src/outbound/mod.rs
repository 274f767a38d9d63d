//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL capture store using Diesel
//! - **memory**: process-local capture store
//! - **codegen**: local handler code generator
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod codegen;
pub mod memory;
pub mod persistence;
