//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: in-process repositories for database-less runs and tests
//! - **keto**: reqwest client for the third-party keto recipes API
//! - **security**: Argon2id password hashing
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business rules.

pub mod keto;
pub mod memory;
pub mod persistence;
pub mod security;
