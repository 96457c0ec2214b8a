//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM
//! - **memory**: in-process repositories used without a database
//! - **password**: PBKDF2 password hashing shared by both

pub mod memory;
pub mod password;
pub mod persistence;
