//! Credential chain library
//!
//! Reads a `<context-credentials>` declaration from XML, validates it into
//! typed source descriptors, and resolves credentials by trying each declared
//! source in order.

pub mod cli;
pub mod color;
pub mod commands;
pub mod config;
pub mod context;
pub mod credentials;
pub mod registry;
