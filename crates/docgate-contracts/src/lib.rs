//! # docgate-contracts
//!
//! Shared types, records, and error contracts for the docgate tool-call
//! hooks.
//!
//! Every other crate in the workspace imports from here. Nothing in this
//! crate performs I/O; it only defines the data exchanged between the agent
//! runtime, the schema validator, and the audit logger.

pub mod decision;
pub mod error;
pub mod role;
pub mod tool;
pub mod verdict;
