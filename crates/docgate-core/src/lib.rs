//! # docgate-core
//!
//! The synchronous interception point between an agent runtime and its
//! tools.
//!
//! This crate provides:
//! - The handler traits (`PreToolHandler`, `PostToolHandler`)
//! - `HookBundle`, the ordered per-event chain the runtime drives
//!
//! Concrete handlers live in `docgate-hooks`.

pub mod bundle;
pub mod traits;

pub use bundle::HookBundle;
