//! Shared DTOs (schemas-as-code) for the debrepo workspace.
//!
//! # Design constraints
//! - `manifest` types are read from `debrepo.toml`; every section has defaults.
//! - `workflow` types are serialized to YAML for an external runner. Field
//!   declaration order is the emitted key order, so do not reorder fields.
//! - `plan` types are the derived intermediate and may be dumped as JSON.

pub mod manifest;
pub mod plan;
pub mod workflow;

/// Identifiers for things debrepo emits.
pub mod schema {
    pub const DEBREPO_MANIFEST_FILE: &str = "debrepo.toml";
    pub const DEBREPO_PLAN_V1: &str = "debrepo.plan.v1";
}
