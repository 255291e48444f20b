//! Domain logic: turn a repository manifest into a deterministic publishing workflow.
//!
//! This crate owns *what* the workflow does. It does not own how the document is
//! written out; that's the `debrepo-render` crate.

mod assemble;
mod builtin;
mod error;
mod planner;
mod templates;
mod validate;

pub use assemble::assemble_workflow;
pub use builtin::builtin_manifest;
pub use error::{ManifestError, ManifestResult};
pub use planner::{PlanError, Planner, derive_codenames};
pub use templates::{render_index_script, render_move_script};
pub use validate::validate_manifest;

use debrepo_types::manifest::RepoManifest;
use debrepo_types::workflow::WorkflowDocument;

/// Validate, plan and assemble in one go.
pub fn generate(manifest: &RepoManifest) -> Result<WorkflowDocument, PlanError> {
    let plan = Planner::new().plan(manifest)?;
    Ok(assemble_workflow(manifest, &plan))
}
