use crate::error::{ManifestError, ManifestResult};
use crate::planner::classify;
use debrepo_types::manifest::RepoManifest;
use debrepo_types::plan::ArtifactFamily;
use std::collections::BTreeSet;

/// Reject manifests that would produce a broken or ambiguous workflow.
///
/// Checks run in a fixed order so the first reported error is stable.
pub fn validate_manifest(manifest: &RepoManifest) -> ManifestResult<()> {
    validate_and_classify(manifest).map(|_| ())
}

/// Validate, returning each artifact's family in manifest order.
pub(crate) fn validate_and_classify(
    manifest: &RepoManifest,
) -> ManifestResult<Vec<ArtifactFamily>> {
    validate_packages(manifest)?;
    validate_architectures(manifest)?;

    if manifest.artifacts.is_empty() {
        return Err(ManifestError::NoArtifacts);
    }

    let mut seen = BTreeSet::new();
    let mut families = Vec::with_capacity(manifest.artifacts.len());
    for (index, artifact) in manifest.artifacts.iter().enumerate() {
        for (field, value) in [
            ("repo", &artifact.repo),
            ("branch", &artifact.branch),
            ("name", &artifact.name),
            ("workflow", &artifact.workflow),
        ] {
            if value.trim().is_empty() {
                return Err(ManifestError::EmptyField { index, field });
            }
        }

        if !seen.insert(artifact.name.as_str()) {
            return Err(ManifestError::DuplicateArtifact {
                artifact: artifact.name.clone(),
            });
        }

        if !is_workflow_file(&artifact.workflow) {
            return Err(ManifestError::InvalidWorkflow {
                artifact: artifact.name.clone(),
                workflow: artifact.workflow.clone(),
            });
        }

        families.push(classify(manifest, artifact)?);
    }

    Ok(families)
}

fn validate_packages(manifest: &RepoManifest) -> ManifestResult<()> {
    let mut seen = BTreeSet::new();
    for (index, package) in manifest.packages.iter().enumerate() {
        if package.trim().is_empty() {
            return Err(ManifestError::EmptyPackage { index });
        }
        if !seen.insert(package.as_str()) {
            return Err(ManifestError::DuplicatePackage {
                package: package.clone(),
            });
        }
    }

    for package in &manifest.arch_independent {
        if !seen.contains(package.as_str()) {
            return Err(ManifestError::UnknownIndependentPackage {
                package: package.clone(),
            });
        }
    }
    Ok(())
}

fn validate_architectures(manifest: &RepoManifest) -> ManifestResult<()> {
    if manifest.architectures.is_empty() {
        return Err(ManifestError::NoArchitectures);
    }

    let mut seen = BTreeSet::new();
    for (index, arch) in manifest.architectures.iter().enumerate() {
        if arch.machine.trim().is_empty() || arch.debian.trim().is_empty() {
            return Err(ManifestError::EmptyArchitecture { index });
        }
        if !seen.insert(arch.machine.as_str()) {
            return Err(ManifestError::DuplicateArchitecture {
                machine: arch.machine.clone(),
            });
        }
    }
    Ok(())
}

fn is_workflow_file(workflow: &str) -> bool {
    let stem_len = workflow
        .strip_suffix(".yml")
        .or_else(|| workflow.strip_suffix(".yaml"))
        .map(str::len);
    matches!(stem_len, Some(n) if n > 0) && !workflow.contains('/')
}
