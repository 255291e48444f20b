use crate::error::{ManifestError, ManifestResult};
use crate::validate::validate_and_classify;
use debrepo_types::manifest::{ArtifactDescriptor, RepoManifest};
use debrepo_types::plan::{ArtifactFamily, FetchPlan, PlanWarning, RepoPlan};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Derives a [`RepoPlan`] from a manifest.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    strict: bool,
}

impl Planner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Promote plan warnings to a failed plan.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn plan(&self, manifest: &RepoManifest) -> Result<RepoPlan, PlanError> {
        let families = validate_and_classify(manifest)?;

        let mut plan = RepoPlan::new();
        plan.architectures = manifest.debian_arches().map(str::to_string).collect();
        plan.packages = manifest.packages.clone();

        for (artifact, family) in manifest.artifacts.iter().zip(families) {
            debug!(artifact = %artifact.name, codename = family.codename(), "classified artifact");
            plan.fetches.push(FetchPlan {
                artifact: artifact.clone(),
                family,
            });
        }

        // Architecture-independent artifacts never contribute a codename.
        plan.codenames = plan
            .fetches
            .iter()
            .filter(|f| !f.family.is_arch_independent())
            .map(|f| f.family.codename().to_string())
            .collect();

        plan.warnings = collect_warnings(manifest, &plan);
        for w in &plan.warnings {
            warn!("{}", w);
        }

        if self.strict && !plan.warnings.is_empty() {
            return Err(PlanError::Strict {
                warnings: plan.warnings.clone(),
            });
        }

        Ok(plan)
    }
}

/// Failure to derive a plan.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("{} plan warning(s) in strict mode: {}", .warnings.len(), join_warnings(.warnings))]
    Strict { warnings: Vec<PlanWarning> },
}

fn join_warnings(warnings: &[PlanWarning]) -> String {
    warnings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The distinct codenames of all architecture-specific artifacts, ascending.
pub fn derive_codenames(manifest: &RepoManifest) -> ManifestResult<BTreeSet<String>> {
    let mut out = BTreeSet::new();
    for artifact in &manifest.artifacts {
        if let ArtifactFamily::ArchSpecific { codename, .. } = classify(manifest, artifact)? {
            out.insert(codename);
        }
    }
    Ok(out)
}

/// Split an artifact identifier into its family.
///
/// `<package>-<codename>-<machine>`: the codename is the second-to-last
/// `-` segment and the machine token the last one. For architecture-independent
/// packages the identifier is `<package>-<codename>`. The owning package is the
/// longest listed package prefixing the identifier.
pub(crate) fn classify(
    manifest: &RepoManifest,
    artifact: &ArtifactDescriptor,
) -> ManifestResult<ArtifactFamily> {
    let name = artifact.name.as_str();
    let missing = || ManifestError::MissingCodename {
        artifact: name.to_string(),
    };

    if let Some(package) = manifest.independent_family_of(name) {
        let rest = &name[package.len() + 1..];
        let codename = rest.split('-').next().filter(|s| !s.is_empty());
        return codename
            .map(|codename| ArtifactFamily::ArchIndependent {
                package: package.to_string(),
                codename: codename.to_string(),
            })
            .ok_or_else(missing);
    }

    let segments: Vec<&str> = name.split('-').collect();
    let [.., codename, machine] = segments.as_slice() else {
        return Err(missing());
    };
    if segments.len() < 3 || codename.is_empty() || machine.is_empty() {
        return Err(missing());
    }

    let debian = manifest
        .debian_arch_for(machine)
        .ok_or_else(|| ManifestError::UnknownArchitecture {
            artifact: name.to_string(),
            machine: machine.to_string(),
        })?;

    Ok(ArtifactFamily::ArchSpecific {
        codename: codename.to_string(),
        machine: machine.to_string(),
        debian: debian.to_string(),
    })
}

fn collect_warnings(manifest: &RepoManifest, plan: &RepoPlan) -> Vec<PlanWarning> {
    let mut warnings = Vec::new();

    for fetch in &plan.fetches {
        let name = &fetch.artifact.name;
        if let ArtifactFamily::ArchIndependent { codename, .. } = &fetch.family {
            if !plan.codenames.contains(codename) {
                warnings.push(PlanWarning::OrphanCodename {
                    artifact: name.clone(),
                    codename: codename.clone(),
                });
            }
        }
        if manifest.owner_of(name).is_none() {
            warnings.push(PlanWarning::UnownedArtifact {
                artifact: name.clone(),
            });
        }
    }

    for package in &manifest.packages {
        if !plan
            .fetches
            .iter()
            .any(|f| manifest.owner_of(&f.artifact.name) == Some(package.as_str()))
        {
            warnings.push(PlanWarning::PackageWithoutArtifacts {
                package: package.clone(),
            });
        }
    }

    warnings
}
