use crate::manifest::ArtifactDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Everything derived from a manifest before it is turned into a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoPlan {
    pub schema: String,

    /// Distribution codenames, ascending.
    pub codenames: BTreeSet<String>,

    /// Debian architecture tokens, in architecture map order.
    pub architectures: Vec<String>,

    pub packages: Vec<String>,

    /// One entry per manifest artifact, in manifest order.
    pub fetches: Vec<FetchPlan>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<PlanWarning>,
}

impl RepoPlan {
    pub fn new() -> Self {
        Self {
            schema: crate::schema::DEBREPO_PLAN_V1.to_string(),
            codenames: BTreeSet::new(),
            architectures: vec![],
            packages: vec![],
            fetches: vec![],
            warnings: vec![],
        }
    }

    pub fn codename_list(&self) -> Vec<&str> {
        self.codenames.iter().map(String::as_str).collect()
    }
}

impl Default for RepoPlan {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchPlan {
    pub artifact: ArtifactDescriptor,
    pub family: ArtifactFamily,
}

/// How an artifact identifier was classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArtifactFamily {
    ArchSpecific {
        codename: String,
        machine: String,
        debian: String,
    },
    ArchIndependent {
        package: String,
        codename: String,
    },
}

impl ArtifactFamily {
    pub fn codename(&self) -> &str {
        match self {
            ArtifactFamily::ArchSpecific { codename, .. } => codename,
            ArtifactFamily::ArchIndependent { codename, .. } => codename,
        }
    }

    pub fn is_arch_independent(&self) -> bool {
        matches!(self, ArtifactFamily::ArchIndependent { .. })
    }
}

/// Non-fatal findings about a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlanWarning {
    /// An architecture-independent artifact targets a codename no other
    /// artifact produces, so the move script never picks it up.
    OrphanCodename { artifact: String, codename: String },
    /// The artifact name does not start with any listed package.
    UnownedArtifact { artifact: String },
    /// A listed package has no artifact.
    PackageWithoutArtifacts { package: String },
}

impl fmt::Display for PlanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanWarning::OrphanCodename { artifact, codename } => write!(
                f,
                "artifact `{artifact}` targets codename `{codename}` which has no architecture-specific artifact"
            ),
            PlanWarning::UnownedArtifact { artifact } => {
                write!(f, "artifact `{artifact}` does not belong to any listed package")
            }
            PlanWarning::PackageWithoutArtifacts { package } => {
                write!(f, "package `{package}` has no artifacts")
            }
        }
    }
}
