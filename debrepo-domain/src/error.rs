//! Errors raised while validating a manifest.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManifestError {
    #[error("manifest lists no artifacts")]
    NoArtifacts,

    #[error("manifest lists no architectures")]
    NoArchitectures,

    #[error("artifact #{index} has an empty `{field}`")]
    EmptyField { index: usize, field: &'static str },

    #[error("artifact `{artifact}` is listed more than once")]
    DuplicateArtifact { artifact: String },

    #[error("artifact `{artifact}` has no codename segment (expected `<package>-<codename>-<arch>`)")]
    MissingCodename { artifact: String },

    #[error("artifact `{artifact}` names workflow `{workflow}`, expected a `.yml` or `.yaml` file")]
    InvalidWorkflow { artifact: String, workflow: String },

    #[error("artifact `{artifact}` is built for `{machine}`, which is not in the architecture map")]
    UnknownArchitecture { artifact: String, machine: String },

    #[error("architecture `{machine}` is mapped more than once")]
    DuplicateArchitecture { machine: String },

    #[error("architecture map entry #{index} has an empty token")]
    EmptyArchitecture { index: usize },

    #[error("package `{package}` is listed more than once")]
    DuplicatePackage { package: String },

    #[error("package name at #{index} is empty")]
    EmptyPackage { index: usize },

    #[error("architecture-independent package `{package}` is not in the package list")]
    UnknownIndependentPackage { package: String },
}

pub type ManifestResult<T> = Result<T, ManifestError>;
