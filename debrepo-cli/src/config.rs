//! Manifest loading for debrepo.
//!
//! Discovers `debrepo.toml` in the repository root, falling back to the built-in
//! manifest. CLI overrides are applied on top (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use debrepo_domain::builtin_manifest;
use debrepo_types::manifest::RepoManifest;
use debrepo_types::schema::DEBREPO_MANIFEST_FILE;
use fs_err as fs;
use std::fmt;
use tracing::debug;

/// Where the manifest in use came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    File(Utf8PathBuf),
    Builtin,
}

impl fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestSource::File(path) => write!(f, "{path}"),
            ManifestSource::Builtin => f.write_str("<builtin>"),
        }
    }
}

/// Discover the debrepo.toml manifest in `repo_root`.
pub fn discover_manifest(repo_root: &Utf8Path) -> Option<Utf8PathBuf> {
    let path = repo_root.join(DEBREPO_MANIFEST_FILE);
    if path.exists() {
        debug!("found manifest at {}", path);
        Some(path)
    } else {
        debug!("no manifest at {}", path);
        None
    }
}

/// Load and parse a manifest file.
pub fn load_manifest(path: &Utf8Path) -> anyhow::Result<RepoManifest> {
    let contents = fs::read_to_string(path).with_context(|| format!("read manifest {}", path))?;
    parse_manifest(&contents).with_context(|| format!("parse manifest {}", path))
}

pub fn parse_manifest(contents: &str) -> anyhow::Result<RepoManifest> {
    let manifest: RepoManifest = toml::from_str(contents).context("invalid TOML")?;
    Ok(manifest)
}

/// An explicit `--manifest` wins; otherwise look in the repo root; otherwise builtin.
pub fn resolve_manifest(
    repo_root: &Utf8Path,
    explicit: Option<&Utf8Path>,
) -> anyhow::Result<(RepoManifest, ManifestSource)> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => discover_manifest(repo_root),
    };
    match path {
        Some(path) => {
            let manifest = load_manifest(&path)?;
            Ok((manifest, ManifestSource::File(path)))
        }
        None => Ok((builtin_manifest(), ManifestSource::Builtin)),
    }
}

/// Job settings that may be overridden from the command line.
#[derive(Debug, Clone, Default)]
pub struct JobOverrides {
    pub runs_on: Option<String>,
    pub timeout_minutes: Option<u32>,
}

impl JobOverrides {
    pub fn apply(&self, manifest: &mut RepoManifest) {
        if let Some(runs_on) = &self.runs_on {
            manifest.job.runs_on = runs_on.clone();
        }
        if let Some(minutes) = self.timeout_minutes {
            manifest.job.timeout_minutes = minutes;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debrepo_types::manifest::PublishTarget;
    use tempfile::TempDir;

    const EXAMPLE: &str = r#"
name = "Publish hello"
packages = ["hello", "hello-data"]
arch_independent = ["hello-data"]

[[artifacts]]
repo = "acme/hello"
branch = "main"
name = "hello-bookworm-x86_64"
workflow = "build.yml"

[[artifacts]]
repo = "acme/hello"
branch = "main"
name = "hello-data-bookworm"
workflow = "build-data.yml"

[[architectures]]
machine = "x86_64"
debian = "amd64"

[job]
timeout_minutes = 20

[layout]
output_dir = "public"

[publish]
kind = "object_store"
bucket = "hello-apt"
endpoint = "https://s3.example.com/"
"#;

    fn utf8(td: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(td.path().to_path_buf()).expect("utf8 tempdir")
    }

    #[test]
    fn parse_example_manifest() {
        let m = parse_manifest(EXAMPLE).unwrap();
        assert_eq!(m.name, "Publish hello");
        assert_eq!(m.artifacts.len(), 2);
        assert_eq!(m.architectures.len(), 1);
        assert_eq!(m.job.timeout_minutes, 20);
        assert_eq!(m.job.runs_on, "ubuntu-latest");
        assert_eq!(m.layout.output_dir, "public");
        assert_eq!(m.layout.component, "main");
        match m.publish {
            PublishTarget::ObjectStore(t) => {
                assert_eq!(t.bucket, "hello-apt");
                assert_eq!(t.access_key_id_secret, "S3_ACCESS_KEY_ID");
            }
            other => panic!("unexpected target {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_unknown_publish_kind() {
        let bad = EXAMPLE.replace("kind = \"object_store\"", "kind = \"ftp\"");
        assert!(parse_manifest(&bad).is_err());
    }

    #[test]
    fn resolve_falls_back_to_builtin() {
        let td = TempDir::new().unwrap();
        let (m, source) = resolve_manifest(&utf8(&td), None).unwrap();
        assert_eq!(source, ManifestSource::Builtin);
        assert_eq!(m, builtin_manifest());
    }

    #[test]
    fn resolve_discovers_repo_manifest() {
        let td = TempDir::new().unwrap();
        let root = utf8(&td);
        fs::write(root.join(DEBREPO_MANIFEST_FILE), EXAMPLE).unwrap();

        let (m, source) = resolve_manifest(&root, None).unwrap();
        assert_eq!(source, ManifestSource::File(root.join(DEBREPO_MANIFEST_FILE)));
        assert_eq!(m.name, "Publish hello");
    }

    #[test]
    fn explicit_missing_manifest_errors() {
        let td = TempDir::new().unwrap();
        let root = utf8(&td);
        let missing = root.join("nope.toml");
        let err = resolve_manifest(&root, Some(missing.as_path())).unwrap_err();
        assert!(format!("{err:#}").contains("nope.toml"));
    }

    #[test]
    fn overrides_replace_job_settings() {
        let mut m = builtin_manifest();
        JobOverrides {
            runs_on: Some("self-hosted".to_string()),
            timeout_minutes: None,
        }
        .apply(&mut m);
        assert_eq!(m.job.runs_on, "self-hosted");
        assert_eq!(m.job.timeout_minutes, 15);
    }
}
