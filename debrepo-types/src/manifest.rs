use serde::{Deserialize, Serialize};

/// The declarative input: which artifacts to fetch and how to publish them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoManifest {
    /// Display name of the generated workflow.
    #[serde(default = "default_workflow_name")]
    pub name: String,

    /// Packages relocated into the repository pool.
    pub packages: Vec<String>,

    /// Packages whose binaries are identical on every architecture.
    ///
    /// Artifacts of these packages are fetched and moved but never contribute a
    /// distribution codename.
    #[serde(default)]
    pub arch_independent: Vec<String>,

    pub artifacts: Vec<ArtifactDescriptor>,

    #[serde(default = "default_architectures")]
    pub architectures: Vec<ArchMapping>,

    #[serde(default)]
    pub job: JobSettings,

    #[serde(default)]
    pub layout: LayoutSettings,

    #[serde(default)]
    pub signing: SigningSettings,

    pub publish: PublishTarget,
}

impl RepoManifest {
    /// Debian architecture tokens in declaration order.
    pub fn debian_arches(&self) -> impl Iterator<Item = &str> {
        self.architectures.iter().map(|a| a.debian.as_str())
    }

    /// Looks up the Debian token for a machine-reported architecture.
    pub fn debian_arch_for(&self, machine: &str) -> Option<&str> {
        self.architectures
            .iter()
            .find(|a| a.machine == machine)
            .map(|a| a.debian.as_str())
    }

    /// The package that owns an artifact: the longest listed package whose
    /// name, followed by `-`, prefixes the artifact identifier.
    pub fn owner_of(&self, artifact: &str) -> Option<&str> {
        self.packages
            .iter()
            .map(String::as_str)
            .filter(|package| belongs_to(artifact, package))
            .max_by_key(|package| package.len())
    }

    /// Returns the architecture-independent package an artifact belongs to, if any.
    ///
    /// `asl-dahdi-buster-x86_64` is owned by `asl-dahdi` even when `asl` is
    /// architecture-independent.
    pub fn independent_family_of(&self, artifact: &str) -> Option<&str> {
        self.owner_of(artifact)
            .filter(|owner| self.arch_independent.iter().any(|p| p == owner))
    }
}

/// Whether `artifact` is named `<package>-...`.
pub fn belongs_to(artifact: &str, package: &str) -> bool {
    artifact
        .strip_prefix(package)
        .is_some_and(|rest| rest.starts_with('-'))
}

/// One pre-built artifact produced by an upstream pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    /// Upstream repository, `owner/name`.
    pub repo: String,
    pub branch: String,
    /// Artifact identifier, `<package>-<codename>-<machine arch>` or
    /// `<package>-<codename>` for architecture-independent packages.
    pub name: String,
    /// Workflow file of the upstream pipeline that uploaded the artifact.
    pub workflow: String,
}

impl ArtifactDescriptor {
    pub fn new(repo: &str, branch: &str, name: &str, workflow: &str) -> Self {
        Self {
            repo: repo.to_string(),
            branch: branch.to_string(),
            name: name.to_string(),
            workflow: workflow.to_string(),
        }
    }
}

/// Maps a machine-reported CPU identifier (`uname -m`) to a Debian architecture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchMapping {
    pub machine: String,
    pub debian: String,
}

impl ArchMapping {
    pub fn new(machine: &str, debian: &str) -> Self {
        Self {
            machine: machine.to_string(),
            debian: debian.to_string(),
        }
    }
}

/// Settings for the single generated job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSettings {
    /// Key of the job under `jobs:`.
    pub id: String,
    pub name: String,
    pub runs_on: String,
    pub timeout_minutes: u32,
    pub fail_fast: bool,
    pub checkout_action: String,
    pub download_action: String,
    /// OS packages installed with apt before the scripts run.
    pub install_packages: Vec<String>,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            id: "generate-deb-repository".to_string(),
            name: default_workflow_name(),
            runs_on: "ubuntu-latest".to_string(),
            timeout_minutes: 15,
            fail_fast: false,
            checkout_action: "actions/checkout@v2".to_string(),
            download_action: "dawidd6/action-download-artifact@v2".to_string(),
            install_packages: vec![
                "gcc".to_string(),
                "dpkg-dev".to_string(),
                "gpg".to_string(),
            ],
        }
    }
}

/// Where and how the repository tree is laid out by the generated scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Directory the repository tree is built in and published from.
    pub output_dir: String,
    /// Archive component, e.g. `main`.
    pub component: String,
    /// Script in the checked-out repository that prints a `Release` file.
    pub release_script: String,
    /// URL of the HTML index generator.
    pub index_generator_url: String,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            output_dir: "deb-repo".to_string(),
            component: "main".to_string(),
            release_script: "generate-release.sh".to_string(),
            index_generator_url:
                "https://raw.githubusercontent.com/relrod/oneoff/master/generate-html-indexes.py"
                    .to_string(),
        }
    }
}

/// Signing key import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SigningSettings {
    pub action: String,
    /// Name of the secret holding the armored private key.
    pub private_key_secret: String,
    /// Name of the secret holding the key passphrase.
    pub passphrase_secret: String,
}

impl Default for SigningSettings {
    fn default() -> Self {
        Self {
            action: "crazy-max/ghaction-import-gpg@v5".to_string(),
            private_key_secret: "GPG_SECRET_KEY".to_string(),
            passphrase_secret: "GPG_PASSPHRASE".to_string(),
        }
    }
}

/// Final publish step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PublishTarget {
    /// Sync the tree to an S3-compatible bucket.
    ObjectStore(ObjectStoreTarget),
    /// Push the tree to a static pages branch.
    Pages(PagesTarget),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectStoreTarget {
    #[serde(default = "default_object_store_action")]
    pub action: String,
    pub bucket: String,
    pub endpoint: String,
    #[serde(default = "default_access_key_id_secret")]
    pub access_key_id_secret: String,
    #[serde(default = "default_secret_access_key_secret")]
    pub secret_access_key_secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagesTarget {
    #[serde(default = "default_pages_action")]
    pub action: String,
    #[serde(default = "default_pages_branch")]
    pub publish_branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cname: Option<String>,
}

fn default_workflow_name() -> String {
    "Generate deb repository".to_string()
}

fn default_architectures() -> Vec<ArchMapping> {
    vec![
        ArchMapping::new("x86_64", "amd64"),
        ArchMapping::new("armv7l", "armhf"),
    ]
}

fn default_object_store_action() -> String {
    "jakejarvis/s3-sync-action@master".to_string()
}

fn default_access_key_id_secret() -> String {
    "S3_ACCESS_KEY_ID".to_string()
}

fn default_secret_access_key_secret() -> String {
    "S3_SECRET_ACCESS_KEY".to_string()
}

fn default_pages_action() -> String {
    "peaceiris/actions-gh-pages@v3".to_string()
}

fn default_pages_branch() -> String {
    "gh-pages".to_string()
}
