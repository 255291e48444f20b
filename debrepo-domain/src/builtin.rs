use debrepo_types::manifest::{
    ArchMapping, ArtifactDescriptor, JobSettings, LayoutSettings, ObjectStoreTarget,
    PublishTarget, RepoManifest, SigningSettings,
};

const BRANCH: &str = "fixes";

/// The AllStarLink package repository published to `repo-ai5a-net`.
///
/// Used when no `debrepo.toml` is present.
pub fn builtin_manifest() -> RepoManifest {
    let mut artifacts = Vec::new();
    for (repo, package) in [("AI5A/asl-dahdi", "asl-dahdi"), ("AI5A/asl", "allstarlink")] {
        for (machine, workflow) in [("x86_64", "build-x86.yml"), ("armv7l", "build-arm.yml")] {
            for codename in ["bookworm", "bullseye", "buster"] {
                artifacts.push(ArtifactDescriptor::new(
                    repo,
                    BRANCH,
                    &format!("{package}-{codename}-{machine}"),
                    workflow,
                ));
            }
        }
    }

    // noarch, so built once per codename
    for codename in ["bookworm", "bullseye", "buster"] {
        artifacts.push(ArtifactDescriptor::new(
            "AI5A/asl-update-node-list",
            BRANCH,
            &format!("asl-update-node-list-{codename}"),
            "build.yml",
        ));
    }

    RepoManifest {
        name: "Generate deb repository".to_string(),
        packages: vec![
            "asl-dahdi".to_string(),
            "allstarlink".to_string(),
            "asl-update-node-list".to_string(),
        ],
        arch_independent: vec!["asl-update-node-list".to_string()],
        artifacts,
        architectures: vec![
            ArchMapping::new("x86_64", "amd64"),
            ArchMapping::new("armv7l", "armhf"),
        ],
        job: JobSettings::default(),
        layout: LayoutSettings {
            output_dir: "asl-pkgs".to_string(),
            ..LayoutSettings::default()
        },
        signing: SigningSettings::default(),
        publish: PublishTarget::ObjectStore(ObjectStoreTarget {
            action: "jakejarvis/s3-sync-action@master".to_string(),
            bucket: "repo-ai5a-net".to_string(),
            endpoint: "https://s3.us-west-000.backblazeb2.com/".to_string(),
            access_key_id_secret: "B2_KEY_ID".to_string(),
            secret_access_key_secret: "B2_APPLICATION_KEY".to_string(),
        }),
    }
}
