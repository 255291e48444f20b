use crate::templates::{render_index_script, render_move_script};
use debrepo_types::manifest::{PublishTarget, RepoManifest};
use debrepo_types::plan::{FetchPlan, RepoPlan};
use debrepo_types::workflow::{
    DownloadArtifactInputs, ImportGpgInputs, Job, ObjectStoreEnv, PagesDeployInputs, Step,
    StepInputs, Strategy, Triggers, WorkflowDocument, secret_ref,
};
use std::collections::BTreeMap;

const TOKEN_SECRET: &str = "GITHUB_TOKEN";

/// Lay out the final document:
/// checkout, one download per artifact, key import, apt install, move, index, publish.
pub fn assemble_workflow(manifest: &RepoManifest, plan: &RepoPlan) -> WorkflowDocument {
    let job_settings = &manifest.job;

    let mut steps = Vec::with_capacity(plan.fetches.len() + 6);
    steps.push(Step::uses("Checkout", &job_settings.checkout_action));
    steps.extend(
        plan.fetches
            .iter()
            .map(|f| fetch_step(&job_settings.download_action, f)),
    );
    steps.push(
        Step::uses("Import GPG key", &manifest.signing.action).with_inputs(StepInputs::ImportGpg(
            ImportGpgInputs {
                gpg_private_key: secret_ref(&manifest.signing.private_key_secret),
                passphrase: secret_ref(&manifest.signing.passphrase_secret),
            },
        )),
    );
    steps.push(Step::run(
        "Install dependencies",
        format!(
            "sudo apt-get install -y {}",
            job_settings.install_packages.join(" ")
        ),
    ));
    steps.push(Step::run(
        "Move debs",
        render_move_script(&manifest.layout, plan),
    ));
    steps.push(Step::run(
        "Generate indexes",
        render_index_script(&manifest.layout),
    ));
    steps.push(publish_step(manifest));

    let job = Job {
        name: job_settings.name.clone(),
        runs_on: job_settings.runs_on.clone(),
        timeout_minutes: job_settings.timeout_minutes,
        strategy: Strategy {
            fail_fast: job_settings.fail_fast,
        },
        steps,
    };

    let mut jobs = BTreeMap::new();
    jobs.insert(job_settings.id.clone(), job);

    WorkflowDocument {
        name: manifest.name.clone(),
        on: Triggers::default(),
        jobs,
    }
}

fn fetch_step(action: &str, fetch: &FetchPlan) -> Step {
    let a = &fetch.artifact;
    Step::uses(format!("Download {}", a.name), action).with_inputs(StepInputs::DownloadArtifact(
        DownloadArtifactInputs {
            github_token: secret_ref(TOKEN_SECRET),
            workflow: a.workflow.clone(),
            name: a.name.clone(),
            path: a.name.clone(),
            repo: a.repo.clone(),
            branch: a.branch.clone(),
            workflow_conclusion: "success".to_string(),
        },
    ))
}

fn publish_step(manifest: &RepoManifest) -> Step {
    let output_dir = manifest.layout.output_dir.clone();
    match &manifest.publish {
        PublishTarget::ObjectStore(t) => {
            Step::uses("Sync repository", &t.action).with_env(ObjectStoreEnv {
                aws_s3_bucket: t.bucket.clone(),
                aws_access_key_id: secret_ref(&t.access_key_id_secret),
                aws_secret_access_key: secret_ref(&t.secret_access_key_secret),
                aws_s3_endpoint: t.endpoint.clone(),
                source_dir: output_dir,
            })
        }
        PublishTarget::Pages(t) => Step::uses("Deploy to GitHub Pages", &t.action).with_inputs(
            StepInputs::PagesDeploy(PagesDeployInputs {
                github_token: secret_ref(TOKEN_SECRET),
                publish_dir: output_dir,
                publish_branch: t.publish_branch.clone(),
                cname: t.cname.clone(),
            }),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Planner, builtin_manifest};
    use debrepo_types::manifest::PagesTarget;
    use pretty_assertions::assert_eq;

    fn step_names(doc: &WorkflowDocument) -> Vec<String> {
        doc.jobs
            .values()
            .flat_map(|j| j.steps.iter().map(|s| s.name.clone()))
            .collect()
    }

    #[test]
    fn step_sequence_brackets_downloads() {
        let m = builtin_manifest();
        let plan = Planner::new().plan(&m).expect("plan");
        let doc = assemble_workflow(&m, &plan);
        let names = step_names(&doc);

        assert_eq!(names.len(), 15 + 6);
        assert_eq!(names[0], "Checkout");
        assert!(names[1..16].iter().all(|n| n.starts_with("Download ")));
        assert_eq!(
            &names[16..],
            &[
                "Import GPG key",
                "Install dependencies",
                "Move debs",
                "Generate indexes",
                "Sync repository"
            ]
        );
    }

    #[test]
    fn download_path_is_artifact_name() {
        let m = builtin_manifest();
        let plan = Planner::new().plan(&m).expect("plan");
        let doc = assemble_workflow(&m, &plan);
        let job = &doc.jobs["generate-deb-repository"];

        let downloads: Vec<&DownloadArtifactInputs> = job
            .steps
            .iter()
            .filter_map(|s| match &s.with {
                Some(StepInputs::DownloadArtifact(d)) => Some(d),
                _ => None,
            })
            .collect();
        assert_eq!(downloads.len(), m.artifacts.len());
        for (d, a) in downloads.iter().zip(&m.artifacts) {
            assert_eq!(d.path, a.name);
            assert_eq!(d.workflow, a.workflow);
            assert_eq!(d.github_token, "${{ secrets.GITHUB_TOKEN }}");
            assert_eq!(d.workflow_conclusion, "success");
        }
    }

    #[test]
    fn job_settings_flow_through() {
        let mut m = builtin_manifest();
        m.job.timeout_minutes = 30;
        m.job.runs_on = "ubuntu-22.04".to_string();
        let plan = Planner::new().plan(&m).expect("plan");
        let doc = assemble_workflow(&m, &plan);
        let job = &doc.jobs["generate-deb-repository"];
        assert_eq!(job.timeout_minutes, 30);
        assert_eq!(job.runs_on, "ubuntu-22.04");
        assert!(!job.strategy.fail_fast);
        assert_eq!(
            job.steps[17].run.as_deref(),
            Some("sudo apt-get install -y gcc dpkg-dev gpg")
        );
    }

    #[test]
    fn pages_publish_step() {
        let mut m = builtin_manifest();
        m.publish = PublishTarget::Pages(PagesTarget {
            action: "peaceiris/actions-gh-pages@v3".to_string(),
            publish_branch: "gh-pages".to_string(),
            cname: Some("repo.example.org".to_string()),
        });
        let plan = Planner::new().plan(&m).expect("plan");
        let doc = assemble_workflow(&m, &plan);
        let last = doc.jobs["generate-deb-repository"]
            .steps
            .last()
            .expect("publish step")
            .clone();
        assert_eq!(last.name, "Deploy to GitHub Pages");
        assert_eq!(last.env, None);
        assert_eq!(
            last.with,
            Some(StepInputs::PagesDeploy(PagesDeployInputs {
                github_token: "${{ secrets.GITHUB_TOKEN }}".to_string(),
                publish_dir: "asl-pkgs".to_string(),
                publish_branch: "gh-pages".to_string(),
                cname: Some("repo.example.org".to_string()),
            }))
        );
    }
}
