//! Rendering helpers: the workflow YAML and a human-readable plan summary.

use anyhow::Context;
use debrepo_types::plan::{ArtifactFamily, RepoPlan};
use debrepo_types::workflow::WorkflowDocument;
use tracing::debug;

/// Lines written ahead of every generated document.
pub const GENERATED_HEADER: [&str; 2] = [
    "# NOTE: This file is generated by debrepo.",
    "# Do not edit this file directly.",
];

/// Serialize the workflow with the generated-file header and a blank line.
pub fn render_workflow_yaml(doc: &WorkflowDocument) -> anyhow::Result<String> {
    let body = serde_yaml::to_string(doc).context("serialize workflow yaml")?;
    let mut out = String::with_capacity(body.len() + 96);
    for line in GENERATED_HEADER {
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&body);
    debug!(bytes = out.len(), "rendered workflow");
    Ok(out)
}

/// Strip the generated header, if present, returning the YAML body.
pub fn strip_header(text: &str) -> &str {
    let mut rest = text;
    for line in GENERATED_HEADER {
        match rest.strip_prefix(line).and_then(|r| r.strip_prefix('\n')) {
            Some(r) => rest = r,
            None => return text,
        }
    }
    rest.strip_prefix('\n').unwrap_or(rest)
}

pub fn render_plan_md(plan: &RepoPlan) -> String {
    let mut out = String::new();
    out.push_str("# debrepo plan\n\n");
    out.push_str(&format!(
        "- Codenames: {}\n",
        list_or_dash(&plan.codename_list())
    ));
    out.push_str(&format!(
        "- Architectures: {}\n",
        list_or_dash(&plan.architectures)
    ));
    out.push_str(&format!("- Packages: {}\n", list_or_dash(&plan.packages)));
    out.push_str(&format!("- Artifacts: {}\n\n", plan.fetches.len()));

    out.push_str("## Artifacts\n\n");
    if plan.fetches.is_empty() {
        out.push_str("_No artifacts._\n");
    }
    for (i, f) in plan.fetches.iter().enumerate() {
        let a = &f.artifact;
        let family = match &f.family {
            ArtifactFamily::ArchSpecific {
                codename,
                machine,
                debian,
            } => format!("{codename} {machine} -> {debian}"),
            ArtifactFamily::ArchIndependent { codename, .. } => format!("{codename} all"),
        };
        out.push_str(&format!(
            "{}. `{}` from `{}@{}` ({}) [{}]\n",
            i + 1,
            a.name,
            a.repo,
            a.branch,
            a.workflow,
            family
        ));
    }

    if !plan.warnings.is_empty() {
        out.push_str("\n## Warnings\n\n");
        for w in &plan.warnings {
            out.push_str(&format!("- {}\n", w));
        }
    }

    out
}

fn list_or_dash<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items
            .iter()
            .map(|s| format!("`{}`", s.as_ref()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debrepo_types::manifest::ArtifactDescriptor;
    use debrepo_types::plan::{FetchPlan, PlanWarning};
    use debrepo_types::workflow::{Job, Step, Strategy, Triggers};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn tiny_doc() -> WorkflowDocument {
        let mut jobs = BTreeMap::new();
        jobs.insert(
            "build".to_string(),
            Job {
                name: "Build".to_string(),
                runs_on: "ubuntu-latest".to_string(),
                timeout_minutes: 5,
                strategy: Strategy { fail_fast: false },
                steps: vec![Step::run("Hello", "echo hi\necho there\n")],
            },
        );
        WorkflowDocument {
            name: "Tiny".to_string(),
            on: Triggers::default(),
            jobs,
        }
    }

    #[test]
    fn yaml_starts_with_header_and_blank_line() {
        let text = render_workflow_yaml(&tiny_doc()).expect("render");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(GENERATED_HEADER[0]));
        assert_eq!(lines.next(), Some(GENERATED_HEADER[1]));
        assert_eq!(lines.next(), Some(""));
        assert_eq!(lines.next(), Some("name: Tiny"));
    }

    #[test]
    fn yaml_is_stable() {
        let a = render_workflow_yaml(&tiny_doc()).expect("render");
        let b = render_workflow_yaml(&tiny_doc()).expect("render");
        assert_eq!(a, b);
    }

    #[test]
    fn yaml_body_round_trips_multiline_run() {
        let text = render_workflow_yaml(&tiny_doc()).expect("render");
        let value: serde_yaml::Value = serde_yaml::from_str(strip_header(&text)).expect("parse");
        let run = value["jobs"]["build"]["steps"][0]["run"].as_str();
        assert_eq!(run, Some("echo hi\necho there\n"));
        assert_eq!(value["jobs"]["build"]["timeout-minutes"].as_u64(), Some(5));
    }

    #[test]
    fn strip_header_leaves_foreign_text_alone() {
        assert_eq!(strip_header("name: x\n"), "name: x\n");
    }

    #[test]
    fn plan_md_lists_artifacts_and_warnings() {
        let mut plan = RepoPlan::new();
        plan.codenames.insert("buster".to_string());
        plan.architectures = vec!["amd64".to_string()];
        plan.packages = vec!["hello".to_string()];
        plan.fetches.push(FetchPlan {
            artifact: ArtifactDescriptor::new("acme/hello", "main", "hello-buster-x86_64", "build.yml"),
            family: ArtifactFamily::ArchSpecific {
                codename: "buster".to_string(),
                machine: "x86_64".to_string(),
                debian: "amd64".to_string(),
            },
        });
        plan.warnings.push(PlanWarning::PackageWithoutArtifacts {
            package: "ghost".to_string(),
        });

        let md = render_plan_md(&plan);
        assert!(md.contains("- Codenames: `buster`"));
        assert!(md.contains(
            "1. `hello-buster-x86_64` from `acme/hello@main` (build.yml) [buster x86_64 -> amd64]"
        ));
        assert!(md.contains("## Warnings"));
        assert!(md.contains("`ghost`"));
    }

    #[test]
    fn plan_md_handles_empty_plan() {
        let md = render_plan_md(&RepoPlan::new());
        assert!(md.contains("- Codenames: -"));
        assert!(md.contains("_No artifacts._"));
        assert!(!md.contains("## Warnings"));
    }
}
