//! The document handed to the automation runner.
//!
//! Keys are emitted in field declaration order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Renders a secret reference, e.g. `${{ secrets.GITHUB_TOKEN }}`.
pub fn secret_ref(name: &str) -> String {
    format!("${{{{ secrets.{name} }}}}")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDocument {
    pub name: String,
    pub on: Triggers,
    pub jobs: BTreeMap<String, Job>,
}

/// Run on every push and on manual dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triggers {
    pub push: EmptyEvent,
    pub workflow_dispatch: EmptyEvent,
}

/// An event with no filters; serialized as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyEvent {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    #[serde(rename = "runs-on")]
    pub runs_on: String,
    #[serde(rename = "timeout-minutes")]
    pub timeout_minutes: u32,
    pub strategy: Strategy,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    #[serde(rename = "fail-fast")]
    pub fail_fast: bool,
}

/// A single job step. Exactly one of `uses` or `run` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with: Option<StepInputs>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<ObjectStoreEnv>,
}

impl Step {
    pub fn uses(name: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uses: Some(action.into()),
            with: None,
            run: None,
            env: None,
        }
    }

    pub fn run(name: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uses: None,
            with: None,
            run: Some(script.into()),
            env: None,
        }
    }

    pub fn with_inputs(mut self, inputs: StepInputs) -> Self {
        self.with = Some(inputs);
        self
    }

    pub fn with_env(mut self, env: ObjectStoreEnv) -> Self {
        self.env = Some(env);
        self
    }
}

/// Inputs of the actions debrepo knows how to call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepInputs {
    DownloadArtifact(DownloadArtifactInputs),
    ImportGpg(ImportGpgInputs),
    PagesDeploy(PagesDeployInputs),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DownloadArtifactInputs {
    pub github_token: String,
    pub workflow: String,
    pub name: String,
    pub path: String,
    pub repo: String,
    pub branch: String,
    pub workflow_conclusion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportGpgInputs {
    pub gpg_private_key: String,
    pub passphrase: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PagesDeployInputs {
    pub github_token: String,
    pub publish_dir: String,
    pub publish_branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cname: Option<String>,
}

/// Environment of the S3 sync action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ObjectStoreEnv {
    pub aws_s3_bucket: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub aws_s3_endpoint: String,
    pub source_dir: String,
}

#[cfg(test)]
mod tests {
    use super::secret_ref;

    #[test]
    fn secret_ref_uses_expression_syntax() {
        assert_eq!(secret_ref("GITHUB_TOKEN"), "${{ secrets.GITHUB_TOKEN }}");
    }
}
