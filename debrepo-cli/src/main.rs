mod config;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use config::{JobOverrides, resolve_manifest};
use debrepo_domain::{Planner, assemble_workflow};
use debrepo_render::{render_plan_md, render_workflow_yaml};
use debrepo_types::manifest::RepoManifest;
use fs_err as fs;
use std::io::Write;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Exit code when `check` finds the workflow out of date.
const EXIT_DRIFT: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "debrepo",
    version,
    about = "Generate the CI workflow that publishes a Debian package repository."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate the workflow document (stdout unless --out is given).
    Generate(GenerateArgs),
    /// Fail if an existing workflow file differs from what would be generated.
    Check(CheckArgs),
    /// Show the derived plan: codenames, architectures and artifacts.
    Plan(PlanArgs),
}

#[derive(Debug, clap::Args)]
struct ManifestArgs {
    /// Repository root searched for debrepo.toml (default: current directory).
    #[arg(long, default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Manifest file (default: <repo_root>/debrepo.toml, else the built-in table).
    #[arg(long)]
    manifest: Option<Utf8PathBuf>,

    /// Treat plan warnings as errors.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(Debug, clap::Args)]
struct JobArgs {
    /// Override the runner label.
    #[arg(long)]
    runs_on: Option<String>,

    /// Override the job timeout.
    #[arg(long)]
    timeout_minutes: Option<u32>,
}

#[derive(Debug, Parser)]
struct GenerateArgs {
    #[command(flatten)]
    manifest: ManifestArgs,

    #[command(flatten)]
    job: JobArgs,

    /// Write the document to this file instead of stdout.
    #[arg(long)]
    out: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct CheckArgs {
    #[command(flatten)]
    manifest: ManifestArgs,

    #[command(flatten)]
    job: JobArgs,

    /// The checked-in workflow file to compare against.
    #[arg(long)]
    workflow: Utf8PathBuf,
}

#[derive(Debug, Parser)]
struct PlanArgs {
    #[command(flatten)]
    manifest: ManifestArgs,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Result of comparing a checked-in workflow with a fresh one.
#[derive(Debug, PartialEq, Eq)]
enum CheckOutcome {
    InSync,
    Drift { patch: String },
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    // stdout is reserved for the generated document.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Check(args) => cmd_check(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn load(args: &ManifestArgs, job: Option<&JobArgs>) -> anyhow::Result<RepoManifest> {
    let (mut manifest, source) = resolve_manifest(&args.repo_root, args.manifest.as_deref())?;
    info!(source = %source, artifacts = manifest.artifacts.len(), "loaded manifest");

    if let Some(job) = job {
        let overrides = JobOverrides {
            runs_on: job.runs_on.clone(),
            timeout_minutes: job.timeout_minutes,
        };
        debug!(?overrides, "applying job overrides");
        overrides.apply(&mut manifest);
    }
    Ok(manifest)
}

fn render(args: &ManifestArgs, job: &JobArgs) -> anyhow::Result<String> {
    let manifest = load(args, Some(job))?;
    let plan = Planner::new()
        .strict(args.strict)
        .plan(&manifest)
        .context("derive plan")?;
    debug!(codenames = ?plan.codenames, "derived codenames");
    let doc = assemble_workflow(&manifest, &plan);
    render_workflow_yaml(&doc)
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<ExitCode> {
    let text = render(&args.manifest, &args.job)?;
    match &args.out {
        Some(path) => {
            write_file(path, &text)?;
            info!("wrote workflow to {}", path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .context("write workflow to stdout")?;
            stdout.flush().context("flush stdout")?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let expected = render(&args.manifest, &args.job)?;
    let actual = fs::read_to_string(&args.workflow)
        .with_context(|| format!("read {}", args.workflow))?;

    match compare(&actual, &expected) {
        CheckOutcome::InSync => {
            info!("{} is up to date", args.workflow);
            Ok(ExitCode::SUCCESS)
        }
        CheckOutcome::Drift { patch } => {
            print!("{patch}");
            error!(
                "{} is out of date; regenerate it with `debrepo generate --out {}`",
                args.workflow, args.workflow
            );
            Ok(ExitCode::from(EXIT_DRIFT))
        }
    }
}

fn compare(actual: &str, expected: &str) -> CheckOutcome {
    if actual == expected {
        CheckOutcome::InSync
    } else {
        let patch = diffy::create_patch(actual, expected);
        CheckOutcome::Drift {
            patch: patch.to_string(),
        }
    }
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<ExitCode> {
    let manifest = load(&args.manifest, None)?;
    let plan = Planner::new()
        .strict(args.manifest.strict)
        .plan(&manifest)
        .context("derive plan")?;

    match args.format {
        OutputFormat::Text => print!("{}", render_plan_md(&plan)),
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&plan).context("serialize plan")?
            )
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn write_file(path: &Utf8Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent))?;
    }
    fs::write(path, contents).with_context(|| format!("write {}", path))?;
    Ok(())
}
