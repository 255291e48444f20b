use anyhow::Context;
use clap::{Parser, Subcommand};
use std::process::Command as ProcessCommand;

const DEFAULT_WORKFLOW: &str = ".github/workflows/deb-repo.yml";

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Workspace helper tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Bless golden fixtures (overwrite expected outputs).
    BlessFixtures,
    /// Regenerate the checked-in workflow.
    Regenerate {
        #[arg(long, default_value = DEFAULT_WORKFLOW)]
        out: String,
    },
    /// Fail if the checked-in workflow is stale.
    CheckWorkflow {
        #[arg(long, default_value = DEFAULT_WORKFLOW)]
        workflow: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::BlessFixtures => {
            let status = ProcessCommand::new("cargo")
                .args(["test", "-p", "debrepo-domain", "--test", "golden_fixtures"])
                .env("DEBREPO_BLESS", "1")
                .status()
                .context("run golden fixture blessing")?;
            if !status.success() {
                anyhow::bail!("bless-fixtures failed");
            }
        }
        Command::Regenerate { out } => {
            run_debrepo(&["generate", "--out", &out]).context("regenerate workflow")?;
            println!("wrote {out}");
        }
        Command::CheckWorkflow { workflow } => {
            run_debrepo(&["check", "--workflow", &workflow]).context("check workflow")?;
        }
    }
    Ok(())
}

fn run_debrepo(args: &[&str]) -> anyhow::Result<()> {
    let status = ProcessCommand::new("cargo")
        .args(["run", "--quiet", "-p", "debrepo", "--"])
        .args(args)
        .status()
        .context("run debrepo")?;
    if !status.success() {
        anyhow::bail!("debrepo {} failed ({status})", args.join(" "));
    }
    Ok(())
}
