use std::process::{exit, Command};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the DCS lambda deployment workspace"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run CI checks (fmt, clippy, tests)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting and clippy
    Lint,
    /// Core and lambda crate tests
    Test,
    /// Lint, then test
    Check,
}

// ── helpers ────────────────────────────────────────────────────────

/// Runs one cargo invocation and exits with its status on failure.
fn cargo_step(label: &str, args: &[&str]) {
    eprintln!("\n=== {label} ===");
    eprintln!("+ cargo {}", args.join(" "));
    let status = match Command::new("cargo").args(args).status() {
        Ok(status) => status,
        Err(error) => {
            eprintln!("failed to execute cargo: {error}");
            exit(1);
        }
    };
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_lint() {
    cargo_step("Check formatting", &["fmt", "--all", "--", "--check"]);
    cargo_step(
        "Clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    );
}

fn ci_test() {
    for crate_name in ["dcs_deploy_core", "dcs_deploy_lambda"] {
        cargo_step(&format!("Test {crate_name}"), &["test", "-p", crate_name]);
    }
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let Commands::Ci { job } = Cli::parse().command;
    match job {
        CiJob::Lint => ci_lint(),
        CiJob::Test => ci_test(),
        CiJob::Check => {
            ci_lint();
            ci_test();
        }
    }
    eprintln!("\nCI job passed.");
}
