//! docgate reference runtime CLI
//!
//! Drives agent tool calls through the docgate hooks the way a real agent
//! runtime would, and replays the structured logs those runs leave behind.
//!
//! Usage:
//!   cargo run -p demo -- sample --run-dir runs/demo
//!   cargo run -p demo -- replay --role extraction --script calls.json --run-dir runs/demo
//!   cargo run -p demo -- replay --config hooks.toml --script calls.json
//!   cargo run -p demo -- verify-log runs/demo/logs/extraction/quickstart_tools.jsonl

mod runtime;
mod sample;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use docgate_audit::{recover_tool_log, verify_chain, RunLogLayout};
use docgate_contracts::{
    decision::HookDecision,
    error::{DocgateError, DocgateResult},
    role::AgentRole,
};
use docgate_hooks::{HookComposer, HookConfig};

use runtime::{CallOutcome, ScriptedCall, ScriptedRuntime};

// ── CLI definition ────────────────────────────────────────────────────────────

/// docgate: schema-gated, audited tool calls for document agents.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "docgate reference runtime",
    long_about = "Runs agent tool calls through docgate's audit and schema-gate hooks,\n\
                  and verifies the hash chain of the structured tool logs they produce."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the built-in extraction scenario.
    Sample {
        /// Directory that receives results/ and logs/.
        #[arg(long)]
        run_dir: PathBuf,
    },
    /// Replay a JSON array of tool calls under the given agent role.
    Replay {
        /// JSON file holding `[{"tool_name": ..., "tool_input": {...}}, ...]`.
        #[arg(long)]
        script: PathBuf,
        /// Hook configuration TOML; the flags below override its fields.
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        run_dir: Option<PathBuf>,
        /// Directory the role's artifacts must be written into.
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Document name used for the per-document log files.
        #[arg(long, default_value = "session.md")]
        document: String,
    },
    /// Re-read a structured tool log and check its hash chain.
    VerifyLog { path: PathBuf },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Sample { run_dir } => run_sample(&run_dir),
        Command::Replay {
            script,
            config,
            role,
            run_dir,
            output_dir,
            document,
        } => resolve_config(config.as_deref(), role, run_dir, output_dir)
            .and_then(|config| run_replay(&config, &script, &document)),
        Command::VerifyLog { path } => run_verify(&path),
    };

    if let Err(e) = result {
        eprintln!("docgate error: {}", e);
        std::process::exit(1);
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run_sample(run_dir: &Path) -> DocgateResult<()> {
    let report = sample::run(run_dir)?;
    print_outcomes(&report.outcomes);
    println!();
    println!(
        "{} tool records, {} messages, {} logging errors",
        report.stats.tool_calls_logged, report.stats.messages_logged, report.stats.logging_errors
    );
    println!("logs: {}", run_dir.join("logs").display());
    Ok(())
}

fn resolve_config(
    path: Option<&Path>,
    role: Option<String>,
    run_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
) -> DocgateResult<HookConfig> {
    let mut config = match path {
        Some(path) => HookConfig::from_file(path)?,
        None => HookConfig {
            agent_role: role.clone().ok_or_else(|| DocgateError::ConfigError {
                reason: "--role is required without --config".to_string(),
            })?,
            output_dir: None,
            run_dir: None,
            validation_log_dir: None,
        },
    };
    if let Some(role) = role {
        config.agent_role = role;
    }
    if output_dir.is_some() {
        config.output_dir = output_dir;
    }
    if run_dir.is_some() {
        config.run_dir = run_dir;
    }
    Ok(config)
}

fn run_replay(config: &HookConfig, script: &Path, document: &str) -> DocgateResult<()> {
    let agent_role: AgentRole = config.agent_role.parse()?;
    let calls = load_script(script)?;

    let Some(run_dir) = config.run_dir.as_deref() else {
        let hooks = HookComposer::from_config(config, None)?;
        print_outcomes(&ScriptedRuntime::new(&hooks).run(calls));
        println!();
        println!("no run directory configured; audit logging disabled");
        return Ok(());
    };

    let layout = RunLogLayout::new(run_dir);
    let logger = Arc::new(layout.open_logger(agent_role, document)?);
    let mut config = config.clone();
    if config.validation_log_dir.is_none() {
        config.validation_log_dir = Some(layout.validation_log_dir());
    }
    let hooks = HookComposer::from_config(&config, Some(logger.clone()))?;

    let outcomes = ScriptedRuntime::new(&hooks).run(calls);
    print_outcomes(&outcomes);

    let summary = layout.write_summary(agent_role, 1, logger.get_stats())?;
    println!();
    println!(
        "{} tool records written, {} tool errors",
        summary.stats.tool_calls_logged, summary.stats.tool_errors
    );
    if summary.stats.logging_errors > 0 {
        eprintln!("warning: {} log writes failed", summary.stats.logging_errors);
    }
    Ok(())
}

fn run_verify(path: &Path) -> DocgateResult<()> {
    let file = File::open(path).map_err(|e| DocgateError::Io {
        reason: format!("{}: {e}", path.display()),
    })?;
    let log = recover_tool_log(BufReader::new(file))?;
    if !log.torn_lines.is_empty() {
        eprintln!(
            "warning: skipped torn lines {:?} left by failed writes",
            log.torn_lines
        );
    }

    let lines = log.lines;
    match (1..=lines.len()).find(|&n| !verify_chain(&lines[..n])) {
        None => {
            println!("{}: {} records, chain intact", path.display(), lines.len());
            Ok(())
        }
        Some(record) => Err(DocgateError::MalformedLog {
            line: record,
            reason: format!("hash chain broken at record {record} in {}", path.display()),
        }),
    }
}

fn load_script(path: &Path) -> DocgateResult<Vec<ScriptedCall>> {
    let body = std::fs::read_to_string(path).map_err(|e| DocgateError::Io {
        reason: format!("{}: {e}", path.display()),
    })?;
    serde_json::from_str(&body).map_err(|e| DocgateError::ConfigError {
        reason: format!("invalid script {}: {e}", path.display()),
    })
}

fn print_outcomes(outcomes: &[CallOutcome]) {
    for outcome in outcomes {
        let status = match (&outcome.decision, &outcome.result) {
            (HookDecision::Deny { reason }, _) => format!("DENIED  {reason}"),
            (HookDecision::Allow, Some(Ok(_))) => "OK".to_string(),
            (HookDecision::Allow, Some(Err(e))) => format!("FAILED  {e}"),
            (HookDecision::Allow, None) => "SKIPPED".to_string(),
        };
        println!("[{}] {:<6} {}", outcome.tool_use_id.0, outcome.tool_name, status);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::resolve_config;

    /// Flags override the fields loaded from the config file.
    #[test]
    fn flags_override_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("hooks.toml");
        std::fs::write(
            &path,
            "agent_role = \"extraction\"\noutput_dir = \"out\"\nrun_dir = \"runs/a\"\n",
        )
        .unwrap();

        let config =
            resolve_config(Some(&path), None, Some(PathBuf::from("runs/b")), None).unwrap();
        assert_eq!(config.agent_role, "extraction");
        assert_eq!(config.output_dir, Some(PathBuf::from("out")));
        assert_eq!(config.run_dir, Some(PathBuf::from("runs/b")));
    }

    /// Without a config file the role flag is mandatory.
    #[test]
    fn role_required_without_config() {
        assert!(resolve_config(None, None, Some(PathBuf::from("r")), None).is_err());
        let config =
            resolve_config(None, Some("api_validation".into()), Some(PathBuf::from("r")), None)
                .unwrap();
        assert_eq!(config.agent_role, "api_validation");
    }
}
