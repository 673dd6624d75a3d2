//! CLI command handling
//!
//! Builds the runner from configuration and flags, runs scenarios and
//! formats the results.

use std::path::Path;

use colored::Colorize;

use crate::commands::{Commands, GlobalArgs};
use crate::common::config::Config;
use crate::common::{unix_stamp, Result};
use crate::http::SessionOptions;
use crate::scenario::{registry, RunReport, RunnerConfig, ScenarioRunner, SuiteFile, Templates};

/// Width of the summary banner
const BANNER_WIDTH: usize = 50;

/// Dispatch a CLI command
///
/// Returns whether every executed scenario passed.
pub async fn dispatch(command: Commands, args: &GlobalArgs) -> Result<bool> {
    match command {
        Commands::List => {
            list_scenarios(args.json)?;
            Ok(true)
        }
        Commands::Auth => run_builtin(args, &["auth"]).await,
        Commands::Menu => run_builtin(args, &["menu"]).await,
        Commands::Order => run_builtin(args, &["order"]).await,
        Commands::All => run_builtin(args, registry::known_ids().as_slice()).await,
        Commands::Suite { path } => run_suite(&path, args).await,
    }
}

async fn run_builtin(args: &GlobalArgs, ids: &[&str]) -> Result<bool> {
    let config = Config::load(args.config.as_deref())?;
    execute(&config, args, None, &config.templates, ids).await
}

async fn run_suite(path: &Path, args: &GlobalArgs) -> Result<bool> {
    let config = Config::load(args.config.as_deref())?;
    let suite = SuiteFile::load(path)?;
    let templates = suite.templates(&config.templates)?;

    if !args.json {
        println!("\n{} {}", "Suite:".blue().bold(), suite.name.white().bold());
        if let Some(desc) = &suite.description {
            println!("  {}", desc.dimmed());
        }
    }

    execute(
        &config,
        args,
        suite.base_url.as_deref(),
        &templates,
        suite.scenarios.as_slice(),
    )
    .await
}

/// Resolve runner settings
///
/// Precedence for the endpoint: flag or environment, then the suite, then
/// the config file.
pub fn runner_config(config: &Config, args: &GlobalArgs, suite_base_url: Option<&str>) -> RunnerConfig {
    let base_url = args
        .base_url
        .as_deref()
        .or(suite_base_url)
        .unwrap_or(&config.base_url);

    let accept_invalid_certs = if args.insecure {
        true
    } else if args.strict_tls {
        false
    } else {
        config.accept_invalid_certs
    };

    RunnerConfig {
        session: SessionOptions {
            base_url: base_url.to_string(),
            accept_invalid_certs,
            timeout: config.request_timeout(),
        },
        verbose: args.verbose,
        echo: !args.json,
        stamp: args.stamp.unwrap_or_else(unix_stamp),
    }
}

async fn execute<S: AsRef<str>>(
    config: &Config,
    args: &GlobalArgs,
    suite_base_url: Option<&str>,
    templates: &Templates,
    ids: &[S],
) -> Result<bool> {
    let runner = ScenarioRunner::new(
        runner_config(config, args, suite_base_url),
        templates.clone(),
    );
    let report = runner.run_ids(ids).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(report.all_passed())
}

fn print_summary(report: &RunReport) {
    let rule = "=".repeat(BANNER_WIDTH);
    println!("\n{}", rule);
    println!("{:=^width$}", " Test Result Summary ", width = BANNER_WIDTH);
    println!("{}", rule);

    for result in &report.results {
        match result.failure() {
            None => println!("{}: {}", result.name(), "✓ PASSED".green()),
            Some(failure) => println!(
                "{}: {} ({}, step {}/{})",
                result.name(),
                "✗ FAILED".red(),
                failure.kind,
                result.steps_run(),
                result.steps_total()
            ),
        }
    }

    let verdict = if report.all_passed() {
        "✓ TEST PASSED".green().bold()
    } else {
        "✗ TEST FAILED".red().bold()
    };
    println!(
        "\nFinal Result: {} ({}/{} passed)",
        verdict, report.passed, report.total
    );
    println!("{}", rule);
}

fn list_scenarios(json: bool) -> Result<()> {
    let scenarios = registry::all_scenarios();

    if json {
        let entries: Vec<_> = scenarios
            .iter()
            .map(|info| {
                serde_json::json!({
                    "id": info.id,
                    "name": info.name,
                    "description": info.description,
                    "steps": info.steps,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        println!("Available scenarios:");
        for info in scenarios {
            println!("  {:8} - {} ({} steps)", info.id, info.description, info.steps);
        }
    }

    Ok(())
}
