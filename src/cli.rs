//! CLI definition and dispatch.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::{CsvRecommendationWriter, CsvUniverseAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::tracing_audit_adapter::TracingAuditAdapter;
use crate::domain::config_validation::{build_risk_chain, build_selection_policy};
use crate::domain::error::RecommendError;
use crate::domain::recommendation::RecommendationRun;
use crate::domain::security::SecurityTable;
use crate::ports::audit_port::AuditPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::recommendation_port::RecommendationPort;
use crate::ports::universe_port::UniversePort;

#[derive(Parser, Debug)]
#[command(name = "samrecommend", about = "Risk-filtered stock recommendation selector")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Filter and select recommendations from a scored universe
    Recommend {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        universe: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Evaluation date (YYYY-MM-DD); defaults to [run] date, then today
        #[arg(long)]
        date: Option<String>,
    },
    /// Validate the risk and selection configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Recommend {
            config,
            universe,
            output,
            date,
        } => run_recommend(&config, universe, output.as_ref(), date.as_deref()),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Resolves the evaluation date: the CLI override wins over `[run] date`,
/// which wins over `today`.
pub fn resolve_recommend_date(
    cli_date: Option<&str>,
    config: &dyn ConfigPort,
    today: NaiveDate,
) -> Result<NaiveDate, RecommendError> {
    let raw = match cli_date {
        Some(d) => d.to_string(),
        None => match config.get_string("run", "date") {
            Some(d) => d,
            None => return Ok(today),
        },
    };
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| RecommendError::ConfigInvalid {
        section: "run".into(),
        key: "date".into(),
        reason: format!("invalid date '{raw}' (expected YYYY-MM-DD)"),
    })
}

pub fn build_run(
    config: &dyn ConfigPort,
    recommend_date: NaiveDate,
) -> Result<RecommendationRun, RecommendError> {
    Ok(RecommendationRun::new(
        build_risk_chain(config)?,
        build_selection_policy(config)?,
        recommend_date,
    ))
}

/// Loads, recommends and writes. Split out from [`run_recommend`] so the
/// pipeline can be driven with any port implementations.
pub fn run_pipeline(
    run: &RecommendationRun,
    universe: &dyn UniversePort,
    sink: &dyn RecommendationPort,
    output_path: Option<&PathBuf>,
    audit: &dyn AuditPort,
) -> Result<SecurityTable, RecommendError> {
    let table = universe.load_universe()?;
    info!(
        candidates = table.len(),
        rules = run.chain.len(),
        policy = run.policy.name(),
        date = %run.recommend_date,
        "Starting recommendation run"
    );

    let recommended = run.recommend(&table, audit);

    match output_path {
        Some(path) => {
            sink.write(&recommended, path)?;
            info!(path = %path.display(), selected = recommended.len(), "Recommendations written");
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            sink.write_to(&recommended, &mut lock)?;
        }
    }
    Ok(recommended)
}

fn run_recommend(
    config_path: &PathBuf,
    universe_path: PathBuf,
    output_path: Option<&PathBuf>,
    cli_date: Option<&str>,
) -> Result<(), RecommendError> {
    info!(path = %config_path.display(), "Loading config");
    let config = FileConfigAdapter::from_file(config_path)?;
    let date = resolve_recommend_date(cli_date, &config, Local::now().date_naive())?;
    let run = build_run(&config, date)?;

    run_pipeline(
        &run,
        &CsvUniverseAdapter::new(universe_path),
        &CsvRecommendationWriter,
        output_path,
        &TracingAuditAdapter,
    )?;
    Ok(())
}

fn run_validate(config_path: &PathBuf) -> Result<(), RecommendError> {
    let config = FileConfigAdapter::from_file(config_path)?;
    let run = build_run(&config, Local::now().date_naive())?;
    let rules: Vec<&str> = run.chain.rules().iter().map(|r| r.name()).collect();
    println!("Configuration OK");
    println!(
        "  Risk rules: {}",
        if rules.is_empty() {
            "(none)".to_string()
        } else {
            rules.join(" -> ")
        }
    );
    println!(
        "  Selection:  {} (score column '{}')",
        run.policy.name(),
        run.policy.score_column()
    );
    Ok(())
}
