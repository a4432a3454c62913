//! Count-and-min reduction benchmark
//!
//! Generates one data set, then times every configured strategy over it.
//!
//! Flow:
//! 1. Load reducer and data configuration from the environment
//! 2. Generate the input sequence once (deterministic seed)
//! 3. Run each strategy, logging count, minimum and elapsed time
//! 4. Check that all strategies agree, print a JSON summary and
//!    optionally append CSV lines to `REDUCE_REPORT_PATH`

use anyhow::{Context, Result, bail};
use divisible_reduce::{
    DataConfig, ReduceConfig, ReportWriter, RunReport, Strategy, data::generate, time_reduction,
};
use serde::Serialize;
use std::{env, path::PathBuf, time::Instant};
use tracing::{info, warn};

/// Machine-readable summary printed at the end of a run
#[derive(Serialize)]
struct Summary<'a> {
    config: &'a ReduceConfig,
    data: &'a DataConfig,
    runs: &'a [RunReport],
    agree: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ReduceConfig::from_env().context("invalid reducer configuration")?;
    let data_config = DataConfig::from_env().context("invalid data configuration")?;
    let strategies = strategies_from_env()?;
    let report_path = env::var("REDUCE_REPORT_PATH").ok().map(PathBuf::from);

    info!("Count-and-min reduction benchmark");
    info!("  Divisor:   {}", config.divisor);
    info!("  Workers:   {}", config.workers);
    info!("  Min merge: {}", config.min_merge.as_str());
    info!("  Elements:  {}", data_config.len);

    info!("Generating input sequence...");
    let start = Instant::now();
    let data = generate(&data_config);
    info!("  ✓ Generated {} values in {:?}", data.len(), start.elapsed());

    let mut runs = Vec::with_capacity(strategies.len());
    for strategy in strategies {
        let reducer = strategy.build(&config)?;
        let report = time_reduction(reducer.as_ref(), &data)
            .with_context(|| format!("{strategy} reduction failed"))?;

        let min = report.result.min.map_or_else(|| "none".to_string(), |m| m.to_string());
        info!("[*] {}", report.strategy);
        info!(
            "Found: {} elements, minimum: {}, time: {:.3} ms",
            report.result.count,
            min,
            report.elapsed_ms()
        );
        runs.push(report);
    }

    let agree = runs.windows(2).all(|pair| pair[0].result == pair[1].result);

    if let Some(path) = report_path {
        let mut writer = ReportWriter::open(&path)
            .with_context(|| format!("failed to open report file {}", path.display()))?;
        for report in &runs {
            writer.append(report)?;
        }
        writer.sync_all()?;
        info!("Report appended to {}", writer.path().display());
    }

    let summary = Summary { config: &config, data: &data_config, runs: &runs, agree };
    println!("{}", serde_json::to_string(&summary)?);

    if !agree {
        warn!("Strategies disagree on the result");
        bail!("strategies produced different results");
    }

    Ok(())
}

/// Strategies to run, from a comma-separated `REDUCE_STRATEGIES`. Defaults to all.
fn strategies_from_env() -> Result<Vec<Strategy>> {
    let Ok(raw) = env::var("REDUCE_STRATEGIES") else {
        return Ok(Strategy::ALL.to_vec());
    };

    let strategies = raw
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(str::parse)
        .collect::<Result<Vec<Strategy>, _>>()?;

    if strategies.is_empty() {
        bail!("REDUCE_STRATEGIES is set but names no strategy");
    }
    Ok(strategies)
}
