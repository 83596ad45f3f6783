use std::time::Instant;

use anyhow::{Context, Result};
use num_bigint::BigInt;

use pnsym::analysis::{
    explicit_reachable, find_deadlock_filtered, find_deadlock_iterative, maximize,
};
use pnsym::options::{Options, Strategy};
use pnsym::pnml::load_pnml;
use pnsym::report::{AnalysisReport, DeadlockReportEntry, OptimumReport};
use pnsym::symbolic::{reachable_set, SymbolicContext};

fn main() -> Result<()> {
    let env = env_logger::Env::new()
        .filter_or("PNSYM_LOG", "info")
        .write_style("PNSYM_LOG_STYLE");
    env_logger::init_from_env(env);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match Options::parse_from_args(&args) {
        Ok(options) => options,
        Err(err) => match err.downcast::<clap::Error>() {
            Ok(clap_err) => clap_err.exit(),
            Err(other) => return Err(anyhow::anyhow!(other.to_string())),
        },
    };
    log::debug!("options: {options:?}");

    let net = load_pnml(&options.model)
        .with_context(|| format!("loading net model from {}", options.model))?;
    log::info!(
        "{}: {} places, {} transitions",
        options.model,
        net.places_len(),
        net.transitions_len()
    );

    let start = Instant::now();
    let ctx = SymbolicContext::new(&net)?;
    let reach = reachable_set(&net, &ctx);

    let mut deadlock = Vec::new();
    if matches!(options.strategy, Strategy::Iterative | Strategy::Both) {
        let result = find_deadlock_iterative(&net, &ctx, &reach, options.max_iterations)?;
        log::info!("iterative search: {result}");
        deadlock.push(DeadlockReportEntry::from_result("iterative", &result));
    }
    if matches!(options.strategy, Strategy::Filter | Strategy::Both) {
        let result = find_deadlock_filtered(&net, &ctx, &reach)?;
        log::info!("filter search: {result}");
        deadlock.push(DeadlockReportEntry::from_result("filter", &result));
    }

    let cost = options
        .cost
        .clone()
        .unwrap_or_else(|| vec![1; net.places_len()]);
    let optimum = maximize(&ctx, reach.formula(), &cost)?;
    match &optimum {
        Some(optimum) => log::info!("optimum value {}", optimum.value),
        None => log::info!("reachable set is empty, nothing to optimize"),
    }

    let explicit_count = if options.compare {
        let explicit = explicit_reachable(&net);
        if BigInt::from(explicit.len()) == *reach.count() {
            log::info!("explicit baseline agrees: {} markings", explicit.len());
        } else {
            log::warn!(
                "count mismatch: symbolic {} vs explicit {}",
                reach.count(),
                explicit.len()
            );
        }
        Some(explicit.len())
    } else {
        None
    };

    let report = AnalysisReport {
        model: options.model.clone(),
        places: net.places_len(),
        transitions: net.transitions_len(),
        reachable_count: reach.count().to_string(),
        fixed_point_passes: reach.passes(),
        explicit_count,
        deadlock,
        optimum: optimum.as_ref().map(OptimumReport::from),
        elapsed_ms: start.elapsed().as_millis(),
    };

    println!("{report}");
    if let Some(path) = &options.output {
        report
            .save_to_file(path)
            .with_context(|| format!("writing report to {path}"))?;
        log::info!("report written to {path}");
    }
    Ok(())
}
