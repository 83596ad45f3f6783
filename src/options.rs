//! Command line options.
//! `pnsym <MODEL.pnml> [-s {strategy}] [--max-iterations N] [--cost c0,c1,...]`

use std::error::Error;

use clap::{Arg, ArgAction, Command};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Iterative IP refinement with no-good cuts.
    Iterative,
    /// IP precheck plus symbolic filtering.
    Filter,
    /// Run both and report each verdict.
    Both,
}

fn make_options_parser() -> Command {
    Command::new("pnsym")
        .no_binary_name(true)
        .version("v0.1.0")
        .about("Symbolic reachability, deadlock and optimization analysis of 1-safe Petri nets")
        .arg(
            Arg::new("model")
                .required(true)
                .value_name("MODEL.pnml")
                .help("Path to the PNML net description"),
        )
        .arg(
            Arg::new("strategy")
                .short('s')
                .long("strategy")
                .help("Deadlock search strategy")
                .default_value("both")
                .value_parser(["iterative", "filter", "both"]),
        )
        .arg(
            Arg::new("max-iterations")
                .long("max-iterations")
                .help("Iteration budget for the iterative deadlock search")
                .default_value("1000")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("cost")
                .long("cost")
                .value_name("c0,c1,...")
                .help("Cost per place for the marking optimizer (default: all ones)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Write the analysis report as JSON to this file"),
        )
        .arg(
            Arg::new("compare")
                .long("compare")
                .action(ArgAction::SetTrue)
                .help("Also enumerate the reachable set explicitly and compare counts"),
        )
}

#[derive(Debug, Clone)]
pub struct Options {
    pub model: String,
    pub strategy: Strategy,
    pub max_iterations: usize,
    pub cost: Option<Vec<i64>>,
    pub output: Option<String>,
    pub compare: bool,
}

impl Options {
    pub fn parse_from_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let flags = shellwords::split(s)?;
        Self::parse_from_args(&flags)
    }

    pub fn parse_from_args(flags: &[String]) -> Result<Self, Box<dyn Error>> {
        let app = make_options_parser();
        let matches = app.try_get_matches_from(flags.iter())?;

        let strategy = match matches
            .get_one::<String>("strategy")
            .map(String::as_str)
        {
            Some("iterative") => Strategy::Iterative,
            Some("filter") => Strategy::Filter,
            _ => Strategy::Both,
        };

        let cost = match matches.get_one::<String>("cost") {
            Some(list) => Some(parse_cost(list)?),
            None => None,
        };

        Ok(Options {
            model: matches
                .get_one::<String>("model")
                .cloned()
                .unwrap_or_default(),
            strategy,
            max_iterations: *matches.get_one::<usize>("max-iterations").unwrap_or(&1000),
            cost,
            output: matches.get_one::<String>("output").cloned(),
            compare: matches.get_flag("compare"),
        })
    }
}

fn parse_cost(list: &str) -> Result<Vec<i64>, Box<dyn Error>> {
    list.split(',')
        .map(|entry| {
            entry
                .trim()
                .parse::<i64>()
                .map_err(|_| Box::<dyn Error>::from(format!("invalid cost entry `{entry}`")))
        })
        .collect()
}
