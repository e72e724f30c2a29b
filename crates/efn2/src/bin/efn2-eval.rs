use std::io::Write;
use log::info;
use colored::*;
use env_logger::Builder;
use clap::Args;
use clap::Parser;
use clap::ArgAction;
use anyhow::Result;

use efn2::input_parsers::ruler;
use efn2::input_parsers::read_structures_input;
use efn2::energy_parsers::ParameterArguments;
use efn2::evaluation::evaluate;


#[derive(Debug, Args)]
pub struct EvalInput {
    /// Input file (FASTA-like), or "-" for stdin
    #[arg(value_name = "INPUT", default_value = "-")]
    pub input: String,

    /// Verbosity (-v = info, -vv = debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Evaluate only this structure (1-based), 0 evaluates all
    #[arg(short, long, value_name = "N", default_value_t = 0)]
    pub structure: usize,

    /// Print the energies as a JSON array
    #[arg(long)]
    pub json: bool,

    /// Number of worker threads (0 = one per core)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,
}


#[derive(Debug, Parser)]
#[command(name = "efn2-eval")]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub eval: EvalInput,

    #[command(flatten, next_help_heading = "Energy model parameters")]
    pub parameters: ParameterArguments,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            // no prefix, just the message
            writeln!(buf, "{}", record.args())
        })
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.eval.verbose);

    if cli.eval.jobs > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.eval.jobs)
            .build_global()?;
    }

    let efn2 = cli.parameters.build_model()?;
    let record = read_structures_input(&cli.eval.input)?;
    let model = record.structure_model()?;
    let energies = evaluate(&efn2, &model, cli.eval.structure)?;

    if cli.eval.json {
        println!("{}", serde_json::to_string_pretty(&energies)?);
        return Ok(());
    }

    if let Some(h) = record.header {
        println!("{}", h.yellow())
    }
    info!("{}", ruler(record.sequence.len().saturating_sub(1)).magenta());
    println!("{}", record.sequence);
    for rec in &energies {
        println!("{} {}", rec.structure, format!("{:>6.2}", rec.energy).green());
    }
    info!("{}", ruler(record.sequence.len().saturating_sub(1)).magenta());

    Ok(())
}
