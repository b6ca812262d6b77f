use clap::Parser;
use liftedbdi::automata::{Dfa, RefineMethod};
use liftedbdi::grounding::GroundingMap;
use liftedbdi::search::PlanningDomain;
use liftedbdi::{PipelineConfig, PlanGenerator};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Verbosity {
    Silent,
    Normal,
    Verbose,
    Debug,
}

impl From<Verbosity> for tracing::Level {
    fn from(verbosity: Verbosity) -> Self {
        match verbosity {
            Verbosity::Silent => tracing::Level::ERROR,
            Verbosity::Normal => tracing::Level::INFO,
            Verbosity::Verbose => tracing::Level::DEBUG,
            Verbosity::Debug => tracing::Level::TRACE,
        }
    }
}

#[derive(Parser)]
#[command(version)]
/// Compile a DFA over grounded atoms plus a PDDL domain into a reactive
/// plan library.
struct Cli {
    #[arg(help = "The PDDL domain file")]
    domain: PathBuf,
    #[arg(help = "The DFA file in DOT format")]
    dfa: PathBuf,
    #[arg(help = "The grounding map JSON file")]
    grounding: PathBuf,
    #[arg(
        help = "The output plan library, defaults to stdout",
        short = 'o',
        long = "output",
        id = "OUTPUT"
    )]
    output: Option<PathBuf>,
    #[arg(
        help = "Cap on the visited set of each regression search",
        long = "max-states",
        default_value_t = 200_000
    )]
    max_states: usize,
    #[arg(
        help = "Symbolic object cap for the feasibility prune, defaults to \
                the grounding map's object count",
        long = "max-objects"
    )]
    max_objects: Option<usize>,
    #[arg(
        help = "Per-label partition budget for the refiner",
        long = "minterm-budget",
        default_value_t = 1000
    )]
    minterm_budget: usize,
    #[arg(
        value_enum,
        help = "The label refinement method",
        long = "refiner",
        default_value_t = RefineMethod::Auto
    )]
    refiner: RefineMethod,
    #[arg(
        help = "Fail instead of writing a partial library when a search is truncated",
        long = "no-partial"
    )]
    no_partial: bool,
    #[arg(
        value_enum,
        help = "The verbosity level",
        short = 'v',
        long = "verbosity",
        default_value_t = Verbosity::Normal
    )]
    verbosity: Verbosity,
    #[arg(help = "Whether to use coloured output", short = 'c', long = "colour")]
    colour: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level: tracing::Level = cli.verbosity.into();
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(cli.colour)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, liftedbdi::PlannerError> {
    let domain = PlanningDomain::from_path(&cli.domain)?;
    let dfa = Dfa::from_path(&cli.dfa)?;
    let grounding = GroundingMap::from_path(&cli.grounding)?;

    let config = PipelineConfig {
        max_states: cli.max_states,
        max_objects: cli.max_objects,
        minterm_budget: cli.minterm_budget,
        refine_method: cli.refiner,
    };
    let generator = PlanGenerator::new(&domain, &grounding, config);
    let library = generator.generate(&dfa)?;

    if library.truncated && cli.no_partial {
        error!("search budget exhausted and partial output is disabled");
        return Ok(ExitCode::from(2));
    }

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &library.code)
                .map_err(|source| liftedbdi::PlannerError::io(path, source))?;
            info!(path = %path.display(), "wrote plan library");
        }
        None => print!("{}", library.code),
    }

    Ok(ExitCode::SUCCESS)
}
