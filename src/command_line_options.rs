use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

use crate::parameters::Override;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct CommandLineOptions {
    #[clap(subcommand)]
    pub command: Command,
    /// YAML file with one section per parameter type.
    #[clap(short, long)]
    pub parameter_file: Option<PathBuf>,
    /// Override a single parameter, e.g. `--set run.n=3`.
    #[clap(long = "set")]
    pub overrides: Vec<Override>,
    #[clap(short, parse(from_occurrences))]
    pub verbosity: usize,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Order a triangulation. Writes `<name>_ordered.trig` or, if no
    /// ordering exists, `<name>_unorderable.trig`.
    Order { triangulation: PathBuf },
    /// Write one decomposition input file per obstruction class.
    Variety { triangulation: PathBuf },
    /// Compute volumes and Chern-Simons invariants from the output of
    /// the decomposition program.
    Evaluate { outputs: Vec<PathBuf> },
    /// Solve the Ptolemy varieties numerically without decomposing them.
    Solve { triangulation: PathBuf },
    /// Run the decomposition program on every obstruction class and
    /// evaluate the results.
    Decompose { triangulation: PathBuf },
}
