mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[command(flatten)]
	verbose: Verbosity<WarnLevel>,

	/// log everything down to debug messages
	#[arg(long, global = true)]
	debug: bool,
}

impl Cli {
	fn log_level(&self) -> LevelFilter {
		if self.debug {
			LevelFilter::Debug
		} else {
			self.verbose.log_level_filter()
		}
	}
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Build the layer catalog from a directory of packs
	Build(tools::build::Subcommand),

	/// Print the style derived from a single style document
	InspectStyle(tools::inspect_style::Subcommand),
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.log_level())
		.format_timestamp(None)
		.init();

	run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
	match &cli.command {
		Commands::Build(arguments) => tools::build::run(arguments),
		Commands::InspectStyle(arguments) => tools::inspect_style::run(arguments),
	}
}
