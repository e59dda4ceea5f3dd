use anyhow::Result;
use geopack::{
	config::GeopackConfig,
	orchestrator::{BuildOptions, Orchestrator},
};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// directory with one folder per pack
	#[arg(long, short, value_name = "DIR")]
	source: PathBuf,

	/// directory receiving the catalog, created when missing
	#[arg(long, short, value_name = "DIR")]
	output: PathBuf,

	/// process every layer again, ignoring the layer cache
	#[arg(long, display_order = 1)]
	no_cache: bool,

	/// only rebuild styles and manifests from the artifacts of an earlier run
	#[arg(long, display_order = 1)]
	metadata_only: bool,

	/// number of layers processed in parallel [default: number of CPUs - 1]
	#[arg(long, short, value_name = "int", display_order = 2)]
	workers: Option<usize>,

	/// YAML file overriding folder conventions, projection and tiling settings
	#[arg(long, short, value_name = "FILE", display_order = 2)]
	config: Option<PathBuf>,
}

impl Subcommand {
	fn options(&self) -> BuildOptions {
		BuildOptions {
			source: self.source.clone(),
			output: self.output.clone(),
			no_cache: self.no_cache,
			metadata_only: self.metadata_only,
			workers: self.workers,
		}
	}
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let config = match &arguments.config {
		Some(path) => GeopackConfig::from_path(path)?,
		None => GeopackConfig::default(),
	};

	eprintln!("build {:?} into {:?}", arguments.source, arguments.output);
	let report = Orchestrator::new(config).run(&arguments.options()).await?;
	eprintln!("{report}");

	Ok(())
}
