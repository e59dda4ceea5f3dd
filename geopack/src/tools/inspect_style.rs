use anyhow::{Context, Result};
use geopack_core::GeometryType;
use geopack_style::{CimDocument, MAX_SYMBOL_DEPTH, StyleInterpreter};
use std::path::PathBuf;

fn parse_geometry_type(value: &str) -> Result<GeometryType> {
	serde_json::from_value(serde_json::Value::from(value.to_ascii_lowercase()))
		.with_context(|| format!("'{value}' is none of point, line, polygon, unknown"))
}

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// style document, usually a *.lyrx file
	#[arg(required = true)]
	file: PathBuf,

	/// geometry of the layer the style is meant for
	#[arg(long, short, value_name = "TYPE", default_value = "unknown", value_parser = parse_geometry_type)]
	geometry_type: GeometryType,

	/// nesting limit when flattening symbols
	#[arg(long, value_name = "int", default_value_t = MAX_SYMBOL_DEPTH)]
	max_depth: usize,
}

/// Prints the derived style as JSON. Unlike a build, a document that cannot be interpreted is
/// an error instead of a fallback style.
pub fn run(arguments: &Subcommand) -> Result<()> {
	let document = CimDocument::from_path(&arguments.file)?;
	let style = StyleInterpreter::new(arguments.max_depth)
		.interpret(&document, arguments.geometry_type)
		.with_context(|| format!("interpreting {:?}", arguments.file))?;
	println!("{}", serde_json::to_string_pretty(&style)?);
	Ok(())
}
