//! # geopack
//!
//! Turns a directory of layer packs into a catalog a web map can load directly.
//!
//! Every pack is a folder holding GeoJSON documents, layer style documents (`.lyrx`), raster
//! images and optionally WMTS declarations. A build
//! - reprojects every document into WGS 84 longitude/latitude,
//! - derives a renderer-agnostic style for each layer from its style document,
//! - tiles large or elaborately styled layers into PMTiles archives,
//! - and writes one manifest and style catalog per pack plus a root manifest.
//!
//! Unchanged layers are skipped on the next run thanks to a content-hash cache.
//!
//! ```no_run
//! use geopack::{config::GeopackConfig, orchestrator::{BuildOptions, Orchestrator}};
//!
//! # async fn build() -> anyhow::Result<()> {
//! let options = BuildOptions {
//! 	source: "data/packs".into(),
//! 	output: "public/layers".into(),
//! 	..BuildOptions::default()
//! };
//! let report = Orchestrator::new(GeopackConfig::default()).run(&options).await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod manifest;
pub mod orchestrator;
pub mod scan;
