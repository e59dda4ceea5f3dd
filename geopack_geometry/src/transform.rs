use crate::{
	CoordinateReference, GeoCollection, RegionalProjection, read_geojson, web_mercator_to_lon_lat,
};
use anyhow::{Context, Result, ensure};
use geopack_core::{GeometryType, json::write_atomic};
use log::{debug, warn};
use std::{fs, path::Path};

/// Number of leading features inspected when a document does not declare its reference.
const SAMPLE_FEATURES: usize = 5;

fn round7(value: f64) -> f64 {
	(value * 1e7).round() / 1e7
}

/// Result of transforming one document.
#[derive(Clone, Debug)]
pub struct TransformOutcome {
	/// the reference the positions were found to be in
	pub source_reference: CoordinateReference,
	pub reprojected: bool,
	pub geometry_type: GeometryType,
	pub feature_count: usize,
}

/// Brings GeoJSON documents into WGS 84 longitude/latitude.
#[derive(Clone, Debug, Default)]
pub struct GeometryTransformer {
	regional: RegionalProjection,
}

impl GeometryTransformer {
	pub fn new(regional: RegionalProjection) -> Self {
		Self { regional }
	}

	pub fn regional(&self) -> &RegionalProjection {
		&self.regional
	}

	/// Determines the reference of `collection`.
	///
	/// A readable `crs` member wins unless it names an unsupported system. Otherwise the
	/// positions of the first few features decide: everything inside ±180/±90 is taken as
	/// degrees, anything else as the regional grid.
	pub fn detect_reference(&self, collection: &GeoCollection) -> CoordinateReference {
		if let Some(crs) = &collection.crs {
			match CoordinateReference::from_crs_member(crs, self.regional.epsg) {
				Some(CoordinateReference::Unsupported(code)) => {
					warn!("unsupported coordinate reference EPSG:{code}, guessing from coordinates");
				}
				Some(reference) => return reference,
				None => debug!("unreadable crs member {crs}, guessing from coordinates"),
			}
		}

		let mut count = 0usize;
		let mut geographic = true;
		let mut inside_regional = true;
		for geometry in collection
			.features
			.iter()
			.filter_map(|feature| feature.geometry.as_ref())
			.take(SAMPLE_FEATURES)
		{
			geometry.for_each_position(&mut |position| {
				if !position.is_valid() {
					return;
				}
				let (x, y) = (position.x(), position.y());
				count += 1;
				geographic &= x.abs() <= 180.0 && y.abs() <= 90.0;
				inside_regional &= self.regional.contains(x, y);
			});
		}

		if count == 0 || geographic {
			return CoordinateReference::Canonical;
		}
		if !inside_regional {
			warn!(
				"coordinates are neither degrees nor inside the envelope of EPSG:{}, assuming EPSG:{} anyway",
				self.regional.epsg, self.regional.epsg
			);
		}
		CoordinateReference::Regional
	}

	/// Reprojects `collection` in place and returns the reference it was in.
	///
	/// Canonical documents are not touched at all. Reprojected positions are rounded to 7
	/// decimals and the `crs` and `bbox` members are removed since they no longer apply.
	pub fn transform(&self, collection: &mut GeoCollection) -> Result<CoordinateReference> {
		let reference = self.detect_reference(collection);
		let project: Box<dyn Fn(f64, f64) -> (f64, f64) + '_> = match reference {
			CoordinateReference::Canonical => return Ok(reference),
			CoordinateReference::WebMercator => Box::new(web_mercator_to_lon_lat),
			CoordinateReference::Regional | CoordinateReference::Unsupported(_) => {
				Box::new(|x, y| self.regional.to_lon_lat(x, y))
			}
		};

		for (index, feature) in collection.features.iter_mut().enumerate() {
			feature.foreign.remove("bbox");
			let Some(geometry) = feature.geometry.as_mut() else {
				continue;
			};
			geometry
				.try_for_each_position_mut(&mut |position| {
					let (lon, lat) = project(position.x(), position.y());
					ensure!(
						lon.is_finite() && lat.is_finite(),
						"position {position:?} cannot be reprojected"
					);
					position.set_xy(round7(lon), round7(lat));
					Ok(())
				})
				.with_context(|| format!("reprojecting feature {index}"))?;
		}
		collection.crs = None;
		collection.foreign.remove("bbox");
		Ok(reference)
	}

	/// Reads `input`, transforms it and writes the result to `output`.
	///
	/// Canonical documents are copied byte for byte.
	pub fn transform_file(&self, input: &Path, output: &Path) -> Result<TransformOutcome> {
		let bytes = fs::read(input).with_context(|| format!("reading {input:?}"))?;
		let mut collection = read_geojson(bytes.as_slice()).with_context(|| format!("parsing GeoJSON {input:?}"))?;

		let source_reference = self.transform(&mut collection)?;
		let reprojected = source_reference != CoordinateReference::Canonical;
		if reprojected {
			debug!("reprojected {input:?} from {source_reference:?}");
			write_atomic(output, &collection.to_json_vec()?)?;
		} else {
			write_atomic(output, &bytes)?;
		}

		Ok(TransformOutcome {
			source_reference,
			reprojected,
			geometry_type: collection.geometry_type(),
			feature_count: collection.features.len(),
		})
	}
}
