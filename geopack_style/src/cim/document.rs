use super::CimSymbolReference;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::{fs::File, io::BufReader, path::Path};

/// A layer document (`.lyrx`) or any other CIM JSON document with `layerDefinitions`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CimDocument {
	#[serde(default)]
	pub layer_definitions: Vec<CimLayerDefinition>,
}

impl CimDocument {
	pub fn from_slice(bytes: &[u8]) -> Result<Self> {
		serde_json::from_slice(bytes).context("parsing CIM document")
	}

	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("opening {path:?}"))?;
		serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing CIM document {path:?}"))
	}

	/// The layer whose symbology describes the document: the first one with a renderer.
	pub fn primary_layer(&self) -> Option<&CimLayerDefinition> {
		self
			.layer_definitions
			.iter()
			.find(|layer| layer.renderer.is_some())
			.or_else(|| self.layer_definitions.first())
	}

	/// Layer names stored inside the document: names, the last segment of each URI (without
	/// extension) and the dataset of each data connection.
	pub fn metadata_names(&self) -> Vec<String> {
		let mut names = Vec::new();
		for layer in &self.layer_definitions {
			if let Some(name) = &layer.name {
				names.push(name.clone());
			}
			if let Some(uri) = &layer.uri
				&& let Some(segment) = uri.rsplit(['/', '=']).next()
				&& !segment.is_empty()
			{
				let stem = segment.rsplit_once('.').map_or(segment, |(stem, _)| stem);
				names.push(stem.to_string());
			}
			if let Some(dataset) = layer
				.feature_table
				.as_ref()
				.and_then(|table| table.data_connection.as_ref())
				.and_then(|connection| connection.dataset.as_ref())
			{
				names.push(dataset.clone());
			}
		}
		names
	}
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CimLayerDefinition {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default, rename = "uRI")]
	pub uri: Option<String>,
	#[serde(default)]
	pub feature_table: Option<CimFeatureTable>,
	#[serde(default)]
	pub renderer: Option<CimRenderer>,
	#[serde(default)]
	pub label_classes: Vec<CimLabelClass>,
	#[serde(default)]
	pub min_scale: Option<f64>,
	#[serde(default)]
	pub max_scale: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CimFeatureTable {
	#[serde(default)]
	pub data_connection: Option<CimDataConnection>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CimDataConnection {
	#[serde(default)]
	pub dataset: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type")]
pub enum CimRenderer {
	#[serde(rename = "CIMSimpleRenderer")]
	Simple(CimSimpleRenderer),
	#[serde(rename = "CIMUniqueValueRenderer")]
	UniqueValue(CimUniqueValueRenderer),
	#[serde(other)]
	Unsupported,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CimSimpleRenderer {
	#[serde(default)]
	pub symbol: Option<CimSymbolReference>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CimUniqueValueRenderer {
	#[serde(default)]
	pub fields: Vec<String>,
	#[serde(default)]
	pub groups: Vec<CimUniqueValueGroup>,
	#[serde(default)]
	pub default_symbol: Option<CimSymbolReference>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CimUniqueValueGroup {
	#[serde(default)]
	pub classes: Vec<CimUniqueValueClass>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CimUniqueValueClass {
	#[serde(default)]
	pub label: String,
	#[serde(default)]
	pub values: Vec<CimUniqueValue>,
	#[serde(default)]
	pub symbol: Option<CimSymbolReference>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CimUniqueValue {
	/// one value per renderer field; usually strings, sometimes numbers
	#[serde(default)]
	pub field_values: Vec<Value>,
}

impl CimUniqueValue {
	pub fn field_strings(&self) -> Vec<String> {
		self
			.field_values
			.iter()
			.map(|value| match value {
				Value::String(text) => text.clone(),
				Value::Null => String::new(),
				other => other.to_string(),
			})
			.collect()
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CimLabelClass {
	#[serde(default)]
	pub expression: String,
	#[serde(default)]
	pub text_symbol: Option<CimSymbolReference>,
	#[serde(default = "visible")]
	pub visibility: bool,
}

fn visible() -> bool {
	true
}
