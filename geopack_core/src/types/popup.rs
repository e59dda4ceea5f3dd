use serde::{Deserialize, Serialize};

/// One attribute shown in a feature popup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopupField {
	pub label: String,
	pub key: String,
}

/// Popup definition for a layer, as declared in `popup-config.json`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupConfig {
	#[serde(default)]
	pub fields: Vec<PopupField>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title_field: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub hide_empty: Option<bool>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn parse_popup_config() {
		let json = r#"{"fields":[{"label":"Name","key":"NAME"}],"titleField":"NAME","hideEmpty":true}"#;
		let popup: PopupConfig = serde_json::from_str(json).unwrap();
		assert_eq!(
			popup,
			PopupConfig {
				fields: vec![PopupField {
					label: "Name".to_string(),
					key: "NAME".to_string()
				}],
				title_field: Some("NAME".to_string()),
				hide_empty: Some(true),
			}
		);
		assert_eq!(serde_json::to_string(&popup).unwrap(), json);
	}

	#[test]
	fn optional_members_are_omitted() {
		let popup: PopupConfig = serde_json::from_str("{}").unwrap();
		assert_eq!(serde_json::to_string(&popup).unwrap(), r#"{"fields":[]}"#);
	}
}
