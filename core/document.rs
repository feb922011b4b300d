/*!
This module defines the documents the cluster returns for a model. A `ModelDocument` is one complete snapshot: it is replaced wholesale by a refresh and never patched.
*/

use crate::table::Table;
use remodel_metrics::{number, Metrics, Role};
use serde_json::Value;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ModelsResponse {
	pub models: Vec<ModelDocument>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ModelDocument {
	pub model_id: KeyRef,
	pub algo: String,
	#[serde(default)]
	pub algo_full_name: Option<String>,
	#[serde(default)]
	pub parameters: Vec<ParameterSpec>,
	pub output: ModelOutput,
}

/// A reference to another entity on the cluster.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct KeyRef {
	pub name: String,
	#[serde(rename = "URL", default)]
	pub url: Option<String>,
}

impl KeyRef {
	pub fn new(name: impl Into<String>) -> Self {
		KeyRef {
			name: name.into(),
			url: None,
		}
	}

	/// The id of the frame this reference points to. References to weight and bias frames carry the id as the fourth segment of their URL, as in `/3/Frames/<id>`.
	pub fn frame_id(&self) -> &str {
		self.url
			.as_deref()
			.and_then(|url| url.split('/').nth(3))
			.filter(|id| !id.is_empty())
			.unwrap_or(&self.name)
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct ParameterSpec {
	pub name: String,
	#[serde(default)]
	pub label: Option<String>,
	#[serde(rename = "type", default)]
	pub kind: Option<String>,
	#[serde(default)]
	pub default_value: Value,
	#[serde(default)]
	pub actual_value: Value,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct ModelOutput {
	pub model_category: Option<String>,
	pub names: Option<Vec<String>>,
	pub training_metrics: Option<Metrics>,
	pub validation_metrics: Option<Metrics>,
	pub cross_validation_metrics: Option<Metrics>,
	pub cross_validation_metrics_summary: Option<Table>,
	pub model_summary: Option<Table>,
	pub scoring_history: Option<Table>,
	pub variable_importances: Option<Table>,
	pub coefficients_table: Option<Table>,
	pub weights: Option<Vec<KeyRef>>,
	pub biases: Option<Vec<KeyRef>>,
	#[serde(deserialize_with = "number::deserialize_vec")]
	pub normmul: Option<Vec<f64>>,
	#[serde(deserialize_with = "number::deserialize_vec")]
	pub normsub: Option<Vec<f64>>,
	#[serde(deserialize_with = "number::deserialize_vec")]
	pub normrespmul: Option<Vec<f64>>,
	#[serde(deserialize_with = "number::deserialize_vec")]
	pub normrespsub: Option<Vec<f64>>,
	pub catoffsets: Option<Vec<i64>>,
	pub cross_validation_models: Option<Vec<KeyRef>>,
	pub cross_validation_predictions: Option<Vec<KeyRef>>,
	pub cross_validation_holdout_predictions_frame_id: Option<KeyRef>,
	pub cross_validation_fold_assignment_frame_id: Option<KeyRef>,
}

impl ModelOutput {
	/// The metric block computed against the dataset playing `role`.
	pub fn metrics(&self, role: Role) -> Option<&Metrics> {
		match role {
			Role::Train => self.training_metrics.as_ref(),
			Role::Valid => self.validation_metrics.as_ref(),
			Role::Xval => self.cross_validation_metrics.as_ref(),
		}
	}
}

#[test]
fn test_frame_id() {
	let key: KeyRef =
		serde_json::from_str(r#"{"name": "w0", "URL": "/3/Frames/weights_layer_0"}"#).unwrap();
	assert_eq!(key.frame_id(), "weights_layer_0");
	assert_eq!(KeyRef::new("plain").frame_id(), "plain");
}

#[test]
fn test_null_outputs() {
	let output: ModelOutput = serde_json::from_value(serde_json::json!({
		"model_category": "Regression",
		"training_metrics": { "model_category": "Regression", "MSE": 0.5 },
		"validation_metrics": null,
		"scoring_history": null,
	}))
	.unwrap();
	assert!(output.metrics(Role::Train).is_some());
	assert!(output.metrics(Role::Valid).is_none());
	assert!(output.metrics(Role::Xval).is_none());
	assert!(output.scoring_history.is_none());
}
