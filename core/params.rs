/*!
Parameter reconciliation. A model's build parameters are exposed three ways, all derived from the same snapshot: the default values, the actual values with references to other entities unwrapped to their names, and the raw default/actual pairs.
*/

use crate::document::ParameterSpec;
use serde_json::Value;
use std::collections::BTreeMap;

/// Parameters whose actual value is a reference to another entity, and the field of that reference holding its name.
const ENTITY_REFERENCES: [(&str, &str); 4] = [
	("model_id", "name"),
	("response_column", "column_name"),
	("training_frame", "name"),
	("validation_frame", "name"),
];

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ParameterValues {
	pub default: Value,
	pub actual: Value,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters(BTreeMap<String, ParameterValues>);

impl Parameters {
	pub fn from_specs(specs: &[ParameterSpec]) -> Self {
		let parameters = specs
			.iter()
			.map(|spec| {
				let values = ParameterValues {
					default: spec.default_value.clone(),
					actual: spec.actual_value.clone(),
				};
				(spec.name.clone(), values)
			})
			.collect();
		Parameters(parameters)
	}

	pub fn get(&self, name: &str) -> Option<&ParameterValues> {
		self.0.get(name)
	}

	pub fn default_parameters(&self) -> BTreeMap<String, Value> {
		self.0
			.iter()
			.map(|(name, values)| (name.clone(), values.default.clone()))
			.collect()
	}

	pub fn actual_parameters(&self) -> BTreeMap<String, Value> {
		self.0
			.iter()
			.map(|(name, values)| (name.clone(), unwrap_reference(name, &values.actual)))
			.collect()
	}

	pub fn full_parameters(&self) -> &BTreeMap<String, ParameterValues> {
		&self.0
	}
}

fn unwrap_reference(name: &str, actual: &Value) -> Value {
	match ENTITY_REFERENCES.iter().find(|(parameter, _)| *parameter == name) {
		Some((_, field)) => actual.get(field).cloned().unwrap_or(Value::Null),
		None => actual.clone(),
	}
}

#[cfg(test)]
fn parameters() -> Parameters {
	let specs: Vec<ParameterSpec> = serde_json::from_value(serde_json::json!([
		{
			"name": "training_frame",
			"default_value": null,
			"actual_value": { "name": "X", "type": "Key<Frame>", "URL": "/3/Frames/X" },
		},
		{
			"name": "response_column",
			"default_value": null,
			"actual_value": { "column_name": "price", "is_member_of_frames": null },
		},
		{
			"name": "validation_frame",
			"default_value": null,
			"actual_value": null,
		},
		{
			"name": "ntrees",
			"default_value": 50,
			"actual_value": 100,
		},
	]))
	.unwrap();
	Parameters::from_specs(&specs)
}

#[test]
fn test_actual_parameters_unwrap_references() {
	let actual = parameters().actual_parameters();
	assert_eq!(actual["training_frame"], serde_json::json!("X"));
	assert_eq!(actual["response_column"], serde_json::json!("price"));
	assert_eq!(actual["validation_frame"], Value::Null);
	assert_eq!(actual["ntrees"], serde_json::json!(100));
}

#[test]
fn test_views_agree() {
	let parameters = parameters();
	let defaults = parameters.default_parameters();
	let full = parameters.full_parameters();
	assert_eq!(full.len(), defaults.len());
	for (name, values) in full.iter() {
		assert_eq!(values.default, defaults[name]);
		assert_eq!(Some(values), parameters.get(name));
	}
	assert_eq!(
		full["training_frame"].actual,
		serde_json::json!({ "name": "X", "type": "Key<Frame>", "URL": "/3/Frames/X" })
	);
	assert_eq!(
		defaults,
		maplit::btreemap! {
			"ntrees".to_owned() => serde_json::json!(50),
			"response_column".to_owned() => Value::Null,
			"training_frame".to_owned() => Value::Null,
			"validation_frame".to_owned() => Value::Null,
		}
	);
}
