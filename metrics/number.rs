/*!
The cluster writes non-finite numbers as the strings `"NaN"`, `"Infinity"` and `"-Infinity"`. Use this module with `#[serde(default, deserialize_with = "...")]` on `Option<f64>` fields.
*/

use serde::{de::Error, Deserialize};

#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
	Number(f64),
	String(String),
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let number: Option<Number> = Option::deserialize(deserializer)?;
	match number {
		None => Ok(None),
		Some(Number::Number(value)) => Ok(Some(value)),
		Some(Number::String(value)) => parse(&value)
			.map(Some)
			.ok_or_else(|| D::Error::custom(format!("invalid number {:?}", value))),
	}
}

/// Like `deserialize`, for arrays of numbers. Cells that cannot be read as numbers become `NaN`.
pub fn deserialize_vec<'de, D>(deserializer: D) -> Result<Option<Vec<f64>>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let values: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
	Ok(values.map(|values| {
		values
			.iter()
			.map(|value| from_value(value).unwrap_or(f64::NAN))
			.collect()
	}))
}

/// Parse a number the way the cluster writes it, including its spellings of non-finite values.
pub fn parse(value: &str) -> Option<f64> {
	match value {
		"NaN" => Some(f64::NAN),
		"Infinity" => Some(f64::INFINITY),
		"-Infinity" => Some(f64::NEG_INFINITY),
		value => value.trim().parse().ok(),
	}
}

/// Read a JSON value as a number, accepting the string spellings `parse` understands.
pub fn from_value(value: &serde_json::Value) -> Option<f64> {
	match value {
		serde_json::Value::Number(number) => number.as_f64(),
		serde_json::Value::String(string) => parse(string),
		_ => None,
	}
}

#[test]
fn test_parse() {
	assert_eq!(parse("1.5"), Some(1.5));
	assert_eq!(parse("Infinity"), Some(f64::INFINITY));
	assert_eq!(parse("-Infinity"), Some(f64::NEG_INFINITY));
	assert!(parse("NaN").unwrap().is_nan());
	assert_eq!(parse("hello"), None);
	assert_eq!(from_value(&serde_json::json!(2)), Some(2.0));
	assert_eq!(from_value(&serde_json::json!(null)), None);
}
