use crate::{document::KeyRef, service::Service};
use anyhow::Result;

/// A handle to a dataset on the cluster. It is only an id. Call `summary` to learn its shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
	id: String,
}

impl Frame {
	pub fn new(id: impl Into<String>) -> Self {
		Frame { id: id.into() }
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn summary<S>(&self, service: &S) -> Result<FrameSummary>
	where
		S: Service + ?Sized,
	{
		service.fetch_frame(&self.id)
	}
}

impl std::fmt::Display for Frame {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.id)
	}
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct FramesResponse {
	pub frames: Vec<FrameSummary>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct FrameSummary {
	pub frame_id: KeyRef,
	pub rows: u64,
	#[serde(default)]
	pub columns: Vec<FrameColumn>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct FrameColumn {
	pub label: String,
	#[serde(rename = "type")]
	pub kind: String,
}

impl FrameSummary {
	pub fn row_count(&self) -> u64 {
		self.rows
	}

	pub fn column_names(&self) -> Vec<&str> {
		self.columns.iter().map(|column| column.label.as_str()).collect()
	}

	/// Whether the column named `name` holds categorical values, or `None` if there is no such column.
	pub fn is_factor(&self, name: &str) -> Option<bool> {
		self.columns
			.iter()
			.find(|column| column.label == name)
			.map(|column| column.kind == "enum")
	}
}

#[test]
fn test_summary() {
	let summary: FrameSummary = serde_json::from_value(serde_json::json!({
		"frame_id": { "name": "iris.hex" },
		"rows": 150,
		"columns": [
			{ "label": "sepal_len", "type": "real" },
			{ "label": "class", "type": "enum" },
		],
	}))
	.unwrap();
	assert_eq!(summary.row_count(), 150);
	assert_eq!(summary.column_names(), vec!["sepal_len", "class"]);
	assert_eq!(summary.is_factor("class"), Some(true));
	assert_eq!(summary.is_factor("sepal_len"), Some(false));
	assert_eq!(summary.is_factor("petal_len"), None);
}
