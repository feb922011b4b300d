/*!
Chart options produced from a model's outputs. Nothing here draws. A renderer receives these records and decides how to present them.
*/

pub const BLUE: &str = "#1F77B4";
pub const ORANGE: &str = "#FF7F0E";

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct LineChart {
	pub title: Option<String>,
	pub series: Vec<LineChartSeries>,
	pub x_axis_title: Option<String>,
	pub y_axis_title: Option<String>,
	/// Labels for the points of categorical x axes, indexed by x.
	pub x_axis_labels: Option<Vec<String>>,
	pub x_min: Option<f64>,
	pub x_max: Option<f64>,
	pub y_min: Option<f64>,
	pub y_max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct LineChartSeries {
	pub color: String,
	pub data: Vec<LineChartPoint>,
	pub line_style: Option<LineStyle>,
	pub point_style: Option<PointStyle>,
	pub title: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct LineChartPoint {
	pub x: f64,
	pub y: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub enum LineStyle {
	#[serde(rename = "hidden")]
	Hidden,
	#[serde(rename = "solid")]
	Solid,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub enum PointStyle {
	#[serde(rename = "circle")]
	Circle,
}

/// A horizontal bar chart. Bars are listed largest first.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BarChart {
	pub title: Option<String>,
	pub series: Vec<BarChartSeries>,
	pub x_axis_title: Option<String>,
	pub y_axis_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BarChartSeries {
	pub title: Option<String>,
	pub data: Vec<BarChartPoint>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BarChartPoint {
	pub label: String,
	pub x: f64,
	pub y: Option<f64>,
	pub color: String,
}

impl LineChart {
	/// The x range covered by the chart's series, ignoring missing points.
	pub fn compute_x_range(&self) -> Option<(f64, f64)> {
		range(
			self.series
				.iter()
				.flat_map(|series| series.data.iter().map(|point| point.x)),
		)
	}
}

/// The smallest and largest finite values in `values`.
pub fn range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
	values
		.into_iter()
		.filter(|value| value.is_finite())
		.fold(None, |range, value| match range {
			None => Some((value, value)),
			Some((min, max)) => Some((f64::min(min, value), f64::max(max, value))),
		})
}

#[test]
fn test_range() {
	assert_eq!(range(vec![3.0, f64::NAN, 1.0, 2.0]), Some((1.0, 3.0)));
	assert_eq!(range(vec![f64::NAN]), None);
	assert_eq!(range(Vec::new()), None);
}
