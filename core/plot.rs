/*!
Chart series computed from a model's outputs: the scoring history, variable importances, standardized coefficient magnitudes and partial dependence.
*/

use crate::{
	algorithm::{Algorithm, EstimatorType},
	chart::{
		range, BarChart, BarChartPoint, BarChartSeries, LineChart, LineChartPoint, LineChartSeries,
		LineStyle, PointStyle, BLUE, ORANGE,
	},
	error::Error,
	frame::Frame,
	model::ModelView,
	service::{PartialDependenceRequest, Service},
	table::Table,
};
use anyhow::Result;
use itertools::Itertools;
use std::cmp::Ordering;

/// The partial dependence of the model's response on one column.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialDependence {
	pub column: String,
	pub table: Table,
	pub chart: LineChart,
}

impl<S> ModelView<S>
where
	S: Service,
{
	/**
	Chart how the model's metrics changed over the course of training. `timestep` and `metric` choose the x and y axes, or an algorithm specific default when `None`. Returns `None` if the model has no scoring history.

	GLM models only plot against `iteration`, and only `log_likelihood` or `objective`. Tree models plot against `number_of_trees` or `duration`. Deep learning models plot against `epochs`, `samples` or `duration`.
	*/
	pub fn scoring_history_chart(
		&mut self,
		timestep: Option<&str>,
		metric: Option<&str>,
	) -> Result<Option<LineChart>> {
		let algorithm = self.algorithm()?;
		let estimator_type = self.estimator_type()?;
		match algorithm {
			Algorithm::Glm => {
				let metric = match metric {
					None => "log_likelihood",
					Some(metric) if metric == "log_likelihood" || metric == "objective" => metric,
					Some(metric) => {
						return Err(Error::InvalidArgument(format!(
							"for GLM, metric must be one of log_likelihood, objective, not {}",
							metric
						))
						.into())
					}
				};
				let history = match self.scoring_history()? {
					Some(history) => history,
					None => return Ok(None),
				};
				glm_scoring_history_chart(history, metric).map(Some)
			}
			Algorithm::Gbm | Algorithm::Drf | Algorithm::DeepLearning | Algorithm::DeepWater => {
				let (allowed, default): (&[&str], _) = match algorithm {
					Algorithm::Gbm | Algorithm::Drf => (&["duration", "number_of_trees"], "number_of_trees"),
					_ => (&["epochs", "samples", "duration"], "epochs"),
				};
				let timestep = timestep.unwrap_or(default);
				if !allowed.contains(&timestep) {
					return Err(Error::InvalidArgument(format!(
						"timestep for {} must be one of {}, not {}",
						algorithm,
						allowed.iter().join(", "),
						timestep
					))
					.into());
				}
				let metric = metric.unwrap_or(match estimator_type {
					EstimatorType::Classifier => "logloss",
					EstimatorType::Regressor | EstimatorType::Unsupervised => "rmse",
				});
				let history = match self.scoring_history()? {
					Some(history) => history,
					None => return Ok(None),
				};
				// The first row of a deep learning scoring history is recorded before any training.
				let starts_untrained = matches!(algorithm, Algorithm::DeepLearning | Algorithm::DeepWater)
					&& history
						.column_f64("samples")
						.and_then(|samples| samples.first().copied().flatten())
						== Some(0.0);
				if starts_untrained {
					let history = history.skip_rows(1);
					scoring_history_chart(&history, timestep, metric).map(Some)
				} else {
					scoring_history_chart(history, timestep, metric).map(Some)
				}
			}
			algorithm => Err(Error::UnsupportedOperation(format!(
				"scoring history charts are not implemented for {} models",
				algorithm
			))
			.into()),
		}
	}

	/// Chart the `n` most important variables, or all of them. GLM models chart their standardized coefficients instead.
	pub fn varimp_chart(&mut self, n: Option<usize>) -> Result<Option<BarChart>> {
		let algorithm = self.algorithm()?;
		match algorithm {
			Algorithm::Glm => {
				log::info!("variable importance does not apply to GLM, charting standardized coefficients instead");
				self.std_coef_chart(n)
			}
			Algorithm::Gbm | Algorithm::Drf | Algorithm::DeepLearning => {
				let importances = match self.varimp()? {
					Some(importances) => importances,
					None => return Ok(None),
				};
				let n = n.unwrap_or_else(|| importances.len());
				let data = importances
					.into_iter()
					.take(n)
					.enumerate()
					.map(|(index, importance)| BarChartPoint {
						label: importance.variable,
						x: index as f64,
						y: importance.scaled_importance,
						color: BLUE.to_owned(),
					})
					.collect();
				Ok(Some(BarChart {
					title: Some(format!("Variable Importance: {}", algorithm.display_name())),
					series: vec![BarChartSeries {
						title: Some("Scaled Importance".to_owned()),
						data,
					}],
					x_axis_title: Some("Variable".to_owned()),
					y_axis_title: Some("Scaled Importance".to_owned()),
				}))
			}
			algorithm => Err(Error::UnsupportedOperation(format!(
				"variable importance charts are not implemented for {} models",
				algorithm
			))
			.into()),
		}
	}

	/**
	Chart the magnitudes of a GLM model's standardized coefficients, largest first, leaving out the intercept. Positive coefficients are blue and negative ones orange.
	*/
	pub fn std_coef_chart(&mut self, n: Option<usize>) -> Result<Option<BarChart>> {
		if n == Some(0) {
			return Err(Error::InvalidArgument(
				"the number of coefficients to chart must be greater than 0".to_owned(),
			)
			.into());
		}
		if self.algorithm()? != Algorithm::Glm {
			return Err(Error::UnsupportedOperation(
				"standardized coefficient charts are available for GLM models only".to_owned(),
			)
			.into());
		}
		let coefficients = match self.coef_norm()? {
			Some(coefficients) => coefficients,
			None => return Ok(None),
		};
		let mut coefficients = coefficients
			.into_iter()
			.filter(|(name, _)| name != "Intercept")
			.collect::<Vec<_>>();
		coefficients.sort_by(|(_, a), (_, b)| b.abs().partial_cmp(&a.abs()).unwrap_or(Ordering::Equal));
		let n = n.unwrap_or_else(|| coefficients.len());
		let data = coefficients
			.into_iter()
			.take(n)
			.enumerate()
			.map(|(index, (name, value))| BarChartPoint {
				label: name,
				x: index as f64,
				y: Some(value.abs()),
				color: (if value >= 0.0 { BLUE } else { ORANGE }).to_owned(),
			})
			.collect();
		Ok(Some(BarChart {
			title: Some("Standardized Coefficient Magnitudes".to_owned()),
			series: vec![BarChartSeries { title: None, data }],
			x_axis_title: Some("Variable".to_owned()),
			y_axis_title: Some("Magnitude".to_owned()),
		}))
	}

	/**
	Compute the partial dependence of the response on each of `cols`, scoring `data`. Every column must exist in `data`. This is checked before anything is submitted.
	*/
	pub fn partial_plot(
		&mut self,
		data: &Frame,
		cols: &[&str],
		destination_key: Option<&str>,
		nbins: usize,
	) -> Result<Vec<PartialDependence>> {
		let id = self.model_id()?;
		let summary = data.summary(self.service())?;
		if let Some(column) = cols.iter().find(|column| summary.is_factor(column).is_none()) {
			return Err(Error::InvalidArgument(format!(
				"column {} does not exist in frame {}",
				column, data
			))
			.into());
		}
		let request = PartialDependenceRequest {
			model_id: id,
			frame_id: data.id().to_owned(),
			cols: cols.iter().map(|column| column.to_string()).collect(),
			nbins,
			destination_key: destination_key.map(str::to_owned),
		};
		let document = self.service().submit_partial_dependence(&request)?;
		let mut job = self.job(document, "PartialDependencePlot");
		job.poll(self.service())?;
		let dest = job.dest_key().ok_or_else(|| {
			Error::NotAvailable(format!("job {} did not produce partial dependence", job.key()))
		})?;
		let tables = self.service().fetch_partial_dependence(dest)?;
		if tables.len() < cols.len() {
			let missing = cols[tables.len()..].join(", ");
			return Err(Error::NotAvailable(format!(
				"partial dependence {} has no table for {}",
				dest, missing
			))
			.into());
		}
		cols.iter()
			.zip(tables)
			.map(|(column, table)| {
				let categorical = summary.is_factor(column).unwrap_or(false);
				let chart = partial_dependence_chart(column, &table, categorical)?;
				Ok(PartialDependence {
					column: column.to_string(),
					table,
					chart,
				})
			})
			.collect()
	}
}

fn glm_scoring_history_chart(history: &Table, metric: &str) -> Result<LineChart> {
	let timestep = "iteration";
	let x = required_column(history, timestep)?;
	let y = required_column(history, metric)?;
	Ok(LineChart {
		title: Some("Validation Scoring History".to_owned()),
		series: vec![line_series(None, BLUE, &x, &y)],
		x_axis_title: Some(timestep.to_owned()),
		y_axis_title: Some(metric.to_owned()),
		x_axis_labels: None,
		x_min: None,
		x_max: None,
		y_min: None,
		y_max: None,
	})
}

fn scoring_history_chart(history: &Table, timestep: &str, metric: &str) -> Result<LineChart> {
	let training_metric = format!("training_{}", metric);
	let validation_metric = format!("validation_{}", metric);
	let (x_axis_title, x) = if timestep == "duration" {
		parse_durations(history)?
	} else {
		(timestep.to_owned(), required_column(history, timestep)?)
	};
	let training = required_column(history, &training_metric)?;
	let validation = history.column_f64(&validation_metric);
	let y_values = training
		.iter()
		.chain(validation.iter().flatten())
		.filter_map(|value| *value);
	let (y_min, y_max) = match range(y_values) {
		Some((min, max)) if min == max => (Some(0.0), Some(1.0)),
		Some((min, max)) => (Some(min), Some(max)),
		None => (None, None),
	};
	let (title, y_axis_title, series) = match validation {
		Some(validation) => (
			"Scoring History",
			metric.to_owned(),
			vec![
				line_series(Some("Training"), BLUE, &x, &training),
				line_series(Some("Validation"), ORANGE, &x, &validation),
			],
		),
		None => (
			"Training Scoring History",
			training_metric,
			vec![line_series(None, BLUE, &x, &training)],
		),
	};
	Ok(LineChart {
		title: Some(title.to_owned()),
		series,
		x_axis_title: Some(x_axis_title),
		y_axis_title: Some(y_axis_title),
		x_axis_labels: None,
		x_min: None,
		x_max: None,
		y_min,
		y_max,
	})
}

/// Durations are reported as `"<value> <unit>"`. The unit is read from the second row, since the first may be a placeholder.
fn parse_durations(history: &Table) -> Result<(String, Vec<Option<f64>>)> {
	let cells = history
		.column_str("duration")
		.ok_or_else(|| Error::InvalidArgument("the scoring history has no duration column".to_owned()))?;
	let unit = cells
		.get(1)
		.or_else(|| cells.first())
		.copied()
		.flatten()
		.and_then(|cell| cell.split_whitespace().nth(1))
		.unwrap_or("sec");
	let values = cells
		.iter()
		.map(|cell| {
			cell.and_then(|cell| cell.split_whitespace().next())
				.and_then(remodel_metrics::number::parse)
		})
		.collect();
	Ok((format!("duration_{}", unit), values))
}

fn required_column(table: &Table, name: &str) -> Result<Vec<Option<f64>>> {
	table.column_f64(name).ok_or_else(|| {
		Error::InvalidArgument(format!("the scoring history has no {} column", name)).into()
	})
}

fn line_series(title: Option<&str>, color: &str, x: &[Option<f64>], y: &[Option<f64>]) -> LineChartSeries {
	let data = x
		.iter()
		.zip(y.iter())
		.filter_map(|(x, y)| {
			let x = (*x)?;
			Some(LineChartPoint {
				x,
				y: y.filter(|y| y.is_finite()),
			})
		})
		.collect();
	LineChartSeries {
		color: color.to_owned(),
		data,
		line_style: Some(LineStyle::Solid),
		point_style: None,
		title: title.map(str::to_owned),
	}
}

fn partial_dependence_chart(column: &str, table: &Table, categorical: bool) -> Result<LineChart> {
	let header = table.header();
	let (x_name, y_name) = match header.as_slice() {
		[x_name, y_name, ..] => (*x_name, *y_name),
		_ => {
			return Err(Error::NotAvailable(format!(
				"the partial dependence table for {} has fewer than two columns",
				column
			))
			.into())
		}
	};
	let y = table.column_f64(y_name).unwrap_or_default();
	let mut chart = LineChart {
		title: Some(format!("Partial Dependence Plot For {}", column)),
		series: Vec::new(),
		x_axis_title: Some(x_name.to_owned()),
		y_axis_title: Some(y_name.to_owned()),
		x_axis_labels: None,
		x_min: None,
		x_max: None,
		y_min: None,
		y_max: None,
	};
	if categorical {
		let labels = table
			.column(x_name)
			.unwrap_or_default()
			.into_iter()
			.map(|value| match value {
				serde_json::Value::String(label) => label.clone(),
				value => value.to_string(),
			})
			.collect::<Vec<_>>();
		let x = (0..labels.len()).map(|index| Some(index as f64)).collect::<Vec<_>>();
		let mut series = line_series(None, BLUE, &x, &y);
		series.line_style = Some(LineStyle::Hidden);
		series.point_style = Some(PointStyle::Circle);
		chart.series.push(series);
		chart.x_axis_labels = Some(labels);
	} else {
		let x = table.column_f64(x_name).unwrap_or_default();
		chart.series.push(line_series(None, BLUE, &x, &y));
		if let Some((x_min, x_max)) = chart.compute_x_range() {
			chart.x_min = Some(x_min);
			chart.x_max = Some(x_max);
		}
	}
	Ok(chart)
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::{
		job::JobStatus,
		mock::{
			deeplearning_regressor, frame_summary, gbm_classifier, gbm_regressor, glm_regressor,
			job_document, kmeans, MockService,
		},
	};
	use std::time::Duration;

	fn points(series: &LineChartSeries) -> Vec<(f64, Option<f64>)> {
		series.data.iter().map(|point| (point.x, point.y)).collect()
	}

	#[test]
	fn test_gbm_scoring_history() {
		let service = MockService::with_model(gbm_regressor("modelA"));
		let mut model = ModelView::fetch(&service, "modelA").unwrap();
		let chart = model.scoring_history_chart(None, None).unwrap().unwrap();
		assert_eq!(chart.title.as_deref(), Some("Scoring History"));
		assert_eq!(chart.x_axis_title.as_deref(), Some("number_of_trees"));
		assert_eq!(chart.y_axis_title.as_deref(), Some("rmse"));
		assert_eq!(chart.series.len(), 2);
		assert_eq!(
			points(&chart.series[0]),
			vec![(0.0, None), (1.0, Some(1.5)), (2.0, Some(1.0))]
		);
		assert_eq!(chart.series[1].color, ORANGE);
		assert_eq!((chart.y_min, chart.y_max), (Some(1.0), Some(1.75)));
	}

	#[test]
	fn test_duration_timestep() {
		let service = MockService::with_model(gbm_regressor("modelA"));
		let mut model = ModelView::fetch(&service, "modelA").unwrap();
		let chart = model
			.scoring_history_chart(Some("duration"), None)
			.unwrap()
			.unwrap();
		assert_eq!(chart.x_axis_title.as_deref(), Some("duration_sec"));
		let xs = chart.series[0].data.iter().map(|point| point.x).collect::<Vec<_>>();
		assert_eq!(xs, vec![0.0, 0.12, 0.25]);
	}

	#[test]
	fn test_classifier_defaults_to_logloss() {
		let service = MockService::with_model(gbm_classifier("modelB"));
		let mut model = ModelView::fetch(&service, "modelB").unwrap();
		let chart = model.scoring_history_chart(None, None).unwrap().unwrap();
		assert_eq!(chart.title.as_deref(), Some("Training Scoring History"));
		assert_eq!(chart.y_axis_title.as_deref(), Some("training_logloss"));
		assert_eq!(chart.series.len(), 1);
	}

	#[test]
	fn test_deeplearning_drops_untrained_row() {
		let service = MockService::with_model(deeplearning_regressor("dl"));
		let mut model = ModelView::fetch(&service, "dl").unwrap();
		let chart = model.scoring_history_chart(None, None).unwrap().unwrap();
		assert_eq!(chart.x_axis_title.as_deref(), Some("epochs"));
		assert_eq!(
			points(&chart.series[0]),
			vec![(1.0, Some(2.0)), (2.0, Some(2.0))]
		);
		assert_eq!((chart.y_min, chart.y_max), (Some(0.0), Some(1.0)));
		let error = model
			.scoring_history_chart(Some("number_of_trees"), None)
			.unwrap_err();
		assert!(matches!(
			error.downcast_ref::<Error>(),
			Some(Error::InvalidArgument(_))
		));
	}

	#[test]
	fn test_glm_scoring_history() {
		let service = MockService::with_model(glm_regressor("glm"));
		let mut model = ModelView::fetch(&service, "glm").unwrap();
		let chart = model
			.scoring_history_chart(Some("duration"), None)
			.unwrap()
			.unwrap();
		assert_eq!(chart.title.as_deref(), Some("Validation Scoring History"));
		assert_eq!(chart.x_axis_title.as_deref(), Some("iteration"));
		assert_eq!(chart.y_axis_title.as_deref(), Some("log_likelihood"));
		assert_eq!(
			points(&chart.series[0]),
			vec![(0.0, Some(90.0)), (1.0, Some(60.0)), (2.0, Some(55.0))]
		);
		let chart = model
			.scoring_history_chart(None, Some("objective"))
			.unwrap()
			.unwrap();
		assert_eq!(chart.y_axis_title.as_deref(), Some("objective"));
		let error = model.scoring_history_chart(None, Some("rmse")).unwrap_err();
		assert_eq!(
			error.to_string(),
			"invalid argument: for GLM, metric must be one of log_likelihood, objective, not rmse"
		);
	}

	#[test]
	fn test_unsupported_algorithm() {
		let service = MockService::with_model(kmeans("km"));
		let mut model = ModelView::fetch(&service, "km").unwrap();
		for error in vec![
			model.scoring_history_chart(None, None).unwrap_err(),
			model.varimp_chart(None).unwrap_err(),
			model.std_coef_chart(None).unwrap_err(),
		] {
			assert!(matches!(
				error.downcast_ref::<Error>(),
				Some(Error::UnsupportedOperation(_))
			));
		}
	}

	#[test]
	fn test_varimp_chart() {
		let service = MockService::with_model(gbm_regressor("modelA"));
		let mut model = ModelView::fetch(&service, "modelA").unwrap();
		let chart = model.varimp_chart(Some(1)).unwrap().unwrap();
		assert_eq!(chart.title.as_deref(), Some("Variable Importance: GBM"));
		assert_eq!(
			chart.series[0].data,
			vec![BarChartPoint {
				label: "x1".to_owned(),
				x: 0.0,
				y: Some(1.0),
				color: BLUE.to_owned(),
			}]
		);
	}

	#[test]
	fn test_std_coef_chart() {
		let service = MockService::with_model(glm_regressor("glm"));
		let mut model = ModelView::fetch(&service, "glm").unwrap();
		let chart = model.varimp_chart(None).unwrap().unwrap();
		let bars = chart.series[0]
			.data
			.iter()
			.map(|point| (point.label.as_str(), point.y, point.color.as_str()))
			.collect::<Vec<_>>();
		assert_eq!(
			bars,
			vec![
				("x2", Some(1.25), ORANGE),
				("x1", Some(0.75), BLUE),
				("x3", Some(0.25), BLUE),
			]
		);
		assert_eq!(model.std_coef_chart(Some(2)).unwrap().unwrap().series[0].data.len(), 2);
		let error = model.std_coef_chart(Some(0)).unwrap_err();
		assert!(matches!(
			error.downcast_ref::<Error>(),
			Some(Error::InvalidArgument(_))
		));
	}

	#[test]
	fn test_partial_plot_checks_columns_first() {
		let service = MockService::with_model(gbm_regressor("modelA"));
		service.insert_frame(frame_summary("test.hex", &[("x1", "real"), ("x2", "enum")]));
		let mut model = ModelView::fetch(&service, "modelA").unwrap();
		let error = model
			.partial_plot(&Frame::new("test.hex"), &["x1", "x9"], None, 20)
			.unwrap_err();
		assert_eq!(
			error.to_string(),
			"invalid argument: column x9 does not exist in frame test.hex"
		);
		assert_eq!(
			service.calls(),
			vec!["fetch_model modelA", "fetch_frame test.hex"]
		);
	}

	#[test]
	fn test_partial_plot_missing_table() {
		let service = MockService::with_model(gbm_regressor("modelA"));
		service.insert_frame(frame_summary("test.hex", &[("x1", "real"), ("x2", "enum")]));
		let tables: Vec<Table> = serde_json::from_value(serde_json::json!([
			{
				"name": "PartialDependence",
				"columns": [
					{ "name": "x1", "type": "double" },
					{ "name": "mean_response", "type": "double" },
				],
				"rowcount": 2,
				"data": [[1.0, 2.0], [0.5, 0.75]],
			},
		]))
		.unwrap();
		service.set_partial_dependence(
			job_document("job_4", "pdp_1", JobStatus::Done, 1.0),
			tables,
		);
		let mut model = ModelView::fetch(&service, "modelA")
			.unwrap()
			.with_poll_interval(Duration::from_millis(0));
		let error = model
			.partial_plot(&Frame::new("test.hex"), &["x1", "x2"], None, 20)
			.unwrap_err();
		assert_eq!(
			error.to_string(),
			"not available: partial dependence pdp_1 has no table for x2"
		);
	}

	#[test]
	fn test_partial_plot() {
		let service = MockService::with_model(gbm_regressor("modelA"));
		service.insert_frame(frame_summary("test.hex", &[("x1", "real"), ("x2", "enum")]));
		let tables: Vec<Table> = serde_json::from_value(serde_json::json!([
			{
				"name": "PartialDependence",
				"columns": [
					{ "name": "x1", "type": "double" },
					{ "name": "mean_response", "type": "double" },
				],
				"rowcount": 3,
				"data": [[1.0, 2.0, 3.0], [0.5, 0.75, 0.7]],
			},
			{
				"name": "PartialDependence",
				"columns": [
					{ "name": "x2", "type": "string" },
					{ "name": "mean_response", "type": "double" },
				],
				"rowcount": 2,
				"data": [["a", "b"], [0.2, 0.4]],
			},
		]))
		.unwrap();
		service.set_partial_dependence(
			job_document("job_4", "pdp_1", JobStatus::Done, 1.0),
			tables,
		);
		let mut model = ModelView::fetch(&service, "modelA")
			.unwrap()
			.with_poll_interval(Duration::from_millis(0));
		let plots = model
			.partial_plot(&Frame::new("test.hex"), &["x1", "x2"], None, 20)
			.unwrap();
		assert_eq!(plots.len(), 2);
		let numeric = &plots[0].chart;
		assert_eq!(numeric.title.as_deref(), Some("Partial Dependence Plot For x1"));
		assert_eq!(numeric.y_axis_title.as_deref(), Some("mean_response"));
		assert_eq!((numeric.x_min, numeric.x_max), (Some(1.0), Some(3.0)));
		let categorical = &plots[1].chart;
		assert_eq!(
			categorical.x_axis_labels,
			Some(vec!["a".to_owned(), "b".to_owned()])
		);
		assert_eq!(
			points(&categorical.series[0]),
			vec![(0.0, Some(0.2)), (1.0, Some(0.4))]
		);
		assert_eq!(
			service.calls()[2..],
			[
				"submit_partial_dependence modelA test.hex x1,x2".to_owned(),
				"fetch_partial_dependence pdp_1".to_owned(),
			]
		);
	}
}
