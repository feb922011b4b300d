/*!
An in-memory [`Service`](../service/trait.Service.html) for tests. It records every call it receives so tests can assert what was sent, and in what order.
*/

use crate::{
	document::{KeyRef, ModelDocument},
	error::Error,
	frame::FrameSummary,
	job::{JobDocument, JobStatus},
	service::{PartialDependenceRequest, PredictionKind, RemoteFile, Service, Submission},
	table::Table,
};
use anyhow::Result;
use remodel_metrics::Metrics;
use serde_json::json;
use std::{
	cell::RefCell,
	collections::{BTreeMap, VecDeque},
};

#[derive(Default)]
pub struct MockService {
	state: RefCell<MockState>,
}

#[derive(Default)]
struct MockState {
	models: BTreeMap<String, ModelDocument>,
	jobs: BTreeMap<String, VecDeque<JobDocument>>,
	frames: BTreeMap<String, FrameSummary>,
	submission: Option<Submission>,
	metrics: Vec<Metrics>,
	partial_dependence_job: Option<JobDocument>,
	partial_dependence: Vec<Table>,
	files: BTreeMap<String, RemoteFile>,
	fail_rename: bool,
	fail_fetch_model: bool,
	calls: Vec<String>,
}

fn not_found(what: &str, id: &str) -> anyhow::Error {
	Error::RemoteFailure {
		status: 404,
		message: format!("{} {} not found", what, id),
	}
	.into()
}

impl MockService {
	pub fn with_model(document: ModelDocument) -> Self {
		let service = MockService::default();
		service.insert_model(document);
		service
	}

	pub fn insert_model(&self, document: ModelDocument) {
		let id = document.model_id.name.clone();
		self.state.borrow_mut().models.insert(id, document);
	}

	pub fn has_model(&self, id: &str) -> bool {
		self.state.borrow().models.contains_key(id)
	}

	/// Queue the documents successive `fetch_job` calls return. The last one repeats.
	pub fn script_job(&self, key: &str, documents: Vec<JobDocument>) {
		self.state
			.borrow_mut()
			.jobs
			.insert(key.to_owned(), documents.into_iter().collect());
	}

	pub fn insert_frame(&self, summary: FrameSummary) {
		let id = summary.frame_id.name.clone();
		self.state.borrow_mut().frames.insert(id, summary);
	}

	pub fn set_submission(&self, submission: Submission) {
		self.state.borrow_mut().submission = Some(submission);
	}

	pub fn set_metrics(&self, metrics: Vec<Metrics>) {
		self.state.borrow_mut().metrics = metrics;
	}

	pub fn set_partial_dependence(&self, job: JobDocument, tables: Vec<Table>) {
		let mut state = self.state.borrow_mut();
		state.partial_dependence_job = Some(job);
		state.partial_dependence = tables;
	}

	pub fn insert_file(&self, path: &str, file: RemoteFile) {
		self.state.borrow_mut().files.insert(path.to_owned(), file);
	}

	pub fn fail_rename(&self) {
		self.state.borrow_mut().fail_rename = true;
	}

	pub fn fail_fetch_model(&self) {
		self.state.borrow_mut().fail_fetch_model = true;
	}

	pub fn calls(&self) -> Vec<String> {
		self.state.borrow().calls.clone()
	}

	fn record(&self, call: String) {
		self.state.borrow_mut().calls.push(call);
	}
}

impl Service for MockService {
	fn rename(&self, old_id: &str, new_id: &str) -> Result<()> {
		self.record(format!("rename {} {}", old_id, new_id));
		let mut state = self.state.borrow_mut();
		if state.fail_rename {
			return Err(Error::RemoteFailure {
				status: 500,
				message: "rename rejected".to_owned(),
			}
			.into());
		}
		let mut document = state
			.models
			.remove(old_id)
			.ok_or_else(|| not_found("model", old_id))?;
		document.model_id = KeyRef::new(new_id);
		state.models.insert(new_id.to_owned(), document);
		Ok(())
	}

	fn fetch_model(&self, model_id: &str) -> Result<ModelDocument> {
		self.record(format!("fetch_model {}", model_id));
		let state = self.state.borrow();
		if state.fail_fetch_model {
			return Err(Error::RemoteFailure {
				status: 503,
				message: "cluster is busy".to_owned(),
			}
			.into());
		}
		state
			.models
			.get(model_id)
			.cloned()
			.ok_or_else(|| not_found("model", model_id))
	}

	fn delete_model(&self, model_id: &str) -> Result<()> {
		self.record(format!("delete_model {}", model_id));
		self.state
			.borrow_mut()
			.models
			.remove(model_id)
			.map(|_| ())
			.ok_or_else(|| not_found("model", model_id))
	}

	fn fetch_job(&self, job_key: &str) -> Result<JobDocument> {
		self.record(format!("fetch_job {}", job_key));
		let mut state = self.state.borrow_mut();
		let documents = state
			.jobs
			.get_mut(job_key)
			.ok_or_else(|| not_found("job", job_key))?;
		let document = if documents.len() > 1 {
			documents.pop_front()
		} else {
			documents.front().cloned()
		};
		document.ok_or_else(|| not_found("job", job_key))
	}

	fn fetch_frame(&self, frame_id: &str) -> Result<FrameSummary> {
		self.record(format!("fetch_frame {}", frame_id));
		self.state
			.borrow()
			.frames
			.get(frame_id)
			.cloned()
			.ok_or_else(|| not_found("frame", frame_id))
	}

	fn submit_prediction(
		&self,
		model_id: &str,
		frame_id: &str,
		kind: &PredictionKind,
	) -> Result<Submission> {
		self.record(format!("submit_prediction {} {} {:?}", model_id, frame_id, kind));
		self.state
			.borrow()
			.submission
			.clone()
			.ok_or_else(|| not_found("model", model_id))
	}

	fn submit_metrics(&self, model_id: &str, frame_id: &str) -> Result<Vec<Metrics>> {
		self.record(format!("submit_metrics {} {}", model_id, frame_id));
		Ok(self.state.borrow().metrics.clone())
	}

	fn submit_partial_dependence(&self, request: &PartialDependenceRequest) -> Result<JobDocument> {
		self.record(format!(
			"submit_partial_dependence {} {} {}",
			request.model_id,
			request.frame_id,
			request.cols.join(",")
		));
		self.state
			.borrow()
			.partial_dependence_job
			.clone()
			.ok_or_else(|| not_found("model", &request.model_id))
	}

	fn fetch_partial_dependence(&self, key: &str) -> Result<Vec<Table>> {
		self.record(format!("fetch_partial_dependence {}", key));
		Ok(self.state.borrow().partial_dependence.clone())
	}

	fn fetch_file(&self, path: &str) -> Result<RemoteFile> {
		self.record(format!("fetch_file {}", path));
		self.state
			.borrow()
			.files
			.get(path)
			.cloned()
			.ok_or_else(|| not_found("file", path))
	}
}

pub fn job_document(key: &str, dest: &str, status: JobStatus, progress: f64) -> JobDocument {
	JobDocument {
		key: KeyRef::new(key),
		dest: Some(KeyRef::new(dest)),
		status,
		progress,
		progress_msg: None,
		exception: None,
		description: None,
	}
}

pub fn frame_summary(id: &str, columns: &[(&str, &str)]) -> FrameSummary {
	let columns = columns
		.iter()
		.map(|(label, kind)| json!({ "label": label, "type": kind }))
		.collect::<Vec<_>>();
	serde_json::from_value(json!({
		"frame_id": { "name": id },
		"rows": 100,
		"columns": columns,
	}))
	.unwrap()
}

fn parameters(id: &str) -> serde_json::Value {
	json!([
		{
			"name": "model_id",
			"default_value": null,
			"actual_value": { "name": id, "type": "Key<Model>" },
		},
		{
			"name": "training_frame",
			"default_value": null,
			"actual_value": { "name": "train.hex", "type": "Key<Frame>" },
		},
		{
			"name": "response_column",
			"default_value": null,
			"actual_value": { "column_name": "y" },
		},
		{
			"name": "seed",
			"default_value": -1,
			"actual_value": 42,
		},
	])
}

/// A gbm regressor with training and validation metrics, a scoring history and variable importances.
pub fn gbm_regressor(id: &str) -> ModelDocument {
	serde_json::from_value(json!({
		"model_id": { "name": id },
		"algo": "gbm",
		"algo_full_name": "Gradient Boosting Machine",
		"parameters": parameters(id),
		"output": {
			"model_category": "Regression",
			"names": ["x1", "x2", "y"],
			"training_metrics": {
				"model_category": "Regression",
				"frame": { "name": "train.hex" },
				"MSE": 0.5,
				"RMSE": 0.7,
				"mae": 0.4,
				"rmsle": 0.1,
				"r2": 0.9,
				"mean_residual_deviance": 0.5,
				"residual_deviance": 50.0,
				"null_deviance": 120.0,
				"residual_degrees_of_freedom": 98,
				"null_degrees_of_freedom": 99,
			},
			"validation_metrics": {
				"model_category": "Regression",
				"frame": { "name": "valid.hex" },
				"MSE": 0.75,
				"RMSE": 0.86,
				"r2": 0.8,
				"residual_deviance": 70.0,
			},
			"cross_validation_metrics": null,
			"model_summary": {
				"name": "Model Summary",
				"columns": [
					{ "name": "number_of_trees", "type": "int" },
					{ "name": "max_depth", "type": "int" },
				],
				"rowcount": 1,
				"data": [[3], [5]],
			},
			"scoring_history": {
				"name": "Scoring History",
				"columns": [
					{ "name": "duration", "type": "string" },
					{ "name": "number_of_trees", "type": "long" },
					{ "name": "training_rmse", "type": "double" },
					{ "name": "validation_rmse", "type": "double" },
				],
				"rowcount": 3,
				"data": [
					["0.000 sec", "0.120 sec", "0.250 sec"],
					[0, 1, 2],
					["NaN", 1.5, 1.0],
					["NaN", 1.75, 1.25],
				],
			},
			"variable_importances": {
				"name": "Variable Importances",
				"columns": [
					{ "name": "variable", "type": "string" },
					{ "name": "relative_importance", "type": "double" },
					{ "name": "scaled_importance", "type": "double" },
					{ "name": "percentage", "type": "double" },
				],
				"rowcount": 2,
				"data": [
					["x1", "x2"],
					[40.0, 10.0],
					[1.0, 0.25],
					[0.8, 0.2],
				],
			},
		},
	}))
	.unwrap()
}

/// A gbm classifier with training metrics only.
pub fn gbm_classifier(id: &str) -> ModelDocument {
	serde_json::from_value(json!({
		"model_id": { "name": id },
		"algo": "gbm",
		"algo_full_name": "Gradient Boosting Machine",
		"parameters": parameters(id),
		"output": {
			"model_category": "Binomial",
			"training_metrics": {
				"model_category": "Binomial",
				"MSE": 0.1,
				"logloss": 0.3,
				"AUC": 0.95,
				"Gini": 0.9,
				"mean_per_class_error": 0.05,
				"domain": ["no", "yes"],
			},
			"scoring_history": {
				"name": "Scoring History",
				"columns": [
					{ "name": "number_of_trees", "type": "long" },
					{ "name": "training_logloss", "type": "double" },
				],
				"rowcount": 2,
				"data": [[1, 2], [0.6, 0.4]],
			},
		},
	}))
	.unwrap()
}

/// A glm regressor with a coefficients table.
pub fn glm_regressor(id: &str) -> ModelDocument {
	serde_json::from_value(json!({
		"model_id": { "name": id },
		"algo": "glm",
		"algo_full_name": "Generalized Linear Modeling",
		"parameters": parameters(id),
		"output": {
			"model_category": "Regression",
			"training_metrics": {
				"model_category": "Regression",
				"MSE": 2.0,
				"AIC": 310.5,
				"residual_deviance": 200.0,
				"null_deviance": 400.0,
				"residual_degrees_of_freedom": 97,
				"null_degrees_of_freedom": 99,
			},
			"coefficients_table": {
				"name": "Coefficients",
				"columns": [
					{ "name": "names", "type": "string" },
					{ "name": "coefficients", "type": "double" },
					{ "name": "standardized_coefficients", "type": "double" },
				],
				"rowcount": 4,
				"data": [
					["Intercept", "x1", "x2", "x3"],
					[1.5, 2.0, -3.0, 0.5],
					[4.0, 0.75, -1.25, 0.25],
				],
			},
			"scoring_history": {
				"name": "Scoring History",
				"columns": [
					{ "name": "iteration", "type": "int" },
					{ "name": "log_likelihood", "type": "double" },
					{ "name": "objective", "type": "double" },
				],
				"rowcount": 3,
				"data": [[0, 1, 2], [90.0, 60.0, 55.0], [0.9, 0.6, 0.55]],
			},
		},
	}))
	.unwrap()
}

/// A deep learning regressor with weight and bias frames, normalization vectors and cross-validation outputs.
pub fn deeplearning_regressor(id: &str) -> ModelDocument {
	serde_json::from_value(json!({
		"model_id": { "name": id },
		"algo": "deeplearning",
		"algo_full_name": "Deep Learning",
		"parameters": parameters(id),
		"output": {
			"model_category": "Regression",
			"training_metrics": { "model_category": "Regression", "MSE": 1.0 },
			"cross_validation_metrics": { "model_category": "Regression", "MSE": 1.5 },
			"weights": [
				{ "name": "w0", "URL": "/3/Frames/dl_weights_0" },
				{ "name": "w1", "URL": "/3/Frames/dl_weights_1" },
			],
			"biases": [
				{ "name": "b0", "URL": "/3/Frames/dl_biases_0" },
				{ "name": "b1", "URL": "/3/Frames/dl_biases_1" },
			],
			"normmul": [0.5, "NaN"],
			"normsub": [1.0, 2.0],
			"normrespmul": [0.1],
			"normrespsub": [10.0],
			"catoffsets": [0, 3],
			"cross_validation_models": [{ "name": format!("{}_cv_1", id) }, { "name": format!("{}_cv_2", id) }],
			"cross_validation_predictions": [{ "name": "prediction_cv_1" }, { "name": "prediction_cv_2" }],
			"cross_validation_holdout_predictions_frame_id": { "name": "holdout_predictions" },
			"cross_validation_fold_assignment_frame_id": null,
			"scoring_history": {
				"name": "Scoring History",
				"columns": [
					{ "name": "duration", "type": "string" },
					{ "name": "epochs", "type": "double" },
					{ "name": "samples", "type": "double" },
					{ "name": "training_rmse", "type": "double" },
				],
				"rowcount": 3,
				"data": [
					["0.000 sec", "1.500 sec", "3.000 sec"],
					[0.0, 1.0, 2.0],
					[0.0, 100.0, 200.0],
					["NaN", 2.0, 2.0],
				],
			},
		},
	}))
	.unwrap()
}

/// A kmeans model, which reports clustering metrics and has no plots.
pub fn kmeans(id: &str) -> ModelDocument {
	serde_json::from_value(json!({
		"model_id": { "name": id },
		"algo": "kmeans",
		"algo_full_name": "K-means",
		"parameters": parameters(id),
		"output": {
			"model_category": "Clustering",
			"training_metrics": {
				"model_category": "Clustering",
				"MSE": 3.0,
				"tot_withinss": 12.0,
				"betweenss": 30.0,
				"totss": 42.0,
			},
		},
	}))
	.unwrap()
}
