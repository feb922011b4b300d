/*!
This module defines `ModelView`, a handle to a model living on the cluster.

A view is in one of four states. It starts `NotTrained`, or `Pending` when it is built from a training job, and becomes `Ready` once a complete snapshot of the model's document has been fetched. Deleting the model leaves the view `Removed`. Every read except [`show`](struct.ModelView.html#method.show) waits for a pending job to finish before answering.
*/

use crate::{
	algorithm::{Algorithm, EstimatorType},
	document::ModelDocument,
	error::Error,
	frame::Frame,
	job::{Job, JobDocument},
	params::{ParameterValues, Parameters},
	select::{metric_value, single_role_value, RoleValue, Roles},
	service::Service,
	table::Table,
};
use anyhow::Result;
use remodel_metrics::{Metrics, Role, Statistic};
use serde_json::Value;
use std::{collections::BTreeMap, fmt::Write, time::Duration};

pub struct ModelView<S> {
	service: S,
	id: Option<String>,
	state: State,
	poll_interval: Option<Duration>,
}

enum State {
	NotTrained,
	Pending(Job),
	Ready(Box<Snapshot>),
	Removed,
}

/// One complete fetch of a model's document, with the parameters derived from it.
pub(crate) struct Snapshot {
	pub document: ModelDocument,
	pub parameters: Parameters,
}

impl Snapshot {
	fn new(document: ModelDocument) -> Self {
		let parameters = Parameters::from_specs(&document.parameters);
		Snapshot {
			document,
			parameters,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
	NotTrained,
	Pending,
	Ready,
	Removed,
}

/// What [`ModelView::show`](struct.ModelView.html#method.show) reports.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
	NotTrained,
	Removed,
	Pending {
		key: String,
		status: crate::job::JobStatus,
		progress: f64,
	},
	Details(String),
}

impl std::fmt::Display for Report {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Report::NotTrained => write!(f, "No model trained yet"),
			Report::Removed => write!(f, "This model has been removed."),
			Report::Pending {
				key,
				status,
				progress,
			} => write!(
				f,
				"Job {} is {} ({:.0}%), the model is not ready yet",
				key,
				status,
				progress * 100.0
			),
			Report::Details(details) => write!(f, "{}", details),
		}
	}
}

/// One row of a model's variable importances.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct VariableImportance {
	pub variable: String,
	pub relative_importance: Option<f64>,
	pub scaled_importance: Option<f64>,
	pub percentage: Option<f64>,
}

impl<S> ModelView<S>
where
	S: Service,
{
	pub fn new(service: S) -> Self {
		ModelView {
			service,
			id: None,
			state: State::NotTrained,
			poll_interval: None,
		}
	}

	/// Fetch the model named `id`.
	pub fn fetch(service: S, id: &str) -> Result<Self> {
		let document = service.fetch_model(id)?;
		Ok(ModelView::from_document(service, document))
	}

	pub fn from_document(service: S, document: ModelDocument) -> Self {
		ModelView {
			service,
			id: Some(document.model_id.name.clone()),
			state: State::Ready(Box::new(Snapshot::new(document))),
			poll_interval: None,
		}
	}

	/// A view of the model `job` is training. The view becomes ready when the job is done.
	pub fn from_job(service: S, job: Job) -> Self {
		ModelView {
			service,
			id: job.dest_key().map(str::to_owned),
			state: State::Pending(job),
			poll_interval: None,
		}
	}

	/// How long jobs this view submits wait between status checks.
	pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
		self.poll_interval = Some(poll_interval);
		self
	}

	pub(crate) fn job(&self, document: JobDocument, job_type: impl Into<String>) -> Job {
		let job = Job::new(document, job_type);
		match self.poll_interval {
			Some(poll_interval) => job.with_poll_interval(poll_interval),
			None => job,
		}
	}

	pub fn service(&self) -> &S {
		&self.service
	}

	pub fn id(&self) -> Option<&str> {
		self.id.as_deref()
	}

	pub fn readiness(&self) -> Readiness {
		match self.state {
			State::NotTrained => Readiness::NotTrained,
			State::Pending(_) => Readiness::Pending,
			State::Ready(_) => Readiness::Ready,
			State::Removed => Readiness::Removed,
		}
	}

	/// Wait for a pending job to finish, then fetch the model it produced.
	pub fn resolve(&mut self) -> Result<()> {
		if let State::Pending(job) = &mut self.state {
			job.poll(&self.service)?;
			let dest = job.dest_key().map(str::to_owned).ok_or_else(|| {
				Error::NotAvailable(format!("job {} did not produce a model", job.key()))
			})?;
			let document = self.service.fetch_model(&dest)?;
			log::debug!("model {} is ready", dest);
			self.id = Some(dest);
			self.state = State::Ready(Box::new(Snapshot::new(document)));
		}
		Ok(())
	}

	/// The current snapshot, without waiting on a pending job.
	pub(crate) fn snapshot(&self) -> Result<&Snapshot> {
		match &self.state {
			State::Ready(snapshot) => Ok(snapshot),
			State::NotTrained => {
				Err(Error::NotAvailable("no model has been trained yet".to_owned()).into())
			}
			State::Pending(job) => Err(Error::NotAvailable(format!(
				"job {} has not finished training the model",
				job.key()
			))
			.into()),
			State::Removed => Err(Error::NotAvailable(format!(
				"model {} has been removed",
				self.id.as_deref().unwrap_or_default()
			))
			.into()),
		}
	}

	pub(crate) fn ready(&mut self) -> Result<&Snapshot> {
		self.resolve()?;
		self.snapshot()
	}

	/// The id of a ready model.
	pub(crate) fn model_id(&mut self) -> Result<String> {
		self.resolve()?;
		self.snapshot()?;
		self.id
			.clone()
			.ok_or_else(|| Error::NotAvailable("the model has no id".to_owned()).into())
	}

	/**
	Describe the model. Unlike every other read, this does not block on a pending job: it checks the job's status once and reports the progress if the job is still running.
	*/
	pub fn show(&mut self) -> Result<Report> {
		if let State::Pending(job) = &mut self.state {
			let status = job.poll_once(&self.service)?;
			if !status.is_finished() {
				return Ok(Report::Pending {
					key: job.key().to_owned(),
					status,
					progress: job.progress(),
				});
			}
		}
		match self.state {
			State::NotTrained => return Ok(Report::NotTrained),
			State::Removed => return Ok(Report::Removed),
			State::Pending(_) | State::Ready(_) => {}
		}
		let id = self.model_id()?;
		let snapshot = self.snapshot()?;
		let mut details = String::new();
		write_details(&mut details, &id, &snapshot.document)?;
		Ok(Report::Details(details))
	}

	/// Rename the model on the cluster. The local id changes only once the cluster has accepted the new one.
	pub fn rename(&mut self, new_id: &str) -> Result<()> {
		if new_id.is_empty() {
			return Err(Error::InvalidArgument("the new model id must not be empty".to_owned()).into());
		}
		let old_id = self.model_id()?;
		self.service.rename(&old_id, new_id)?;
		log::info!("renamed model {} to {}", old_id, new_id);
		self.id = Some(new_id.to_owned());
		Ok(())
	}

	/// Fetch the model's document again and replace the snapshot with it. If the cluster no longer has the model, the view becomes removed.
	pub fn refresh(&mut self) -> Result<()> {
		let id = self.model_id()?;
		let document = match self.service.fetch_model(&id) {
			Ok(document) => document,
			Err(error) => {
				if is_missing_model(&error) {
					log::warn!("model {} is gone from the cluster", id);
					self.state = State::Removed;
				}
				return Err(error);
			}
		};
		self.state = State::Ready(Box::new(Snapshot::new(document)));
		Ok(())
	}

	/// Remove the model from the cluster. Every later read fails with `NotAvailable`.
	pub fn delete(&mut self) -> Result<()> {
		let id = self.model_id()?;
		self.service.delete_model(&id)?;
		log::info!("deleted model {}", id);
		self.state = State::Removed;
		Ok(())
	}

	pub fn algorithm(&mut self) -> Result<Algorithm> {
		Ok(Algorithm::from_name(&self.ready()?.document.algo))
	}

	pub fn algo_full_name(&mut self) -> Result<Option<String>> {
		Ok(self.ready()?.document.algo_full_name.clone())
	}

	pub fn estimator_type(&mut self) -> Result<EstimatorType> {
		let output = &self.ready()?.document.output;
		let category = output.model_category.as_deref().unwrap_or_default();
		Ok(EstimatorType::from_model_category(category))
	}

	pub fn parameters(&mut self) -> Result<&Parameters> {
		Ok(&self.ready()?.parameters)
	}

	pub fn default_parameters(&mut self) -> Result<BTreeMap<String, Value>> {
		Ok(self.ready()?.parameters.default_parameters())
	}

	/// The actual parameters, with references to frames, columns and models replaced by their names.
	pub fn actual_parameters(&mut self) -> Result<BTreeMap<String, Value>> {
		Ok(self.ready()?.parameters.actual_parameters())
	}

	pub fn full_parameters(&mut self) -> Result<&BTreeMap<String, ParameterValues>> {
		Ok(self.ready()?.parameters.full_parameters())
	}

	/// Read any statistic for the requested roles.
	pub fn metric(&mut self, statistic: Statistic, roles: Roles) -> Result<RoleValue<f64>> {
		metric_value(&self.ready()?.document.output, roles, statistic)
	}

	pub fn r2(&mut self, roles: Roles) -> Result<RoleValue<f64>> {
		self.metric(Statistic::R2, roles)
	}

	pub fn mse(&mut self, roles: Roles) -> Result<RoleValue<f64>> {
		self.metric(Statistic::Mse, roles)
	}

	pub fn rmse(&mut self, roles: Roles) -> Result<RoleValue<f64>> {
		self.metric(Statistic::Rmse, roles)
	}

	pub fn mae(&mut self, roles: Roles) -> Result<RoleValue<f64>> {
		self.metric(Statistic::Mae, roles)
	}

	pub fn rmsle(&mut self, roles: Roles) -> Result<RoleValue<f64>> {
		self.metric(Statistic::Rmsle, roles)
	}

	pub fn logloss(&mut self, roles: Roles) -> Result<RoleValue<f64>> {
		self.metric(Statistic::Logloss, roles)
	}

	pub fn mean_residual_deviance(&mut self, roles: Roles) -> Result<RoleValue<f64>> {
		self.metric(Statistic::MeanResidualDeviance, roles)
	}

	pub fn auc(&mut self, roles: Roles) -> Result<RoleValue<f64>> {
		self.metric(Statistic::Auc, roles)
	}

	pub fn aic(&mut self, roles: Roles) -> Result<RoleValue<f64>> {
		self.metric(Statistic::Aic, roles)
	}

	pub fn gini(&mut self, roles: Roles) -> Result<RoleValue<f64>> {
		self.metric(Statistic::Gini, roles)
	}

	pub fn mean_per_class_error(&mut self, roles: Roles) -> Result<RoleValue<f64>> {
		self.metric(Statistic::MeanPerClassError, roles)
	}

	/**
	The residual deviance for a single role. Cross-validation is rejected. When training and validation are both requested, the training value is returned.
	*/
	pub fn residual_deviance(&mut self, roles: Roles) -> Result<Option<f64>> {
		self.single_role_metric(Statistic::ResidualDeviance, roles)
	}

	pub fn residual_degrees_of_freedom(&mut self, roles: Roles) -> Result<Option<f64>> {
		self.single_role_metric(Statistic::ResidualDegreesOfFreedom, roles)
	}

	pub fn null_deviance(&mut self, roles: Roles) -> Result<Option<f64>> {
		self.single_role_metric(Statistic::NullDeviance, roles)
	}

	pub fn null_degrees_of_freedom(&mut self, roles: Roles) -> Result<Option<f64>> {
		self.single_role_metric(Statistic::NullDegreesOfFreedom, roles)
	}

	fn single_role_metric(&mut self, statistic: Statistic, roles: Roles) -> Result<Option<f64>> {
		roles.resolve_single()?;
		single_role_value(&self.ready()?.document.output, roles, statistic)
	}

	/**
	The metrics for one dataset. Without `test_data` the first of the training, validation and cross-validation roles requested is reported, training by default. With `test_data` the cluster computes fresh metrics against that frame.
	*/
	pub fn model_performance(
		&mut self,
		test_data: Option<&Frame>,
		roles: Roles,
	) -> Result<Option<Metrics>> {
		let id = self.model_id()?;
		match test_data {
			None => {
				let role = roles.resolve()[0];
				Ok(self.snapshot()?.document.output.metrics(role).cloned())
			}
			Some(frame) => {
				let metrics = self.service.submit_metrics(&id, frame.id())?;
				Ok(metrics
					.into_iter()
					.find(|metrics| metrics.frame_name() == Some(frame.id())))
			}
		}
	}

	pub fn summary(&mut self) -> Result<Option<&Table>> {
		let output = &self.ready()?.document.output;
		Ok(output.model_summary.as_ref())
	}

	pub fn scoring_history(&mut self) -> Result<Option<&Table>> {
		let output = &self.ready()?.document.output;
		Ok(output.scoring_history.as_ref())
	}

	pub fn cross_validation_metrics_summary(&mut self) -> Result<Option<&Table>> {
		let output = &self.ready()?.document.output;
		Ok(output.cross_validation_metrics_summary.as_ref())
	}

	pub fn variable_importances(&mut self) -> Result<Option<&Table>> {
		let output = &self.ready()?.document.output;
		Ok(output.variable_importances.as_ref())
	}

	pub fn varimp(&mut self) -> Result<Option<Vec<VariableImportance>>> {
		let table = match self.variable_importances()? {
			Some(table) => table,
			None => {
				log::warn!("this model does not have variable importances");
				return Ok(None);
			}
		};
		let variables = table.column_str("variable").unwrap_or_default();
		let relative = table.column_f64("relative_importance").unwrap_or_default();
		let scaled = table.column_f64("scaled_importance").unwrap_or_default();
		let percentage = table.column_f64("percentage").unwrap_or_default();
		let importances = variables
			.into_iter()
			.enumerate()
			.map(|(index, variable)| VariableImportance {
				variable: variable.unwrap_or_default().to_owned(),
				relative_importance: relative.get(index).copied().flatten(),
				scaled_importance: scaled.get(index).copied().flatten(),
				percentage: percentage.get(index).copied().flatten(),
			})
			.collect();
		Ok(Some(importances))
	}

	/// The coefficients to apply to the unstandardized data.
	pub fn coef(&mut self) -> Result<Option<BTreeMap<String, f64>>> {
		self.coefficients("coefficients")
	}

	/// The coefficients fit on the standardized data.
	pub fn coef_norm(&mut self) -> Result<Option<BTreeMap<String, f64>>> {
		self.coefficients("standardized_coefficients")
	}

	fn coefficients(&mut self, column: &str) -> Result<Option<BTreeMap<String, f64>>> {
		let table = match &self.ready()?.document.output.coefficients_table {
			Some(table) => table,
			None => return Ok(None),
		};
		let names = table.column_str("names").unwrap_or_default();
		let values = table.column_f64(column).ok_or_else(|| {
			Error::NotAvailable(format!("the coefficients table has no {} column", column))
		})?;
		let coefficients = names
			.into_iter()
			.zip(values)
			.filter_map(|(name, value)| Some((name?.to_owned(), value?)))
			.collect();
		Ok(Some(coefficients))
	}

	/// The frame holding the weight matrix `matrix_id`.
	pub fn weights(&mut self, matrix_id: usize) -> Result<Option<Frame>> {
		let weights = &self.ready()?.document.output.weights;
		referenced_frame(weights.as_deref(), matrix_id, "weight matrices")
	}

	/// The frame holding the bias vector `vector_id`.
	pub fn biases(&mut self, vector_id: usize) -> Result<Option<Frame>> {
		let biases = &self.ready()?.document.output.biases;
		referenced_frame(biases.as_deref(), vector_id, "bias vectors")
	}

	/// Multipliers standardizing the numeric predictors.
	pub fn normmul(&mut self) -> Result<Option<&[f64]>> {
		Ok(self.ready()?.document.output.normmul.as_deref())
	}

	/// Offsets standardizing the numeric predictors.
	pub fn normsub(&mut self) -> Result<Option<&[f64]>> {
		Ok(self.ready()?.document.output.normsub.as_deref())
	}

	pub fn respmul(&mut self) -> Result<Option<&[f64]>> {
		Ok(self.ready()?.document.output.normrespmul.as_deref())
	}

	pub fn respsub(&mut self) -> Result<Option<&[f64]>> {
		Ok(self.ready()?.document.output.normrespsub.as_deref())
	}

	/// Offsets of each categorical column in the one hot encoding.
	pub fn catoffsets(&mut self) -> Result<Option<&[i64]>> {
		Ok(self.ready()?.document.output.catoffsets.as_deref())
	}

	pub fn is_cross_validated(&mut self) -> Result<bool> {
		Ok(!self.xval_keys()?.is_empty())
	}

	/// The ids of the models trained on each cross-validation fold.
	pub fn xval_keys(&mut self) -> Result<Vec<String>> {
		let models = &self.ready()?.document.output.cross_validation_models;
		Ok(models
			.iter()
			.flatten()
			.map(|model| model.name.clone())
			.collect())
	}

	pub fn cross_validation_predictions(&mut self) -> Result<Option<Vec<Frame>>> {
		let predictions = &self.ready()?.document.output.cross_validation_predictions;
		Ok(predictions.as_ref().map(|predictions| {
			predictions
				.iter()
				.map(|prediction| Frame::new(prediction.name.as_str()))
				.collect()
		}))
	}

	/// The holdout predictions of every cross-validation model, combined over the training data.
	pub fn cross_validation_holdout_predictions(&mut self) -> Result<Option<Frame>> {
		let output = &self.ready()?.document.output;
		Ok(output
			.cross_validation_holdout_predictions_frame_id
			.as_ref()
			.map(|key| Frame::new(key.name.as_str())))
	}

	pub fn cross_validation_fold_assignment(&mut self) -> Result<Option<Frame>> {
		let output = &self.ready()?.document.output;
		Ok(output
			.cross_validation_fold_assignment_frame_id
			.as_ref()
			.map(|key| Frame::new(key.name.as_str())))
	}
}

impl<S> ModelView<S>
where
	S: Service + Clone,
{
	/// Fetch a view of every cross-validation model, or `None` if the model was not cross-validated.
	pub fn cross_validation_models(&mut self) -> Result<Option<Vec<ModelView<S>>>> {
		if self.ready()?.document.output.cross_validation_models.is_none() {
			return Ok(None);
		}
		let models = self
			.xval_keys()?
			.iter()
			.map(|key| self.fetch_related(key))
			.collect::<Result<Vec<_>>>()?;
		Ok(Some(models))
	}

	/// Fetch the cross-validation model named `key`.
	pub fn xval_model(&mut self, key: &str) -> Result<ModelView<S>> {
		if !self.xval_keys()?.iter().any(|xval_key| xval_key == key) {
			return Err(Error::InvalidArgument(format!(
				"{} is not a cross-validation model of this model",
				key
			))
			.into());
		}
		self.fetch_related(key)
	}

	fn fetch_related(&self, id: &str) -> Result<ModelView<S>> {
		let model = ModelView::fetch(self.service.clone(), id)?;
		Ok(match self.poll_interval {
			Some(poll_interval) => model.with_poll_interval(poll_interval),
			None => model,
		})
	}
}

/// The cluster answers 404 for a model it does not know, or an empty model list.
fn is_missing_model(error: &anyhow::Error) -> bool {
	matches!(
		error.downcast_ref::<Error>(),
		Some(Error::RemoteFailure { status: 404, .. }) | Some(Error::NotAvailable(_))
	)
}

fn referenced_frame(
	references: Option<&[crate::document::KeyRef]>,
	index: usize,
	what: &str,
) -> Result<Option<Frame>> {
	let references = match references {
		Some(references) => references,
		None => return Ok(None),
	};
	let reference = references.get(index).ok_or_else(|| {
		Error::InvalidArgument(format!(
			"the model has {} {} (indexed from 0), but {} was requested",
			references.len(),
			what,
			index
		))
	})?;
	Ok(Some(Frame::new(reference.frame_id())))
}

fn write_details(f: &mut String, id: &str, document: &ModelDocument) -> std::fmt::Result {
	let output = &document.output;
	writeln!(f, "Model Details")?;
	writeln!(f, "=============")?;
	writeln!(
		f,
		"{}: {}",
		document.algo,
		document.algo_full_name.as_deref().unwrap_or(&document.algo)
	)?;
	writeln!(f, "Model Key: {}", id)?;
	if let Some(summary) = &output.model_summary {
		writeln!(f)?;
		writeln!(f, "{}", summary)?;
	}
	for role in Role::ALL.iter() {
		if let Some(metrics) = output.metrics(*role) {
			writeln!(f)?;
			write!(f, "{}", metrics)?;
		}
	}
	let tables = [
		&output.cross_validation_metrics_summary,
		&output.scoring_history,
		&output.variable_importances,
	];
	for table in tables.iter().filter_map(|table| table.as_ref()) {
		writeln!(f)?;
		writeln!(f, "{}", table)?;
	}
	Ok(())
}
