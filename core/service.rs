use crate::{
	document::{KeyRef, ModelDocument},
	frame::FrameSummary,
	job::JobDocument,
	table::Table,
};
use anyhow::Result;
use remodel_metrics::Metrics;

/**
The request/response contract of the remote cluster. [`HttpService`](../http/struct.HttpService.html) implements it over HTTP. Tests implement it in memory.

Every method is one blocking round trip. Implementations must not retry: a non-success status is returned to the caller as [`Error::RemoteFailure`](../error/enum.Error.html).
*/
pub trait Service {
	/// Rename the model `old_id` to `new_id`. Fails if `old_id` does not exist.
	fn rename(&self, old_id: &str, new_id: &str) -> Result<()>;
	fn fetch_model(&self, model_id: &str) -> Result<ModelDocument>;
	fn delete_model(&self, model_id: &str) -> Result<()>;
	fn fetch_job(&self, job_key: &str) -> Result<JobDocument>;
	fn fetch_frame(&self, frame_id: &str) -> Result<FrameSummary>;
	fn submit_prediction(
		&self,
		model_id: &str,
		frame_id: &str,
		kind: &PredictionKind,
	) -> Result<Submission>;
	/// Compute metrics for the model against an arbitrary frame.
	fn submit_metrics(&self, model_id: &str, frame_id: &str) -> Result<Vec<Metrics>>;
	fn submit_partial_dependence(&self, request: &PartialDependenceRequest) -> Result<JobDocument>;
	fn fetch_partial_dependence(&self, key: &str) -> Result<Vec<Table>>;
	/// Download the file at `path`, relative to the cluster's base url.
	fn fetch_file(&self, path: &str) -> Result<RemoteFile>;
}

impl<T> Service for &T
where
	T: Service + ?Sized,
{
	fn rename(&self, old_id: &str, new_id: &str) -> Result<()> {
		(**self).rename(old_id, new_id)
	}
	fn fetch_model(&self, model_id: &str) -> Result<ModelDocument> {
		(**self).fetch_model(model_id)
	}
	fn delete_model(&self, model_id: &str) -> Result<()> {
		(**self).delete_model(model_id)
	}
	fn fetch_job(&self, job_key: &str) -> Result<JobDocument> {
		(**self).fetch_job(job_key)
	}
	fn fetch_frame(&self, frame_id: &str) -> Result<FrameSummary> {
		(**self).fetch_frame(frame_id)
	}
	fn submit_prediction(
		&self,
		model_id: &str,
		frame_id: &str,
		kind: &PredictionKind,
	) -> Result<Submission> {
		(**self).submit_prediction(model_id, frame_id, kind)
	}
	fn submit_metrics(&self, model_id: &str, frame_id: &str) -> Result<Vec<Metrics>> {
		(**self).submit_metrics(model_id, frame_id)
	}
	fn submit_partial_dependence(&self, request: &PartialDependenceRequest) -> Result<JobDocument> {
		(**self).submit_partial_dependence(request)
	}
	fn fetch_partial_dependence(&self, key: &str) -> Result<Vec<Table>> {
		(**self).fetch_partial_dependence(key)
	}
	fn fetch_file(&self, path: &str) -> Result<RemoteFile> {
		(**self).fetch_file(path)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredictionKind {
	Predictions,
	LeafNodeAssignment,
	DeepFeatures { hidden_layer: usize },
}

/// Some endpoints answer with a job to poll, others with the resulting frame directly.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
	Job(JobDocument),
	Frame(KeyRef),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartialDependenceRequest {
	pub model_id: String,
	pub frame_id: String,
	pub cols: Vec<String>,
	pub nbins: usize,
	pub destination_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteFile {
	/// The file name the server suggested, if any.
	pub file_name: Option<String>,
	pub bytes: Vec<u8>,
}
