use crate::{document::KeyRef, error::Error, service::Service};
use anyhow::Result;
use std::time::Duration;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
	Created,
	Running,
	Done,
	Cancelled,
	Failed,
}

impl JobStatus {
	pub fn is_finished(self) -> bool {
		matches!(self, JobStatus::Done | JobStatus::Cancelled | JobStatus::Failed)
	}
}

impl std::fmt::Display for JobStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			JobStatus::Created => "created",
			JobStatus::Running => "running",
			JobStatus::Done => "done",
			JobStatus::Cancelled => "cancelled",
			JobStatus::Failed => "failed",
		};
		write!(f, "{}", s)
	}
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct JobDocument {
	pub key: KeyRef,
	#[serde(default)]
	pub dest: Option<KeyRef>,
	pub status: JobStatus,
	#[serde(default)]
	pub progress: f64,
	#[serde(default)]
	pub progress_msg: Option<String>,
	#[serde(default)]
	pub exception: Option<String>,
	#[serde(default)]
	pub description: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct JobsResponse {
	pub jobs: Vec<JobDocument>,
}

/// Submitting work answers either with the job wrapped in a `job` field or with the bare job.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(untagged)]
pub enum JobResponse {
	Wrapped { job: JobDocument },
	Bare(JobDocument),
}

impl JobResponse {
	pub fn into_document(self) -> JobDocument {
		match self {
			JobResponse::Wrapped { job } => job,
			JobResponse::Bare(job) => job,
		}
	}
}

/**
A handle to work running on the cluster. `poll_once` checks the status a single time. `poll` blocks the calling thread until the job finishes.
*/
#[derive(Debug, Clone)]
pub struct Job {
	document: JobDocument,
	job_type: String,
	poll_interval: Duration,
}

impl Job {
	pub fn new(document: JobDocument, job_type: impl Into<String>) -> Self {
		Job {
			document,
			job_type: job_type.into(),
			poll_interval: DEFAULT_POLL_INTERVAL,
		}
	}

	pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
		self.poll_interval = poll_interval;
		self
	}

	pub fn key(&self) -> &str {
		&self.document.key.name
	}

	/// The key of the entity this job produces.
	pub fn dest_key(&self) -> Option<&str> {
		self.document.dest.as_ref().map(|dest| dest.name.as_str())
	}

	pub fn status(&self) -> JobStatus {
		self.document.status
	}

	/// Progress as a fraction between 0 and 1.
	pub fn progress(&self) -> f64 {
		self.document.progress
	}

	/// Check the job's status once without blocking. A finished job is not checked again.
	pub fn poll_once<S>(&mut self, service: &S) -> Result<JobStatus>
	where
		S: Service + ?Sized,
	{
		if !self.status().is_finished() {
			self.document = service.fetch_job(self.key())?;
			log::debug!(
				"{} job {} is {} ({:.0}%)",
				self.job_type,
				self.key(),
				self.status(),
				self.progress() * 100.0
			);
		}
		Ok(self.status())
	}

	/// Block until the job finishes. A failed or cancelled job is an error.
	pub fn poll<S>(&mut self, service: &S) -> Result<()>
	where
		S: Service + ?Sized,
	{
		loop {
			match self.status() {
				JobStatus::Done => return Ok(()),
				JobStatus::Failed => {
					let message = self
						.document
						.exception
						.clone()
						.unwrap_or_else(|| "no exception was reported".to_owned());
					return Err(self.failure(message).into());
				}
				JobStatus::Cancelled => {
					let message = format!("{} job was cancelled", self.job_type);
					return Err(self.failure(message).into());
				}
				JobStatus::Created | JobStatus::Running => {}
			}
			if !self.poll_interval.is_zero() {
				std::thread::sleep(self.poll_interval);
			}
			self.poll_once(service)?;
		}
	}

	fn failure(&self, message: String) -> Error {
		Error::JobFailed {
			key: self.key().to_owned(),
			status: self.status().to_string(),
			message,
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::mock::{job_document, MockService};

	#[test]
	fn test_poll_until_done() {
		let service = MockService::default();
		service.script_job(
			"job_1",
			vec![
				job_document("job_1", "model_1", JobStatus::Running, 0.5),
				job_document("job_1", "model_1", JobStatus::Done, 1.0),
			],
		);
		let mut job = Job::new(
			job_document("job_1", "model_1", JobStatus::Created, 0.0),
			"gbm",
		)
		.with_poll_interval(Duration::from_millis(0));
		job.poll(&service).unwrap();
		assert_eq!(job.status(), JobStatus::Done);
		assert_eq!(job.dest_key(), Some("model_1"));
		assert_eq!(service.calls(), vec!["fetch_job job_1", "fetch_job job_1"]);
	}

	#[test]
	fn test_poll_once_does_not_block() {
		let service = MockService::default();
		service.script_job(
			"job_1",
			vec![job_document("job_1", "model_1", JobStatus::Running, 0.25)],
		);
		let mut job = Job::new(
			job_document("job_1", "model_1", JobStatus::Created, 0.0),
			"gbm",
		);
		assert_eq!(job.poll_once(&service).unwrap(), JobStatus::Running);
		assert_eq!(job.progress(), 0.25);
		assert_eq!(service.calls().len(), 1);
	}

	#[test]
	fn test_failed_job_is_an_error() {
		let service = MockService::default();
		let mut document = job_document("job_1", "model_1", JobStatus::Failed, 0.1);
		document.exception = Some("out of memory".to_owned());
		let mut job = Job::new(document, "gbm");
		let error = job.poll(&service).unwrap_err();
		let error = error.downcast_ref::<Error>().unwrap();
		assert!(error.is_remote_failure());
		assert_eq!(error.to_string(), "job job_1 failed: out of memory");
		assert!(service.calls().is_empty());
	}

	#[test]
	fn test_wrapped_and_bare_responses() {
		let wrapped: JobResponse = serde_json::from_str(
			r#"{"job": {"key": {"name": "j"}, "dest": {"name": "p"}, "status": "RUNNING"}}"#,
		)
		.unwrap();
		let bare: JobResponse =
			serde_json::from_str(r#"{"key": {"name": "j"}, "status": "DONE", "progress": 1.0}"#)
				.unwrap();
		assert_eq!(wrapped.into_document().dest, Some(KeyRef::new("p")));
		assert_eq!(bare.into_document().status, JobStatus::Done);
	}
}
