use thiserror::Error;

/**
The errors this crate raises on purpose. They travel inside `anyhow::Error`, so recover them with `error.downcast_ref::<Error>()`.
*/
#[derive(Debug, Error)]
pub enum Error {
	/// The caller passed a value of the wrong shape. Raised before any request is sent.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),
	/// The operation is not defined for this model's algorithm or category.
	#[error("unsupported operation: {0}")]
	UnsupportedOperation(String),
	/// The model this view points to has not been trained or has been removed.
	#[error("not available: {0}")]
	NotAvailable(String),
	/// The remote service answered with an error status.
	#[error("remote failure ({status}): {message}")]
	RemoteFailure { status: u16, message: String },
	/// A remote job finished without producing its result.
	#[error("job {key} {status}: {message}")]
	JobFailed {
		key: String,
		status: String,
		message: String,
	},
}

impl Error {
	/// Returns true for errors that originate on the remote side.
	pub fn is_remote_failure(&self) -> bool {
		matches!(self, Error::RemoteFailure { .. } | Error::JobFailed { .. })
	}
}

impl From<remodel_metrics::UnsupportedStatistic> for Error {
	fn from(error: remodel_metrics::UnsupportedStatistic) -> Self {
		Error::UnsupportedOperation(error.to_string())
	}
}
