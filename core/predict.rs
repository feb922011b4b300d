use crate::{
	error::Error,
	frame::Frame,
	model::ModelView,
	service::{PredictionKind, Service, Submission},
};
use anyhow::Result;

impl<S> ModelView<S>
where
	S: Service,
{
	/// Score `test_data` and return the frame of predictions.
	pub fn predict(&mut self, test_data: &Frame) -> Result<Frame> {
		let job_type = format!("{} prediction", self.algorithm()?);
		self.submit(test_data, &PredictionKind::Predictions, job_type)
	}

	/// The leaf each row of `test_data` lands in, per tree. Only tree based models support this.
	pub fn predict_leaf_node_assignment(&mut self, test_data: &Frame) -> Result<Frame> {
		self.submit(test_data, &PredictionKind::LeafNodeAssignment, "leaf node assignment")
	}

	/// The activations of the hidden layer `layer`, indexed from 0, for each row of `test_data`.
	pub fn deepfeatures(&mut self, test_data: &Frame, layer: usize) -> Result<Frame> {
		let kind = PredictionKind::DeepFeatures {
			hidden_layer: layer,
		};
		self.submit(test_data, &kind, "deepfeatures")
	}

	fn submit(
		&mut self,
		test_data: &Frame,
		kind: &PredictionKind,
		job_type: impl Into<String>,
	) -> Result<Frame> {
		let id = self.model_id()?;
		match self.service().submit_prediction(&id, test_data.id(), kind)? {
			Submission::Frame(key) => Ok(Frame::new(key.name)),
			Submission::Job(document) => {
				let mut job = self.job(document, job_type);
				job.poll(self.service())?;
				let dest = job.dest_key().ok_or_else(|| {
					Error::NotAvailable(format!("job {} did not produce a frame", job.key()))
				})?;
				Ok(Frame::new(dest))
			}
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::{
		document::KeyRef,
		job::JobStatus,
		mock::{deeplearning_regressor, gbm_regressor, job_document, MockService},
	};
	use std::time::Duration;

	#[test]
	fn test_predict_polls_the_job() {
		let service = MockService::with_model(gbm_regressor("modelA"));
		service.set_submission(Submission::Job(job_document(
			"job_2",
			"predictions_1",
			JobStatus::Running,
			0.0,
		)));
		service.script_job(
			"job_2",
			vec![job_document("job_2", "predictions_1", JobStatus::Done, 1.0)],
		);
		let mut model = ModelView::fetch(&service, "modelA")
			.unwrap()
			.with_poll_interval(Duration::from_millis(0));
		let predictions = model.predict(&Frame::new("test.hex")).unwrap();
		assert_eq!(predictions, Frame::new("predictions_1"));
		assert_eq!(
			service.calls(),
			vec![
				"fetch_model modelA",
				"submit_prediction modelA test.hex Predictions",
				"fetch_job job_2",
			]
		);
	}

	#[test]
	fn test_leaf_node_assignment() {
		let service = MockService::with_model(gbm_regressor("modelA"));
		service.set_submission(Submission::Frame(KeyRef::new("leaf_assignment")));
		let mut model = ModelView::fetch(&service, "modelA").unwrap();
		let frame = model
			.predict_leaf_node_assignment(&Frame::new("test.hex"))
			.unwrap();
		assert_eq!(frame.id(), "leaf_assignment");
		assert!(!service.calls().iter().any(|call| call.starts_with("fetch_job")));
	}

	#[test]
	fn test_deepfeatures_failed_job() {
		let service = MockService::with_model(deeplearning_regressor("dl"));
		let mut failed = job_document("job_3", "features", JobStatus::Failed, 0.5);
		failed.exception = Some("layer 7 does not exist".to_owned());
		service.set_submission(Submission::Job(failed));
		let mut model = ModelView::fetch(&service, "dl").unwrap();
		let error = model.deepfeatures(&Frame::new("test.hex"), 7).unwrap_err();
		assert_eq!(error.to_string(), "job job_3 failed: layer 7 does not exist");
		assert!(service
			.calls()
			.contains(&"submit_prediction dl test.hex DeepFeatures { hidden_layer: 7 }".to_owned()));
	}
}
