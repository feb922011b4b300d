use crate::{
	config::Config,
	document::{KeyRef, ModelDocument, ModelsResponse},
	error::Error,
	frame::{FrameSummary, FramesResponse},
	job::{JobDocument, JobResponse, JobsResponse},
	service::{PartialDependenceRequest, PredictionKind, RemoteFile, Service, Submission},
	table::Table,
};
use anyhow::{Context, Result};
use itertools::Itertools;
use remodel_metrics::Metrics;
use reqwest::{
	blocking::{Client, RequestBuilder, Response},
	header::{HeaderMap, CONTENT_DISPOSITION},
	Method,
};
use url::Url;

/// A [`Service`](../service/trait.Service.html) that talks to the cluster's REST API.
#[derive(Debug, Clone)]
pub struct HttpService {
	client: Client,
	base_url: Url,
	credentials: Option<(String, Option<String>)>,
}

#[derive(serde::Deserialize)]
struct ErrorResponse {
	#[serde(default)]
	msg: Option<String>,
	#[serde(default)]
	exception_msg: Option<String>,
}

#[derive(serde::Deserialize)]
struct PredictionsResponse {
	predictions_frame: KeyRef,
}

#[derive(serde::Deserialize)]
struct ModelMetricsResponse {
	#[serde(default)]
	model_metrics: Vec<Metrics>,
}

#[derive(serde::Deserialize)]
struct PartialDependenceResponse {
	#[serde(default)]
	partial_dependence_data: Vec<Table>,
}

impl HttpService {
	pub fn new(config: &Config) -> Result<Self> {
		let mut base_url = Url::parse(&config.url)
			.with_context(|| format!("invalid cluster url {}", config.url))?;
		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());
			base_url.set_path(&path);
		}
		let mut builder = Client::builder();
		if let Some(timeout) = config.timeout() {
			builder = builder.timeout(timeout);
		}
		let client = builder.build()?;
		let credentials = config
			.username
			.clone()
			.map(|username| (username, config.password.clone()));
		Ok(HttpService {
			client,
			base_url,
			credentials,
		})
	}

	/// Build the url for an endpoint from its path segments. Each segment is percent encoded, so ids may contain any character but `/`.
	fn endpoint(&self, segments: &[&str]) -> Result<Url> {
		let mut url = self.base_url.clone();
		url.path_segments_mut()
			.map_err(|_| anyhow::format_err!("{} cannot be a base url", self.base_url))?
			.pop_if_empty()
			.extend(segments);
		Ok(url)
	}

	fn request(&self, method: Method, url: Url) -> RequestBuilder {
		log::debug!("{} {}", method, url);
		let builder = self.client.request(method, url);
		match &self.credentials {
			Some((username, password)) => builder.basic_auth(username, password.as_ref()),
			None => builder,
		}
	}

	fn send(&self, builder: RequestBuilder) -> Result<Response> {
		let response = builder.send().context("failed to reach the cluster")?;
		check_status(response)
	}
}

fn check_status(response: Response) -> Result<Response> {
	let status = response.status();
	if status.is_success() {
		return Ok(response);
	}
	let body = response.text().unwrap_or_default();
	Err(Error::RemoteFailure {
		status: status.as_u16(),
		message: failure_message(&body),
	}
	.into())
}

/// The cluster reports errors as json with `msg` or `exception_msg`. Anything else is passed through as is.
fn failure_message(body: &str) -> String {
	serde_json::from_str::<ErrorResponse>(body)
		.ok()
		.and_then(|error| error.msg.or(error.exception_msg))
		.unwrap_or_else(|| body.to_owned())
}

/// Quote an id for a rapids expression.
fn rapids_string(id: &str) -> String {
	let mut quoted = String::with_capacity(id.len() + 2);
	quoted.push('"');
	for c in id.chars() {
		if c == '"' || c == '\\' {
			quoted.push('\\');
		}
		quoted.push(c);
	}
	quoted.push('"');
	quoted
}

/// Read the file name from a `Content-Disposition: attachment; filename=...` header.
fn file_name(headers: &HeaderMap) -> Option<String> {
	let value = headers.get(CONTENT_DISPOSITION)?.to_str().ok()?;
	value
		.split(';')
		.map(|part| part.trim())
		.find_map(|part| part.strip_prefix("filename="))
		.map(|name| name.trim_matches('"').to_owned())
		.filter(|name| !name.is_empty())
}

/// Lists are sent to the cluster as `["a","b"]`.
fn list_param(values: &[String]) -> String {
	format!(
		"[{}]",
		values.iter().map(|value| format!("\"{}\"", value)).join(",")
	)
}

impl Service for HttpService {
	fn rename(&self, old_id: &str, new_id: &str) -> Result<()> {
		let url = self.endpoint(&["99", "Rapids"])?;
		let ast = format!("(rename {} {})", rapids_string(old_id), rapids_string(new_id));
		self.send(self.request(Method::POST, url).form(&[("ast", ast)]))?;
		Ok(())
	}

	fn fetch_model(&self, model_id: &str) -> Result<ModelDocument> {
		let url = self.endpoint(&["3", "Models", model_id])?;
		let response: ModelsResponse = self.send(self.request(Method::GET, url))?.json()?;
		response
			.models
			.into_iter()
			.next()
			.ok_or_else(|| Error::NotAvailable(format!("model {} was not found", model_id)).into())
	}

	fn delete_model(&self, model_id: &str) -> Result<()> {
		let url = self.endpoint(&["3", "Models", model_id])?;
		self.send(self.request(Method::DELETE, url))?;
		Ok(())
	}

	fn fetch_job(&self, job_key: &str) -> Result<JobDocument> {
		let url = self.endpoint(&["3", "Jobs", job_key])?;
		let response: JobsResponse = self.send(self.request(Method::GET, url))?.json()?;
		response
			.jobs
			.into_iter()
			.next()
			.ok_or_else(|| Error::NotAvailable(format!("job {} was not found", job_key)).into())
	}

	fn fetch_frame(&self, frame_id: &str) -> Result<FrameSummary> {
		let url = self.endpoint(&["3", "Frames", frame_id])?;
		let response: FramesResponse = self.send(self.request(Method::GET, url))?.json()?;
		response
			.frames
			.into_iter()
			.next()
			.ok_or_else(|| Error::NotAvailable(format!("frame {} was not found", frame_id)).into())
	}

	fn submit_prediction(
		&self,
		model_id: &str,
		frame_id: &str,
		kind: &PredictionKind,
	) -> Result<Submission> {
		match kind {
			PredictionKind::Predictions => {
				let url = self.endpoint(&["4", "Predictions", "models", model_id, "frames", frame_id])?;
				let response: JobResponse = self.send(self.request(Method::POST, url))?.json()?;
				Ok(Submission::Job(response.into_document()))
			}
			PredictionKind::LeafNodeAssignment => {
				let url = self.endpoint(&["3", "Predictions", "models", model_id, "frames", frame_id])?;
				let builder = self
					.request(Method::POST, url)
					.form(&[("leaf_node_assignment", "true")]);
				let response: PredictionsResponse = self.send(builder)?.json()?;
				Ok(Submission::Frame(response.predictions_frame))
			}
			PredictionKind::DeepFeatures { hidden_layer } => {
				let url = self.endpoint(&["4", "Predictions", "models", model_id, "frames", frame_id])?;
				let builder = self
					.request(Method::POST, url)
					.form(&[("deep_features_hidden_layer", hidden_layer.to_string())]);
				let response: JobResponse = self.send(builder)?.json()?;
				Ok(Submission::Job(response.into_document()))
			}
		}
	}

	fn submit_metrics(&self, model_id: &str, frame_id: &str) -> Result<Vec<Metrics>> {
		let url = self.endpoint(&["3", "ModelMetrics", "models", model_id, "frames", frame_id])?;
		let response: ModelMetricsResponse = self.send(self.request(Method::POST, url))?.json()?;
		Ok(response.model_metrics)
	}

	fn submit_partial_dependence(&self, request: &PartialDependenceRequest) -> Result<JobDocument> {
		let url = self.endpoint(&["3", "PartialDependence", ""])?;
		let mut form = vec![
			("cols", list_param(&request.cols)),
			("model_id", request.model_id.clone()),
			("frame_id", request.frame_id.clone()),
			("nbins", request.nbins.to_string()),
		];
		if let Some(destination_key) = &request.destination_key {
			form.push(("destination_key", destination_key.clone()));
		}
		let builder = self.request(Method::POST, url).form(&form);
		let response: JobResponse = self.send(builder)?.json()?;
		Ok(response.into_document())
	}

	fn fetch_partial_dependence(&self, key: &str) -> Result<Vec<Table>> {
		let url = self.endpoint(&["3", "PartialDependence", key])?;
		let response: PartialDependenceResponse =
			self.send(self.request(Method::GET, url))?.json()?;
		Ok(response.partial_dependence_data)
	}

	fn fetch_file(&self, path: &str) -> Result<RemoteFile> {
		let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();
		let url = self.endpoint(&segments)?;
		let response = self.send(self.request(Method::GET, url))?;
		let file_name = file_name(response.headers());
		let bytes = response.bytes()?.to_vec();
		Ok(RemoteFile { file_name, bytes })
	}
}

#[test]
fn test_endpoint() {
	let service = HttpService::new(&Config::default()).unwrap();
	assert_eq!(
		service.endpoint(&["3", "Models", "my model"]).unwrap().as_str(),
		"http://localhost:54321/3/Models/my%20model"
	);
	let config = Config {
		url: "https://cluster.example.com/proxy".to_owned(),
		..Default::default()
	};
	let service = HttpService::new(&config).unwrap();
	assert_eq!(
		service.endpoint(&["3", "Jobs", "job_1"]).unwrap().as_str(),
		"https://cluster.example.com/proxy/3/Jobs/job_1"
	);
	assert_eq!(
		service.endpoint(&["3", "PartialDependence", ""]).unwrap().as_str(),
		"https://cluster.example.com/proxy/3/PartialDependence/"
	);
}

#[test]
fn test_file_name() {
	let mut headers = HeaderMap::new();
	assert_eq!(file_name(&headers), None);
	headers.insert(
		CONTENT_DISPOSITION,
		"attachment; filename=\"gbm_model.zip\"".parse().unwrap(),
	);
	assert_eq!(file_name(&headers).as_deref(), Some("gbm_model.zip"));
}

#[test]
fn test_list_param() {
	let cols = vec!["age".to_owned(), "income".to_owned()];
	assert_eq!(list_param(&cols), r#"["age","income"]"#);
}

#[test]
fn test_failure_message() {
	assert_eq!(
		failure_message(r#"{"msg": "Object 'modelA' not found", "exception_msg": "ignored"}"#),
		"Object 'modelA' not found"
	);
	assert_eq!(
		failure_message(r#"{"exception_msg": "java.lang.IllegalArgumentException"}"#),
		"java.lang.IllegalArgumentException"
	);
	assert_eq!(failure_message("502 Bad Gateway"), "502 Bad Gateway");
	assert_eq!(failure_message(r#"{"error": "nope"}"#), r#"{"error": "nope"}"#);
}

#[test]
fn test_rapids_string() {
	assert_eq!(rapids_string("modelA"), r#""modelA""#);
	assert_eq!(rapids_string(r#"my "best" model"#), r#""my \"best\" model""#);
	assert_eq!(rapids_string(r"a\b"), r#""a\\b""#);
}
