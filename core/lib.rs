/*!
This crate is a client for models trained on a remote cluster. A [`ModelView`](model/struct.ModelView.html) reads a model's metrics, parameters and outputs, scores frames with it, charts its training and downloads it.

```no_run
use remodel_core::{Config, HttpService, ModelView, Roles};

let config = Config::default();
let service = HttpService::new(&config)?;
let mut model = ModelView::fetch(&service, "gbm_model")?;
println!("{}", model.rmse(Roles::valid())?);
# Ok::<(), anyhow::Error>(())
```
*/

#![allow(clippy::tabs_in_doc_comments)]

mod download;
#[cfg(test)]
mod mock;
mod plot;
mod predict;

pub mod algorithm;
pub mod chart;
pub mod config;
pub mod document;
pub mod error;
pub mod frame;
pub mod http;
pub mod job;
pub mod model;
pub mod params;
pub mod select;
pub mod service;
pub mod table;

pub use self::{
	algorithm::{Algorithm, EstimatorType},
	config::Config,
	download::Pojo,
	error::Error,
	frame::Frame,
	http::HttpService,
	job::{Job, JobStatus},
	model::{ModelView, Readiness, Report},
	plot::PartialDependence,
	select::{RoleValue, Roles},
	service::Service,
};
pub use remodel_metrics::{Metrics, Role, Statistic};
