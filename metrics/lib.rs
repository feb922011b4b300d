/*!
This crate defines typed views over the metric blocks a remote cluster reports for a model. Each block carries a `model_category` tag, and [`Metrics`](enum.Metrics.html) holds one record per category so that asking for a statistic is an exhaustive match rather than a string lookup.

```
use remodel_metrics::{Metrics, Statistic};

let metrics: Metrics = serde_json::from_str(r#"{"model_category": "Regression", "MSE": 0.5}"#).unwrap();
assert_eq!(metrics.statistic(Statistic::Mse).unwrap(), Some(0.5));
assert!(metrics.statistic(Statistic::Auc).is_err());
```
*/

#![allow(clippy::tabs_in_doc_comments)]

mod binomial;
mod clustering;
mod multinomial;
pub mod number;
mod regression;
mod role;
mod statistic;
mod unsupervised;

pub use self::binomial::BinomialMetrics;
pub use self::clustering::ClusteringMetrics;
pub use self::multinomial::MultinomialMetrics;
pub use self::regression::RegressionMetrics;
pub use self::role::Role;
pub use self::statistic::{ParseStatisticError, Statistic};
pub use self::unsupervised::{AutoEncoderMetrics, BaseMetrics, DimReductionMetrics};

use serde::de::Error as _;
use thiserror::Error;

/// A metric block, tagged by the category of model that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Metrics {
	Regression(RegressionMetrics),
	Binomial(BinomialMetrics),
	Multinomial(MultinomialMetrics),
	Ordinal(MultinomialMetrics),
	Clustering(ClusteringMetrics),
	AutoEncoder(AutoEncoderMetrics),
	DimReduction(DimReductionMetrics),
	Unknown(BaseMetrics),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{statistic} is not defined for {category} metrics")]
pub struct UnsupportedStatistic {
	pub statistic: Statistic,
	pub category: &'static str,
}

/// A reference to another remote entity, such as the frame a block was computed on.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EntityRef {
	pub name: String,
}

impl Metrics {
	/// The `model_category` this block was tagged with.
	pub fn category(&self) -> &'static str {
		match self {
			Metrics::Regression(_) => "Regression",
			Metrics::Binomial(_) => "Binomial",
			Metrics::Multinomial(_) => "Multinomial",
			Metrics::Ordinal(_) => "Ordinal",
			Metrics::Clustering(_) => "Clustering",
			Metrics::AutoEncoder(_) => "AutoEncoder",
			Metrics::DimReduction(_) => "DimReduction",
			Metrics::Unknown(_) => "Unknown",
		}
	}

	/// Retrieve a single statistic. `Ok(None)` means the category defines the statistic but the server did not report it.
	pub fn statistic(&self, statistic: Statistic) -> Result<Option<f64>, UnsupportedStatistic> {
		let value = match self {
			Metrics::Regression(m) => m.get(statistic),
			Metrics::Binomial(m) => m.get(statistic),
			Metrics::Multinomial(m) => m.get(statistic),
			Metrics::Ordinal(m) => m.get(statistic),
			Metrics::Clustering(m) => m.get(statistic),
			Metrics::AutoEncoder(m) => m.get(statistic),
			Metrics::DimReduction(m) => m.get(statistic),
			Metrics::Unknown(m) => m.get(statistic),
		};
		value.ok_or(UnsupportedStatistic {
			statistic,
			category: self.category(),
		})
	}

	/// The name of the frame this block was computed on, if the server reported one.
	pub fn frame_name(&self) -> Option<&str> {
		let frame = match self {
			Metrics::Regression(m) => &m.frame,
			Metrics::Binomial(m) => &m.frame,
			Metrics::Multinomial(m) => &m.frame,
			Metrics::Ordinal(m) => &m.frame,
			Metrics::Clustering(m) => &m.frame,
			Metrics::AutoEncoder(m) => &m.frame,
			Metrics::DimReduction(m) => &m.frame,
			Metrics::Unknown(m) => &m.frame,
		};
		frame.as_ref().map(|frame| frame.name.as_str())
	}
}

impl<'de> serde::Deserialize<'de> for Metrics {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let value = serde_json::Value::deserialize(deserializer)?;
		let category = value
			.get("model_category")
			.and_then(|category| category.as_str())
			.unwrap_or("Unknown")
			.to_owned();
		let metrics = match category.as_str() {
			"Regression" => serde_json::from_value(value).map(Metrics::Regression),
			"Binomial" => serde_json::from_value(value).map(Metrics::Binomial),
			"Multinomial" => serde_json::from_value(value).map(Metrics::Multinomial),
			"Ordinal" => serde_json::from_value(value).map(Metrics::Ordinal),
			"Clustering" => serde_json::from_value(value).map(Metrics::Clustering),
			"AutoEncoder" => serde_json::from_value(value).map(Metrics::AutoEncoder),
			"DimReduction" => serde_json::from_value(value).map(Metrics::DimReduction),
			_ => serde_json::from_value(value).map(Metrics::Unknown),
		};
		metrics.map_err(D::Error::custom)
	}
}

impl std::fmt::Display for Metrics {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "ModelMetrics{}", self.category())?;
		if let Some(frame_name) = self.frame_name() {
			writeln!(f, "** Reported on {} **", frame_name)?;
		}
		for statistic in Statistic::ALL.iter() {
			if let Ok(Some(value)) = self.statistic(*statistic) {
				writeln!(f, "{}: {}", statistic.label(), value)?;
			}
		}
		Ok(())
	}
}

#[test]
fn test_deserialize_by_category() {
	let metrics: Metrics = serde_json::from_str(
		r#"{"model_category": "Binomial", "MSE": 0.25, "AUC": 0.9, "Gini": 0.8, "logloss": "NaN"}"#,
	)
	.unwrap();
	assert_eq!(metrics.category(), "Binomial");
	assert_eq!(metrics.statistic(Statistic::Auc).unwrap(), Some(0.9));
	assert_eq!(metrics.statistic(Statistic::Gini).unwrap(), Some(0.8));
	assert!(metrics.statistic(Statistic::Logloss).unwrap().unwrap().is_nan());
	assert_eq!(metrics.statistic(Statistic::Mae), Err(UnsupportedStatistic {
		statistic: Statistic::Mae,
		category: "Binomial",
	}));
}

#[test]
fn test_missing_category_is_unknown() {
	let metrics: Metrics = serde_json::from_str(r#"{"MSE": 1.5, "RMSE": null}"#).unwrap();
	assert_eq!(metrics.category(), "Unknown");
	assert_eq!(metrics.statistic(Statistic::Mse).unwrap(), Some(1.5));
	assert_eq!(metrics.statistic(Statistic::Rmse).unwrap(), None);
	assert!(metrics.statistic(Statistic::R2).is_err());
}

#[test]
fn test_display() {
	let metrics: Metrics = serde_json::from_str(
		r#"{"model_category": "Regression", "frame": {"name": "train.hex"}, "MSE": 0.5, "RMSE": 0.25, "r2": 0.75}"#,
	)
	.unwrap();
	insta::assert_snapshot!(metrics.to_string(), @r###"
 ModelMetricsRegression
 ** Reported on train.hex **
 MSE: 0.5
 RMSE: 0.25
 R^2: 0.75
 "###);
}
