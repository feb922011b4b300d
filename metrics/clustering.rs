use crate::{EntityRef, Statistic};

/// Metrics reported for a clustering model such as k-means.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct ClusteringMetrics {
	#[serde(default)]
	pub frame: Option<EntityRef>,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub nobs: Option<u64>,
	#[serde(rename = "MSE", default, deserialize_with = "crate::number::deserialize")]
	pub mse: Option<f64>,
	#[serde(rename = "RMSE", default, deserialize_with = "crate::number::deserialize")]
	pub rmse: Option<f64>,
	#[serde(default, deserialize_with = "crate::number::deserialize")]
	pub tot_withinss: Option<f64>,
	#[serde(default, deserialize_with = "crate::number::deserialize")]
	pub betweenss: Option<f64>,
	#[serde(default, deserialize_with = "crate::number::deserialize")]
	pub totss: Option<f64>,
}

impl ClusteringMetrics {
	pub(crate) fn get(&self, statistic: Statistic) -> Option<Option<f64>> {
		match statistic {
			Statistic::Mse => Some(self.mse),
			Statistic::Rmse => Some(self.rmse),
			Statistic::TotWithinss => Some(self.tot_withinss),
			Statistic::Betweenss => Some(self.betweenss),
			Statistic::Totss => Some(self.totss),
			_ => None,
		}
	}
}
