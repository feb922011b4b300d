use crate::{EntityRef, Statistic};

/// Metrics reported for a two class classifier.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct BinomialMetrics {
	#[serde(default)]
	pub frame: Option<EntityRef>,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub nobs: Option<u64>,
	/// The class labels, negative class first.
	#[serde(default)]
	pub domain: Option<Vec<String>>,
	#[serde(rename = "MSE", default, deserialize_with = "crate::number::deserialize")]
	pub mse: Option<f64>,
	#[serde(rename = "RMSE", default, deserialize_with = "crate::number::deserialize")]
	pub rmse: Option<f64>,
	#[serde(default, deserialize_with = "crate::number::deserialize")]
	pub r2: Option<f64>,
	#[serde(default, deserialize_with = "crate::number::deserialize")]
	pub logloss: Option<f64>,
	#[serde(rename = "AUC", default, deserialize_with = "crate::number::deserialize")]
	pub auc: Option<f64>,
	#[serde(default, deserialize_with = "crate::number::deserialize")]
	pub pr_auc: Option<f64>,
	#[serde(rename = "Gini", default, deserialize_with = "crate::number::deserialize")]
	pub gini: Option<f64>,
	#[serde(default, deserialize_with = "crate::number::deserialize")]
	pub mean_per_class_error: Option<f64>,
	#[serde(rename = "AIC", default, deserialize_with = "crate::number::deserialize")]
	pub aic: Option<f64>,
	#[serde(default, deserialize_with = "crate::number::deserialize")]
	pub residual_deviance: Option<f64>,
	#[serde(default, deserialize_with = "crate::number::deserialize")]
	pub null_deviance: Option<f64>,
	#[serde(default, deserialize_with = "crate::number::deserialize")]
	pub residual_degrees_of_freedom: Option<f64>,
	#[serde(default, deserialize_with = "crate::number::deserialize")]
	pub null_degrees_of_freedom: Option<f64>,
}

impl BinomialMetrics {
	pub(crate) fn get(&self, statistic: Statistic) -> Option<Option<f64>> {
		match statistic {
			Statistic::Mse => Some(self.mse),
			Statistic::Rmse => Some(self.rmse),
			Statistic::R2 => Some(self.r2),
			Statistic::Logloss => Some(self.logloss),
			Statistic::Auc => Some(self.auc),
			Statistic::PrAuc => Some(self.pr_auc),
			Statistic::Gini => Some(self.gini),
			Statistic::MeanPerClassError => Some(self.mean_per_class_error),
			Statistic::Aic => Some(self.aic),
			Statistic::ResidualDeviance => Some(self.residual_deviance),
			Statistic::NullDeviance => Some(self.null_deviance),
			Statistic::ResidualDegreesOfFreedom => Some(self.residual_degrees_of_freedom),
			Statistic::NullDegreesOfFreedom => Some(self.null_degrees_of_freedom),
			_ => None,
		}
	}
}
