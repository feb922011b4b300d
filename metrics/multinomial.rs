use crate::{EntityRef, Statistic};

/// Metrics reported for a classifier with more than two classes. Ordinal models report the same block.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct MultinomialMetrics {
	#[serde(default)]
	pub frame: Option<EntityRef>,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub nobs: Option<u64>,
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

impl MultinomialMetrics {
	pub(crate) fn get(&self, statistic: Statistic) -> Option<Option<f64>> {
		match statistic {
			Statistic::Mse => Some(self.mse),
			Statistic::Rmse => Some(self.rmse),
			Statistic::R2 => Some(self.r2),
			Statistic::Logloss => Some(self.logloss),
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

#[test]
fn test_auc_is_not_defined() {
	let metrics: MultinomialMetrics =
		serde_json::from_str(r#"{"logloss": 0.4, "domain": ["a", "b", "c"]}"#).unwrap();
	assert_eq!(metrics.get(Statistic::Logloss), Some(Some(0.4)));
	assert_eq!(metrics.get(Statistic::Auc), None);
	assert_eq!(metrics.domain.unwrap().len(), 3);
}
