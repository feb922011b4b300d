use crate::{EntityRef, Statistic};

/// Metrics reported for a model predicting a number. Models fit as generalized linear models additionally report deviances and AIC.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct RegressionMetrics {
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
	pub mae: Option<f64>,
	#[serde(default, deserialize_with = "crate::number::deserialize")]
	pub rmsle: Option<f64>,
	#[serde(default, deserialize_with = "crate::number::deserialize")]
	pub r2: Option<f64>,
	#[serde(default, deserialize_with = "crate::number::deserialize")]
	pub mean_residual_deviance: Option<f64>,
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

impl RegressionMetrics {
	pub(crate) fn get(&self, statistic: Statistic) -> Option<Option<f64>> {
		match statistic {
			Statistic::Mse => Some(self.mse),
			Statistic::Rmse => Some(self.rmse),
			Statistic::Mae => Some(self.mae),
			Statistic::Rmsle => Some(self.rmsle),
			Statistic::R2 => Some(self.r2),
			Statistic::MeanResidualDeviance => Some(self.mean_residual_deviance),
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
fn test_glm_fields() {
	let metrics: RegressionMetrics = serde_json::from_str(
		r#"{
			"MSE": 4.0,
			"RMSE": 2.0,
			"mae": 1.5,
			"r2": 0.5,
			"AIC": 120.25,
			"residual_deviance": 80.0,
			"null_deviance": 160.0,
			"residual_degrees_of_freedom": 95,
			"null_degrees_of_freedom": 99,
			"nobs": 100
		}"#,
	)
	.unwrap();
	assert_eq!(metrics.get(Statistic::Aic), Some(Some(120.25)));
	assert_eq!(metrics.get(Statistic::ResidualDegreesOfFreedom), Some(Some(95.0)));
	assert_eq!(metrics.get(Statistic::Rmsle), Some(None));
	assert_eq!(metrics.get(Statistic::Logloss), None);
	assert_eq!(metrics.nobs, Some(100));
}
