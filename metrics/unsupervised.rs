use crate::{EntityRef, Statistic};

/// Reconstruction metrics reported for an autoencoder.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct AutoEncoderMetrics {
	#[serde(default)]
	pub frame: Option<EntityRef>,
	#[serde(default)]
	pub nobs: Option<u64>,
	#[serde(rename = "MSE", default, deserialize_with = "crate::number::deserialize")]
	pub mse: Option<f64>,
	#[serde(rename = "RMSE", default, deserialize_with = "crate::number::deserialize")]
	pub rmse: Option<f64>,
}

impl AutoEncoderMetrics {
	pub(crate) fn get(&self, statistic: Statistic) -> Option<Option<f64>> {
		match statistic {
			Statistic::Mse => Some(self.mse),
			Statistic::Rmse => Some(self.rmse),
			_ => None,
		}
	}
}

/// Reconstruction errors reported for a low rank model.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct DimReductionMetrics {
	#[serde(default)]
	pub frame: Option<EntityRef>,
	#[serde(default)]
	pub nobs: Option<u64>,
	#[serde(default, deserialize_with = "crate::number::deserialize")]
	pub numerr: Option<f64>,
	#[serde(default, deserialize_with = "crate::number::deserialize")]
	pub caterr: Option<f64>,
}

impl DimReductionMetrics {
	pub(crate) fn get(&self, statistic: Statistic) -> Option<Option<f64>> {
		match statistic {
			Statistic::NumErr => Some(self.numerr),
			Statistic::CatErr => Some(self.caterr),
			_ => None,
		}
	}
}

/// The fields every metric block carries, used for categories without a dedicated record.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct BaseMetrics {
	#[serde(default)]
	pub frame: Option<EntityRef>,
	#[serde(default)]
	pub nobs: Option<u64>,
	#[serde(rename = "MSE", default, deserialize_with = "crate::number::deserialize")]
	pub mse: Option<f64>,
	#[serde(rename = "RMSE", default, deserialize_with = "crate::number::deserialize")]
	pub rmse: Option<f64>,
}

impl BaseMetrics {
	pub(crate) fn get(&self, statistic: Statistic) -> Option<Option<f64>> {
		match statistic {
			Statistic::Mse => Some(self.mse),
			Statistic::Rmse => Some(self.rmse),
			_ => None,
		}
	}
}
