/// A named scalar a metric block may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Statistic {
	Mse,
	Rmse,
	Mae,
	Rmsle,
	R2,
	MeanResidualDeviance,
	Logloss,
	Auc,
	PrAuc,
	Gini,
	MeanPerClassError,
	Aic,
	ResidualDeviance,
	NullDeviance,
	ResidualDegreesOfFreedom,
	NullDegreesOfFreedom,
	TotWithinss,
	Betweenss,
	Totss,
	NumErr,
	CatErr,
}

impl Statistic {
	pub const ALL: [Statistic; 21] = [
		Statistic::Mse,
		Statistic::Rmse,
		Statistic::Mae,
		Statistic::Rmsle,
		Statistic::R2,
		Statistic::MeanResidualDeviance,
		Statistic::Logloss,
		Statistic::Auc,
		Statistic::PrAuc,
		Statistic::Gini,
		Statistic::MeanPerClassError,
		Statistic::Aic,
		Statistic::ResidualDeviance,
		Statistic::NullDeviance,
		Statistic::ResidualDegreesOfFreedom,
		Statistic::NullDegreesOfFreedom,
		Statistic::TotWithinss,
		Statistic::Betweenss,
		Statistic::Totss,
		Statistic::NumErr,
		Statistic::CatErr,
	];

	/// The label used when printing a metric block.
	pub fn label(self) -> &'static str {
		match self {
			Statistic::Mse => "MSE",
			Statistic::Rmse => "RMSE",
			Statistic::Mae => "MAE",
			Statistic::Rmsle => "RMSLE",
			Statistic::R2 => "R^2",
			Statistic::MeanResidualDeviance => "Mean Residual Deviance",
			Statistic::Logloss => "LogLoss",
			Statistic::Auc => "AUC",
			Statistic::PrAuc => "AUCPR",
			Statistic::Gini => "Gini",
			Statistic::MeanPerClassError => "Mean Per-Class Error",
			Statistic::Aic => "AIC",
			Statistic::ResidualDeviance => "Residual Deviance",
			Statistic::NullDeviance => "Null Deviance",
			Statistic::ResidualDegreesOfFreedom => "Residual D.o.F.",
			Statistic::NullDegreesOfFreedom => "Null D.o.F.",
			Statistic::TotWithinss => "Total Within Cluster Sum of Square Error",
			Statistic::Betweenss => "Between Cluster Sum of Square Error",
			Statistic::Totss => "Total Sum of Square Error",
			Statistic::NumErr => "Numeric Error",
			Statistic::CatErr => "Categorical Error",
		}
	}
}

impl std::fmt::Display for Statistic {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			Statistic::Mse => "mse",
			Statistic::Rmse => "rmse",
			Statistic::Mae => "mae",
			Statistic::Rmsle => "rmsle",
			Statistic::R2 => "r2",
			Statistic::MeanResidualDeviance => "mean_residual_deviance",
			Statistic::Logloss => "logloss",
			Statistic::Auc => "auc",
			Statistic::PrAuc => "pr_auc",
			Statistic::Gini => "gini",
			Statistic::MeanPerClassError => "mean_per_class_error",
			Statistic::Aic => "aic",
			Statistic::ResidualDeviance => "residual_deviance",
			Statistic::NullDeviance => "null_deviance",
			Statistic::ResidualDegreesOfFreedom => "residual_degrees_of_freedom",
			Statistic::NullDegreesOfFreedom => "null_degrees_of_freedom",
			Statistic::TotWithinss => "tot_withinss",
			Statistic::Betweenss => "betweenss",
			Statistic::Totss => "totss",
			Statistic::NumErr => "numerr",
			Statistic::CatErr => "caterr",
		};
		write!(f, "{}", s)
	}
}

#[derive(Debug, thiserror::Error)]
#[error("unknown statistic {0:?}")]
pub struct ParseStatisticError(pub String);

impl std::str::FromStr for Statistic {
	type Err = ParseStatisticError;
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Statistic::ALL
			.iter()
			.copied()
			.find(|statistic| statistic.to_string() == s)
			.ok_or_else(|| ParseStatisticError(s.to_owned()))
	}
}

#[test]
fn test_parse() {
	assert_eq!("mse".parse::<Statistic>().unwrap(), Statistic::Mse);
	assert_eq!(
		"mean_residual_deviance".parse::<Statistic>().unwrap(),
		Statistic::MeanResidualDeviance
	);
	assert!("MSE".parse::<Statistic>().is_err());
}
