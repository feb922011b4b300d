/// The algorithm a model was built with, as named by the document's `algo` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Algorithm {
	Glm,
	Gbm,
	Drf,
	DeepLearning,
	DeepWater,
	Glrm,
	KMeans,
	Pca,
	NaiveBayes,
	StackedEnsemble,
	XGBoost,
	Other(String),
}

impl Algorithm {
	pub fn from_name(name: &str) -> Self {
		match name {
			"glm" => Algorithm::Glm,
			"gbm" => Algorithm::Gbm,
			"drf" => Algorithm::Drf,
			"deeplearning" => Algorithm::DeepLearning,
			"deepwater" => Algorithm::DeepWater,
			"glrm" => Algorithm::Glrm,
			"kmeans" => Algorithm::KMeans,
			"pca" => Algorithm::Pca,
			"naivebayes" => Algorithm::NaiveBayes,
			"stackedensemble" => Algorithm::StackedEnsemble,
			"xgboost" => Algorithm::XGBoost,
			name => Algorithm::Other(name.to_owned()),
		}
	}

	pub fn name(&self) -> &str {
		match self {
			Algorithm::Glm => "glm",
			Algorithm::Gbm => "gbm",
			Algorithm::Drf => "drf",
			Algorithm::DeepLearning => "deeplearning",
			Algorithm::DeepWater => "deepwater",
			Algorithm::Glrm => "glrm",
			Algorithm::KMeans => "kmeans",
			Algorithm::Pca => "pca",
			Algorithm::NaiveBayes => "naivebayes",
			Algorithm::StackedEnsemble => "stackedensemble",
			Algorithm::XGBoost => "xgboost",
			Algorithm::Other(name) => name,
		}
	}

	/// Whether the cluster can export models built with this algorithm as a MOJO.
	pub fn supports_mojo(&self) -> bool {
		matches!(
			self,
			Algorithm::Drf
				| Algorithm::Gbm
				| Algorithm::DeepWater
				| Algorithm::Glrm
				| Algorithm::Glm
		)
	}

	/// The name used in chart titles.
	pub fn display_name(&self) -> &str {
		match self {
			Algorithm::Gbm => "GBM",
			Algorithm::Drf => "DRF",
			Algorithm::DeepLearning => "Deep Learning",
			Algorithm::Glm => "GLM",
			algorithm => algorithm.name(),
		}
	}
}

impl std::fmt::Display for Algorithm {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.name())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimatorType {
	Regressor,
	Classifier,
	Unsupervised,
}

impl EstimatorType {
	pub fn from_model_category(model_category: &str) -> Self {
		match model_category {
			"Regression" => EstimatorType::Regressor,
			"Binomial" | "Multinomial" | "Ordinal" => EstimatorType::Classifier,
			_ => EstimatorType::Unsupervised,
		}
	}
}

impl std::fmt::Display for EstimatorType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			EstimatorType::Regressor => "regressor",
			EstimatorType::Classifier => "classifier",
			EstimatorType::Unsupervised => "unsupervised",
		};
		write!(f, "{}", s)
	}
}

#[test]
fn test_from_name() {
	assert_eq!(Algorithm::from_name("gbm"), Algorithm::Gbm);
	assert_eq!(
		Algorithm::from_name("isolationforest"),
		Algorithm::Other("isolationforest".to_owned())
	);
	assert_eq!(Algorithm::from_name("deeplearning").name(), "deeplearning");
}

#[test]
fn test_supports_mojo() {
	let supported = ["drf", "gbm", "deepwater", "glrm", "glm"];
	for name in supported.iter() {
		assert!(Algorithm::from_name(name).supports_mojo());
	}
	for name in ["deeplearning", "kmeans", "pca", "naivebayes"].iter() {
		assert!(!Algorithm::from_name(name).supports_mojo());
	}
}

#[test]
fn test_estimator_type() {
	assert_eq!(
		EstimatorType::from_model_category("Binomial"),
		EstimatorType::Classifier
	);
	assert_eq!(
		EstimatorType::from_model_category("Regression"),
		EstimatorType::Regressor
	);
	assert_eq!(
		EstimatorType::from_model_category("Clustering"),
		EstimatorType::Unsupervised
	);
}
