/// The dataset a metric block was computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum Role {
	#[serde(rename = "train")]
	Train,
	#[serde(rename = "valid")]
	Valid,
	#[serde(rename = "xval")]
	Xval,
}

impl Role {
	pub const ALL: [Role; 3] = [Role::Train, Role::Valid, Role::Xval];
}

impl std::fmt::Display for Role {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			Role::Train => "train",
			Role::Valid => "valid",
			Role::Xval => "xval",
		};
		write!(f, "{}", s)
	}
}
