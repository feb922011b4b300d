/*!
Metric selection. Every scalar metric accessor resolves which metric blocks to read the same way: each requested role maps to its block, and when no role is requested the training block is the default.
*/

use crate::{document::ModelOutput, error::Error};
use anyhow::Result;
use remodel_metrics::{Metrics, Role, Statistic};
use std::collections::BTreeMap;

/// Which datasets a metric should be reported for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Roles {
	pub train: bool,
	pub valid: bool,
	pub xval: bool,
}

impl Roles {
	pub fn train() -> Self {
		Roles {
			train: true,
			..Default::default()
		}
	}

	pub fn valid() -> Self {
		Roles {
			valid: true,
			..Default::default()
		}
	}

	pub fn xval() -> Self {
		Roles {
			xval: true,
			..Default::default()
		}
	}

	pub fn all() -> Self {
		Roles {
			train: true,
			valid: true,
			xval: true,
		}
	}

	/// The roles requested, or only the training role when none is.
	pub fn resolve(self) -> Vec<Role> {
		let mut roles = Vec::new();
		if self.train {
			roles.push(Role::Train);
		}
		if self.valid {
			roles.push(Role::Valid);
		}
		if self.xval {
			roles.push(Role::Xval);
		}
		if roles.is_empty() {
			roles.push(Role::Train);
		}
		roles
	}

	/**
	Resolve to exactly one role for accessors that report a single value, such as the deviances. Cross-validation is not supported by these accessors. When both the training and validation roles are requested, training wins.
	*/
	pub fn resolve_single(self) -> Result<Role> {
		if self.xval {
			return Err(Error::UnsupportedOperation(
				"cross-validation metrics are not available for deviances or degrees of freedom"
					.to_owned(),
			)
			.into());
		}
		if self.valid && !self.train {
			Ok(Role::Valid)
		} else {
			Ok(Role::Train)
		}
	}
}

/// A statistic reported for one role, or for several roles keyed by role.
#[derive(Debug, Clone, PartialEq)]
pub enum RoleValue<T> {
	Single(Option<T>),
	ByRole(BTreeMap<Role, Option<T>>),
}

impl<T> RoleValue<T> {
	fn from_map(map: BTreeMap<Role, Option<T>>) -> Self {
		let mut entries = map.into_iter();
		match (entries.next(), entries.next()) {
			(Some((_, value)), None) => RoleValue::Single(value),
			(first, second) => RoleValue::ByRole(first.into_iter().chain(second).chain(entries).collect()),
		}
	}

	/// The value when a single role was resolved.
	pub fn single(&self) -> Option<&Option<T>> {
		match self {
			RoleValue::Single(value) => Some(value),
			RoleValue::ByRole(_) => None,
		}
	}

	pub fn get(&self, role: Role) -> Option<&T> {
		match self {
			RoleValue::Single(value) => value.as_ref(),
			RoleValue::ByRole(map) => map.get(&role).and_then(|value| value.as_ref()),
		}
	}
}

impl<T: std::fmt::Display> std::fmt::Display for RoleValue<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		fn write_value<T: std::fmt::Display>(
			f: &mut std::fmt::Formatter<'_>,
			value: &Option<T>,
		) -> std::fmt::Result {
			match value {
				Some(value) => write!(f, "{}", value),
				None => write!(f, "none"),
			}
		}
		match self {
			RoleValue::Single(value) => write_value(f, value),
			RoleValue::ByRole(map) => {
				for (i, (role, value)) in map.iter().enumerate() {
					if i > 0 {
						writeln!(f)?;
					}
					write!(f, "{}: ", role)?;
					write_value(f, value)?;
				}
				Ok(())
			}
		}
	}
}

/// Map each resolved role to its metric block, `None` where the server never computed one.
pub fn select_metrics(output: &ModelOutput, roles: Roles) -> BTreeMap<Role, Option<&Metrics>> {
	roles
		.resolve()
		.into_iter()
		.map(|role| (role, output.metrics(role)))
		.collect()
}

/// Read `statistic` from every selected block. Fails if a present block's category does not define the statistic.
pub fn metric_value(
	output: &ModelOutput,
	roles: Roles,
	statistic: Statistic,
) -> Result<RoleValue<f64>> {
	let mut values = BTreeMap::new();
	for (role, metrics) in select_metrics(output, roles) {
		let value = match metrics {
			Some(metrics) => metrics.statistic(statistic).map_err(Error::from)?,
			None => None,
		};
		values.insert(role, value);
	}
	Ok(RoleValue::from_map(values))
}

/// Read `statistic` from the single role `roles` resolves to. Blocks that do not report the statistic read as `None`.
pub fn single_role_value(
	output: &ModelOutput,
	roles: Roles,
	statistic: Statistic,
) -> Result<Option<f64>> {
	let role = roles.resolve_single()?;
	let value = output
		.metrics(role)
		.and_then(|metrics| metrics.statistic(statistic).ok())
		.flatten();
	Ok(value)
}

#[cfg(test)]
fn output() -> ModelOutput {
	serde_json::from_value(serde_json::json!({
		"model_category": "Regression",
		"training_metrics": {
			"model_category": "Regression",
			"MSE": 0.5,
			"residual_deviance": 12.0,
		},
		"validation_metrics": {
			"model_category": "Regression",
			"MSE": 0.75,
			"residual_deviance": 15.0,
		},
		"cross_validation_metrics": null,
	}))
	.unwrap()
}

#[test]
fn test_resolve_every_combination() {
	for &train in [false, true].iter() {
		for &valid in [false, true].iter() {
			for &xval in [false, true].iter() {
				let roles = Roles { train, valid, xval };
				let mut expected = Vec::new();
				if train {
					expected.push(Role::Train);
				}
				if valid {
					expected.push(Role::Valid);
				}
				if xval {
					expected.push(Role::Xval);
				}
				if expected.is_empty() {
					expected.push(Role::Train);
				}
				assert_eq!(roles.resolve(), expected);
			}
		}
	}
}

#[test]
fn test_resolve_single() {
	for &train in [false, true].iter() {
		for &valid in [false, true].iter() {
			let roles = Roles {
				train,
				valid,
				xval: true,
			};
			let error = roles.resolve_single().unwrap_err();
			assert!(matches!(
				error.downcast_ref::<Error>(),
				Some(Error::UnsupportedOperation(_))
			));
		}
	}
	assert_eq!(Roles::default().resolve_single().unwrap(), Role::Train);
	assert_eq!(Roles::train().resolve_single().unwrap(), Role::Train);
	assert_eq!(Roles::valid().resolve_single().unwrap(), Role::Valid);
	let both = Roles {
		train: true,
		valid: true,
		xval: false,
	};
	assert_eq!(both.resolve_single().unwrap(), Role::Train);
	assert_eq!(both.resolve(), vec![Role::Train, Role::Valid]);
}

#[test]
fn test_metric_value() {
	let output = output();
	assert_eq!(
		metric_value(&output, Roles::default(), Statistic::Mse).unwrap(),
		RoleValue::Single(Some(0.5))
	);
	assert_eq!(
		metric_value(&output, Roles::xval(), Statistic::Mse).unwrap(),
		RoleValue::Single(None)
	);
	assert_eq!(
		metric_value(&output, Roles::all(), Statistic::Mse).unwrap(),
		RoleValue::ByRole(maplit::btreemap! {
			Role::Train => Some(0.5),
			Role::Valid => Some(0.75),
			Role::Xval => None,
		})
	);
	let error = metric_value(&output, Roles::default(), Statistic::Auc).unwrap_err();
	assert_eq!(
		error.to_string(),
		"unsupported operation: auc is not defined for Regression metrics"
	);
}

#[test]
fn test_single_role_value() {
	let output = output();
	let both = Roles {
		train: true,
		valid: true,
		xval: false,
	};
	assert_eq!(
		single_role_value(&output, both, Statistic::ResidualDeviance).unwrap(),
		Some(12.0)
	);
	assert_eq!(
		single_role_value(&output, Roles::valid(), Statistic::ResidualDeviance).unwrap(),
		Some(15.0)
	);
	assert_eq!(
		single_role_value(&output, Roles::default(), Statistic::Auc).unwrap(),
		None
	);
}

#[test]
fn test_display() {
	let value = RoleValue::ByRole(maplit::btreemap! {
		Role::Train => Some(0.5),
		Role::Valid => None,
	});
	assert_eq!(value.to_string(), "train: 0.5\nvalid: none");
	assert_eq!(RoleValue::Single(Some(1.5)).to_string(), "1.5");
}
