/*!
This module defines the `Config` struct, which tells [`HttpService`](../http/struct.HttpService.html) where the cluster lives and how to talk to it.
*/

use anyhow::{Context, Result};
use std::{path::Path, time::Duration};

pub const DEFAULT_URL: &str = "http://localhost:54321";
const DEFAULT_POLL_INTERVAL_MS: u64 = 200;

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct Config {
	#[serde(default = "default_url")]
	pub url: String,
	pub username: Option<String>,
	pub password: Option<String>,
	pub timeout_secs: Option<u64>,
	pub poll_interval_ms: Option<u64>,
}

fn default_url() -> String {
	DEFAULT_URL.to_owned()
}

impl Default for Config {
	fn default() -> Self {
		Self {
			url: default_url(),
			username: None,
			password: None,
			timeout_secs: None,
			poll_interval_ms: None,
		}
	}
}

impl Config {
	/// Load a config from the yaml file at `path`. Json is valid yaml, so json files load too.
	pub fn from_path(path: &Path) -> Result<Self> {
		let config = std::fs::read_to_string(path)
			.with_context(|| format!("failed to read config file {}", path.display()))?;
		let config = serde_yaml::from_str(&config)
			.with_context(|| format!("failed to parse config file {}", path.display()))?;
		Ok(config)
	}

	/// The time to wait between two status checks of a remote job.
	pub fn poll_interval(&self) -> Duration {
		Duration::from_millis(self.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS))
	}

	pub fn timeout(&self) -> Option<Duration> {
		self.timeout_secs.map(Duration::from_secs)
	}
}

#[test]
fn test_parse_config() {
	let config: Config = serde_yaml::from_str(
		"
url: https://cluster.example.com:54321
username: analyst
poll_interval_ms: 50
",
	)
	.unwrap();
	assert_eq!(config.url, "https://cluster.example.com:54321");
	assert_eq!(config.username.as_deref(), Some("analyst"));
	assert_eq!(config.password, None);
	assert_eq!(config.poll_interval(), Duration::from_millis(50));
	assert_eq!(config.timeout(), None);
	let config: Config = serde_yaml::from_str("timeout_secs: 30").unwrap();
	assert_eq!(config.url, DEFAULT_URL);
	assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
}

#[test]
fn test_parse_json_config() {
	let config: Config =
		serde_yaml::from_str(r#"{"url": "http://10.0.0.5:54321", "poll_interval_ms": 10}"#).unwrap();
	assert_eq!(config.url, "http://10.0.0.5:54321");
	assert_eq!(config.poll_interval(), Duration::from_millis(10));
}
