use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Delivery, PayloadFormat, Protocol, SendError, ValidateError};

/// A configured notification target: where to send, over which transport,
/// and how each delivery is dressed up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
	pub protocol: Protocol,
	pub url: String,
	#[serde(default)]
	pub format: PayloadFormat,
	#[serde(default = "default_timeout_millis")]
	pub timeout_millis: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub secret: Option<String>,
}

fn default_timeout_millis() -> u64 {
	30_000
}

impl Endpoint {
	/// Check the destination shape against the configured transport.
	pub fn validate(&self) -> Result<(), ValidateError> {
		self.protocol.validate_url(&self.url)
	}

	pub fn timeout(&self) -> Duration {
		Duration::from_millis(self.timeout_millis)
	}

	/// One blocking delivery of `payload` to this endpoint.
	pub fn deliver(&self, payload: &[u8]) -> Result<(), SendError> {
		self.protocol.send(
			&self.url,
			&Delivery {
				payload,
				timeout: self.timeout(),
				format: self.format,
				secret: self.secret.as_deref(),
			},
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn deserializes_with_defaults() {
		let endpoint: Endpoint =
			serde_json::from_str(r#"{"protocol": "http", "url": "http://example.com/hook"}"#)
				.expect("deserialize");

		assert_eq!(endpoint.protocol, Protocol::Http);
		assert_eq!(endpoint.format, PayloadFormat::Json);
		assert_eq!(endpoint.timeout(), Duration::from_millis(30_000));
		assert!(endpoint.secret.is_none());
		endpoint.validate().expect("valid");
	}

	#[test]
	fn full_descriptor() {
		let endpoint: Endpoint = serde_json::from_str(
			r#"{
				"protocol": "tcp",
				"url": "logs.lan:7000",
				"format": "xml",
				"timeoutMillis": 500,
				"secret": "s3cr3t"
			}"#,
		)
		.expect("deserialize");

		assert_eq!(endpoint.protocol, Protocol::Tcp);
		assert_eq!(endpoint.format, PayloadFormat::Xml);
		assert_eq!(endpoint.timeout(), Duration::from_millis(500));
		assert_eq!(endpoint.secret.as_deref(), Some("s3cr3t"));
		endpoint.validate().expect("valid");
	}

	#[test]
	fn validate_rejects_mismatched_shapes() {
		let endpoint = Endpoint {
			protocol: Protocol::Udp,
			url: "http://example.com/hook".into(),
			format: PayloadFormat::Json,
			timeout_millis: 1000,
			secret: None,
		};

		assert!(endpoint.validate().is_err());
	}
}
