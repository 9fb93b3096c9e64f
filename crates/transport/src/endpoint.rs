use std::{
	fmt,
	net::{SocketAddr, ToSocketAddrs},
	str::FromStr,
};

use thiserror::Error;

/// A `"hostname:port"` destination.
///
/// The split happens on the LAST colon, so hostnames with embedded colons
/// keep their full host part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPort {
	pub host: String,
	pub port: u16,
}

#[derive(Debug, Error)]
pub enum HostPortParseError {
	#[error("missing ':' separator in '{0}'")]
	MissingSeparator(String),
	#[error("empty hostname in '{0}'")]
	EmptyHost(String),
	#[error("invalid port in '{0}'")]
	InvalidPort(String),
}

#[derive(Debug, Error)]
pub enum ResolveError {
	#[error("failed to resolve '{host}': {source}")]
	Lookup {
		host: String,
		#[source]
		source: std::io::Error,
	},
	#[error("'{host}' did not resolve to any address")]
	NoAddresses { host: String },
}

impl FromStr for HostPort {
	type Err = HostPortParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (host, port) = s
			.rsplit_once(':')
			.ok_or_else(|| HostPortParseError::MissingSeparator(s.to_string()))?;

		if host.is_empty() {
			return Err(HostPortParseError::EmptyHost(s.to_string()));
		}

		let port = port
			.parse::<u16>()
			.ok()
			.filter(|port| *port > 0)
			.ok_or_else(|| HostPortParseError::InvalidPort(s.to_string()))?;

		Ok(Self {
			host: host.to_string(),
			port,
		})
	}
}

impl fmt::Display for HostPort {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.host, self.port)
	}
}

impl HostPort {
	/// Resolve to the first address the system resolver returns.
	pub fn resolve(&self) -> Result<SocketAddr, ResolveError> {
		(self.host.as_str(), self.port)
			.to_socket_addrs()
			.map_err(|source| ResolveError::Lookup {
				host: self.host.clone(),
				source,
			})?
			.next()
			.ok_or_else(|| ResolveError::NoAddresses {
				host: self.host.clone(),
			})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn splits_on_the_last_colon() {
		let parsed = "fe80::1:9000".parse::<HostPort>().expect("parse");
		assert_eq!(parsed.host, "fe80::1");
		assert_eq!(parsed.port, 9000);
	}

	#[test]
	fn plain_host_and_port() {
		let parsed = "example.com:8080".parse::<HostPort>().expect("parse");
		assert_eq!(parsed.host, "example.com");
		assert_eq!(parsed.port, 8080);
		assert_eq!(parsed.to_string(), "example.com:8080");
	}

	#[test]
	fn rejects_malformed_destinations() {
		assert!(matches!(
			"example.com".parse::<HostPort>(),
			Err(HostPortParseError::MissingSeparator(_))
		));
		assert!(matches!(
			":8080".parse::<HostPort>(),
			Err(HostPortParseError::EmptyHost(_))
		));
		assert!(matches!(
			"example.com:".parse::<HostPort>(),
			Err(HostPortParseError::InvalidPort(_))
		));
		assert!(matches!(
			"example.com:http".parse::<HostPort>(),
			Err(HostPortParseError::InvalidPort(_))
		));
		assert!(matches!(
			"example.com:0".parse::<HostPort>(),
			Err(HostPortParseError::InvalidPort(_))
		));
		assert!(matches!(
			"example.com:70000".parse::<HostPort>(),
			Err(HostPortParseError::InvalidPort(_))
		));
	}

	#[test]
	fn errors_name_the_offending_input() {
		let err = "nope".parse::<HostPort>().expect_err("must fail");
		assert!(err.to_string().contains("nope"));
	}

	#[test]
	fn resolves_loopback() {
		let addr = HostPort {
			host: "localhost".into(),
			port: 80,
		}
		.resolve()
		.expect("resolve");
		assert!(addr.ip().is_loopback());
		assert_eq!(addr.port(), 80);
	}

	#[test]
	fn unresolvable_hosts_error() {
		assert!(HostPort {
			host: "host.invalid".into(),
			port: 80,
		}
		.resolve()
		.is_err());
	}
}
