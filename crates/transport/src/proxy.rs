use url::Url;

use crate::error::SendError;

/// Where HTTP proxy configuration comes from.
///
/// Process environment state is ambient; hiding it behind this seam keeps
/// the transport logic testable without mutating real env vars.
pub trait ProxySource {
	/// The proxy URL to route HTTP sends through, if any.
	fn http_proxy(&self) -> Option<String>;
}

/// Reads the conventional lowercase `http_proxy` variable. Empty counts as
/// unset.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvProxy;

impl ProxySource for EnvProxy {
	fn http_proxy(&self) -> Option<String> {
		std::env::var("http_proxy")
			.ok()
			.filter(|value| !value.is_empty())
	}
}

/// Connection parameters of a configured HTTP proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
	pub host: String,
	pub port: u16,
}

impl ProxyConfig {
	pub const DEFAULT_PORT: u16 = 80;

	/// Parse a proxy URL. The scheme must be http(s); a missing port falls
	/// back to [`ProxyConfig::DEFAULT_PORT`].
	pub fn parse(proxy_url: &str) -> Result<Self, SendError> {
		let url = Url::parse(proxy_url).map_err(|source| SendError::MalformedUrl {
			url: proxy_url.to_string(),
			source,
		})?;

		if !url.scheme().starts_with("http") {
			return Err(SendError::Scheme {
				url: proxy_url.to_string(),
			});
		}

		let host = url.host_str().ok_or_else(|| SendError::ProxyHost {
			url: proxy_url.to_string(),
		})?;

		Ok(Self {
			host: host.to_string(),
			port: url.port().unwrap_or(Self::DEFAULT_PORT),
		})
	}

	pub fn to_url(&self) -> String {
		format!("http://{}:{}", self.host, self.port)
	}
}
