use std::net::SocketAddr;

use thiserror::Error;

use crate::{
	endpoint::{HostPortParseError, ResolveError},
	signature::SignatureError,
};

/// Eager destination validation failure, produced without any network side
/// effect.
#[derive(Debug, Error)]
pub enum ValidateError {
	#[error("invalid URL '{url}', use hostname:port for the endpoint")]
	HostPort {
		url: String,
		#[source]
		source: HostPortParseError,
	},
	#[error("invalid URL '{url}', use http://hostname:port/path for the endpoint")]
	Url {
		url: String,
		#[source]
		source: url::ParseError,
	},
	#[error("not an http(s) url: '{url}'")]
	Scheme { url: String },
}

/// Everything that can go wrong during a single blocking send.
#[derive(Debug, Error)]
pub enum SendError {
	#[error(transparent)]
	Endpoint(#[from] HostPortParseError),
	#[error(transparent)]
	Resolve(#[from] ResolveError),
	#[error("malformed URL '{url}': {source}")]
	MalformedUrl {
		url: String,
		#[source]
		source: url::ParseError,
	},
	#[error("not an http(s) url: '{url}'")]
	Scheme { url: String },
	#[error("proxy url '{url}' has no host")]
	ProxyHost { url: String },
	#[error("failed to connect to {addr}: {source}")]
	Connect {
		addr: SocketAddr,
		#[source]
		source: std::io::Error,
	},
	#[error("i/o error: {0}")]
	Io(#[from] std::io::Error),
	#[error(transparent)]
	Http(#[from] reqwest::Error),
	#[error(transparent)]
	Signature(#[from] SignatureError),
	#[error("redirected more than {0} times")]
	TooManyRedirects(u8),
	#[error("307 response from '{url}' is missing a Location header")]
	MissingLocation { url: String },
}
