//! Blocking delivery of serialized notification payloads over UDP, TCP and
//! HTTP.
//!
//! Each send is a one-shot, blocking call: parse the destination, open a
//! transport-appropriate connection, write the payload, release the socket.
//! Nothing is pooled or retried here, and concurrent sends share no state.

mod config;
mod endpoint;
mod error;
mod http;
mod proxy;
mod signature;

use std::{
	io::Write,
	net::{Ipv4Addr, Ipv6Addr, Shutdown, SocketAddr, TcpStream, UdpSocket},
	time::Duration,
};

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tracing::{debug, trace};

pub use config::Endpoint;
pub use endpoint::{HostPort, HostPortParseError, ResolveError};
pub use error::{SendError, ValidateError};
pub use http::MAX_REDIRECT_HOPS;
pub use proxy::{EnvProxy, ProxyConfig, ProxySource};
pub use signature::{sign, SignatureError};

/// Wire transport a notification is delivered over.
///
/// A closed set; each variant carries its own `send` behaviour, and the plain
/// socket transports share `hostname:port` destination validation.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Protocol {
	Udp,
	Tcp,
	Http,
}

/// Content type a notification payload is declared as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFormat {
	#[default]
	Json,
	Xml,
}

impl PayloadFormat {
	pub fn content_type(&self) -> &'static str {
		match self {
			Self::Json => "application/json;charset=UTF-8",
			Self::Xml => "application/xml;charset=UTF-8",
		}
	}
}

/// Parameters of a single delivery. The payload is borrowed; this crate only
/// ever reads it.
#[derive(Debug, Clone, Copy)]
pub struct Delivery<'a> {
	pub payload: &'a [u8],
	/// Connect and read timeout. Zero means wait without bound.
	pub timeout: Duration,
	pub format: PayloadFormat,
	/// Shared secret for the bearer signature. `None` or blank disables
	/// signing.
	pub secret: Option<&'a str>,
}

impl Protocol {
	/// Validate `destination` without touching the network.
	///
	/// Intended to run at configuration time, so mistakes are caught before
	/// a send produces side effects.
	pub fn validate_url(&self, destination: &str) -> Result<(), ValidateError> {
		match self {
			Self::Udp | Self::Tcp => destination
				.parse::<HostPort>()
				.map(|_| ())
				.map_err(|source| ValidateError::HostPort {
					url: destination.to_string(),
					source,
				}),
			Self::Http => http::validate(destination),
		}
	}

	/// Deliver `delivery.payload` to `destination`, blocking until the
	/// transport has accepted the payload or failed.
	pub fn send(&self, destination: &str, delivery: &Delivery<'_>) -> Result<(), SendError> {
		self.send_with(destination, delivery, &EnvProxy)
	}

	/// Like [`Protocol::send`], but with an explicit proxy source so ambient
	/// environment state can be swapped out in tests. Only HTTP consults it.
	pub fn send_with(
		&self,
		destination: &str,
		delivery: &Delivery<'_>,
		proxy: &impl ProxySource,
	) -> Result<(), SendError> {
		match self {
			Self::Udp => send_udp(destination, delivery),
			Self::Tcp => send_tcp(destination, delivery),
			Self::Http => http::send(destination, delivery, proxy),
		}
	}
}

/// Fire-and-forget: one datagram, no timeout, no acknowledgment.
fn send_udp(destination: &str, delivery: &Delivery<'_>) -> Result<(), SendError> {
	let addr = destination.parse::<HostPort>()?.resolve()?;

	// The ephemeral socket's family has to match the resolved address.
	let socket = match addr {
		SocketAddr::V4(_) => UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)),
		SocketAddr::V6(_) => UdpSocket::bind((Ipv6Addr::UNSPECIFIED, 0)),
	}
	.map_err(SendError::Io)?;

	trace!("sending {} byte datagram to {addr}", delivery.payload.len());
	socket.send_to(delivery.payload, addr).map_err(SendError::Io)?;

	Ok(())
}

fn send_tcp(destination: &str, delivery: &Delivery<'_>) -> Result<(), SendError> {
	let addr = destination.parse::<HostPort>()?.resolve()?;

	let mut stream = if delivery.timeout.is_zero() {
		TcpStream::connect(addr)
	} else {
		TcpStream::connect_timeout(&addr, delivery.timeout)
	}
	.map_err(|source| SendError::Connect { addr, source })?;

	// The timeout also bounds reads, even though this path never reads.
	if !delivery.timeout.is_zero() {
		stream
			.set_read_timeout(Some(delivery.timeout))
			.map_err(SendError::Io)?;
	}

	stream.write_all(delivery.payload).map_err(SendError::Io)?;
	stream.flush().map_err(SendError::Io)?;
	stream.shutdown(Shutdown::Write).map_err(SendError::Io)?;

	debug!("wrote {} bytes to {addr}", delivery.payload.len());
	Ok(())
}
