use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{
	blocking::{Client, Response},
	header, redirect, StatusCode,
};
use tracing::{debug, warn};
use url::Url;

use crate::{
	error::{SendError, ValidateError},
	proxy::{ProxyConfig, ProxySource},
	signature, Delivery,
};

/// 307 hops followed before a send gives up.
pub const MAX_REDIRECT_HOPS: u8 = 5;

pub(crate) fn validate(destination: &str) -> Result<(), ValidateError> {
	let url = Url::parse(destination).map_err(|source| ValidateError::Url {
		url: destination.to_string(),
		source,
	})?;

	if !url.scheme().starts_with("http") {
		return Err(ValidateError::Scheme {
			url: destination.to_string(),
		});
	}

	Ok(())
}

fn parse_target(destination: &str) -> Result<Url, SendError> {
	let url = Url::parse(destination).map_err(|source| SendError::MalformedUrl {
		url: destination.to_string(),
		source,
	})?;

	if !url.scheme().starts_with("http") {
		return Err(SendError::Scheme {
			url: destination.to_string(),
		});
	}

	Ok(url)
}

pub(crate) fn send(
	destination: &str,
	delivery: &Delivery<'_>,
	proxy: &impl ProxySource,
) -> Result<(), SendError> {
	let client = build_client(delivery.timeout, proxy)?;
	let mut url = parse_target(destination)?;

	for _ in 0..=MAX_REDIRECT_HOPS {
		let response = dispatch(&client, &url, delivery)?;

		if response.status() != StatusCode::TEMPORARY_REDIRECT {
			debug!("{url} responded {}", response.status());
			return Ok(());
		}

		let location = response
			.headers()
			.get(header::LOCATION)
			.and_then(|value| value.to_str().ok())
			.map(ToString::to_string)
			.ok_or_else(|| SendError::MissingLocation {
				url: url.to_string(),
			})?;
		drop(response);

		warn!("{url} redirected to {location}");
		url = parse_target(&location)?;
	}

	Err(SendError::TooManyRedirects(MAX_REDIRECT_HOPS))
}

fn build_client(timeout: Duration, proxy: &impl ProxySource) -> Result<Client, SendError> {
	let mut builder = Client::builder().redirect(redirect::Policy::none());

	// Zero keeps the wait unbounded.
	if !timeout.is_zero() {
		builder = builder.connect_timeout(timeout).timeout(timeout);
	}

	builder = match proxy.http_proxy() {
		Some(proxy_url) => {
			let proxy = ProxyConfig::parse(&proxy_url)?;
			debug!("proxying through {}:{}", proxy.host, proxy.port);
			builder.proxy(reqwest::Proxy::all(proxy.to_url())?)
		}
		// The proxy decision belongs to the ProxySource seam; keep reqwest
		// from reading the process environment on its own.
		None => builder.no_proxy(),
	};

	builder.build().map_err(SendError::Http)
}

fn dispatch(client: &Client, url: &Url, delivery: &Delivery<'_>) -> Result<Response, SendError> {
	// Credentials move from the URL into an Authorization header; the
	// request itself goes out without user-info.
	let mut target = url.clone();
	let userinfo = match (target.username(), target.password()) {
		("", None) => None,
		(username, None) => Some(username.to_string()),
		(username, Some(password)) => Some(format!("{username}:{password}")),
	};
	let _ = target.set_username("");
	let _ = target.set_password(None);

	// A bearer signature takes precedence over URL credentials; the header
	// is replaced, never doubled up.
	let secret = delivery.secret.filter(|secret| !secret.trim().is_empty());
	let authorization = match secret {
		Some(secret) => Some(format!(
			"Bearer {}",
			signature::sign(delivery.payload, secret)?
		)),
		None => userinfo.map(|userinfo| format!("Basic {}", STANDARD.encode(userinfo.as_bytes()))),
	};

	let mut request = client
		.post(target)
		.header(header::CONTENT_TYPE, delivery.format.content_type())
		.body(delivery.payload.to_vec());

	if let Some(authorization) = authorization {
		request = request.header(header::AUTHORIZATION, authorization);
	}

	request.send().map_err(SendError::Http)
}
