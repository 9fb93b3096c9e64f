use hmac::{Hmac, Mac};
use sha1::Sha1;
use thiserror::Error;

type HmacSha1 = Hmac<Sha1>;

#[derive(Debug, Error)]
pub enum SignatureError {
	#[error("invalid signing key")]
	InvalidKey,
}

/// HMAC-SHA1 bearer signature over the payload's UTF-8 text.
///
/// The MAC is rendered as a big-endian unsigned integer in lowercase hex:
/// leading zero bytes are dropped by the integer rendering, and a single `0`
/// is prepended when the digit count comes out odd, so the result is always
/// even-length.
pub fn sign(payload: &[u8], secret: &str) -> Result<String, SignatureError> {
	let mut mac =
		HmacSha1::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::InvalidKey)?;

	// Invalid UTF-8 is replaced rather than rejected, matching the lossy
	// text decode the payload gets elsewhere in the pipeline.
	mac.update(String::from_utf8_lossy(payload).as_bytes());

	Ok(bigint_hex(mac.finalize().into_bytes().as_slice()))
}

fn bigint_hex(bytes: &[u8]) -> String {
	let mut digits = String::with_capacity(bytes.len() * 2);
	let mut bytes = bytes.iter().skip_while(|byte| **byte == 0);

	match bytes.next() {
		Some(first) => {
			digits.push_str(&format!("{first:x}"));
			for byte in bytes {
				digits.push_str(&format!("{byte:02x}"));
			}
		}
		None => digits.push('0'),
	}

	if digits.len() % 2 != 0 {
		digits.insert(0, '0');
	}

	digits
}
