//! Webhook Signature Verification
//!
//! The provider signs the raw request body with HMAC-SHA256 over
//! `"{timestamp}.{body}"` and sends `t=<unix>,v1=<hex>` in a header.
//! Verification is local and CPU-bound; an unverifiable payload is never
//! parsed or persisted.

use platform::crypto::{constant_time_eq, from_hex, hmac_sha256};

/// Parsed signature header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    pub timestamp: i64,
    /// All `v1` candidates (the provider may send several during secret rotation)
    pub signatures: Vec<String>,
}

/// Parse a `t=<unix>,v1=<hex>[,v1=<hex>...]` header
pub fn parse_header(header: &str) -> Option<SignatureHeader> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let (key, value) = part.trim().split_once('=')?;
        match key {
            "t" => timestamp = Some(value.parse::<i64>().ok()?),
            "v1" => signatures.push(value.to_string()),
            // Other schemes (v0 test signatures) are ignored
            _ => {}
        }
    }

    let timestamp = timestamp?;
    if signatures.is_empty() {
        return None;
    }
    Some(SignatureHeader {
        timestamp,
        signatures,
    })
}

/// Verify a signature header against the raw body
///
/// `now` and `tolerance_secs` bound replay: a timestamp outside the window
/// fails even with a valid MAC.
pub fn verify(
    secret: &[u8],
    raw_body: &[u8],
    header: &str,
    now: i64,
    tolerance_secs: i64,
) -> bool {
    let Some(parsed) = parse_header(header) else {
        return false;
    };

    if (now - parsed.timestamp).abs() > tolerance_secs {
        return false;
    }

    let mut signed_payload = Vec::with_capacity(raw_body.len() + 16);
    signed_payload.extend_from_slice(parsed.timestamp.to_string().as_bytes());
    signed_payload.push(b'.');
    signed_payload.extend_from_slice(raw_body);
    let expected = hmac_sha256(secret, &signed_payload);

    parsed.signatures.iter().any(|candidate| {
        from_hex(candidate)
            .map(|bytes| constant_time_eq(&bytes, &expected))
            .unwrap_or(false)
    })
}
