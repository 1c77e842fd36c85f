//! SigV4-style request signing.
//!
//! Authenticated backends expect a date-scoped HMAC-SHA256 signature chain
//! over a canonical rendering of the request. The header list inside the
//! canonical request and the `SignedHeaders` value of the `Authorization`
//! header must be the same lexicographically sorted list; the server rejects
//! any divergence with a bare authentication error and no local symptom, so
//! both are produced from one sorted vector here.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const REQUEST_TYPE: &str = "aws4_request";

/// Everything needed to sign one outbound request.
pub struct SignRequestParams<'a> {
    pub method: &'a str,
    pub path: &'a str,
    /// Raw query string; empty for body-carrying requests.
    pub query: &'a str,
    /// Headers to sign, in any order and case. `x-amz-date` and
    /// `x-amz-content-sha256` are added by the signer itself.
    pub headers: &'a [(String, String)],
    pub payload: &'a [u8],
    pub access_key: &'a str,
    pub secret_key: &'a str,
    pub region: &'a str,
    pub service: &'a str,
    /// Request timestamp, captured fresh per request. Injected so tests can
    /// pin the clock.
    pub timestamp: DateTime<Utc>,
}

/// Header values to attach to the outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub authorization: String,
    pub amz_date: String,
    pub content_sha256: String,
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac =
        <HmacSha256 as Mac>::new_from_slice(key).expect("HMAC-SHA256 accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Chain the four HMAC steps that scope the secret to one day, region and
/// service.
fn derive_signing_key(secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, REQUEST_TYPE.as_bytes())
}

/// Lower-case, trim and sort the headers once; the same sorted list feeds
/// the canonical request and the `SignedHeaders` value.
fn sorted_headers(
    headers: &[(String, String)],
    payload_hash: &str,
    amz_date: &str,
) -> Vec<(String, String)> {
    let mut sorted: Vec<(String, String)> = headers
        .iter()
        .map(|(name, value)| (name.to_lowercase(), value.trim().to_string()))
        .collect();
    sorted.push(("x-amz-content-sha256".to_string(), payload_hash.to_string()));
    sorted.push(("x-amz-date".to_string(), amz_date.to_string()));
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    sorted
}

fn canonical_request(
    method: &str,
    path: &str,
    query: &str,
    headers: &[(String, String)],
    payload_hash: &str,
) -> (String, String) {
    let canonical_headers: String = headers
        .iter()
        .map(|(name, value)| format!("{name}:{value}\n"))
        .collect();
    let signed_headers = headers
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(";");
    let request = format!(
        "{method}\n{path}\n{query}\n{canonical_headers}\n{signed_headers}\n{payload_hash}"
    );
    (request, signed_headers)
}

/// Sign one request, returning the headers to attach to it.
pub fn sign_request(params: &SignRequestParams<'_>) -> SignedRequest {
    let amz_date = params.timestamp.format("%Y%m%dT%H%M%SZ").to_string();
    let date = params.timestamp.format("%Y%m%d").to_string();

    let payload_hash = sha256_hex(params.payload);
    let headers = sorted_headers(params.headers, &payload_hash, &amz_date);
    let (canonical, signed_headers) =
        canonical_request(params.method, params.path, params.query, &headers, &payload_hash);

    let scope = format!("{date}/{}/{}/{REQUEST_TYPE}", params.region, params.service);
    let string_to_sign = format!(
        "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
        sha256_hex(canonical.as_bytes())
    );

    let signing_key = derive_signing_key(params.secret_key, &date, params.region, params.service);
    let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes()));

    let authorization = format!(
        "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
        params.access_key
    );

    SignedRequest {
        authorization,
        amz_date,
        content_sha256: payload_hash,
    }
}
