//! Request signing
//!
//! Every request is signed before dispatch by a [`RequestSigner`]. The
//! token bootstrap (request token, user authorization, access token) is
//! done out of band; this module only consumes the resulting credentials.

use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use reqwest::Method;
use sha1::Sha1;
use std::fmt;
use url::Url;
use uuid::Uuid;

type HmacSha1 = Hmac<Sha1>;

/// Consumer and access-token key pairs granted by the service
#[derive(Clone)]
pub struct OAuthCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub token_key: String,
    pub token_secret: String,
}

impl OAuthCredentials {
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        token_key: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            token_key: token_key.into(),
            token_secret: token_secret.into(),
        }
    }

    /// `enc(consumer_secret)&enc(token_secret)`
    fn signing_key(&self) -> String {
        format!(
            "{}&{}",
            urlencoding::encode(&self.consumer_secret),
            urlencoding::encode(&self.token_secret)
        )
    }
}

// Security: never print secrets
impl fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"***")
            .field("token_key", &self.token_key)
            .field("token_secret", &"***")
            .finish()
    }
}

/// Produces the `Authorization` header for an outgoing request
pub trait RequestSigner: Send + Sync {
    /// `url` is the full request url, `params` its query parameters
    fn authorization(&self, method: &Method, url: &Url, params: &[(String, String)])
        -> Result<String>;
}

/// Per-request protocol values
struct Nonce {
    timestamp: String,
    nonce: String,
}

impl Nonce {
    fn fresh() -> Self {
        Self {
            timestamp: chrono::Utc::now().timestamp().to_string(),
            nonce: Uuid::new_v4().simple().to_string(),
        }
    }
}

/// The `oauth_*` protocol parameters, without the signature
fn protocol_params<'a>(
    credentials: &'a OAuthCredentials,
    method_name: &'static str,
    nonce: &'a Nonce,
) -> [(&'static str, &'a str); 6] {
    [
        ("oauth_consumer_key", credentials.consumer_key.as_str()),
        ("oauth_nonce", nonce.nonce.as_str()),
        ("oauth_signature_method", method_name),
        ("oauth_timestamp", nonce.timestamp.as_str()),
        ("oauth_token", credentials.token_key.as_str()),
        ("oauth_version", "1.0"),
    ]
}

fn authorization_header(oauth_params: &[(&str, &str)], signature: &str) -> String {
    let fields = oauth_params
        .iter()
        .copied()
        .chain(std::iter::once(("oauth_signature", signature)))
        .map(|(key, value)| format!("{}=\"{}\"", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join(", ");

    format!("OAuth realm=\"\", {}", fields)
}

/// Scheme, host, non-default port and path; query and fragment dropped
fn base_string_uri(url: &Url) -> String {
    let mut base = url.clone();
    base.set_query(None);
    base.set_fragment(None);
    base.to_string()
}

/// OAuth 1.0 signature base string: `METHOD&enc(uri)&enc(sorted params)`.
///
/// Request parameters and protocol parameters are percent-encoded, sorted
/// by name then value, and joined as `k=v` pairs.
pub fn signature_base_string(
    method: &Method,
    url: &Url,
    params: &[(String, String)],
    oauth_params: &[(&str, &str)],
) -> String {
    let mut pairs: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .chain(oauth_params.iter().copied())
        .map(|(k, v)| {
            (
                urlencoding::encode(k).into_owned(),
                urlencoding::encode(v).into_owned(),
            )
        })
        .collect();
    pairs.sort();

    let normalized = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.as_str().to_uppercase(),
        urlencoding::encode(&base_string_uri(url)),
        urlencoding::encode(&normalized)
    )
}

/// OAuth 1.0 signer using `HMAC-SHA1`, the service's default method.
///
/// The signature covers the HTTP method, the url without its query and
/// every query and protocol parameter.
#[derive(Debug, Clone)]
pub struct HmacSha1Signer {
    credentials: OAuthCredentials,
}

impl HmacSha1Signer {
    pub const METHOD: &'static str = "HMAC-SHA1";

    pub fn new(credentials: OAuthCredentials) -> Self {
        Self { credentials }
    }

    /// Base64 HMAC-SHA1 of the signature base string for fixed protocol values
    pub fn signature(
        &self,
        method: &Method,
        url: &Url,
        params: &[(String, String)],
        timestamp: &str,
        nonce: &str,
    ) -> Result<String> {
        let nonce = Nonce {
            timestamp: timestamp.to_string(),
            nonce: nonce.to_string(),
        };
        let oauth_params = protocol_params(&self.credentials, Self::METHOD, &nonce);
        self.sign(method, url, params, &oauth_params)
    }

    fn sign(
        &self,
        method: &Method,
        url: &Url,
        params: &[(String, String)],
        oauth_params: &[(&str, &str)],
    ) -> Result<String> {
        let base = signature_base_string(method, url, params, oauth_params);
        let mut mac = HmacSha1::new_from_slice(self.credentials.signing_key().as_bytes())
            .map_err(|e| Error::Signing(e.to_string()))?;
        mac.update(base.as_bytes());
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }
}

impl RequestSigner for HmacSha1Signer {
    fn authorization(
        &self,
        method: &Method,
        url: &Url,
        params: &[(String, String)],
    ) -> Result<String> {
        let nonce = Nonce::fresh();
        let oauth_params = protocol_params(&self.credentials, Self::METHOD, &nonce);
        let signature = self.sign(method, url, params, &oauth_params)?;

        tracing::trace!("signed {} {}", method, url.path());
        Ok(authorization_header(&oauth_params, &signature))
    }
}

/// OAuth 1.0 signer using the `PLAINTEXT` signature method.
///
/// The signature is the bare signing key and covers nothing in the
/// request; only use it over TLS against servers that accept it.
#[derive(Debug, Clone)]
pub struct PlaintextSigner {
    credentials: OAuthCredentials,
}

impl PlaintextSigner {
    pub const METHOD: &'static str = "PLAINTEXT";

    pub fn new(credentials: OAuthCredentials) -> Self {
        Self { credentials }
    }

    /// `enc(consumer_secret)&enc(token_secret)`
    pub fn signature(&self) -> String {
        self.credentials.signing_key()
    }
}

impl RequestSigner for PlaintextSigner {
    fn authorization(
        &self,
        method: &Method,
        url: &Url,
        _params: &[(String, String)],
    ) -> Result<String> {
        let nonce = Nonce::fresh();
        let oauth_params = protocol_params(&self.credentials, Self::METHOD, &nonce);

        tracing::trace!("signed {} {}", method, url.path());
        Ok(authorization_header(&oauth_params, &self.signature()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plaintext() -> PlaintextSigner {
        PlaintextSigner::new(OAuthCredentials::new("ck", "c&s", "tk", "ts"))
    }

    /// Credentials from the OAuth 1.0 photos.example.net walkthrough
    fn photos_signer() -> HmacSha1Signer {
        HmacSha1Signer::new(OAuthCredentials::new(
            "dpf43f3p2l4k3l03",
            "kd94hf93k423kf44",
            "nnch734d00sl2jdk",
            "pfkkdhi9sl3r4s00",
        ))
    }

    fn photos_params() -> Vec<(String, String)> {
        vec![
            ("file".into(), "vacation.jpg".into()),
            ("size".into(), "original".into()),
        ]
    }

    #[test]
    fn test_signature_encodes_secrets() {
        assert_eq!(plaintext().signature(), "c%26s&ts");
    }

    #[test]
    fn test_authorization_header_shape() {
        let url = Url::parse("https://example.test/api/1.0/customers/?format=json").unwrap();
        let header = plaintext()
            .authorization(&Method::GET, &url, &[("format".into(), "json".into())])
            .unwrap();

        assert!(header.starts_with("OAuth realm=\"\", "));
        assert!(header.contains("oauth_consumer_key=\"ck\""));
        assert!(header.contains("oauth_token=\"tk\""));
        assert!(header.contains("oauth_signature_method=\"PLAINTEXT\""));
        assert!(header.contains("oauth_signature=\"c%2526s%26ts\""));
        assert!(header.contains("oauth_version=\"1.0\""));
    }

    #[test]
    fn test_nonce_changes_per_request() {
        let url = Url::parse("https://example.test/").unwrap();
        let a = plaintext().authorization(&Method::GET, &url, &[]).unwrap();
        let b = plaintext().authorization(&Method::GET, &url, &[]).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_base_string_matches_reference_example() {
        let url = Url::parse("http://photos.example.net/photos?file=vacation.jpg&size=original")
            .unwrap();
        let nonce = Nonce {
            timestamp: "1191242096".into(),
            nonce: "kllo9940pd9333jh".into(),
        };
        let signer = photos_signer();
        let oauth_params = protocol_params(&signer.credentials, HmacSha1Signer::METHOD, &nonce);

        let base = signature_base_string(&Method::GET, &url, &photos_params(), &oauth_params);
        assert_eq!(
            base,
            "GET&http%3A%2F%2Fphotos.example.net%2Fphotos&file%3Dvacation.jpg\
             %26oauth_consumer_key%3Ddpf43f3p2l4k3l03%26oauth_nonce%3Dkllo9940pd9333jh\
             %26oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1191242096\
             %26oauth_token%3Dnnch734d00sl2jdk%26oauth_version%3D1.0%26size%3Doriginal"
        );
    }

    #[test]
    fn test_hmac_sha1_matches_reference_signature() {
        let url = Url::parse("http://photos.example.net/photos?file=vacation.jpg&size=original")
            .unwrap();
        let signature = photos_signer()
            .signature(
                &Method::GET,
                &url,
                &photos_params(),
                "1191242096",
                "kllo9940pd9333jh",
            )
            .unwrap();

        assert_eq!(signature, "tR3+Ty81lMeYAr/Fid0kMTYa/WM=");
    }

    #[test]
    fn test_hmac_signature_covers_method_url_and_params() {
        let signer = photos_signer();
        let sign = |method: &Method, url: &str, params: &[(String, String)]| {
            signer
                .signature(method, &Url::parse(url).unwrap(), params, "1", "n")
                .unwrap()
        };

        let list = sign(&Method::GET, "https://example.test/api/1.0/customers/", &[]);
        let delete = sign(&Method::DELETE, "https://example.test/api/1.0/customers/", &[]);
        let other_path = sign(&Method::GET, "https://example.test/api/1.0/invoices/9/", &[]);
        let paged = sign(
            &Method::GET,
            "https://example.test/api/1.0/customers/",
            &[("offset".into(), "40".into())],
        );

        assert_ne!(list, delete);
        assert_ne!(list, other_path);
        assert_ne!(list, paged);
    }

    #[test]
    fn test_hmac_authorization_header() {
        let url = Url::parse("https://example.test/api/1.0/customers/?format=json").unwrap();
        let header = photos_signer()
            .authorization(&Method::GET, &url, &[("format".into(), "json".into())])
            .unwrap();

        assert!(header.starts_with("OAuth realm=\"\", "));
        assert!(header.contains("oauth_signature_method=\"HMAC-SHA1\""));
        assert!(header.contains("oauth_token=\"nnch734d00sl2jdk\""));
        assert!(!header.contains("kd94hf93k423kf44"));
    }

    #[test]
    fn test_debug_masks_secrets() {
        let debug = format!("{:?}", OAuthCredentials::new("ck", "secret1", "tk", "secret2"));
        assert!(!debug.contains("secret1"));
        assert!(!debug.contains("secret2"));
    }
}
