//! Signed request envelopes.
//!
//! The platform communicates with applications through `signature.payload`
//! envelopes: two URL-safe base64 strings joined by a dot, where the
//! signature is an HMAC-SHA256 of the encoded payload under the
//! application's secret key.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error)]
pub enum SignedRequestError {
    #[error("signed request malformed")]
    Malformed,

    #[error("signed request had a corrupted payload")]
    CorruptPayload,

    #[error("signed request is using an unknown algorithm")]
    UnknownAlgorithm,

    #[error("signed request signature mismatch")]
    SignatureMismatch,
}

/// Age bracket granted by the user's privacy settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeRange {
    pub min: u32,
    pub max: Option<u32>,
}

/// An access token issued for the user who generated the signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthToken {
    pub token: String,
    pub issued_at: Option<DateTime<Utc>>,
    /// `None` means the token does not expire.
    pub expires_at: Option<DateTime<Utc>>,
}

impl OAuthToken {
    pub fn has_expired(&self) -> bool {
        matches!(self.expires_at, Some(expires_at) if expires_at < Utc::now())
    }
}

/// The user a signed request was generated for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub id: Option<String>,
    pub age: Option<AgeRange>,
    pub locale: Option<String>,
    pub country: Option<String>,
    pub oauth_token: Option<OAuthToken>,
}

impl User {
    pub fn profile_url(&self) -> Option<String> {
        self.id
            .as_ref()
            .map(|id| format!("http://facebook.com/{}", id))
    }

    pub fn has_authorized_application(&self) -> bool {
        self.oauth_token.is_some()
    }
}

/// The page a signed request was generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: String,
    pub is_liked: bool,
    pub is_admin: bool,
}

impl Page {
    pub fn url(&self) -> String {
        format!("http://facebook.com/{}", self.id)
    }
}

/// A parsed (or to-be-generated) signed request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignedRequest {
    pub user: User,
    pub page: Option<Page>,
    /// Contents of the `app_data` query string parameter.
    pub data: Option<Value>,
}

impl SignedRequest {
    /// Parse and verify a signed request envelope.
    pub fn parse(raw: &str, application_secret_key: &str) -> Result<Self, SignedRequestError> {
        let (encoded_signature, encoded_payload) =
            raw.split_once('.').ok_or(SignedRequestError::Malformed)?;

        let signature = decode(encoded_signature).map_err(|_| SignedRequestError::Malformed)?;
        let payload = decode(encoded_payload).map_err(|_| SignedRequestError::CorruptPayload)?;
        let data: Value =
            serde_json::from_slice(&payload).map_err(|_| SignedRequestError::CorruptPayload)?;

        let algorithm = data
            .get("algorithm")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if !algorithm.eq_ignore_ascii_case("HMAC-SHA256") {
            return Err(SignedRequestError::UnknownAlgorithm);
        }

        let mut mac = HmacSha256::new_from_slice(application_secret_key.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(encoded_payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| SignedRequestError::SignatureMismatch)?;

        let user_data = data.get("user");
        let user = User {
            id: data.get("user_id").and_then(Value::as_str).map(str::to_owned),
            locale: user_data
                .and_then(|u| u.get("locale"))
                .and_then(Value::as_str)
                .map(str::to_owned),
            country: user_data
                .and_then(|u| u.get("country"))
                .and_then(Value::as_str)
                .map(str::to_owned),
            age: user_data.and_then(|u| u.get("age")).and_then(|age| {
                Some(AgeRange {
                    min: age.get("min")?.as_u64()? as u32,
                    max: age.get("max").and_then(Value::as_u64).map(|max| max as u32),
                })
            }),
            oauth_token: data
                .get("oauth_token")
                .and_then(Value::as_str)
                .map(|token| OAuthToken {
                    token: token.to_owned(),
                    issued_at: data
                        .get("issued_at")
                        .and_then(Value::as_i64)
                        .and_then(|t| DateTime::from_timestamp(t, 0)),
                    expires_at: data
                        .get("expires")
                        .and_then(Value::as_i64)
                        .filter(|t| *t > 0)
                        .and_then(|t| DateTime::from_timestamp(t, 0)),
                }),
        };

        let page = data.get("page").and_then(|page| {
            Some(Page {
                id: page.get("id")?.as_str()?.to_owned(),
                is_liked: page.get("liked").and_then(Value::as_bool).unwrap_or(false),
                is_admin: page.get("admin").and_then(Value::as_bool).unwrap_or(false),
            })
        });

        Ok(Self {
            user,
            page,
            data: data.get("app_data").cloned(),
        })
    }

    /// Generate a signed request envelope from this instance.
    pub fn generate(&self, application_secret_key: &str) -> String {
        let mut payload = json!({ "algorithm": "HMAC-SHA256" });

        if let Some(data) = &self.data {
            payload["app_data"] = data.clone();
        }

        if let Some(page) = &self.page {
            payload["page"] = json!({
                "id": page.id,
                "liked": page.is_liked,
                "admin": page.is_admin,
            });
        }

        let mut user = serde_json::Map::new();
        if let Some(country) = &self.user.country {
            user.insert("country".to_owned(), country.clone().into());
        }
        if let Some(locale) = &self.user.locale {
            user.insert("locale".to_owned(), locale.clone().into());
        }
        if let Some(age) = &self.user.age {
            let mut range = serde_json::Map::new();
            range.insert("min".to_owned(), age.min.into());
            if let Some(max) = age.max {
                range.insert("max".to_owned(), max.into());
            }
            user.insert("age".to_owned(), range.into());
        }
        payload["user"] = user.into();

        if let Some(token) = &self.user.oauth_token {
            payload["oauth_token"] = token.token.clone().into();
            payload["expires"] = token
                .expires_at
                .map(|expires_at| expires_at.timestamp())
                .unwrap_or(0)
                .into();
            if let Some(issued_at) = token.issued_at {
                payload["issued_at"] = issued_at.timestamp().into();
            }
        }

        if let Some(id) = &self.user.id {
            payload["user_id"] = id.clone().into();
        }

        let encoded_payload = URL_SAFE_NO_PAD.encode(payload.to_string());

        let mut mac = HmacSha256::new_from_slice(application_secret_key.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(encoded_payload.as_bytes());
        let encoded_signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        format!("{}.{}", encoded_signature, encoded_payload)
    }
}

// The platform omits base64 padding; accept padded input anyway.
fn decode(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_NO_PAD.decode(encoded.trim_end_matches('='))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "181e756bd441dbe8b113281c0a4e8f4c";

    fn signed_request() -> SignedRequest {
        SignedRequest {
            user: User {
                id: Some("499729129".to_owned()),
                age: Some(AgeRange {
                    min: 21,
                    max: None,
                }),
                locale: Some("en_US".to_owned()),
                country: Some("no".to_owned()),
                oauth_token: Some(OAuthToken {
                    token: "181259711925270|1570a553ad6605705d1b7a5f.1-499729129|8XqMRhCWDKtpG-i_zRkHBDSsqqk".to_owned(),
                    issued_at: DateTime::from_timestamp(1306179904, 0),
                    expires_at: None,
                }),
            },
            page: Some(Page {
                id: "1".to_owned(),
                is_liked: true,
                is_admin: false,
            }),
            data: Some(Value::String("foo".to_owned())),
        }
    }

    #[test]
    fn generate_then_parse_roundtrips() {
        let original = signed_request();
        let parsed = SignedRequest::parse(&original.generate(SECRET), SECRET).unwrap();

        assert_eq!(parsed, original);
    }

    #[test]
    fn missing_delimiter_is_malformed() {
        assert!(matches!(
            SignedRequest::parse("no-delimiter-here", SECRET),
            Err(SignedRequestError::Malformed)
        ));
    }

    #[test]
    fn non_json_payload_is_corrupt() {
        let signature = URL_SAFE_NO_PAD.encode("sig");
        let payload = URL_SAFE_NO_PAD.encode("not json");

        assert!(matches!(
            SignedRequest::parse(&format!("{}.{}", signature, payload), SECRET),
            Err(SignedRequestError::CorruptPayload)
        ));
    }

    #[test]
    fn unknown_algorithm_is_rejected_before_verification() {
        let signature = URL_SAFE_NO_PAD.encode("sig");
        let payload = URL_SAFE_NO_PAD.encode(r#"{"algorithm": "PLAINTEXT"}"#);

        assert!(matches!(
            SignedRequest::parse(&format!("{}.{}", signature, payload), SECRET),
            Err(SignedRequestError::UnknownAlgorithm)
        ));
    }

    #[test]
    fn tampered_payload_fails_verification() {
        let envelope = signed_request().generate(SECRET);
        let (signature, _) = envelope.split_once('.').unwrap();
        let forged_payload = URL_SAFE_NO_PAD.encode(r#"{"algorithm": "HMAC-SHA256", "user_id": "1"}"#);

        assert!(matches!(
            SignedRequest::parse(&format!("{}.{}", signature, forged_payload), SECRET),
            Err(SignedRequestError::SignatureMismatch)
        ));
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let envelope = signed_request().generate(SECRET);

        assert!(matches!(
            SignedRequest::parse(&envelope, "another-secret"),
            Err(SignedRequestError::SignatureMismatch)
        ));
    }

    #[test]
    fn zero_expiry_means_the_token_never_expires() {
        let parsed = SignedRequest::parse(&signed_request().generate(SECRET), SECRET).unwrap();
        let token = parsed.user.oauth_token.unwrap();

        assert_eq!(token.expires_at, None);
        assert!(!token.has_expired());
    }

    #[test]
    fn past_expiry_is_expired() {
        let token = OAuthToken {
            token: "abc".to_owned(),
            issued_at: DateTime::from_timestamp(1306179904, 0),
            expires_at: DateTime::from_timestamp(1306180000, 0),
        };

        assert!(token.has_expired());
    }

    #[test]
    fn accessors() {
        let request = signed_request();

        assert_eq!(
            request.user.profile_url().as_deref(),
            Some("http://facebook.com/499729129")
        );
        assert!(request.user.has_authorized_application());
        assert_eq!(request.page.unwrap().url(), "http://facebook.com/1");
    }
}
