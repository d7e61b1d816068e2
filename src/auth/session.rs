use std::time::Duration;

use axum::{
    extract::FromRef,
    http::{header, HeaderMap},
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::auth::{claims::Claims, dto::Session};
use crate::config::{SessionConfig, MAX_TTL_MINUTES};
use crate::state::AppState;

pub const COOKIE_NAME: &str = "session";
const AUDIENCE: &str = "odyer-session";

/// Signing and verification keys for session cookies.
#[derive(Clone)]
pub struct SessionKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub ttl: Duration,
    pub cookie_secure: bool,
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::new(&state.config.session)
    }
}

impl SessionKeys {
    pub fn new(cfg: &SessionConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            ttl: Duration::from_secs(cfg.ttl_minutes.clamp(1, MAX_TTL_MINUTES) as u64 * 60),
            cookie_secure: cfg.cookie_secure,
        }
    }

    pub fn sign(&self, session: &Session) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now
            .checked_add(TimeDuration::seconds(self.ttl.as_secs() as i64))
            .ok_or_else(|| anyhow::anyhow!("session expiry out of range"))?;
        let claims = Claims {
            sub: session.user_id,
            name: session.full_name.clone(),
            adm: session.is_admin,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: AUDIENCE.to_string(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %session.user_id, "session signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Session> {
        let mut validation = Validation::default();
        validation.set_audience(&[AUDIENCE]);
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(Session {
            user_id: data.claims.sub,
            full_name: data.claims.name,
            is_admin: data.claims.adm,
        })
    }

    /// Session carried by the request's cookie, if present and valid.
    pub fn from_headers(&self, headers: &HeaderMap) -> Option<Session> {
        let token = read_cookie(headers, COOKIE_NAME)?;
        match self.verify(token) {
            Ok(s) => Some(s),
            Err(e) => {
                debug!(error = %e, "ignoring invalid session cookie");
                None
            }
        }
    }

    /// `Set-Cookie` value establishing a session.
    pub fn issue_cookie(&self, token: &str) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            COOKIE_NAME,
            token,
            self.ttl.as_secs()
        );
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// `Set-Cookie` value that makes the client drop its session.
    pub fn clear_cookie(&self) -> String {
        let mut cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", COOKIE_NAME);
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// Value of the named cookie across all `Cookie` headers.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use uuid::Uuid;

    fn keys(secret: &str, issuer: &str) -> SessionKeys {
        SessionKeys::new(&SessionConfig {
            secret: secret.into(),
            issuer: issuer.into(),
            ttl_minutes: 5,
            cookie_secure: false,
        })
    }

    fn kari() -> Session {
        Session {
            user_id: Uuid::new_v4(),
            full_name: "Kari".into(),
            is_admin: false,
        }
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let k = keys("dev-secret", "iss");
        let session = kari();
        let token = k.sign(&session).expect("sign");
        assert_eq!(k.verify(&token).expect("verify"), session);
    }

    #[test]
    fn oversized_ttl_is_clamped_instead_of_overflowing() {
        let k = SessionKeys::new(&SessionConfig {
            secret: "s".into(),
            issuer: "i".into(),
            ttl_minutes: 10_000_000_000,
            cookie_secure: false,
        });
        assert_eq!(k.ttl.as_secs(), MAX_TTL_MINUTES as u64 * 60);
        let token = k.sign(&kari()).expect("sign with clamped ttl");
        assert!(k.verify(&token).is_ok());
    }

    #[test]
    fn expiry_past_the_calendar_is_an_error() {
        let mut k = keys("s", "i");
        k.ttl = Duration::from_secs(i64::MAX as u64);
        assert!(k.sign(&kari()).is_err());
    }

    #[test]
    fn verify_rejects_other_secret_or_issuer() {
        let token = keys("one", "iss").sign(&kari()).unwrap();
        assert!(keys("two", "iss").verify(&token).is_err());
        assert!(keys("one", "other").verify(&token).is_err());
    }

    #[test]
    fn token_is_bound_to_the_session_audience() {
        let k = keys("s", "i");
        let token = k.sign(&kari()).unwrap();

        let mut validation = Validation::default();
        validation.set_issuer(&["i"]);
        validation.set_audience(&[AUDIENCE]);
        let data = decode::<Claims>(&token, &k.decoding, &validation).unwrap();
        assert_eq!(data.claims.aud, AUDIENCE);

        validation.set_audience(&["some-other-api"]);
        assert!(decode::<Claims>(&token, &k.decoding, &validation).is_err());
    }

    #[test]
    fn tampered_token_is_ignored() {
        let k = keys("dev-secret", "iss");
        let mut token = k.sign(&kari()).unwrap();
        token.push('x');
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("session={}", token)).unwrap(),
        );
        assert!(k.from_headers(&headers).is_none());
    }

    #[test]
    fn reads_named_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark; lang=nb"));
        headers.append(header::COOKIE, HeaderValue::from_static("session=abc.def; x=1"));
        assert_eq!(read_cookie(&headers, "session"), Some("abc.def"));
        assert_eq!(read_cookie(&headers, "lang"), Some("nb"));
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn empty_cookie_counts_as_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("session="));
        assert_eq!(read_cookie(&headers, "session"), None);
    }

    #[test]
    fn cookies_carry_expected_attributes() {
        let mut k = keys("s", "i");
        let issued = k.issue_cookie("tok");
        assert!(issued.starts_with("session=tok;"));
        assert!(issued.contains("HttpOnly"));
        assert!(issued.contains("Max-Age=300"));
        assert!(!issued.contains("Secure"));

        k.cookie_secure = true;
        assert!(k.issue_cookie("tok").ends_with("; Secure"));
        assert!(k.clear_cookie().contains("Max-Age=0"));
    }
}
