use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use jsonwebtoken::{Algorithm, DecodingKey, Header, Validation, decode, decode_header};
use once_cell::sync::Lazy;
use poem::Request;
use poem_openapi::SecurityScheme;
use serde::Deserialize;

use business::domain::shared::value_objects::{Caller, UserId};

use crate::config::firebase_config::FirebaseConfig;

const GOOGLE_CERTS_URL: &str =
    "https://www.googleapis.com/robot/v1/metadata/x509/securetoken@system.gserviceaccount.com";
const CACHE_TTL: Duration = Duration::from_secs(3600);
const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct FirebaseClaims {
    sub: String,
    email: Option<String>,
    /// Custom claim set through the Firebase Admin SDK.
    role: Option<String>,
    iss: String,
    aud: String,
    exp: u64,
    iat: u64,
}

/// Identity resolved from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub uid: String,
    pub is_admin: bool,
}

impl AuthenticatedUser {
    fn from_claims(claims: FirebaseClaims) -> Self {
        let is_admin = claims.role.as_deref() == Some(ADMIN_ROLE);
        Self {
            uid: claims.sub,
            is_admin,
        }
    }

    pub fn into_caller(self) -> Caller {
        Caller {
            user_id: UserId::new(self.uid),
            is_admin: self.is_admin,
        }
    }
}

struct CachedCerts {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Instant,
}

static CERTS_CACHE: Lazy<RwLock<Option<CachedCerts>>> = Lazy::new(|| RwLock::new(None));

async fn fetch_google_certs() -> Result<HashMap<String, DecodingKey>, String> {
    let response: HashMap<String, String> = reqwest::get(GOOGLE_CERTS_URL)
        .await
        .map_err(|e| format!("auth.certs_fetch_failed: {e}"))?
        .json()
        .await
        .map_err(|e| format!("auth.certs_parse_failed: {e}"))?;

    let mut keys = HashMap::new();
    for (kid, pem) in response {
        let key = DecodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| format!("auth.cert_decode_failed: {e}"))?;
        keys.insert(kid, key);
    }

    Ok(keys)
}

/// Refreshes the certificate cache when it is empty or older than `CACHE_TTL`.
async fn ensure_decoding_keys() -> Result<(), String> {
    {
        let cache = CERTS_CACHE
            .read()
            .map_err(|e| format!("auth.cache_read_failed: {e}"))?;
        if let Some(cached) = cache.as_ref()
            && cached.fetched_at.elapsed() < CACHE_TTL
        {
            return Ok(());
        }
    }

    let keys = fetch_google_certs().await?;

    let mut cache = CERTS_CACHE
        .write()
        .map_err(|e| format!("auth.cache_write_failed: {e}"))?;
    *cache = Some(CachedCerts {
        keys,
        fetched_at: Instant::now(),
    });

    Ok(())
}

fn extract_user_from_token(token: &str, project_id: &str) -> Result<AuthenticatedUser, String> {
    let header: Header =
        decode_header(token).map_err(|e| format!("auth.invalid_token_header: {e}"))?;

    let kid = header.kid.ok_or("auth.missing_kid")?;

    // Keys are loaded by `ensure_decoding_keys` before this runs.
    let cache = CERTS_CACHE
        .read()
        .map_err(|e| format!("auth.cache_read_failed: {e}"))?;
    let cached = cache.as_ref().ok_or("auth.certs_not_loaded")?;

    let decoding_key = cached.keys.get(&kid).ok_or("auth.unknown_kid")?;

    let expected_issuer = format!("https://securetoken.google.com/{project_id}");

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[project_id]);
    validation.set_issuer(&[&expected_issuer]);
    validation.validate_exp = true;

    let token_data = decode::<FirebaseClaims>(token, decoding_key, &validation)
        .map_err(|e| format!("auth.token_validation_failed: {e}"))?;

    Ok(AuthenticatedUser::from_claims(token_data.claims))
}

/// Firebase Bearer token authentication. Rejected tokens answer 401.
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    bearer_format = "JWT",
    checker = "firebase_bearer_checker"
)]
pub struct FirebaseBearer(pub AuthenticatedUser);

async fn firebase_bearer_checker(
    req: &Request,
    bearer: poem_openapi::auth::Bearer,
) -> Option<AuthenticatedUser> {
    let Some(config) = req.data::<FirebaseConfig>() else {
        tracing::error!("Firebase configuration is not attached to the request");
        return None;
    };

    if let Err(e) = ensure_decoding_keys().await {
        tracing::error!("Failed to fetch Google certs: {e}");
        return None;
    }

    match extract_user_from_token(&bearer.token, &config.project_id) {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::warn!("Firebase auth failed: {e}");
            None
        }
    }
}
