use anyhow::{Context, Result};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;

// GitHub rejects App JWTs issued for longer than ten minutes; the issued-at
// claim is backdated slightly to absorb clock skew against GitHub's clock.
const JWT_BACKDATE_SECONDS: i64 = 60;
const JWT_LIFETIME_SECONDS: i64 = 540;

#[derive(Serialize)]
struct AppJwtClaims {
    iat: i64,
    exp: i64,
    iss: String,
}

/// GitHub App signing identity used to mint short-lived API JWTs.
///
/// The RSA private key is parsed once at startup; minting is cheap enough
/// to do per poll cycle, which keeps the runtime stateless across cycles.
pub(super) struct GithubAppAuth {
    app_id: String,
    signing_key: EncodingKey,
}

impl GithubAppAuth {
    pub(super) fn new(app_id: &str, private_key_pem: &str) -> Result<Self> {
        let signing_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .context("failed to parse github app private key")?;
        Ok(Self {
            app_id: app_id.trim().to_string(),
            signing_key,
        })
    }

    pub(super) fn signed_jwt(&self) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = AppJwtClaims {
            iat: now - JWT_BACKDATE_SECONDS,
            exp: now + JWT_LIFETIME_SECONDS,
            iss: self.app_id.clone(),
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .context("failed to sign github app jwt")
    }
}
