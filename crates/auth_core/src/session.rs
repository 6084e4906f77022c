use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::protocol::StoredSession;

use crate::error::AuthStoreError;

/// On-disk session persistence, one JSON document per data directory.
pub(crate) struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) async fn load(&self) -> Result<Option<StoredSession>, AuthStoreError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(AuthStoreError::SessionIo {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let mut session: StoredSession =
            serde_json::from_slice(&raw).map_err(|source| AuthStoreError::SessionFormat {
                path: self.path.clone(),
                source,
            })?;
        if session.expires_at.is_none() {
            session.expires_at = jwt_expiry(&session.access_token);
        }
        Ok(Some(session))
    }

    pub(crate) async fn save(&self, session: &StoredSession) -> Result<(), AuthStoreError> {
        let io_err = |source| AuthStoreError::SessionIo {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let body =
            serde_json::to_vec_pretty(session).map_err(|source| AuthStoreError::SessionFormat {
                path: self.path.clone(),
                source,
            })?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)
    }

    pub(crate) async fn clear(&self) -> Result<(), AuthStoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(AuthStoreError::SessionIo {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[derive(Deserialize)]
struct JwtClaims {
    exp: i64,
}

/// Reads the `exp` claim without verifying the signature.
pub(crate) fn jwt_expiry(token: &str) -> Option<DateTime<Utc>> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: JwtClaims = serde_json::from_slice(&bytes).ok()?;
    DateTime::from_timestamp(claims.exp, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_exp_claim_from_access_token() {
        let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"u","exp":1700000000}"#);
        let token = format!("header.{payload}.signature");
        assert_eq!(
            jwt_expiry(&token),
            DateTime::from_timestamp(1_700_000_000, 0)
        );
    }

    #[test]
    fn opaque_tokens_have_no_expiry() {
        assert_eq!(jwt_expiry("opaque-token"), None);
        assert_eq!(jwt_expiry("a.!!!.c"), None);
    }
}
