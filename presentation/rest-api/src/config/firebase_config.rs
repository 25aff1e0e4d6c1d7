use std::env;

/// Settings for verifying Firebase ID tokens. Attached to every request as poem data.
#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    pub project_id: String,
}

impl FirebaseConfig {
    /// Environment variables:
    /// - FIREBASE_PROJECT_ID: expected token audience (required)
    pub fn from_env() -> anyhow::Result<Self> {
        let project_id = env::var("FIREBASE_PROJECT_ID")
            .map_err(|_| anyhow::anyhow!("FIREBASE_PROJECT_ID must be set"))?;
        Ok(Self { project_id })
    }
}
