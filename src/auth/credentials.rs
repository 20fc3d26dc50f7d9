use log::info;
use std::path::Path;

use crate::error::{Error, Result};

/// Client-credentials grant material for one Azure AD tenant.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub tenant: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(
        tenant: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            tenant: tenant.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn from_env() -> Result<Credentials> {
        info!("Importing credentials from environment variables");

        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let tenant = std::env::var("GRAPH_TENANT")
            .map_err(|_| Error::Auth("GRAPH_TENANT environment variable not set".to_string()))?;
        let client_id = std::env::var("GRAPH_CLIENT_ID")
            .map_err(|_| Error::Auth("GRAPH_CLIENT_ID environment variable not set".to_string()))?;
        let client_secret = std::env::var("GRAPH_CLIENT_SECRET").map_err(|_| {
            Error::Auth("GRAPH_CLIENT_SECRET environment variable not set".to_string())
        })?;

        Ok(Credentials {
            tenant,
            client_id,
            client_secret,
        })
    }

    pub fn from_env_file(path: &str) -> Result<Credentials> {
        info!("Importing credentials from env file: {}", path);

        if !Path::new(path).exists() {
            return Err(Error::Auth(format!("environment file not found: {}", path)));
        }

        dotenvy::from_path(path)
            .map_err(|e| Error::Auth(format!("failed to load env file '{}': {}", path, e)))?;

        let tenant = std::env::var("GRAPH_TENANT")
            .map_err(|_| Error::Auth(format!("GRAPH_TENANT not found in env file: {}", path)))?;
        let client_id = std::env::var("GRAPH_CLIENT_ID")
            .map_err(|_| Error::Auth(format!("GRAPH_CLIENT_ID not found in env file: {}", path)))?;
        let client_secret = std::env::var("GRAPH_CLIENT_SECRET").map_err(|_| {
            Error::Auth(format!("GRAPH_CLIENT_SECRET not found in env file: {}", path))
        })?;

        Ok(Credentials {
            tenant,
            client_id,
            client_secret,
        })
    }
}
