use std::net::SocketAddr;
use std::path::PathBuf;
use anyhow::{bail, Context};
use clap::Parser;
use crate::auth::TokenVerifier;

#[derive(Parser, Clone, Debug)]
pub struct Config {
    #[clap(env, long, default_value = "development")]
    pub environment: String,

    #[clap(env, long, default_value = "127.0.0.1:8080")]
    pub bind_address: SocketAddr,

    /// Comma separated list of origins allowed by CORS.
    #[clap(env, long, default_value = "http://localhost:3000")]
    pub origin_urls: String,

    /// Without it restaurants are kept in process memory.
    #[clap(env, long)]
    pub elasticsearch_url: Option<String>,

    #[clap(env, long, default_value = "restaurants")]
    pub elasticsearch_index: String,

    #[clap(env, long)]
    pub elasticsearch_username: Option<String>,

    #[clap(env, long)]
    pub elasticsearch_password: Option<String>,

    #[clap(env, long, default_value = "uploads")]
    pub storage_location: PathBuf,

    #[clap(env, long)]
    pub jwt_secret: Option<String>,

    /// PEM encoded RSA key of the token issuer. Takes precedence over `jwt_secret`.
    #[clap(env, long)]
    pub jwt_public_key_path: Option<PathBuf>,

    #[clap(env, long)]
    pub jwt_issuer: Option<String>,

    #[clap(env, long)]
    pub jwt_audience: Option<String>,
}

impl Config {
    pub fn token_verifier(&self) -> anyhow::Result<TokenVerifier> {
        let verifier = match (&self.jwt_public_key_path, &self.jwt_secret) {
            (Some(path), _) => {
                let pem = std::fs::read(path)
                    .with_context(|| format!("Could not read JWT public key {}", path.display()))?;
                TokenVerifier::rs256_pem(&pem)?
            }
            (None, Some(secret)) => TokenVerifier::hs256(secret.as_bytes()),
            (None, None) => bail!("Either JWT_PUBLIC_KEY_PATH or JWT_SECRET must be set"),
        };

        let verifier = match &self.jwt_issuer {
            Some(issuer) => verifier.with_issuer(issuer),
            None => verifier,
        };
        Ok(match &self.jwt_audience {
            Some(audience) => verifier.with_audience(audience),
            None => verifier,
        })
    }
}
