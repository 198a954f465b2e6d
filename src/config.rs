use std::net::SocketAddr;
use std::time::Duration;

use alloc::sync::Arc;
use clap::{Parser, ValueEnum};

use crate::mail::{HttpMailer, LogMailer, Mailer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageMode {
    Memory,
    Mongo,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "campfire", version, about = "Campground reviews and social notifications")]
pub struct Config {
    /// Socket address to bind, e.g. 127.0.0.1:3000
    #[arg(long, default_value = "127.0.0.1:3000", env = "CAMPFIRE_LISTEN")]
    pub listen: SocketAddr,
    #[arg(long, value_enum, default_value_t = StorageMode::Memory, env = "CAMPFIRE_STORAGE")]
    pub storage: StorageMode,
    /// Required with `--storage mongo`.
    #[arg(long, env = "MONGODB_URI")]
    pub mongo_uri: Option<String>,
    #[arg(long, default_value = "campfire", env = "CAMPFIRE_DATABASE")]
    pub database: String,
    /// Mail relay accepting `{from, to, subject, html}` as JSON. Emails are
    /// only logged when unset.
    #[arg(long, env = "CAMPFIRE_MAIL_ENDPOINT")]
    pub mail_endpoint: Option<String>,
    #[arg(long, env = "CAMPFIRE_MAIL_TOKEN", hide_env_values = true)]
    pub mail_token: Option<String>,
    #[arg(long, default_value = "noreply@campfire.local", env = "CAMPFIRE_MAIL_FROM")]
    pub mail_from: String,
    #[arg(long, default_value_t = 10, env = "CAMPFIRE_MAIL_TIMEOUT_SECS")]
    pub mail_timeout_secs: u64,
    /// Base of the links put into emails.
    #[arg(long, default_value = "http://localhost:4200", env = "CAMPFIRE_PUBLIC_URL")]
    pub public_url: String,
    #[arg(long, env = "CAMPFIRE_WORKER_THREADS")]
    pub worker_threads: Option<usize>,
}

impl Config {
    pub fn mailer(&self) -> anyhow::Result<Arc<dyn Mailer + Sync + Send>> {
        let mailer: Arc<dyn Mailer + Sync + Send> = match &self.mail_endpoint {
            Some(endpoint) => Arc::new(HttpMailer::new(
                endpoint.clone(),
                self.mail_token.clone(),
                self.mail_from.clone(),
                Duration::from_secs(self.mail_timeout_secs),
            )?),
            None => Arc::new(LogMailer),
        };

        Ok(mailer)
    }

    pub fn public_url(&self) -> String { self.public_url.trim_end_matches('/').to_string() }
}
