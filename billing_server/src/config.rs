use std::{env, io::Write, time::Duration};

use billing_common::{
    helpers::{parse_boolean_flag, parse_seconds},
    Secret,
};
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use tempfile::NamedTempFile;

const DEFAULT_BILLING_HOST: &str = "127.0.0.1";
const DEFAULT_BILLING_PORT: u16 = 8460;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/billing.db";
const DEFAULT_PREPARATION_DELAY: Duration = Duration::from_secs(5);
const DEFAULT_NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(10);
const ADMIN_TOKEN_LENGTH: usize = 40;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// If true, the embedded database migrations are applied when the server starts.
    pub run_migrations: bool,
    /// The bearer token that grants access to the `/api` routes.
    pub admin_token: Secret<String>,
    pub notifier: NotifierConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BILLING_HOST.to_string(),
            port: DEFAULT_BILLING_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            run_migrations: true,
            admin_token: random_admin_token(),
            notifier: NotifierConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_default() -> Self {
        let host = env::var("BILLING_HOST").ok().unwrap_or_else(|| DEFAULT_BILLING_HOST.into());
        let port = env::var("BILLING_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for BILLING_PORT. {e} Using the default, {DEFAULT_BILLING_PORT}, \
                         instead."
                    );
                    DEFAULT_BILLING_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_BILLING_PORT);
        let database_url = env::var("BILLING_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ BILLING_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let run_migrations = parse_boolean_flag(env::var("BILLING_RUN_MIGRATIONS").ok(), true);
        let admin_token = match env::var("BILLING_ADMIN_TOKEN") {
            Ok(s) if !s.trim().is_empty() => Secret::new(s.trim().to_string()),
            _ => random_admin_token(),
        };
        let notifier = NotifierConfig::from_env_or_default();
        Self { host, port, database_url, run_migrations, admin_token, notifier }
    }
}

/// Generates a random admin token for this session, and writes it to a temporary file so that the operator can get
/// hold of it.
fn random_admin_token() -> Secret<String> {
    warn!(
        "🚨️🚨️🚨️ The admin token has not been set. I'm using a random value for this session. DO NOT operate in \
         production like this, since the token changes every time the server restarts. 🚨️🚨️🚨️"
    );
    let token = thread_rng().sample_iter(&Alphanumeric).take(ADMIN_TOKEN_LENGTH).map(char::from).collect::<String>();
    match NamedTempFile::new().ok().and_then(|f| f.keep().ok()) {
        Some((mut f, p)) => match writeln!(f, "{token}") {
            Ok(()) => warn!(
                "🚨️🚨️🚨️ The admin token for this session was written to {}. If this is a production instance, you \
                 are doing it wrong! Set the BILLING_ADMIN_TOKEN environment variable instead. 🚨️🚨️🚨️",
                p.to_str().unwrap_or("???")
            ),
            Err(e) => warn!("🪛️ Could not write the admin token to the temporary file. {e}"),
        },
        None => warn!("🪛️ Could not create a temporary file to store the admin token."),
    }
    Secret::new(token)
}

//-------------------------------------------------  NotifierConfig  ---------------------------------------------------
#[derive(Clone, Debug)]
pub struct NotifierConfig {
    /// The endpoint that receives order-confirmation notifications. If `None`, notifications are disabled.
    pub url: Option<String>,
    /// If non-empty, notifications are signed with this key, and the signature is sent in the
    /// [`crate::notifier::SIGNATURE_HEADER`] header.
    pub secret: Secret<String>,
    /// The pause between confirming an order and notifying the webhook.
    pub preparation_delay: Duration,
    /// The HTTP timeout for the webhook call.
    pub timeout: Duration,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            url: None,
            secret: Secret::default(),
            preparation_delay: DEFAULT_PREPARATION_DELAY,
            timeout: DEFAULT_NOTIFICATION_TIMEOUT,
        }
    }
}

impl NotifierConfig {
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self { url: Some(url.into()), ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let url = env::var("BILLING_NOTIFICATION_URL").ok().filter(|s| !s.trim().is_empty());
        match &url {
            Some(url) => info!("🪛️ Order confirmations will be sent to {url}"),
            None => warn!(
                "🪛️ BILLING_NOTIFICATION_URL is not set. Orders will be confirmed, but no one will be notified about \
                 it."
            ),
        }
        let secret = Secret::new(env::var("BILLING_NOTIFICATION_SECRET").unwrap_or_default());
        if url.is_some() && secret.is_empty() {
            info!("🪛️ BILLING_NOTIFICATION_SECRET is not set. Notifications will not be signed.");
        }
        let preparation_delay = seconds_from_env("BILLING_PREPARATION_DELAY", DEFAULT_PREPARATION_DELAY);
        let timeout = seconds_from_env("BILLING_NOTIFICATION_TIMEOUT", DEFAULT_NOTIFICATION_TIMEOUT);
        Self { url, secret, preparation_delay, timeout }
    }

    pub fn with_secret<S: Into<String>>(mut self, secret: S) -> Self {
        self.secret = Secret::new(secret.into());
        self
    }

    pub fn with_preparation_delay(mut self, delay: Duration) -> Self {
        self.preparation_delay = delay;
        self
    }
}

fn seconds_from_env(name: &str, default: Duration) -> Duration {
    parse_seconds(env::var(name).ok(), default).unwrap_or_else(|e| {
        warn!("🪛️ Invalid configuration value for {name}. {e} Using the default of {}s.", default.as_secs());
        default
    })
}
