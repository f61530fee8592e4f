use std::{env, time::Duration};

use log::*;
use mtc_common::Secret;
use tgvmax_tools::TgvMaxConfig;

const DEFAULT_MTC_HOST: &str = "127.0.0.1";
const DEFAULT_MTC_PORT: u16 = 9091;
const DEFAULT_MTC_DATABASE_URL: &str = "sqlite://data/max_alerts.db";
const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60);
const DEFAULT_SMTP_SERVER: &str = "localhost";
const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The pause between the end of one ticket check and the start of the next.
    pub check_interval: Duration,
    /// Upstream ticket feed configuration
    pub tgvmax: TgvMaxConfig,
    /// Outgoing mail configuration
    pub smtp: SmtpConfig,
}

#[derive(Clone, Debug)]
pub struct SmtpConfig {
    /// The relay to submit messages to. Connections are upgraded with STARTTLS.
    pub server: String,
    pub port: u16,
    pub user: String,
    pub password: Secret<String>,
    /// The sender address. Defaults to the SMTP user.
    pub from: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SMTP_SERVER.to_string(),
            port: DEFAULT_SMTP_PORT,
            user: String::default(),
            password: Secret::default(),
            from: String::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_MTC_HOST.to_string(),
            port: DEFAULT_MTC_PORT,
            database_url: DEFAULT_MTC_DATABASE_URL.to_string(),
            check_interval: DEFAULT_CHECK_INTERVAL,
            tgvmax: TgvMaxConfig::default(),
            smtp: SmtpConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("MTC_HOST").ok().unwrap_or_else(|| DEFAULT_MTC_HOST.into());
        let port = env::var("MTC_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for MTC_PORT. {e} Using the default, {DEFAULT_MTC_PORT}, instead."
                    );
                    DEFAULT_MTC_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_MTC_PORT);
        let database_url = env::var("MTC_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ MTC_DATABASE_URL is not set. Using {DEFAULT_MTC_DATABASE_URL}");
            DEFAULT_MTC_DATABASE_URL.to_string()
        });
        let check_interval = configure_check_interval();
        let tgvmax = TgvMaxConfig::new_from_env_or_default();
        let smtp = SmtpConfig::from_env_or_defaults();
        Self { host, port, database_url, check_interval, tgvmax, smtp }
    }
}

impl SmtpConfig {
    pub fn from_env_or_defaults() -> Self {
        let server = env::var("MTC_SMTP_SERVER").ok().unwrap_or_else(|| {
            warn!("🪛️ MTC_SMTP_SERVER is not set. Notifications will be submitted to {DEFAULT_SMTP_SERVER}.");
            DEFAULT_SMTP_SERVER.to_string()
        });
        let port = env::var("MTC_SMTP_PORT")
            .map_err(|_| info!("🪛️ MTC_SMTP_PORT is not set. Using the default, {DEFAULT_SMTP_PORT}."))
            .and_then(|s| {
                s.parse::<u16>().map_err(|e| warn!("🪛️ Invalid configuration value for MTC_SMTP_PORT. {e}"))
            })
            .ok()
            .unwrap_or(DEFAULT_SMTP_PORT);
        let user = env::var("MTC_SMTP_USER").ok().unwrap_or_else(|| {
            error!("🪛️ MTC_SMTP_USER is not set. Please set it to the login for your mail relay.");
            String::default()
        });
        let password = env::var("MTC_SMTP_PASSWORD").ok().unwrap_or_else(|| {
            error!("🪛️ MTC_SMTP_PASSWORD is not set. Please set it to the password for your mail relay.");
            String::default()
        });
        let password = Secret::new(password);
        let from = env::var("MTC_SMTP_FROM").ok().filter(|s| !s.trim().is_empty()).unwrap_or_else(|| {
            info!("🪛️ MTC_SMTP_FROM is not set. Emails will be sent from the SMTP user address.");
            user.clone()
        });
        Self { server, port, user, password, from }
    }
}

fn configure_check_interval() -> Duration {
    env::var("MTC_CHECK_INTERVAL")
        .map_err(|_| {
            info!(
                "🪛️ MTC_CHECK_INTERVAL is not set. Using the default value of {}s.",
                DEFAULT_CHECK_INTERVAL.as_secs()
            )
        })
        .and_then(|s| match s.parse::<u64>() {
            Ok(0) => {
                warn!("🪛️ MTC_CHECK_INTERVAL cannot be zero. Using the default instead.");
                Err(())
            },
            Ok(secs) => Ok(Duration::from_secs(secs)),
            Err(e) => {
                warn!("🪛️ Invalid configuration value for MTC_CHECK_INTERVAL. {e}");
                Err(())
            },
        })
        .ok()
        .unwrap_or(DEFAULT_CHECK_INTERVAL)
}
