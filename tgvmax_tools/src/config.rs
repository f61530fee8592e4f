use std::time::Duration;

use log::*;

pub const DEFAULT_TGVMAX_BASE_URL: &str =
    "https://ressources.data.sncf.com/api/explore/v2.1/catalog/datasets/tgvmax/records";
pub const DEFAULT_TGVMAX_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct TgvMaxConfig {
    pub base_url: String,
    /// Applies to every request. Never unbounded, since a stalled call would stall the whole polling loop.
    pub timeout: Duration,
    /// `-1` lets the server pick the page size.
    pub limit: i64,
    pub order_by: String,
    pub timezone: String,
    pub lang: String,
}

impl Default for TgvMaxConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_TGVMAX_BASE_URL.to_string(),
            timeout: DEFAULT_TGVMAX_TIMEOUT,
            limit: -1,
            order_by: "date".to_string(),
            timezone: "Europe/Paris".to_string(),
            lang: "fr".to_string(),
        }
    }
}

impl TgvMaxConfig {
    pub fn new_from_env_or_default() -> Self {
        let defaults = Self::default();
        let base_url = std::env::var("MTC_TGVMAX_BASE_URL").unwrap_or_else(|_| {
            info!("🪛️ MTC_TGVMAX_BASE_URL not set, using {DEFAULT_TGVMAX_BASE_URL}");
            defaults.base_url.clone()
        });
        let timeout = std::env::var("MTC_TGVMAX_TIMEOUT")
            .map_err(|_| {
                info!("🪛️ MTC_TGVMAX_TIMEOUT not set, using {}s", DEFAULT_TGVMAX_TIMEOUT.as_secs());
            })
            .and_then(|s| match s.parse::<u64>() {
                Ok(0) => {
                    warn!("🪛️ MTC_TGVMAX_TIMEOUT cannot be zero. Using the default instead.");
                    Err(())
                },
                Ok(secs) => Ok(Duration::from_secs(secs)),
                Err(e) => {
                    warn!("🪛️ Invalid configuration value for MTC_TGVMAX_TIMEOUT. {e}");
                    Err(())
                },
            })
            .unwrap_or(DEFAULT_TGVMAX_TIMEOUT);
        let timezone = std::env::var("MTC_TGVMAX_TIMEZONE").unwrap_or(defaults.timezone.clone());
        let lang = std::env::var("MTC_TGVMAX_LANG").unwrap_or(defaults.lang.clone());
        Self { base_url, timeout, timezone, lang, ..defaults }
    }

    /// The fixed query parameters sent with every request, apart from `where`.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("limit", self.limit.to_string()),
            ("order_by", self.order_by.clone()),
            ("timezone", self.timezone.clone()),
            ("lang", self.lang.clone()),
        ]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_query_params() {
        let params = TgvMaxConfig::default().query_params();
        assert_eq!(params[0], ("limit", "-1".to_string()));
        assert_eq!(params[1], ("order_by", "date".to_string()));
        assert_eq!(params[2], ("timezone", "Europe/Paris".to_string()));
        assert_eq!(params[3], ("lang", "fr".to_string()));
    }
}
