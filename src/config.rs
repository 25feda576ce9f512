use std::path::PathBuf;

/// Process settings, read from `RENTAL_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub vat_rate: f64,
    pub metrics_port: Option<u16>,
    pub admin_email: String,
    pub admin_password: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            vat_rate: 0.21,
            metrics_port: None,
            admin_email: "admin@example.com".into(),
            admin_password: "admin".into(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset or unparsable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let vat_rate = lookup("RENTAL_VAT_RATE")
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|r| r.is_finite() && *r >= 0.0)
            .unwrap_or(defaults.vat_rate);
        Self {
            data_dir: lookup("RENTAL_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            vat_rate,
            metrics_port: lookup("RENTAL_METRICS_PORT").and_then(|s| s.parse().ok()),
            admin_email: lookup("RENTAL_ADMIN_EMAIL").unwrap_or(defaults.admin_email),
            admin_password: lookup("RENTAL_ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(Config::from_lookup(lookup(&[])), Config::default());
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("RENTAL_DATA_DIR", "/var/lib/rental"),
            ("RENTAL_VAT_RATE", "0.1"),
            ("RENTAL_METRICS_PORT", "9100"),
            ("RENTAL_ADMIN_EMAIL", "owner@example.com"),
        ]));
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/rental"));
        assert_eq!(config.vat_rate, 0.1);
        assert_eq!(config.metrics_port, Some(9100));
        assert_eq!(config.admin_email, "owner@example.com");
        assert_eq!(config.admin_password, "admin");
    }

    #[test]
    fn bad_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("RENTAL_VAT_RATE", "-1"),
            ("RENTAL_METRICS_PORT", "not-a-port"),
        ]));
        assert_eq!(config.vat_rate, 0.21);
        assert_eq!(config.metrics_port, None);
    }
}
