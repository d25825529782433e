use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

pub const CONFIG_FILE: &str = "config.toml";
pub const ENV_PREFIX: &str = "QBANK_";

/// Runtime configuration.
///
/// Sources, lowest to highest priority: built-in defaults, `config.toml`,
/// then `QBANK_*` environment variables (`__` separates sections, e.g.
/// `QBANK_SHEETS__SHEET_ID`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub basic: BasicConfig,
    #[serde(default)]
    pub sheets: SheetsConfig,
    #[serde(default)]
    pub firebase: FirebaseConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub loglevel: String,
    /// Base64-encoded master key for private cookies (at least 64 bytes once decoded).
    /// A random key is generated when unset, so sessions do not survive restarts.
    pub cookie_key: Option<String>,
    /// Drop the `Secure` attribute on cookies; local plain-HTTP development only.
    pub insecure_cookie: bool,
    pub proxy: Option<Url>,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            cookie_key: None,
            insecure_cookie: false,
            proxy: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SheetsConfig {
    pub sheet_id: String,
    pub worksheet: String,
    pub service_account_path: PathBuf,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            sheet_id: "1LcWVbB8GkCJ55S_MN78km3Y4xn1JxnAGN6EOrfouO7Y".to_string(),
            worksheet: "question".to_string(),
            service_account_path: PathBuf::from("tws-question-bank-297ef7f605bf.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FirebaseConfig {
    pub service_account_path: PathBuf,
    /// Overrides the `project_id` read from the service-account key file.
    pub project_id: Option<String>,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            service_account_path: PathBuf::from("tws-question-bank-82a10-5d33d8483530.json"),
            project_id: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_question_worksheet() {
        let cfg = Config::default();
        assert_eq!(cfg.sheets.worksheet, "question");
        assert_eq!(cfg.basic.listen_addr, "0.0.0.0:8000");
        assert!(!cfg.basic.insecure_cookie);
        assert!(cfg.firebase.project_id.is_none());
    }

    #[test]
    fn env_and_toml_override_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                [basic]
                loglevel = "debug"

                [sheets]
                worksheet = "staging"
                "#,
            )?;
            jail.set_env("QBANK_SHEETS__SHEET_ID", "sheet-from-env");
            jail.set_env("QBANK_BASIC__INSECURE_COOKIE", "true");

            let cfg = Config::load()?;
            assert_eq!(cfg.basic.loglevel, "debug");
            assert_eq!(cfg.sheets.worksheet, "staging");
            assert_eq!(cfg.sheets.sheet_id, "sheet-from-env");
            assert!(cfg.basic.insecure_cookie);
            Ok(())
        });
    }
}
