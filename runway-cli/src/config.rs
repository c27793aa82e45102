//! Settings file (`~/.runway/config.toml`) with environment overrides.
//!
//! Resolved once at startup into [`Settings`] and passed down explicitly.

use anyhow::{Context, Result};
use chrono_tz::Tz;
use runway_core::account::split_list;
use runway_core::time::parse_timezone;
use runway_core::{ClassificationRules, SpendConfig};
use runway_finance::Credentials;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::default_workbook_dir;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub pocketsmith: PocketsmithSection,
    pub classification: ClassificationSection,
    pub spending: SpendConfig,
    pub workbook: WorkbookSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PocketsmithSection {
    pub api_key: Option<String>,
    pub user_id: Option<String>,
    /// Defaults to https://api.pocketsmith.com/v2
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassificationSection {
    pub cash_titles: TitleList,
    pub investment_titles: TitleList,
    pub car_identifier: String,
    pub condo_identifier: String,
}

/// Either a TOML array or a single comma-separated string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TitleList {
    List(Vec<String>),
    Csv(String),
}

impl Default for TitleList {
    fn default() -> Self {
        TitleList::List(Vec::new())
    }
}

impl TitleList {
    pub fn items(&self) -> Vec<String> {
        match self {
            TitleList::List(v) => v.clone(),
            TitleList::Csv(s) => split_list(s),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkbookSection {
    /// Directory holding one CSV per tab (default: ~/.runway/workbook)
    pub dir: Option<PathBuf>,
    /// Time zone used for "today" and every written date
    pub timezone: String,
}

impl Default for WorkbookSection {
    fn default() -> Self {
        Self {
            dir: None,
            timezone: "America/Chicago".to_string(),
        }
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: Option<String>,
    pub user_id: Option<String>,
    pub base_url: Option<String>,
    pub rules: ClassificationRules,
    pub spend: SpendConfig,
    pub workbook_dir: PathBuf,
    pub timezone: Tz,
}

impl Settings {
    /// Fails with `ConfigurationMissing` when the key or user id is absent.
    pub fn credentials(&self) -> Result<Credentials> {
        Ok(Credentials::new(self.api_key.as_deref(), self.user_id.as_deref())?)
    }
}

impl Config {
    /// Overlay environment variables on top of file values.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("POCKETSMITH_API_KEY") {
            self.pocketsmith.api_key = Some(v);
        }
        if let Some(v) = get("POCKETSMITH_USER_ID") {
            self.pocketsmith.user_id = Some(v);
        }
        if let Some(v) = get("POCKETSMITH_BASE_URL") {
            self.pocketsmith.base_url = Some(v);
        }
        if let Some(v) = get("CASH_TITLES") {
            self.classification.cash_titles = TitleList::Csv(v);
        }
        if let Some(v) = get("INVESTMENT_TITLES") {
            self.classification.investment_titles = TitleList::Csv(v);
        }
        if let Some(v) = get("CAR_IDENTIFIER") {
            self.classification.car_identifier = v;
        }
        if let Some(v) = get("CONDO_IDENTIFIER") {
            self.classification.condo_identifier = v;
        }
        if let Some(v) = get("RUNWAY_TIMEZONE") {
            self.workbook.timezone = v;
        }
        if let Some(v) = get("RUNWAY_WORKBOOK_DIR") {
            self.workbook.dir = Some(PathBuf::from(v));
        }
    }

    pub fn resolve(self, workbook_override: Option<PathBuf>) -> Result<Settings> {
        let timezone = parse_timezone(&self.workbook.timezone)?;
        let workbook_dir = match workbook_override.or(self.workbook.dir) {
            Some(dir) => dir,
            None => default_workbook_dir()?,
        };
        let rules = ClassificationRules::new(
            &self.classification.cash_titles.items(),
            &self.classification.investment_titles.items(),
            &self.classification.car_identifier,
            &self.classification.condo_identifier,
        );

        Ok(Settings {
            api_key: self.pocketsmith.api_key,
            user_id: self.pocketsmith.user_id,
            base_url: self.pocketsmith.base_url,
            rules,
            spend: self.spending,
            workbook_dir,
            timezone,
        })
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

/// Load the file, overlay the process environment, resolve.
pub fn load_settings(path: &Path, workbook_override: Option<PathBuf>) -> Result<Settings> {
    let mut cfg = load_config(path)?;
    cfg.apply_env(|k| std::env::var(k).ok());
    cfg.resolve(workbook_override)
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    save_config(path, &Config::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Mask all but the last four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let n = secret.chars().count();
    if n <= 4 {
        return "*".repeat(n);
    }
    let tail: String = secret.chars().skip(n - 4).collect();
    format!("{}{}", "*".repeat(n - 4), tail)
}
