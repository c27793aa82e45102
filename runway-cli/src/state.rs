use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn runway_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".runway"))
}

pub fn ensure_runway_home() -> Result<PathBuf> {
    let dir = runway_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(ensure_runway_home()?.join("config.toml"))
}

pub fn default_workbook_dir() -> Result<PathBuf> {
    Ok(runway_home()?.join("workbook"))
}
