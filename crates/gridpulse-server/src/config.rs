// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridPulse.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "gridpulse.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub upstream: UpstreamSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub frontend: FrontendSettings,
    #[serde(default)]
    pub cors: CorsSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_main_port")]
    pub main_port: u16,
    #[serde(default = "default_electricity_port")]
    pub electricity_port: u16,
    #[serde(default = "default_gas_port")]
    pub gas_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamSettings {
    #[serde(default = "default_electricity_base_url")]
    pub electricity_base_url: String,
    #[serde(default = "default_gas_base_url")]
    pub gas_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FrontendSettings {
    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_owned()
}

fn default_main_port() -> u16 {
    3000
}

fn default_electricity_port() -> u16 {
    3001
}

fn default_gas_port() -> u16 {
    3002
}

fn default_electricity_base_url() -> String {
    "http://localhost:3001".to_owned()
}

fn default_gas_base_url() -> String {
    "http://localhost:3002".to_owned()
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("./data/historic_demand_2009_2024.csv")
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(gridpulse_core::disk_cache::DEFAULT_CACHE_DIR)
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from("./frontend/dist")
}

fn default_allowed_origins() -> Vec<String> {
    [
        "http://localhost:8080",
        "http://localhost:3000",
        "http://localhost:3001",
        "http://localhost:3002",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            main_port: default_main_port(),
            electricity_port: default_electricity_port(),
            gas_port: default_gas_port(),
        }
    }
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            electricity_base_url: default_electricity_base_url(),
            gas_base_url: default_gas_base_url(),
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            cache_dir: default_cache_dir(),
        }
    }
}

impl Default for FrontendSettings {
    fn default() -> Self {
        Self {
            dist_dir: default_dist_dir(),
        }
    }
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl AppConfig {
    /// Load configuration: the given file (which must exist), else `gridpulse.toml` if
    /// present, else defaults. Environment variables are applied on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).with_context(|| "Failed to parse config TOML")?;
        Ok(config)
    }

    /// Apply overrides from an environment-like lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = |key: &str| -> Result<Option<u16>> {
            lookup(key)
                .map(|value| {
                    value
                        .trim()
                        .parse::<u16>()
                        .with_context(|| format!("{key} must be a port number, got {value:?}"))
                })
                .transpose()
        };

        if let Some(p) = port("MAIN_PORT")? {
            self.server.main_port = p;
        }
        if let Some(p) = port("ELECTRICITY_PORT")? {
            self.server.electricity_port = p;
        }
        if let Some(p) = port("GAS_PORT")? {
            self.server.gas_port = p;
        }
        if let Some(url) = lookup("ELECTRICITY_BASE_URL") {
            self.upstream.electricity_base_url = url;
        }
        if let Some(url) = lookup("GAS_BASE_URL") {
            self.upstream.gas_base_url = url;
        }
        if let Some(path) = lookup("GRIDPULSE_CSV_PATH") {
            self.data.csv_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("GRIDPULSE_CACHE_DIR") {
            self.data.cache_dir = PathBuf::from(path);
        }
        if let Some(path) = lookup("GRIDPULSE_FRONTEND_DIR") {
            self.frontend.dist_dir = PathBuf::from(path);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let ports = [
            ("main", self.server.main_port),
            ("electricity", self.server.electricity_port),
            ("gas", self.server.gas_port),
        ];
        for (i, (name, port)) in ports.iter().enumerate() {
            for (other, other_port) in ports.iter().skip(i + 1) {
                if *port != 0 && port == other_port {
                    bail!("{name} and {other} services cannot share port {port}");
                }
            }
        }
        if self.upstream.electricity_base_url.is_empty() || self.upstream.gas_base_url.is_empty()
        {
            bail!("upstream base URLs must not be empty");
        }
        Ok(())
    }
}
