//! Lab-specific site configuration.
//!
//! Each participating site runs the same protocol on different display
//! and trigger hardware; the differences live in a JSON file keyed by
//! site name.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortType {
    /// Log triggers instead of sending them, for development
    Dummy,
    Serial,
    ViewPixx,
    LabJack,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Short site code, prefixed to subject IDs
    pub abbreviation: String,
    pub mon_width_cm: f64,
    pub mon_dist_cm: f64,
    pub mon_resolution: (u32, u32),
    /// Configured refresh rate; the session asserts the measured rate
    /// stays close to this
    pub refresh_rate: f64,
    pub port_type: PortType,
    #[serde(default)]
    pub port_address: Option<String>,
    #[serde(default)]
    pub port_baudrate: Option<u32>,
}

/// Load one site's configuration from a JSON lookup of all sites.
pub fn load_site_config(path: &Path, site: &str) -> Result<SiteConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading site configuration {}", path.display()))?;
    let sites: BTreeMap<String, SiteConfig> =
        serde_json::from_str(&text).context("parsing site configuration")?;
    sites.get(site).cloned().ok_or_else(|| {
        let known: Vec<&str> = sites.keys().map(String::as_str).collect();
        anyhow!("unknown site '{site}', known sites: {}", known.join(", "))
    })
}

/// Development configuration, used when no site file is given.
pub fn example_site() -> SiteConfig {
    SiteConfig {
        abbreviation: "DEV".to_string(),
        mon_width_cm: 55.0,
        mon_dist_cm: 60.0,
        mon_resolution: (1920, 1080),
        refresh_rate: 60.0,
        port_type: PortType::Dummy,
        port_address: None,
        port_baudrate: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn roundtrips_through_json() {
        let mut sites = BTreeMap::new();
        sites.insert("example".to_string(), example_site());
        let path = env::temp_dir().join("ablink_sites_test.json");
        fs::write(&path, serde_json::to_string_pretty(&sites).unwrap()).unwrap();

        let loaded = load_site_config(&path, "example").unwrap();
        assert_eq!(loaded.abbreviation, "DEV");
        assert_eq!(loaded.port_type, PortType::Dummy);
        assert!(load_site_config(&path, "nowhere").is_err());
        fs::remove_file(&path).ok();
    }

    #[test]
    fn port_type_names_are_lowercase() {
        assert_eq!(
            serde_json::to_string(&PortType::ViewPixx).unwrap(),
            "\"viewpixx\""
        );
        assert_eq!(
            serde_json::from_str::<PortType>("\"labjack\"").unwrap(),
            PortType::LabJack
        );
    }
}
