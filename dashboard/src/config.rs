use anyhow::Context;
use disastercore::feed::DisplayZone;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Initial map view, defaulting to the whole of India.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapView {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: f64,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center_lat: 22.9734,
            center_lon: 78.6569,
            zoom: 5.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub backend_url: String,
    pub map: MapView,
    pub display_zone: DisplayZone,
    /// Periodic refresh; unset means load-time and post-submission only.
    pub refresh_interval_secs: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:5000/".into(),
            map: MapView::default(),
            display_zone: DisplayZone::Local,
            refresh_interval_secs: None,
        }
    }
}

impl DashboardConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading dashboard config {}", path_ref.display()))?;
        let config: DashboardConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing dashboard config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn with_backend(mut self, backend_url: Option<String>) -> Self {
        if let Some(url) = backend_url {
            self.backend_url = url;
        }
        self
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        self.refresh_interval_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"backend_url: http://10.0.0.5:5000/\ndisplay_zone: utc\nrefresh_interval_secs: 30\nmap:\n  zoom: 7\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = DashboardConfig::load(&path).unwrap();
        assert_eq!(cfg.backend_url, "http://10.0.0.5:5000/");
        assert_eq!(cfg.display_zone, DisplayZone::Utc);
        assert_eq!(cfg.refresh_interval(), Some(Duration::from_secs(30)));
        assert_eq!(cfg.map.zoom, 7.0);
        assert_eq!(cfg.map.center_lat, 22.9734);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = DashboardConfig::load("/nonexistent/dashboard.yaml").unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/dashboard.yaml"));
    }

    #[test]
    fn backend_override_wins() {
        let cfg = DashboardConfig::default().with_backend(Some("http://backend:8080/".into()));
        assert_eq!(cfg.backend_url, "http://backend:8080/");
        assert_eq!(cfg.refresh_interval(), None);
    }
}
