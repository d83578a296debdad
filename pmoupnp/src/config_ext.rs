//! Extension pour intégrer la configuration UPnP dans pmoconfig
//!
//! Ce module fournit le trait `UpnpConfigExt` qui ajoute à
//! `pmoconfig::Config` les réglages propres à la couche UPnP.

use std::time::Duration;

use anyhow::Result;
use pmoconfig::Config;
use serde_yaml::Value;

use crate::events::DEFAULT_EVENT_WINDOW;

const DEFAULT_MANUFACTURER: &str = "PMOBridge";

/// Trait d'extension pour ajouter la configuration UPnP à pmoconfig
///
/// # Exemple
///
/// ```rust,ignore
/// use pmoconfig::get_config;
/// use pmoupnp::UpnpConfigExt;
///
/// let config = get_config();
/// let manufacturer = config.get_upnp_manufacturer()?;
/// let window = config.get_event_window()?;
/// ```
pub trait UpnpConfigExt {
    /// Fabricant affiché quand le manifeste n'en déclare pas (défaut: "PMOBridge")
    fn get_upnp_manufacturer(&self) -> Result<String>;

    fn set_upnp_manufacturer(&self, manufacturer: String) -> Result<()>;

    /// Fenêtre de regroupement des évènements, en millisecondes (défaut: 200)
    fn get_event_window_ms(&self) -> Result<u64>;

    fn set_event_window_ms(&self, window_ms: u64) -> Result<()>;

    /// Fenêtre de regroupement des évènements
    fn get_event_window(&self) -> Result<Duration> {
        Ok(Duration::from_millis(self.get_event_window_ms()?))
    }
}

impl UpnpConfigExt for Config {
    fn get_upnp_manufacturer(&self) -> Result<String> {
        match self.get_value(&["host", "upnp", "manufacturer"]) {
            Ok(Value::String(s)) if !s.is_empty() => Ok(s),
            _ => Ok(DEFAULT_MANUFACTURER.to_string()),
        }
    }

    fn set_upnp_manufacturer(&self, manufacturer: String) -> Result<()> {
        self.set_value(
            &["host", "upnp", "manufacturer"],
            Value::String(manufacturer),
        )
    }

    fn get_event_window_ms(&self) -> Result<u64> {
        match self.get_value(&["host", "upnp", "event_window_ms"]) {
            Ok(Value::Number(n)) => match n.as_u64() {
                Some(ms) if ms > 0 => Ok(ms),
                _ => Ok(DEFAULT_EVENT_WINDOW.as_millis() as u64),
            },
            _ => Ok(DEFAULT_EVENT_WINDOW.as_millis() as u64),
        }
    }

    fn set_event_window_ms(&self, window_ms: u64) -> Result<()> {
        self.set_value(
            &["host", "upnp", "event_window_ms"],
            Value::Number(window_ms.into()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config() -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();
        (dir, config)
    }

    #[test]
    fn test_defaults() {
        let (_dir, config) = config();
        assert_eq!(config.get_upnp_manufacturer().unwrap(), "PMOBridge");
        assert_eq!(config.get_event_window_ms().unwrap(), 200);
        assert_eq!(config.get_event_window().unwrap(), Duration::from_millis(200));
    }

    #[test]
    fn test_setters() {
        let (_dir, config) = config();
        config.set_upnp_manufacturer("Acme".to_string()).unwrap();
        config.set_event_window_ms(50).unwrap();
        assert_eq!(config.get_upnp_manufacturer().unwrap(), "Acme");
        assert_eq!(config.get_event_window_ms().unwrap(), 50);
    }
}
