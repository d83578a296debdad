//! Table `unique_id → UUID` assurant la stabilité des identités de devices.
//!
//! Avec une configuration, la table est chargée au démarrage et chaque
//! nouvelle association y est persistée.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use pmoconfig::Config;
use tracing::{debug, warn};
use uuid::Uuid;

pub struct UuidMap {
    entries: Mutex<HashMap<String, String>>,
    config: Option<Arc<Config>>,
}

impl Default for UuidMap {
    fn default() -> Self {
        Self::new()
    }
}

impl UuidMap {
    /// Table en mémoire seulement.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            config: None,
        }
    }

    /// Table persistée dans `config` (`devices.uuids`).
    pub fn with_config(config: Arc<Config>) -> Self {
        let entries = match config.get_device_uuids() {
            Ok(list) => list.into_iter().collect(),
            Err(e) => {
                warn!("Cannot load device UUIDs: {}", e);
                HashMap::new()
            }
        };
        debug!("Loaded {} device UUID(s)", entries.len());
        Self {
            entries: Mutex::new(entries),
            config: Some(config),
        }
    }

    pub fn get(&self, unique_id: &str) -> Option<String> {
        self.entries.lock().get(unique_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// UUID associé à `unique_id`, généré et enregistré au premier appel.
    ///
    /// Sans identifiant, un UUID neuf est produit à chaque appel et rien
    /// n'est enregistré.
    pub fn resolve(&self, unique_id: Option<&str>) -> String {
        let Some(id) = unique_id.filter(|id| !id.is_empty()) else {
            return Uuid::new_v4().to_string();
        };

        let uuid = {
            let mut entries = self.entries.lock();
            if let Some(uuid) = entries.get(id) {
                return uuid.clone();
            }
            let uuid = Uuid::new_v4().to_string();
            entries.insert(id.to_string(), uuid.clone());
            uuid
        };

        debug!("🆔 New UUID {} for {}", uuid, id);
        if let Some(config) = &self.config {
            if let Err(e) = config.set_device_uuid(id, &uuid) {
                warn!("Cannot persist UUID for {}: {}", id, e);
            }
        }
        uuid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_id_same_uuid() {
        let map = UuidMap::new();
        let a = map.resolve(Some("lamp-1"));
        let b = map.resolve(Some("lamp-1"));
        assert_eq!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
        assert_ne!(a, map.resolve(Some("lamp-2")));
    }

    #[test]
    fn test_anonymous_devices_not_recorded() {
        let map = UuidMap::new();
        let a = map.resolve(None);
        let b = map.resolve(None);
        assert_ne!(a, b);
        assert!(map.is_empty());
    }
}
