//! Registre des devices exposés.
//!
//! Le registre possède la table des UUID et les instances de devices. Il
//! est créé au démarrage et partagé par référence ; il n'y a pas d'état
//! global.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use super::{
    DeviceError, DeviceManifest, DeviceProperties, UuidMap, build_device_description, mount_path,
};
use crate::services::Service;

/// Device enregistré : identité, services et description rendue.
#[derive(Debug)]
pub struct DeviceInstance {
    uuid: String,
    manifest: DeviceManifest,
    properties: DeviceProperties,
    services: Vec<Arc<Service>>,
    description: String,
}

impl DeviceInstance {
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// `uuid:<uuid>`
    pub fn udn(&self) -> String {
        format!("uuid:{}", self.uuid)
    }

    pub fn manifest(&self) -> &DeviceManifest {
        &self.manifest
    }

    pub fn properties(&self) -> &DeviceProperties {
        &self.properties
    }

    pub fn mount_path(&self) -> String {
        mount_path(&self.uuid)
    }

    /// Document `desc.xml`
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn services(&self) -> &[Arc<Service>] {
        &self.services
    }

    pub fn service(&self, name: &str) -> Option<&Arc<Service>> {
        self.services.iter().find(|s| s.name() == name)
    }

    fn shutdown(&self) {
        for service in &self.services {
            service.shutdown();
        }
    }
}

#[derive(Default)]
struct Devices {
    by_uuid: HashMap<String, Arc<DeviceInstance>>,
    order: Vec<String>,
}

/// Registre centralisé des devices UPnP.
///
/// # Examples
///
/// ```
/// use pmoupnp::devices::{DeviceManifest, DeviceProperties, DeviceRegistry};
///
/// let registry = DeviceRegistry::new("PMOBridge");
/// let manifest = DeviceManifest::new("Lamp").with_unique_id("lamp-1");
///
/// let uuid = registry.assign_uuid(&manifest);
/// let device = registry
///     .register(&uuid, manifest, DeviceProperties::new("BinaryLight", 1), vec![])
///     .unwrap();
///
/// assert_eq!(device.udn(), format!("uuid:{}", uuid));
/// assert!(registry.get(&uuid).is_some());
/// ```
pub struct DeviceRegistry {
    uuids: UuidMap,
    manufacturer: String,
    config_id: u32,
    devices: RwLock<Devices>,
}

impl std::fmt::Debug for DeviceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let devices = self.devices.read();
        f.debug_struct("DeviceRegistry")
            .field("device_count", &devices.order.len())
            .field("uuids", &devices.order)
            .finish()
    }
}

impl DeviceRegistry {
    /// Registre avec une table d'UUID en mémoire.
    pub fn new(manufacturer: impl Into<String>) -> Self {
        Self::with_uuid_map(UuidMap::new(), manufacturer)
    }

    pub fn with_uuid_map(uuids: UuidMap, manufacturer: impl Into<String>) -> Self {
        Self {
            uuids,
            manufacturer: manufacturer.into(),
            config_id: 1,
            devices: RwLock::new(Devices::default()),
        }
    }

    /// Valeur de `configId` publiée dans les descriptions.
    pub fn with_config_id(mut self, config_id: u32) -> Self {
        self.config_id = config_id;
        self
    }

    pub fn uuids(&self) -> &UuidMap {
        &self.uuids
    }

    /// UUID du device décrit par `manifest` (stable pour un même `unique_id`).
    pub fn assign_uuid(&self, manifest: &DeviceManifest) -> String {
        self.uuids.resolve(manifest.unique_id.as_deref())
    }

    /// Enregistre un device et construit sa description.
    ///
    /// # Errors
    ///
    /// - [`DeviceError::AlreadyRegistered`] si l'UUID est déjà utilisé
    /// - [`DeviceError::InvalidVersion`] pour une version nulle
    /// - [`DeviceError::ServiceAlreadyExists`] si deux services ont le même type
    pub fn register(
        &self,
        uuid: &str,
        manifest: DeviceManifest,
        properties: DeviceProperties,
        services: Vec<Service>,
    ) -> Result<Arc<DeviceInstance>, DeviceError> {
        if properties.version == 0 {
            return Err(DeviceError::InvalidVersion);
        }

        let mut seen: Vec<&str> = Vec::new();
        for service in &services {
            if seen.contains(&service.name()) {
                return Err(DeviceError::ServiceAlreadyExists(service.name().to_string()));
            }
            seen.push(service.name());
        }

        let services: Vec<Arc<Service>> = services.into_iter().map(Arc::new).collect();
        let description = build_device_description(
            uuid,
            &manifest,
            &properties,
            &services,
            &self.manufacturer,
            self.config_id,
        )?;

        let device = Arc::new(DeviceInstance {
            uuid: uuid.to_string(),
            manifest,
            properties,
            services,
            description,
        });

        let mut devices = self.devices.write();
        if devices.by_uuid.contains_key(uuid) {
            return Err(DeviceError::AlreadyRegistered(uuid.to_string()));
        }
        devices.by_uuid.insert(uuid.to_string(), device.clone());
        devices.order.push(uuid.to_string());

        info!(
            "✅ Device {} ({}) registered with {} service(s)",
            device.manifest.display_name,
            device.properties.type_version(),
            device.services.len()
        );
        Ok(device)
    }

    /// Retire un device et annule ses timers en attente.
    pub fn unregister(&self, uuid: &str) -> Result<Arc<DeviceInstance>, DeviceError> {
        let device = {
            let mut devices = self.devices.write();
            let device = devices
                .by_uuid
                .remove(uuid)
                .ok_or_else(|| DeviceError::NotFound(uuid.to_string()))?;
            devices.order.retain(|u| u != uuid);
            device
        };

        device.shutdown();
        info!("🗑️ Device {} unregistered", uuid);
        Ok(device)
    }

    pub fn get(&self, uuid: &str) -> Option<Arc<DeviceInstance>> {
        self.devices.read().by_uuid.get(uuid).cloned()
    }

    /// Devices dans l'ordre d'enregistrement.
    pub fn devices(&self) -> Vec<Arc<DeviceInstance>> {
        let devices = self.devices.read();
        devices
            .order
            .iter()
            .filter_map(|u| devices.by_uuid.get(u).cloned())
            .collect()
    }

    pub fn service(&self, uuid: &str, name: &str) -> Option<Arc<Service>> {
        self.get(uuid).and_then(|d| d.service(name).cloned())
    }

    pub fn len(&self) -> usize {
        self.devices.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retire tous les devices.
    pub fn shutdown_all(&self) {
        let uuids: Vec<String> = self.devices.read().order.clone();
        for uuid in uuids {
            if let Err(e) = self.unregister(&uuid) {
                debug!("Device {} already gone: {}", uuid, e);
            }
        }
    }
}
