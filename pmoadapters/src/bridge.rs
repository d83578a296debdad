//! Exposition des fournisseurs comme devices UPnP.

use std::sync::Arc;
use std::time::Duration;

use pmoupnp::devices::{DeviceInstance, DeviceRegistry};
use pmoupnp::events::{DEFAULT_EVENT_WINDOW, NotificationSink, Scheduler};
use pmoupnp::services::Service;
use pmoxsd::TypeRegistry;
use tracing::{info, warn};

use crate::controllers::{
    AVTransportController, DimmingController, RenderingControlController, SwitchPowerController,
    connection,
};
use crate::{BridgeError, Provider, ServiceContext, resolve};

/// Point d'entrée : un fournisseur enregistré devient un device publié
/// dans le registre.
pub struct Bridge {
    registry: Arc<DeviceRegistry>,
    types: Arc<TypeRegistry>,
    sink: Arc<dyn NotificationSink>,
    scheduler: Arc<dyn Scheduler>,
    window: Duration,
}

impl Bridge {
    pub fn new(
        registry: Arc<DeviceRegistry>,
        sink: Arc<dyn NotificationSink>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            registry,
            types: Arc::new(TypeRegistry::new()),
            sink,
            scheduler,
            window: DEFAULT_EVENT_WINDOW,
        }
    }

    /// Fenêtre de regroupement des évènements `LastChange`.
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.registry
    }

    /// Types déclarés par les services exposés, partagés entre devices.
    pub fn types(&self) -> &Arc<TypeRegistry> {
        &self.types
    }

    /// Enregistre un fournisseur.
    ///
    /// Retourne `Ok(None)` si sa capacité n'a pas de correspondance UPnP :
    /// le fournisseur est ignoré sans erreur.
    ///
    /// # Errors
    ///
    /// Échec de construction d'un service ou d'enregistrement du device.
    pub fn register(&self, provider: &Provider) -> Result<Option<Arc<DeviceInstance>>, BridgeError> {
        let manifest = provider.manifest();
        let Some(mapping) = resolve(provider) else {
            warn!(
                "⚠️ No UPnP mapping for {} provider {}, skipped",
                provider.kind(),
                manifest.display_name
            );
            return Ok(None);
        };

        let uuid = self.registry.assign_uuid(&manifest);
        let ctx = ServiceContext {
            device: uuid.clone(),
            types: self.types.clone(),
            sink: self.sink.clone(),
            scheduler: self.scheduler.clone(),
            window: self.window,
        };

        let services = build_services(provider, &ctx)?;
        let device = self
            .registry
            .register(&uuid, manifest, mapping.properties(), services)?;
        Ok(Some(device))
    }

    /// Enregistre une liste de fournisseurs, dans l'ordre.
    pub fn register_all(&self, providers: &[Provider]) -> Result<Vec<Arc<DeviceInstance>>, BridgeError> {
        let mut devices = Vec::new();
        for provider in providers {
            if let Some(device) = self.register(provider)? {
                devices.push(device);
            }
        }
        info!("🌉 {} device(s) exposed out of {} provider(s)", devices.len(), providers.len());
        Ok(devices)
    }
}

fn build_services(provider: &Provider, ctx: &ServiceContext) -> Result<Vec<Service>, BridgeError> {
    let services = match provider {
        Provider::BinarySwitch(p) => vec![SwitchPowerController::service(p.clone(), ctx)?],
        Provider::DimmableLight(p) => vec![
            SwitchPowerController::service(p.clone(), ctx)?,
            DimmingController::service(p.clone(), ctx)?,
        ],
        Provider::MediaPlayer(p) => vec![
            RenderingControlController::service(p.clone(), ctx)?,
            connection::service(p.clone(), ctx)?,
            AVTransportController::service(p.clone(), ctx)?,
        ],
        Provider::Unsupported { .. } => Vec::new(),
    };
    Ok(services)
}
