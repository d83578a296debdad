//! Contexte d'évènements commun aux contrôleurs d'un device.

use std::sync::Arc;
use std::time::Duration;

use pmoupnp::events::{ChangeCoalescer, Notification, NotificationSink, Scheduler};
use pmoxsd::TypeRegistry;
use tracing::warn;

use crate::ServiceKind;

/// Ce dont un contrôleur a besoin pour déclarer ses types et publier ses
/// changements.
#[derive(Clone)]
pub struct ServiceContext {
    /// UUID du device
    pub device: String,
    /// Registre partagé par tous les services du pont
    pub types: Arc<TypeRegistry>,
    pub sink: Arc<dyn NotificationSink>,
    pub scheduler: Arc<dyn Scheduler>,
    /// Fenêtre de regroupement des évènements `LastChange`
    pub window: Duration,
}

impl ServiceContext {
    pub fn coalescer(&self, kind: ServiceKind, namespace: &str) -> Arc<ChangeCoalescer> {
        ChangeCoalescer::new(
            self.device.clone(),
            kind.service_type(),
            namespace,
            self.window,
            self.sink.clone(),
            self.scheduler.clone(),
        )
    }

    /// Notification directe, sans regroupement.
    pub fn notify(&self, kind: ServiceKind, variables: Vec<(String, String)>) {
        let notification = Notification::new(self.device.clone(), kind.service_type(), variables);
        if let Err(e) = self.sink.deliver(notification) {
            warn!("❌ {} notification failed for {}: {}", kind.service_type(), self.device, e);
        }
    }
}
