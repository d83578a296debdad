//! Canaux de livraison des notifications d'évènements.

use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use super::EventError;

/// Changement d'état publié par un service : paires `(variable, valeur)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// UUID du device émetteur
    pub device: String,
    /// Nom du service émetteur
    pub service: String,
    pub variables: Vec<(String, String)>,
}

impl Notification {
    pub fn new(
        device: impl Into<String>,
        service: impl Into<String>,
        variables: Vec<(String, String)>,
    ) -> Self {
        Self {
            device: device.into(),
            service: service.into(),
            variables,
        }
    }

    pub fn get(&self, variable: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|(n, _)| n == variable)
            .map(|(_, v)| v.as_str())
    }
}

/// Destination des notifications.
///
/// La livraison est au mieux : une erreur est journalisée par l'appelant,
/// jamais rejouée.
pub trait NotificationSink: Send + Sync {
    fn deliver(&self, notification: Notification) -> Result<(), EventError>;
}

/// Transmet les notifications dans un canal tokio.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: UnboundedSender<Notification>,
}

impl ChannelSink {
    pub fn new(tx: UnboundedSender<Notification>) -> Self {
        Self { tx }
    }
}

impl NotificationSink for ChannelSink {
    fn deliver(&self, notification: Notification) -> Result<(), EventError> {
        self.tx
            .send(notification)
            .map_err(|_| EventError::ChannelClosed)
    }
}

/// Se contente de journaliser les notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSink;

impl NotificationSink for LoggingSink {
    fn deliver(&self, notification: Notification) -> Result<(), EventError> {
        for (name, value) in &notification.variables {
            info!(
                device = %notification.device,
                service = %notification.service,
                "📣 {} = {}",
                name,
                value
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sink() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let sink = ChannelSink::new(tx);
        sink.deliver(Notification::new("u", "SwitchPower", vec![("Status".into(), "1".into())]))
            .unwrap();

        let n = rx.try_recv().unwrap();
        assert_eq!(n.service, "SwitchPower");
        assert_eq!(n.get("Status"), Some("1"));
    }

    #[test]
    fn test_closed_channel() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        let sink = ChannelSink::new(tx);
        assert!(matches!(
            sink.deliver(Notification::new("u", "s", vec![])),
            Err(EventError::ChannelClosed)
        ));
    }
}
