//! Table de correspondance capacité → propriétés de device.

use pmoupnp::devices::{DeviceProperties, UPNP_SERVICE_ID_PREFIX};

use crate::Provider;

/// Capacités reconnues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    BinarySwitch,
    DimmableLight,
    MediaPlayer,
}

/// Services fournis par les contrôleurs de cette crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    SwitchPower,
    Dimming,
    RenderingControl,
    ConnectionManager,
    AVTransport,
}

impl ServiceKind {
    pub fn service_type(&self) -> &'static str {
        match self {
            ServiceKind::SwitchPower => "SwitchPower",
            ServiceKind::Dimming => "Dimming",
            ServiceKind::RenderingControl => "RenderingControl",
            ServiceKind::ConnectionManager => "ConnectionManager",
            ServiceKind::AVTransport => "AVTransport",
        }
    }

    pub fn version(&self) -> u32 {
        1
    }

    /// `urn:upnp-org:serviceId:<Type>:<ver>`
    pub fn service_id(&self) -> String {
        format!(
            "{}{}:{}",
            UPNP_SERVICE_ID_PREFIX,
            self.service_type(),
            self.version()
        )
    }
}

/// Propriétés de device associées à une capacité.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceMapping {
    pub capability: Capability,
    pub device_type: &'static str,
    pub version: u32,
    pub spec_major: u32,
    pub spec_minor: u32,
    pub services: &'static [ServiceKind],
}

impl DeviceMapping {
    pub fn properties(&self) -> DeviceProperties {
        DeviceProperties {
            device_type: self.device_type.to_string(),
            version: self.version,
            spec_major: self.spec_major,
            spec_minor: self.spec_minor,
        }
    }
}

pub static MAPPINGS: &[DeviceMapping] = &[
    DeviceMapping {
        capability: Capability::BinarySwitch,
        device_type: "BinaryLight",
        version: 1,
        spec_major: 1,
        spec_minor: 0,
        services: &[ServiceKind::SwitchPower],
    },
    DeviceMapping {
        capability: Capability::DimmableLight,
        device_type: "DimmableLight",
        version: 1,
        spec_major: 1,
        spec_minor: 0,
        services: &[ServiceKind::SwitchPower, ServiceKind::Dimming],
    },
    DeviceMapping {
        capability: Capability::MediaPlayer,
        device_type: "MediaRenderer",
        version: 1,
        spec_major: 1,
        spec_minor: 0,
        services: &[
            ServiceKind::RenderingControl,
            ServiceKind::ConnectionManager,
            ServiceKind::AVTransport,
        ],
    },
];

impl Provider {
    /// Capacité déclarée, `None` pour un fournisseur non reconnu.
    pub fn capability(&self) -> Option<Capability> {
        match self {
            Provider::BinarySwitch(_) => Some(Capability::BinarySwitch),
            Provider::DimmableLight(_) => Some(Capability::DimmableLight),
            Provider::MediaPlayer(_) => Some(Capability::MediaPlayer),
            Provider::Unsupported { .. } => None,
        }
    }
}

/// Propriétés de device d'un fournisseur.
pub fn resolve(provider: &Provider) -> Option<&'static DeviceMapping> {
    let capability = provider.capability()?;
    MAPPINGS.iter().find(|m| m.capability == capability)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmoupnp::devices::DeviceManifest;

    #[test]
    fn test_every_capability_is_mapped() {
        for c in [Capability::BinarySwitch, Capability::DimmableLight, Capability::MediaPlayer] {
            assert_eq!(MAPPINGS.iter().filter(|m| m.capability == c).count(), 1);
        }
    }

    #[test]
    fn test_unsupported_provider_has_no_mapping() {
        let p = Provider::Unsupported {
            kind: "Thermostat".to_string(),
            manifest: DeviceManifest::new("Heater"),
        };
        assert!(resolve(&p).is_none());
    }

    #[test]
    fn test_service_id() {
        assert_eq!(
            ServiceKind::SwitchPower.service_id(),
            "urn:upnp-org:serviceId:SwitchPower:1"
        );
    }

    #[test]
    fn test_media_renderer_properties() {
        let m = MAPPINGS
            .iter()
            .find(|m| m.capability == Capability::MediaPlayer)
            .unwrap();
        let p = m.properties();
        assert_eq!(p.type_version(), "MediaRenderer:1");
        assert_eq!(m.services.len(), 3);
    }
}
