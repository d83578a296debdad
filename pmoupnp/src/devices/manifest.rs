//! Métadonnées déclarées par un fournisseur et propriétés de device.

/// Métadonnées d'affichage et identité stable d'un fournisseur.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceManifest {
    /// Identifiant stable servant de clé dans la table des UUID
    pub unique_id: Option<String>,
    pub display_name: String,
    pub manufacturer: Option<String>,
    pub description: Option<String>,
    pub full_name: Option<String>,
    pub model_number: Option<String>,
}

impl DeviceManifest {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Default::default()
        }
    }

    pub fn with_unique_id(mut self, id: impl Into<String>) -> Self {
        self.unique_id = Some(id.into());
        self
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    pub fn with_model_number(mut self, model_number: impl Into<String>) -> Self {
        self.model_number = Some(model_number.into());
        self
    }

    /// Nom de modèle : nom complet, à défaut nom d'affichage.
    pub fn model_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.display_name)
    }
}

/// Type UPnP d'un device et version de la spécification suivie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProperties {
    pub device_type: String,
    pub version: u32,
    pub spec_major: u32,
    pub spec_minor: u32,
}

impl DeviceProperties {
    /// Propriétés d'un device UPnP 1.0.
    pub fn new(device_type: impl Into<String>, version: u32) -> Self {
        Self {
            device_type: device_type.into(),
            version,
            spec_major: 1,
            spec_minor: 0,
        }
    }

    /// `<type>:<version>`, par exemple `BinaryLight:1`.
    pub fn type_version(&self) -> String {
        format!("{}:{}", self.device_type, self.version)
    }

    /// URN du type de device.
    pub fn urn(&self) -> String {
        format!("urn:schemas-upnp-org:device:{}", self.type_version())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_name_fallback() {
        let m = DeviceManifest::new("Lamp");
        assert_eq!(m.model_name(), "Lamp");
        let m = m.with_full_name("Kitchen Lamp 3000");
        assert_eq!(m.model_name(), "Kitchen Lamp 3000");
    }

    #[test]
    fn test_type_version() {
        let p = DeviceProperties::new("BinaryLight", 1);
        assert_eq!(p.type_version(), "BinaryLight:1");
        assert_eq!(p.urn(), "urn:schemas-upnp-org:device:BinaryLight:1");
        assert_eq!((p.spec_major, p.spec_minor), (1, 0));
    }
}
