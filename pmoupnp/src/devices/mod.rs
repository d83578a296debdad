//! # Module Devices - Devices UPnP
//!
//! - [`DeviceManifest`] / [`DeviceProperties`] : ce que déclare un fournisseur
//! - [`UuidMap`] : identités stables entre redémarrages
//! - [`build_device_description`] : document `desc.xml`
//! - [`DeviceRegistry`] : devices enregistrés et leur cycle de vie

mod description;
mod errors;
mod manifest;
mod registry;
mod uuid_map;

pub use description::{NS_DEVICE, ServiceUrls, build_device_description, mount_path};
pub use errors::DeviceError;
pub use manifest::{DeviceManifest, DeviceProperties};
pub use registry::{DeviceInstance, DeviceRegistry};
pub use uuid_map::UuidMap;

/// Préfixe des identifiants de service UPnP.
pub const UPNP_SERVICE_ID_PREFIX: &str = "urn:upnp-org:serviceId:";
