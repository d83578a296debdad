//! # pmoadapters - Exposition de fournisseurs domotiques et multimédia en UPnP
//!
//! Un fournisseur déclare une capacité (interrupteur, lampe à variateur,
//! lecteur). La table [`MAPPINGS`] associe à chaque capacité un type de
//! device UPnP et ses services ; le [`Bridge`] construit les contrôleurs et
//! enregistre le device dans le registre de `pmoupnp`.
//!
//! ```
//! use std::sync::Arc;
//! use pmoadapters::{Bridge, MemorySwitch, Provider};
//! use pmoupnp::devices::{DeviceManifest, DeviceRegistry};
//! use pmoupnp::events::{LoggingSink, ManualScheduler};
//!
//! let bridge = Bridge::new(
//!     Arc::new(DeviceRegistry::new("PMOBridge")),
//!     Arc::new(LoggingSink),
//!     Arc::new(ManualScheduler::new()),
//! );
//! let lamp = Arc::new(MemorySwitch::new(DeviceManifest::new("Lamp")));
//! let device = bridge.register(&Provider::BinarySwitch(lamp)).unwrap().unwrap();
//! assert_eq!(device.properties().type_version(), "BinaryLight:1");
//! ```

mod bridge;
mod context;
pub mod controllers;
mod errors;
mod mapping;
mod memory;
mod providers;
pub mod types;

pub use bridge::Bridge;
pub use context::ServiceContext;
pub use errors::{BridgeError, ProviderError};
pub use mapping::{Capability, DeviceMapping, MAPPINGS, ServiceKind, resolve};
pub use memory::{MemoryDimmer, MemoryPlayer, MemorySwitch};
pub use providers::{
    BinarySwitch, DimmableLight, MediaPlayer, Observer, PlayerChange, PlayerState, Provider,
    SwitchChange,
};
