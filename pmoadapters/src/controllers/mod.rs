//! Contrôleurs de services : chacun traduit les actions UPnP vers les
//! appels du fournisseur, et ses changements d'état vers des évènements.

pub mod avtransport;
pub mod connection;
pub mod dimming;
pub mod rendering;
pub mod switch_power;

pub use avtransport::{AVTransportController, TransportState};
pub use dimming::DimmingController;
pub use rendering::RenderingControlController;
pub use switch_power::SwitchPowerController;
