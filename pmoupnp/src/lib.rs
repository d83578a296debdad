//! # pmoupnp - Contrôle et évènements UPnP
//!
//! Cette crate expose des objets applicatifs comme devices UPnP :
//!
//! - [`soap`] : enveloppes SOAP, faults et codes d'erreur UPnP
//! - [`services`] : services, handlers d'actions et dispatcher de contrôle
//! - [`events`] : regroupement des changements d'état (`LastChange`),
//!   timers et canaux de notification
//! - [`devices`] : description des devices, table des UUID et registre
//! - [`server`] : adaptateur HTTP axum
//!
//! Le typage des arguments et la génération des schémas de service sont
//! délégués à [`pmoxsd`].

pub mod config_ext;
pub mod devices;
pub mod events;
pub mod server;
pub mod services;
pub mod soap;

pub use crate::config_ext::UpnpConfigExt;

pub use pmoxsd;

#[doc(hidden)]
pub use once_cell;
