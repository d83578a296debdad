//! Erreurs relatives aux devices UPnP.

use thiserror::Error;

/// Erreurs liées aux devices UPnP.
#[derive(Error, Debug)]
pub enum DeviceError {
    /// Device déjà enregistré
    #[error("Device '{0}' already registered")]
    AlreadyRegistered(String),

    /// Device inconnu
    #[error("Device '{0}' not found")]
    NotFound(String),

    /// Version invalide
    #[error("Device version must be > 0")]
    InvalidVersion,

    /// Deux services de même type sur un device
    #[error("Service '{0}' already exists in device")]
    ServiceAlreadyExists(String),

    /// Échec de rendu du document de description
    #[error("Cannot render device description: {0}")]
    Description(#[from] pmoxsd::XsdError),
}
