use thiserror::Error;

use pmoupnp::devices::DeviceError;
use pmoupnp::services::{ActionError, ServiceError};

/// Erreur remontée par un fournisseur.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Provider unavailable")]
    Unavailable,
}

impl From<ProviderError> for ActionError {
    fn from(err: ProviderError) -> Self {
        ActionError::Failed(err.to_string())
    }
}

/// Erreur d'exposition d'un fournisseur.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),
}
