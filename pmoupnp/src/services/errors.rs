use thiserror::Error;

use crate::soap::{UpnpError, error_codes};

/// Erreur levée par un handler d'action.
#[derive(Error, Debug)]
pub enum ActionError {
    /// Erreur métier portant son propre code UPnP (701, 710, ...).
    #[error("UPnP error {code}: {description}")]
    Upnp { code: u16, description: String },

    /// Argument absent ou invalide (402).
    #[error("Invalid argument {0}")]
    InvalidArgument(String),

    /// Toute autre défaillance (501).
    #[error("Action failed: {0}")]
    Failed(String),
}

impl ActionError {
    pub fn upnp(code: u16, description: impl Into<String>) -> Self {
        ActionError::Upnp {
            code,
            description: description.into(),
        }
    }

    /// Code UPnP le plus proche.
    pub fn to_upnp(&self) -> UpnpError {
        match self {
            ActionError::Upnp { code, description } => UpnpError::new(*code, description.clone()),
            ActionError::InvalidArgument(name) => UpnpError::new(
                error_codes::INVALID_ARGS,
                format!("{}: {}", error_codes::description(error_codes::INVALID_ARGS), name),
            ),
            ActionError::Failed(_) => UpnpError::from_code(error_codes::ACTION_FAILED),
        }
    }
}

impl From<pmoxsd::XsdError> for ActionError {
    fn from(err: pmoxsd::XsdError) -> Self {
        ActionError::Failed(err.to_string())
    }
}

/// Erreur de construction d'un service.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("No handler bound to operation {0}")]
    MissingHandler(String),

    #[error("Handler bound to unknown operation {0}")]
    UnknownOperation(String),

    #[error("Invalid service definition: {0}")]
    Definition(#[from] pmoxsd::XsdError),
}
