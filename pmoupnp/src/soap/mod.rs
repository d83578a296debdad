//! # Module SOAP - Simple Object Access Protocol
//!
//! Ce module implémente la couche SOAP du contrôle UPnP :
//!
//! - ✅ Parsing d'enveloppes SOAP et extraction de l'action
//! - ✅ Construction d'enveloppes de réponse et de requête
//! - ✅ Construction des SOAP Faults avec détail `UPnPError`
//!
//! ## Example
//!
//! ```
//! use pmoupnp::soap::parse_soap_action;
//!
//! let body = r#"<?xml version="1.0"?>
//! <s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
//!   <s:Body>
//!     <u:Play xmlns:u="urn:schemas-upnp-org:service:AVTransport:1">
//!       <InstanceID>0</InstanceID>
//!       <Speed>1</Speed>
//!     </u:Play>
//!   </s:Body>
//! </s:Envelope>"#;
//!
//! let action = parse_soap_action(body.as_bytes()).unwrap();
//! assert_eq!(action.name, "Play");
//! assert_eq!(action.arg_text("InstanceID").as_deref(), Some("0"));
//! ```

mod builder;
mod fault;
mod parser;

pub use builder::{build_soap_envelope, build_soap_request, response_element};
pub use fault::{UpnpError, build_soap_fault};
pub use parser::{SoapAction, SoapParseError, parse_soap_action};

/// Namespace de l'enveloppe SOAP 1.1
pub const NS_SOAP_ENVELOPE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Style d'encodage SOAP
pub const SOAP_ENCODING_STYLE: &str = "http://schemas.xmlsoap.org/soap/encoding/";

/// Namespace du détail `UPnPError`
pub const NS_UPNP_CONTROL: &str = "urn:schemas-upnp-org:control-1-0";

/// Codes d'erreur SOAP UPnP standards
pub mod error_codes {
    /// Action invalide
    pub const INVALID_ACTION: u16 = 401;

    /// Arguments invalides
    pub const INVALID_ARGS: u16 = 402;

    /// Action échouée
    pub const ACTION_FAILED: u16 = 501;

    /// Valeur d'argument invalide
    pub const ARGUMENT_VALUE_INVALID: u16 = 600;

    /// Argument hors limites
    pub const ARGUMENT_VALUE_OUT_OF_RANGE: u16 = 601;

    /// Action optionnelle non implémentée
    pub const OPTIONAL_ACTION_NOT_IMPLEMENTED: u16 = 602;

    /// Transition impossible dans l'état courant (AVTransport)
    pub const TRANSITION_NOT_AVAILABLE: u16 = 701;

    /// Mode de recherche non supporté (AVTransport)
    pub const SEEK_MODE_NOT_SUPPORTED: u16 = 710;

    /// Description standard d'un code d'erreur
    pub fn description(code: u16) -> &'static str {
        match code {
            INVALID_ACTION => "Invalid Action",
            INVALID_ARGS => "Invalid Args",
            ACTION_FAILED => "Action Failed",
            ARGUMENT_VALUE_INVALID => "Argument Value Invalid",
            ARGUMENT_VALUE_OUT_OF_RANGE => "Argument Value Out of Range",
            OPTIONAL_ACTION_NOT_IMPLEMENTED => "Optional Action Not Implemented",
            TRANSITION_NOT_AVAILABLE => "Transition not available",
            SEEK_MODE_NOT_SUPPORTED => "Seek mode not supported",
            _ => "Unknown Error",
        }
    }
}
