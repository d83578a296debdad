//! Descripteurs de types partagés par les contrôleurs.

use std::sync::Arc;

use once_cell::sync::Lazy;
use pmoxsd::{PrimitiveType, TypeDescriptor};

/// URN de type du service AVTransport, namespace de ses énumérations.
pub const AVT_SERVICE_URN: &str = "urn:schemas-upnp-org:service:AVTransport:1";

pub static BOOLEAN: Lazy<Arc<TypeDescriptor>> =
    Lazy::new(|| TypeDescriptor::primitive(PrimitiveType::Boolean));

pub static UI1: Lazy<Arc<TypeDescriptor>> = Lazy::new(|| TypeDescriptor::primitive(PrimitiveType::UI1));

pub static UI2: Lazy<Arc<TypeDescriptor>> = Lazy::new(|| TypeDescriptor::primitive(PrimitiveType::UI2));

pub static UI4: Lazy<Arc<TypeDescriptor>> = Lazy::new(|| TypeDescriptor::primitive(PrimitiveType::UI4));

pub static I2: Lazy<Arc<TypeDescriptor>> = Lazy::new(|| TypeDescriptor::primitive(PrimitiveType::I2));

pub static I4: Lazy<Arc<TypeDescriptor>> = Lazy::new(|| TypeDescriptor::primitive(PrimitiveType::I4));

pub static STRING: Lazy<Arc<TypeDescriptor>> =
    Lazy::new(|| TypeDescriptor::primitive(PrimitiveType::String));

/// États de transport AVTransport
pub static TRANSPORT_STATE: Lazy<Arc<TypeDescriptor>> = Lazy::new(|| {
    TypeDescriptor::enumeration(
        "TransportState",
        AVT_SERVICE_URN,
        [
            "STOPPED",
            "PLAYING",
            "PAUSED_PLAYBACK",
            "TRANSITIONING",
            "NO_MEDIA_PRESENT",
        ],
    )
    .expect("TransportState members are unique")
});
