//! # pmoxsd - Types XML Schema, codec et génération WSDL
//!
//! Cette crate fournit la couche de typage utilisée par la pile UPnP :
//!
//! - un registre de types nommés `(namespace, name)` : primitifs,
//!   énumérations, structures et binaire ;
//! - un codec qui convertit les valeurs typées en éléments XML et inversement ;
//! - les signatures d'opérations et les descripteurs de services ;
//! - la génération d'un document WSDL déterministe pour un ensemble de
//!   services.
//!
//! ## Exemple
//!
//! ```
//! use pmoxsd::{codec, EnumValue, TypeDescriptor, TypeRegistry};
//! use xmltree::Element;
//!
//! let registry = TypeRegistry::new();
//! let state = registry
//!     .register(TypeDescriptor::enumeration("State", "urn:example", ["ON", "OFF"]).unwrap())
//!     .unwrap();
//!
//! let mut parent = Element::new("root");
//! let value = EnumValue::of(&state, "ON").unwrap().into();
//! codec::encode(&value, &state, &mut parent).unwrap();
//!
//! let child = parent.get_child("State").unwrap();
//! assert_eq!(codec::decode(child, &state).unwrap(), value);
//! ```

pub mod codec;
mod descriptor;
mod errors;
mod primitive;
mod registry;
mod signature;
mod value;
mod wsdl;
pub mod xml;

pub use descriptor::{Field, QualifiedName, TypeDescriptor, TypeKind};
pub use errors::XsdError;
pub use primitive::{PrimitiveType, PrimitiveValue};
pub use registry::TypeRegistry;
pub use signature::{OperationSignature, Parameter, ServiceDescriptor};
pub use value::{CompositeValue, EnumValue, Value};
pub use wsdl::WsdlBuilder;

/// Namespace XML Schema.
pub const NS_XSD: &str = "http://www.w3.org/2001/XMLSchema";

/// Namespace WSDL 1.1.
pub const NS_WSDL: &str = "http://schemas.xmlsoap.org/wsdl/";

/// Namespace du binding SOAP de WSDL 1.1.
pub const NS_WSDL_SOAP: &str = "http://schemas.xmlsoap.org/wsdl/soap/";

/// Transport SOAP sur HTTP.
pub const SOAP_HTTP_TRANSPORT: &str = "http://schemas.xmlsoap.org/soap/http";
