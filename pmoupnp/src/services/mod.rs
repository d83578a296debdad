//! # Module Services - Services UPnP et dispatch des actions
//!
//! Un [`Service`] associe un [`pmoxsd::ServiceDescriptor`] (opérations et
//! variables évènementielles) à un handler par opération. Le
//! [`dispatch`] traite une enveloppe SOAP de contrôle de bout en bout.

mod dispatcher;
mod errors;
mod macros;
mod service;

pub use dispatcher::{ControlFault, DispatchStage, dispatch};
pub use errors::{ActionError, ServiceError};
pub use service::{ActionArgs, ActionHandler, ActionOutput, Service, ServiceBuilder};
