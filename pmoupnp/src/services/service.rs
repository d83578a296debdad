//! Service UPnP : descripteur + table de handlers.
//!
//! La table d'enregistrement est construite avant tout trafic ; elle est la
//! seule source consultée par le générateur de schéma et par le dispatcher.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use pmoxsd::{ServiceDescriptor, TypeRegistry, Value};
use tracing::debug;

use super::{ActionError, ServiceError};
use crate::events::ChangeCoalescer;

/// Arguments d'entrée décodés, par nom de paramètre.
#[derive(Debug, Clone, Default)]
pub struct ActionArgs {
    values: HashMap<String, Value>,
}

impl ActionArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    fn require(&self, name: &str) -> Result<&Value, ActionError> {
        self.get(name)
            .ok_or_else(|| ActionError::InvalidArgument(name.to_string()))
    }

    /// Forme texte d'un argument scalaire.
    pub fn text(&self, name: &str) -> Result<String, ActionError> {
        self.require(name)?
            .as_text()
            .ok_or_else(|| ActionError::InvalidArgument(name.to_string()))
    }

    pub fn bool(&self, name: &str) -> Result<bool, ActionError> {
        self.require(name)?
            .as_bool()
            .ok_or_else(|| ActionError::InvalidArgument(name.to_string()))
    }

    pub fn i64(&self, name: &str) -> Result<i64, ActionError> {
        self.require(name)?
            .as_i64()
            .ok_or_else(|| ActionError::InvalidArgument(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Valeurs de sortie produites par un handler.
///
/// L'ordre d'insertion est sans importance : le dispatcher encode les
/// sorties dans l'ordre déclaré par la signature.
#[derive(Debug, Clone, Default)]
pub struct ActionOutput {
    values: Vec<(String, Value)>,
}

impl ActionOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        self.values.retain(|(n, _)| *n != name);
        self.values.push((name, value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Handler synchrone d'une action.
pub type ActionHandler =
    Arc<dyn Fn(&ActionArgs) -> Result<ActionOutput, ActionError> + Send + Sync>;

/// Instance de service prête à recevoir des requêtes de contrôle.
pub struct Service {
    descriptor: ServiceDescriptor,
    types: Arc<TypeRegistry>,
    urn: String,
    handlers: HashMap<String, ActionHandler>,
    coalescer: Option<Arc<ChangeCoalescer>>,
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("urn", &self.urn)
            .field("operations", &self.descriptor.operations().len())
            .field("evented", &self.descriptor.evented())
            .finish()
    }
}

impl Service {
    /// Nom du service (`SwitchPower`, `AVTransport`, ...)
    pub fn name(&self) -> &str {
        self.descriptor.service_type()
    }

    pub fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    /// URN du type de service : `urn:schemas-upnp-org:service:<Type>:<ver>`.
    pub fn urn(&self) -> &str {
        &self.urn
    }

    /// Registre où sont enregistrés les types des signatures du service.
    pub fn types(&self) -> &Arc<TypeRegistry> {
        &self.types
    }

    pub fn handler(&self, operation: &str) -> Option<&ActionHandler> {
        self.handlers.get(operation)
    }

    pub fn coalescer(&self) -> Option<&Arc<ChangeCoalescer>> {
        self.coalescer.as_ref()
    }

    /// Libère les ressources du service (timers en attente).
    pub fn shutdown(&self) {
        if let Some(coalescer) = &self.coalescer {
            coalescer.shutdown();
        }
        debug!("🛑 Service {} shut down", self.name());
    }
}

/// Construction d'un [`Service`] : chaque opération déclarée doit recevoir
/// exactement un handler.
pub struct ServiceBuilder {
    descriptor: ServiceDescriptor,
    types: Option<Arc<TypeRegistry>>,
    handlers: HashMap<String, ActionHandler>,
    coalescer: Option<Arc<ChangeCoalescer>>,
}

impl ServiceBuilder {
    pub fn new(descriptor: ServiceDescriptor) -> Self {
        Self {
            descriptor,
            types: None,
            handlers: HashMap::new(),
            coalescer: None,
        }
    }

    pub fn handler(mut self, operation: impl Into<String>, handler: ActionHandler) -> Self {
        self.handlers.insert(operation.into(), handler);
        self
    }

    /// Registre partagé avec d'autres services. Sans appel, le service
    /// reçoit son propre registre.
    pub fn types(mut self, types: Arc<TypeRegistry>) -> Self {
        self.types = Some(types);
        self
    }

    pub fn coalescer(mut self, coalescer: Arc<ChangeCoalescer>) -> Self {
        self.coalescer = Some(coalescer);
        self
    }

    pub fn build(self) -> Result<Service, ServiceError> {
        for op in self.descriptor.operations() {
            if !self.handlers.contains_key(op.name()) {
                return Err(ServiceError::MissingHandler(op.name().to_string()));
            }
        }
        for name in self.handlers.keys() {
            if self.descriptor.operation(name).is_none() {
                return Err(ServiceError::UnknownOperation(name.clone()));
            }
        }

        let types = self.types.unwrap_or_else(|| Arc::new(TypeRegistry::new()));
        types.register_service(&self.descriptor)?;

        let urn = format!(
            "urn:schemas-upnp-org:service:{}",
            self.descriptor.type_version()
        );

        Ok(Service {
            descriptor: self.descriptor,
            types,
            urn,
            handlers: self.handlers,
            coalescer: self.coalescer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action_handler;
    use pmoxsd::{OperationSignature, PrimitiveType, TypeDescriptor};

    fn descriptor() -> ServiceDescriptor {
        let mut d = ServiceDescriptor::new("SwitchPower", "SwitchPower", 1);
        d.add_operation(
            OperationSignature::new("GetStatus")
                .with_output("ResultStatus", TypeDescriptor::primitive(PrimitiveType::Boolean)),
        )
        .unwrap();
        d
    }

    #[test]
    fn test_build_service() {
        let service = ServiceBuilder::new(descriptor())
            .handler("GetStatus", action_handler!(|_args| Ok(ActionOutput::new().with("ResultStatus", true))))
            .build()
            .unwrap();

        assert_eq!(service.name(), "SwitchPower");
        assert_eq!(service.urn(), "urn:schemas-upnp-org:service:SwitchPower:1");
        assert!(service.handler("GetStatus").is_some());
        assert!(service.handler("getstatus").is_none());
    }

    #[test]
    fn test_missing_handler_rejected() {
        let result = ServiceBuilder::new(descriptor()).build();
        assert!(matches!(result, Err(ServiceError::MissingHandler(name)) if name == "GetStatus"));
    }

    #[test]
    fn test_unknown_handler_rejected() {
        let result = ServiceBuilder::new(descriptor())
            .handler("GetStatus", action_handler!(|_args| Ok(ActionOutput::new())))
            .handler("SetStatus", action_handler!(|_args| Ok(ActionOutput::new())))
            .build();
        assert!(matches!(result, Err(ServiceError::UnknownOperation(name)) if name == "SetStatus"));
    }

    fn transport(types: &Arc<TypeRegistry>, members: &[&str]) -> Result<Service, ServiceError> {
        let state = TypeDescriptor::enumeration("TransportState", "urn:t", members.iter().copied()).unwrap();
        let mut d = ServiceDescriptor::new("AVTransport", "AVTransport", 1);
        d.add_operation(OperationSignature::new("GetTransportInfo").with_output("CurrentTransportState", state))
            .unwrap();
        ServiceBuilder::new(d)
            .types(types.clone())
            .handler("GetTransportInfo", action_handler!(|_args| Ok(ActionOutput::new())))
            .build()
    }

    #[test]
    fn test_build_registers_signature_types() {
        let types = Arc::new(TypeRegistry::new());
        let first = transport(&types, &["STOPPED", "PLAYING"]).unwrap();
        let second = transport(&types, &["STOPPED", "PLAYING"]).unwrap();

        assert!(Arc::ptr_eq(first.types(), second.types()));
        assert!(types.contains("urn:t", "TransportState"));
    }

    #[test]
    fn test_conflicting_type_fails_build() {
        let types = Arc::new(TypeRegistry::new());
        transport(&types, &["STOPPED", "PLAYING"]).unwrap();

        let result = transport(&types, &["STOPPED"]);
        assert!(matches!(
            result,
            Err(ServiceError::Definition(pmoxsd::XsdError::ConflictingType(_)))
        ));
    }

    #[test]
    fn test_args_accessors() {
        let mut args = ActionArgs::new();
        args.insert("Flag", Value::from(true));
        args.insert("Level", Value::from(42u8));

        assert!(args.bool("Flag").unwrap());
        assert_eq!(args.i64("Level").unwrap(), 42);
        assert_eq!(args.text("Level").unwrap(), "42");
        assert!(matches!(args.bool("Level"), Err(ActionError::InvalidArgument(_))));
        assert!(matches!(args.text("Nope"), Err(ActionError::InvalidArgument(_))));
    }

    #[test]
    fn test_output_last_write_wins() {
        let out = ActionOutput::new().with("A", "1").with("A", "2");
        assert_eq!(out.len(), 1);
        assert_eq!(out.get("A").and_then(Value::as_str), Some("2"));
    }
}
