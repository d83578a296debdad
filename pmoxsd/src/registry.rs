//! Registre des types nommés.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;
use xmltree::Element;

use crate::{PrimitiveType, QualifiedName, ServiceDescriptor, TypeDescriptor, Value, XsdError, codec};

/// Registre des types, indexé par `(namespace, name)`.
///
/// Le registre est initialisé avec les types primitifs et le type binaire.
/// Il est partagé entre threads et n'est modifié qu'à l'enregistrement.
#[derive(Debug)]
pub struct TypeRegistry {
    types: RwLock<HashMap<QualifiedName, Arc<TypeDescriptor>>>,
    order: RwLock<Vec<QualifiedName>>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        let registry = Self {
            types: RwLock::new(HashMap::new()),
            order: RwLock::new(Vec::new()),
        };

        let builtins = PrimitiveType::ALL
            .iter()
            .map(|p| TypeDescriptor::primitive(*p))
            .chain(std::iter::once(TypeDescriptor::binary()));

        {
            let mut types = registry.types.write();
            let mut order = registry.order.write();
            for d in builtins {
                let key = d.qualified_name();
                order.push(key.clone());
                types.insert(key, d);
            }
        }

        registry
    }

    /// Enregistre un type.
    ///
    /// # Errors
    ///
    /// [`XsdError::DuplicateType`] si un type de même nom qualifié existe
    /// déjà. Le registre n'est pas modifié dans ce cas.
    pub fn register(&self, descriptor: Arc<TypeDescriptor>) -> Result<Arc<TypeDescriptor>, XsdError> {
        let key = descriptor.qualified_name();
        let mut types = self.types.write();

        if types.contains_key(&key) {
            return Err(XsdError::DuplicateType(key));
        }

        debug!("Registering type {}", key);
        types.insert(key.clone(), Arc::clone(&descriptor));
        self.order.write().push(key);
        Ok(descriptor)
    }

    /// Enregistre tous les types nommés atteignables depuis les signatures
    /// de `service`, champs des structures compris.
    ///
    /// Un type déjà présent avec une définition identique est réutilisé :
    /// plusieurs services peuvent partager un même type.
    ///
    /// # Errors
    ///
    /// [`XsdError::ConflictingType`] si un type de même nom qualifié a une
    /// autre définition, dans le registre ou dans le service. Aucun type du
    /// service n'est enregistré dans ce cas.
    pub fn register_service(&self, service: &ServiceDescriptor) -> Result<(), XsdError> {
        let mut pending: Vec<Arc<TypeDescriptor>> = Vec::new();
        let mut stack: Vec<Arc<TypeDescriptor>> = service
            .operations()
            .iter()
            .flat_map(|op| op.inputs().iter().chain(op.outputs()))
            .map(|p| Arc::clone(&p.descriptor))
            .collect();
        stack.reverse();

        let mut types = self.types.write();
        while let Some(descriptor) = stack.pop() {
            if descriptor.is_builtin() {
                continue;
            }

            let key = descriptor.qualified_name();
            let known = types
                .get(&key)
                .or_else(|| pending.iter().find(|d| d.qualified_name() == key));
            match known {
                Some(existing) if **existing == *descriptor => continue,
                Some(_) => return Err(XsdError::ConflictingType(key)),
                None => {}
            }

            if let Some(fields) = descriptor.fields() {
                stack.extend(fields.iter().rev().map(|f| Arc::clone(&f.descriptor)));
            }
            pending.push(descriptor);
        }

        let mut order = self.order.write();
        for descriptor in pending {
            let key = descriptor.qualified_name();
            debug!("Registering type {} for service {}", key, service.service_type());
            order.push(key.clone());
            types.insert(key, descriptor);
        }
        Ok(())
    }

    /// Descripteur enregistré sous le nom qualifié de `descriptor`.
    fn lookup(&self, descriptor: &TypeDescriptor) -> Result<Arc<TypeDescriptor>, XsdError> {
        self.get(descriptor.namespace(), descriptor.name())
            .ok_or_else(|| XsdError::UnknownType(descriptor.qualified_name()))
    }

    pub fn get(&self, namespace: &str, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.types
            .read()
            .get(&QualifiedName::new(namespace, name))
            .cloned()
    }

    pub fn contains(&self, namespace: &str, name: &str) -> bool {
        self.types
            .read()
            .contains_key(&QualifiedName::new(namespace, name))
    }

    /// Descripteur partagé d'un type primitif.
    pub fn primitive(&self, primitive: PrimitiveType) -> Arc<TypeDescriptor> {
        let key = QualifiedName::new(crate::NS_XSD, primitive.xsd_name());
        match self.types.read().get(&key) {
            Some(d) => Arc::clone(d),
            None => TypeDescriptor::primitive(primitive),
        }
    }

    pub fn binary(&self) -> Arc<TypeDescriptor> {
        self.get(crate::NS_XSD, "base64Binary")
            .unwrap_or_else(TypeDescriptor::binary)
    }

    /// Types enregistrés, dans l'ordre d'enregistrement.
    pub fn types(&self) -> Vec<Arc<TypeDescriptor>> {
        let types = self.types.read();
        self.order
            .read()
            .iter()
            .filter_map(|k| types.get(k).cloned())
            .collect()
    }

    /// Encode `value` comme enfant de `parent`. Voir [`codec::encode`].
    pub fn encode(
        &self,
        value: &Value,
        descriptor: &TypeDescriptor,
        parent: &mut Element,
    ) -> Result<(), XsdError> {
        codec::encode(value, descriptor, parent)
    }

    /// Décode `element` selon `descriptor`. Voir [`codec::decode`].
    pub fn decode(&self, element: &Element, descriptor: &TypeDescriptor) -> Result<Value, XsdError> {
        codec::decode(element, descriptor)
    }

    /// Décode le contenu d'un argument selon le type enregistré sous le nom
    /// de `descriptor`.
    ///
    /// # Errors
    ///
    /// [`XsdError::UnknownType`] si le type n'a pas été enregistré, puis les
    /// erreurs de [`codec::decode_content`].
    pub fn decode_content(&self, element: &Element, descriptor: &TypeDescriptor) -> Result<Value, XsdError> {
        codec::decode_content(element, &*self.lookup(descriptor)?)
    }

    /// Encode `value` sous l'élément `name`, selon le type enregistré.
    pub fn encode_named(
        &self,
        value: &Value,
        descriptor: &TypeDescriptor,
        name: &str,
        parent: &mut Element,
    ) -> Result<(), XsdError> {
        codec::encode_named(value, &*self.lookup(descriptor)?, name, None, parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Field, NS_XSD, OperationSignature};

    #[test]
    fn test_seeded_with_primitives() {
        let r = TypeRegistry::new();
        assert!(r.contains(NS_XSD, "string"));
        assert!(r.contains(NS_XSD, "unsignedInt"));
        assert!(r.contains(NS_XSD, "base64Binary"));
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let r = TypeRegistry::new();
        let d = TypeDescriptor::enumeration("E", "urn:t", ["A"]).unwrap();
        r.register(d.clone()).unwrap();

        let again = TypeDescriptor::enumeration("E", "urn:t", ["A", "B"]).unwrap();
        assert!(matches!(r.register(again), Err(XsdError::DuplicateType(_))));

        // Le premier enregistrement reste en place
        let kept = r.get("urn:t", "E").unwrap();
        assert_eq!(kept.members().unwrap().len(), 1);
    }

    #[test]
    fn test_same_name_in_other_namespace_is_allowed() {
        let r = TypeRegistry::new();
        r.register(TypeDescriptor::enumeration("E", "urn:a", ["A"]).unwrap())
            .unwrap();
        r.register(TypeDescriptor::enumeration("E", "urn:b", ["A"]).unwrap())
            .unwrap();
        assert!(r.contains("urn:a", "E"));
        assert!(r.contains("urn:b", "E"));
    }

    fn transport_service(state: Arc<TypeDescriptor>) -> ServiceDescriptor {
        let mut service = ServiceDescriptor::new("AVTransport", "AVTransport", 1);
        service
            .add_operation(OperationSignature::new("GetTransportInfo").with_output("CurrentTransportState", state))
            .unwrap();
        service
    }

    fn transport_state(members: &[&str]) -> Arc<TypeDescriptor> {
        TypeDescriptor::enumeration("TransportState", "urn:t", members.iter().copied()).unwrap()
    }

    #[test]
    fn test_services_share_identical_types() {
        let r = TypeRegistry::new();
        r.register_service(&transport_service(transport_state(&["STOPPED", "PLAYING"])))
            .unwrap();
        r.register_service(&transport_service(transport_state(&["STOPPED", "PLAYING"])))
            .unwrap();

        let registered = r.types().into_iter().filter(|d| d.namespace() == "urn:t").count();
        assert_eq!(registered, 1);
    }

    #[test]
    fn test_conflicting_service_type_is_rejected() {
        let r = TypeRegistry::new();
        r.register_service(&transport_service(transport_state(&["STOPPED", "PLAYING"])))
            .unwrap();

        let other = transport_service(transport_state(&["STOPPED"]));
        assert!(matches!(r.register_service(&other), Err(XsdError::ConflictingType(_))));
        assert_eq!(r.get("urn:t", "TransportState").unwrap().members().unwrap().len(), 2);
    }

    #[test]
    fn test_conflict_inside_one_service_registers_nothing() {
        let r = TypeRegistry::new();
        let mut service = transport_service(transport_state(&["STOPPED", "PLAYING"]));
        let info = TypeDescriptor::composite(
            "Info",
            "urn:t",
            vec![Field::required("state", transport_state(&["PLAYING"]))],
        )
        .unwrap();
        service
            .add_operation(OperationSignature::new("GetInfo").with_output("Info", info))
            .unwrap();

        assert!(matches!(r.register_service(&service), Err(XsdError::ConflictingType(_))));
        assert!(!r.contains("urn:t", "TransportState"));
        assert!(!r.contains("urn:t", "Info"));
    }

    #[test]
    fn test_composite_fields_are_registered() {
        let r = TypeRegistry::new();
        let state = TypeDescriptor::enumeration("State", "urn:inner", ["ON", "OFF"]).unwrap();
        let info = TypeDescriptor::composite("Info", "urn:t", vec![Field::required("state", state)]).unwrap();
        let mut service = ServiceDescriptor::new("Lamp", "Lamp", 1);
        service
            .add_operation(OperationSignature::new("GetInfo").with_output("Info", info))
            .unwrap();

        r.register_service(&service).unwrap();
        assert!(r.contains("urn:t", "Info"));
        assert!(r.contains("urn:inner", "State"));
    }

    #[test]
    fn test_decode_requires_registered_type() {
        let r = TypeRegistry::new();
        let state = transport_state(&["STOPPED", "PLAYING"]);
        let mut element = Element::new("CurrentTransportState");
        element.children.push(xmltree::XMLNode::Text("PLAYING".to_string()));

        assert!(matches!(r.decode_content(&element, &state), Err(XsdError::UnknownType(_))));

        r.register_service(&transport_service(state.clone())).unwrap();
        let value = r.decode_content(&element, &state).unwrap();
        assert_eq!(value, Value::Enum(crate::EnumValue::of(&state, "PLAYING").unwrap()));

        let flag = r.primitive(PrimitiveType::Boolean);
        let mut flag_element = Element::new("Flag");
        flag_element.children.push(xmltree::XMLNode::Text("1".to_string()));
        assert_eq!(r.decode_content(&flag_element, &flag).unwrap(), Value::from(true));
    }

    #[test]
    fn test_types_keep_registration_order() {
        let r = TypeRegistry::new();
        r.register(TypeDescriptor::enumeration("Z", "urn:t", ["A"]).unwrap())
            .unwrap();
        r.register(TypeDescriptor::enumeration("A", "urn:t", ["A"]).unwrap())
            .unwrap();
        let names: Vec<_> = r
            .types()
            .into_iter()
            .filter(|d| d.namespace() == "urn:t")
            .map(|d| d.name().to_string())
            .collect();
        assert_eq!(names, vec!["Z", "A"]);
    }
}
