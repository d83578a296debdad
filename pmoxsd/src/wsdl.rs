//! Génération du document de schéma (WSDL) d'un ou plusieurs services.
//!
//! Le document contient :
//! - un `xs:schema` par namespace de types, les types partagés n'étant émis
//!   qu'une fois (clé `(namespace, name)`) ;
//! - un élément enveloppe par opération (`Op`) et par réponse (`OpResponse`) ;
//! - les messages, port types, bindings SOAP document/literal et services.
//!
//! La sortie est déterministe : l'ordre suit l'ordre de déclaration des
//! services, des opérations et des paramètres.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;
use xmltree::Element;

use crate::xml::{element, push, to_document};
use crate::{
    NS_WSDL, NS_WSDL_SOAP, NS_XSD, OperationSignature, Parameter, QualifiedName,
    SOAP_HTTP_TRANSPORT, ServiceDescriptor, TypeDescriptor, TypeKind, XsdError,
};

/// Constructeur de document WSDL.
///
/// # Examples
///
/// ```
/// use pmoxsd::{OperationSignature, PrimitiveType, ServiceDescriptor, TypeDescriptor, WsdlBuilder};
///
/// let mut service = ServiceDescriptor::new("SwitchPower", "SwitchPower", 1);
/// service
///     .add_operation(
///         OperationSignature::new("GetStatus")
///             .with_output("ResultStatus", TypeDescriptor::primitive(PrimitiveType::Boolean)),
///     )
///     .unwrap();
///
/// let xml = WsdlBuilder::new("SwitchPower", "urn:schemas-upnp-org:service:SwitchPower:1")
///     .to_xml(&[&service])
///     .unwrap();
/// assert!(xml.contains("GetStatusResponse"));
/// ```
#[derive(Debug, Clone)]
pub struct WsdlBuilder {
    name: String,
    target_namespace: String,
    location: Option<String>,
}

struct PrefixTable {
    entries: Vec<(String, String)>,
}

impl PrefixTable {
    fn prefix(&self, namespace: &str) -> &str {
        self.entries
            .iter()
            .find(|(ns, _)| ns == namespace)
            .map(|(_, p)| p.as_str())
            .unwrap_or("tns")
    }

    fn reference(&self, descriptor: &TypeDescriptor) -> String {
        if let TypeKind::Primitive(primitive) = descriptor.kind() {
            format!("xs:{}", primitive.schema_type())
        } else if descriptor.is_builtin() {
            format!("xs:{}", descriptor.name())
        } else {
            format!("{}:{}", self.prefix(descriptor.namespace()), descriptor.name())
        }
    }
}

impl WsdlBuilder {
    pub fn new(name: impl Into<String>, target_namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_namespace: target_namespace.into(),
            location: None,
        }
    }

    /// Adresse publiée dans `soap:address`.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Construit l'arbre du document.
    ///
    /// # Errors
    ///
    /// - [`XsdError::ConflictingType`] si deux types différents partagent un
    ///   même `(namespace, name)`
    /// - [`XsdError::DuplicateOperation`] si deux services déclarent une même
    ///   opération avec des signatures différentes
    pub fn build(&self, services: &[&ServiceDescriptor]) -> Result<Element, XsdError> {
        let operations = self.collect_operations(services)?;
        let types = collect_types(&operations)?;

        // Namespaces : cible d'abord, puis ceux des types par ordre d'apparition
        let mut namespaces: Vec<String> = vec![self.target_namespace.clone()];
        for t in &types {
            if !namespaces.iter().any(|ns| ns == t.namespace()) {
                namespaces.push(t.namespace().to_string());
            }
        }

        let prefixes = PrefixTable {
            entries: namespaces
                .iter()
                .enumerate()
                .map(|(i, ns)| {
                    let p = if i == 0 { "tns".to_string() } else { format!("s{}", i - 1) };
                    (ns.clone(), p)
                })
                .collect(),
        };

        let mut root = element(
            "wsdl:definitions",
            &[
                ("xmlns:wsdl", NS_WSDL),
                ("xmlns:soap", NS_WSDL_SOAP),
                ("xmlns:xs", NS_XSD),
            ],
        );
        for (ns, prefix) in &prefixes.entries {
            root.attributes.insert(format!("xmlns:{}", prefix), ns.clone());
        }
        root.attributes
            .insert("name".to_string(), self.name.clone());
        root.attributes
            .insert("targetNamespace".to_string(), self.target_namespace.clone());

        // <wsdl:types>
        let mut wsdl_types = element("wsdl:types", &[]);
        for (index, ns) in namespaces.iter().enumerate() {
            let mut schema = element(
                "xs:schema",
                &[("targetNamespace", ns.as_str()), ("elementFormDefault", "qualified")],
            );

            if index == 0 {
                for other in namespaces.iter().skip(1) {
                    push(&mut schema, element("xs:import", &[("namespace", other.as_str())]));
                }
            }

            for t in types.iter().filter(|t| t.namespace() == ns) {
                push(&mut schema, type_definition(t, &prefixes));
            }

            if index == 0 {
                for op in &operations {
                    push(&mut schema, wrapper_element(op.name(), op.inputs(), &prefixes));
                    push(
                        &mut schema,
                        wrapper_element(&op.response_name(), op.outputs(), &prefixes),
                    );
                }
            }

            push(&mut wsdl_types, schema);
        }
        push(&mut root, wsdl_types);

        // <wsdl:message>
        for op in &operations {
            for name in [op.name().to_string(), op.response_name()] {
                let mut message = element("wsdl:message", &[("name", name.as_str())]);
                push(
                    &mut message,
                    element(
                        "wsdl:part",
                        &[("name", "parameters"), ("element", format!("tns:{}", name).as_str())],
                    ),
                );
                push(&mut root, message);
            }
        }

        // <wsdl:portType>
        for service in services {
            let mut port_type = element("wsdl:portType", &[("name", service.service_type())]);
            for op in service.operations() {
                let response = op.response_name();
                let mut operation = element("wsdl:operation", &[("name", op.name())]);
                push(
                    &mut operation,
                    element(
                        "wsdl:input",
                        &[("name", op.name()), ("message", format!("tns:{}", op.name()).as_str())],
                    ),
                );
                push(
                    &mut operation,
                    element(
                        "wsdl:output",
                        &[("name", response.as_str()), ("message", format!("tns:{}", response).as_str())],
                    ),
                );
                push(&mut port_type, operation);
            }
            push(&mut root, port_type);
        }

        // <wsdl:binding>
        for service in services {
            let binding_name = format!("{}Binding", service.service_type());
            let mut binding = element(
                "wsdl:binding",
                &[
                    ("name", binding_name.as_str()),
                    ("type", format!("tns:{}", service.service_type()).as_str()),
                ],
            );
            push(
                &mut binding,
                element(
                    "soap:binding",
                    &[("style", "document"), ("transport", SOAP_HTTP_TRANSPORT)],
                ),
            );
            for op in service.operations() {
                let mut operation = element("wsdl:operation", &[("name", op.name())]);
                push(
                    &mut operation,
                    element(
                        "soap:operation",
                        &[
                            ("soapAction", format!("{}#{}", self.target_namespace, op.name()).as_str()),
                            ("style", "document"),
                        ],
                    ),
                );
                for direction in ["wsdl:input", "wsdl:output"] {
                    let mut io = element(direction, &[]);
                    push(&mut io, element("soap:body", &[("use", "literal")]));
                    push(&mut operation, io);
                }
                push(&mut binding, operation);
            }
            push(&mut root, binding);
        }

        // <wsdl:service>
        let mut wsdl_service = element("wsdl:service", &[("name", self.name.as_str())]);
        for service in services {
            let mut port = element(
                "wsdl:port",
                &[
                    ("name", format!("{}Port", service.service_type()).as_str()),
                    ("binding", format!("tns:{}Binding", service.service_type()).as_str()),
                ],
            );
            if let Some(location) = &self.location {
                push(&mut port, element("soap:address", &[("location", location.as_str())]));
            }
            push(&mut wsdl_service, port);
        }
        push(&mut root, wsdl_service);

        debug!(
            "Built schema document {} ({} operations, {} types)",
            self.name,
            operations.len(),
            types.len()
        );

        Ok(root)
    }

    /// Construit et sérialise le document.
    pub fn to_xml(&self, services: &[&ServiceDescriptor]) -> Result<String, XsdError> {
        to_document(&self.build(services)?)
    }

    fn collect_operations<'a>(
        &self,
        services: &[&'a ServiceDescriptor],
    ) -> Result<Vec<&'a OperationSignature>, XsdError> {
        let mut seen: HashMap<&str, &OperationSignature> = HashMap::new();
        let mut ordered = Vec::new();

        for service in services {
            for op in service.operations() {
                match seen.get(op.name()) {
                    Some(existing) if *existing == op => {}
                    Some(_) => return Err(XsdError::DuplicateOperation(op.name().to_string())),
                    None => {
                        seen.insert(op.name(), op);
                        ordered.push(op);
                    }
                }
            }
        }

        Ok(ordered)
    }
}

/// Types non prédéfinis atteignables depuis les opérations, dédoublonnés
/// par nom qualifié, dans l'ordre de première apparition.
fn collect_types(operations: &[&OperationSignature]) -> Result<Vec<Arc<TypeDescriptor>>, XsdError> {
    let mut seen: HashMap<QualifiedName, Arc<TypeDescriptor>> = HashMap::new();
    let mut ordered = Vec::new();

    for op in operations {
        for p in op.inputs().iter().chain(op.outputs()) {
            visit(&p.descriptor, &mut seen, &mut ordered)?;
        }
    }

    Ok(ordered)
}

fn visit(
    descriptor: &Arc<TypeDescriptor>,
    seen: &mut HashMap<QualifiedName, Arc<TypeDescriptor>>,
    ordered: &mut Vec<Arc<TypeDescriptor>>,
) -> Result<(), XsdError> {
    if descriptor.is_builtin() {
        return Ok(());
    }

    let key = descriptor.qualified_name();
    if let Some(existing) = seen.get(&key) {
        if **existing != **descriptor {
            return Err(XsdError::ConflictingType(key));
        }
        return Ok(());
    }

    seen.insert(key, Arc::clone(descriptor));
    ordered.push(Arc::clone(descriptor));

    if let Some(fields) = descriptor.fields() {
        for f in fields {
            visit(&f.descriptor, seen, ordered)?;
        }
    }
    Ok(())
}

fn type_definition(descriptor: &TypeDescriptor, prefixes: &PrefixTable) -> Element {
    match descriptor.kind() {
        TypeKind::Enum(members) => {
            let mut simple = element("xs:simpleType", &[("name", descriptor.name())]);
            let mut restriction = element("xs:restriction", &[("base", "xs:string")]);
            for m in members {
                push(&mut restriction, element("xs:enumeration", &[("value", m.as_str())]));
            }
            push(&mut simple, restriction);
            simple
        }
        TypeKind::Composite(fields) => {
            let mut complex = element("xs:complexType", &[("name", descriptor.name())]);
            let mut sequence = element("xs:sequence", &[]);
            for f in fields {
                let reference = prefixes.reference(&f.descriptor);
                let mut field = element("xs:element", &[("name", f.name.as_str()), ("type", reference.as_str())]);
                if f.optional {
                    field
                        .attributes
                        .insert("minOccurs".to_string(), "0".to_string());
                }
                push(&mut sequence, field);
            }
            push(&mut complex, sequence);
            complex
        }
        // Les types prédéfinis ne sont jamais collectés
        TypeKind::Primitive(_) | TypeKind::Binary => {
            element("xs:simpleType", &[("name", descriptor.name())])
        }
    }
}

fn wrapper_element(name: &str, parameters: &[Parameter], prefixes: &PrefixTable) -> Element {
    let mut wrapper = element("xs:element", &[("name", name)]);
    let mut complex = element("xs:complexType", &[]);
    let mut sequence = element("xs:sequence", &[]);
    for p in parameters {
        let reference = prefixes.reference(&p.descriptor);
        push(
            &mut sequence,
            element("xs:element", &[("name", p.name.as_str()), ("type", reference.as_str())]),
        );
    }
    push(&mut complex, sequence);
    push(&mut wrapper, complex);
    wrapper
}
