//! Tests de génération du document de schéma.

use std::sync::Arc;

use pmoxsd::{
    EnumValue, Field, NS_WSDL, NS_XSD, OperationSignature, PrimitiveType, ServiceDescriptor,
    TypeDescriptor, TypeRegistry, Value, WsdlBuilder, XsdError, codec,
};
use xmltree::Element;

const TNS: &str = "urn:test:calendar";

fn days_of_week() -> Arc<TypeDescriptor> {
    TypeDescriptor::enumeration(
        "DaysOfWeekEnum",
        TNS,
        ["Monday", "Tuesday", "Wednesday", "Friday", "Saturday", "Sunday"],
    )
    .unwrap()
}

fn calendar_service(days: &Arc<TypeDescriptor>) -> ServiceDescriptor {
    let mut service = ServiceDescriptor::new("Calendar", "Calendar", 1);
    service
        .add_operation(
            OperationSignature::new("RemoteCall")
                .with_input("day", days.clone())
                .with_output("result", days.clone()),
        )
        .unwrap();
    service
}

fn elements<'a>(parent: &'a Element, local: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
    parent
        .children
        .iter()
        .filter_map(|n| n.as_element())
        .filter(move |e| e.name == local)
}

fn parse(xml: &str) -> Element {
    Element::parse(xml.as_bytes()).expect("well-formed document")
}

#[test]
fn test_enum_simple_type_in_schema() {
    let days = days_of_week();
    let service = calendar_service(&days);

    let xml = WsdlBuilder::new("Calendar", TNS).to_xml(&[&service]).unwrap();
    let root = parse(&xml);

    assert_eq!(root.name, "definitions");
    assert_eq!(root.namespace.as_deref(), Some(NS_WSDL));

    let types = elements(&root, "types").next().expect("wsdl:types");
    let schema = elements(types, "schema")
        .find(|s| s.attributes.get("targetNamespace").map(String::as_str) == Some(TNS))
        .expect("schema for target namespace");

    let simple = elements(schema, "simpleType")
        .find(|e| e.attributes.get("name").map(String::as_str) == Some("DaysOfWeekEnum"))
        .expect("simpleType DaysOfWeekEnum");
    assert_eq!(simple.namespace.as_deref(), Some(NS_XSD));

    let restriction = elements(simple, "restriction").next().expect("restriction");
    assert_eq!(restriction.namespace.as_deref(), Some(NS_XSD));
    assert_eq!(
        restriction.attributes.get("base").map(String::as_str),
        Some("xs:string")
    );

    let values: Vec<_> = elements(restriction, "enumeration")
        .filter_map(|e| e.attributes.get("value").cloned())
        .collect();
    assert_eq!(
        values,
        vec!["Monday", "Tuesday", "Wednesday", "Friday", "Saturday", "Sunday"]
    );
}

#[test]
fn test_enum_serialization_round_trip() {
    let registry = TypeRegistry::new();
    let days = registry.register(days_of_week()).unwrap();

    let mut parent = Element::new("test");
    let monday: Value = EnumValue::of(&days, "Monday").unwrap().into();
    registry.encode(&monday, &days, &mut parent).unwrap();

    // Aller-retour par la forme texte
    let xml = pmoxsd::xml::to_fragment(&parent).unwrap();
    let reparsed = parse(&xml);
    let child = reparsed.get_child("DaysOfWeekEnum").expect("encoded child");

    assert_eq!(child.get_text().unwrap(), "Monday");
    assert_eq!(child.namespace.as_deref(), Some(TNS));
    assert_eq!(registry.decode(child, &days).unwrap(), monday);
}

#[test]
fn test_decode_mismatched_element_fails() {
    let days = days_of_week();
    let xml = format!(r#"<Weekday xmlns="{}">Monday</Weekday>"#, TNS);
    let element = parse(&xml);
    assert!(matches!(
        codec::decode(&element, &days),
        Err(XsdError::SchemaMismatch { .. })
    ));
}

#[test]
fn test_shared_types_emitted_once() {
    let days = days_of_week();
    let first = calendar_service(&days);

    let mut second = ServiceDescriptor::new("Agenda", "Agenda", 1);
    second
        .add_operation(OperationSignature::new("Next").with_output("day", days.clone()))
        .unwrap();

    let xml = WsdlBuilder::new("Calendar", TNS)
        .to_xml(&[&first, &second])
        .unwrap();
    assert_eq!(xml.matches("name=\"DaysOfWeekEnum\"").count(), 1);
}

#[test]
fn test_conflicting_types_rejected() {
    let days = days_of_week();
    let other_days = TypeDescriptor::enumeration("DaysOfWeekEnum", TNS, ["Monday"]).unwrap();

    let mut service = ServiceDescriptor::new("Calendar", "Calendar", 1);
    service
        .add_operation(OperationSignature::new("A").with_input("d", days))
        .unwrap();
    service
        .add_operation(OperationSignature::new("B").with_input("d", other_days))
        .unwrap();

    assert!(matches!(
        WsdlBuilder::new("Calendar", TNS).to_xml(&[&service]),
        Err(XsdError::ConflictingType(_))
    ));
}

#[test]
fn test_optional_fields_have_min_occurs_zero() {
    let registry = TypeRegistry::new();
    let info = TypeDescriptor::composite(
        "MediaInfo",
        "urn:test:media",
        vec![
            Field::required("uri", registry.primitive(PrimitiveType::String)),
            Field::optional("title", registry.primitive(PrimitiveType::String)),
        ],
    )
    .unwrap();

    let mut service = ServiceDescriptor::new("Media", "Media", 1);
    service
        .add_operation(OperationSignature::new("GetInfo").with_output("info", info))
        .unwrap();

    let root = parse(&WsdlBuilder::new("Media", TNS).to_xml(&[&service]).unwrap());
    let types = elements(&root, "types").next().unwrap();
    let schema = elements(types, "schema")
        .find(|s| s.attributes.get("targetNamespace").map(String::as_str) == Some("urn:test:media"))
        .expect("schema for the type namespace");
    let complex = elements(schema, "complexType").next().unwrap();
    let sequence = elements(complex, "sequence").next().unwrap();
    let fields: Vec<_> = elements(sequence, "element").collect();

    assert_eq!(fields.len(), 2);
    assert!(fields[0].attributes.get("minOccurs").is_none());
    assert_eq!(
        fields[1].attributes.get("minOccurs").map(String::as_str),
        Some("0")
    );
}

#[test]
fn test_output_is_deterministic() {
    let days = days_of_week();
    let service = calendar_service(&days);
    let builder = WsdlBuilder::new("Calendar", TNS).with_location("http://localhost/calendar");

    let a = builder.to_xml(&[&service]).unwrap();
    let b = builder.to_xml(&[&service]).unwrap();
    assert_eq!(a, b);
    assert!(a.contains("http://localhost/calendar"));
}

#[test]
fn test_char_and_uuid_are_published_as_string() {
    let registry = TypeRegistry::new();
    let mut service = ServiceDescriptor::new("Device", "Device", 1);
    service
        .add_operation(
            OperationSignature::new("Identify")
                .with_input("initial", registry.primitive(PrimitiveType::Char))
                .with_output("udn", registry.primitive(PrimitiveType::UUID))
                .with_output("link", registry.primitive(PrimitiveType::URI)),
        )
        .unwrap();

    let xml = WsdlBuilder::new("Device", TNS).to_xml(&[&service]).unwrap();
    assert!(!xml.contains("xs:char"));
    assert!(!xml.contains("xs:uuid"));

    let root = parse(&xml);
    let types = elements(&root, "types").next().unwrap();
    let references: Vec<String> = elements(types, "schema")
        .flat_map(|s| elements(s, "element"))
        .flat_map(|e| elements(e, "complexType"))
        .flat_map(|c| elements(c, "sequence"))
        .flat_map(|s| elements(s, "element"))
        .filter_map(|e| e.attributes.get("type").cloned())
        .collect();
    assert_eq!(references, vec!["xs:string", "xs:string", "xs:anyURI"]);
}
