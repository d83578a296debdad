//! Encodage et décodage des valeurs typées en éléments XML.
//!
//! # Namespaces
//!
//! Un élément qualifié porte le namespace de son descripteur. Une
//! déclaration `xmlns` n'est ajoutée que si le namespace par défaut hérité
//! du parent est différent. Les champs d'une structure sont qualifiés par le
//! namespace de la structure.
//!
//! Les arguments SOAP UPnP sont des éléments non qualifiés : on utilise
//! alors [`encode_named`] et [`decode_content`].

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use xmltree::{Element, XMLNode};

use crate::{
    CompositeValue, EnumValue, PrimitiveValue, QualifiedName, TypeDescriptor, TypeKind, Value,
    XsdError,
};

/// Encode `value` en un élément enfant de `parent`, nommé et qualifié
/// d'après `descriptor`.
///
/// # Errors
///
/// - [`XsdError::TypeMismatch`] si la valeur n'a pas la forme du descripteur
/// - [`XsdError::UnknownMember`] pour un membre d'enum inconnu
/// - [`XsdError::MissingField`] si un champ obligatoire manque
/// - [`XsdError::InvalidValue`] si une conversion primitive échoue
pub fn encode(value: &Value, descriptor: &TypeDescriptor, parent: &mut Element) -> Result<(), XsdError> {
    let inherited = default_namespace(parent).map(str::to_string);
    let element = build_element(
        value,
        descriptor,
        descriptor.name(),
        Some(descriptor.namespace()),
        inherited.as_deref(),
    )?;
    parent.children.push(XMLNode::Element(element));
    Ok(())
}

/// Encode `value` sous un élément nommé `name`.
///
/// Avec `namespace = None`, l'élément n'est pas qualifié (cas des arguments
/// d'action UPnP).
pub fn encode_named(
    value: &Value,
    descriptor: &TypeDescriptor,
    name: &str,
    namespace: Option<&str>,
    parent: &mut Element,
) -> Result<(), XsdError> {
    let inherited = default_namespace(parent).map(str::to_string);
    let element = build_element(value, descriptor, name, namespace, inherited.as_deref())?;
    parent.children.push(XMLNode::Element(element));
    Ok(())
}

/// Décode un élément qualifié.
///
/// Le nom local et le namespace de l'élément doivent correspondre au
/// descripteur, sinon [`XsdError::SchemaMismatch`] est retourné.
pub fn decode(element: &Element, descriptor: &TypeDescriptor) -> Result<Value, XsdError> {
    let found = element_name(element);
    if found.name != descriptor.name() || found.namespace != descriptor.namespace() {
        return Err(XsdError::SchemaMismatch {
            expected: descriptor.qualified_name(),
            found,
        });
    }
    decode_content(element, descriptor)
}

/// Décode le contenu d'un élément sans vérifier son nom.
pub fn decode_content(element: &Element, descriptor: &TypeDescriptor) -> Result<Value, XsdError> {
    match descriptor.kind() {
        TypeKind::Primitive(p) => {
            let text = element.get_text().unwrap_or_default();
            Ok(Value::Primitive(p.parse(&text)?))
        }
        TypeKind::Enum(_) => {
            let text = element.get_text().unwrap_or_default();
            Ok(Value::Enum(EnumValue::of(descriptor, text.trim())?))
        }
        TypeKind::Binary => {
            let text = element.get_text().unwrap_or_default();
            let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
            STANDARD
                .decode(compact.as_bytes())
                .map(Value::Binary)
                .map_err(|e| XsdError::MalformedBinary(e.to_string()))
        }
        TypeKind::Composite(fields) => {
            let mut value = CompositeValue::new();

            for field in fields {
                let child = element.children.iter().find_map(|n| match n {
                    XMLNode::Element(e) if e.name == field.name => Some(e),
                    _ => None,
                });

                match child {
                    Some(child) => {
                        let found = element_name(child);
                        if found.namespace != descriptor.namespace() {
                            return Err(XsdError::SchemaMismatch {
                                expected: QualifiedName::new(descriptor.namespace(), &field.name),
                                found,
                            });
                        }
                        value.set(&field.name, decode_content(child, &field.descriptor)?);
                    }
                    None if field.optional => {}
                    None => {
                        return Err(XsdError::MissingField {
                            type_name: descriptor.qualified_name(),
                            field: field.name.clone(),
                        });
                    }
                }
            }

            Ok(Value::Composite(value))
        }
    }
}

/// Forme texte d'une valeur scalaire selon son descripteur.
///
/// Les primitifs sont convertis vers le type déclaré en passant par leur
/// forme lexicale.
pub fn encode_text(value: &Value, descriptor: &TypeDescriptor) -> Result<String, XsdError> {
    match (descriptor.kind(), value) {
        (TypeKind::Primitive(p), Value::Primitive(v)) => Ok(v.coerce(*p)?.to_string()),
        (TypeKind::Primitive(p), Value::Enum(e)) => Ok(p.parse(e.name())?.to_string()),
        (TypeKind::Enum(_), Value::Enum(e)) => {
            if *e.type_name() != descriptor.qualified_name() {
                return Err(mismatch(descriptor, &format!("enum {}", e.type_name())));
            }
            Ok(e.name().to_string())
        }
        (TypeKind::Enum(members), Value::Primitive(PrimitiveValue::String(s))) => {
            if members.iter().any(|m| m == s) {
                Ok(s.clone())
            } else {
                Err(XsdError::UnknownMember {
                    type_name: descriptor.qualified_name(),
                    member: s.clone(),
                })
            }
        }
        (TypeKind::Binary, Value::Binary(bytes)) => Ok(STANDARD.encode(bytes)),
        (_, v) => Err(mismatch(descriptor, kind_name(v))),
    }
}

fn build_element(
    value: &Value,
    descriptor: &TypeDescriptor,
    name: &str,
    namespace: Option<&str>,
    inherited: Option<&str>,
) -> Result<Element, XsdError> {
    let mut element = Element::new(name);
    element.prefix = None;
    element.namespace = namespace.map(str::to_string);

    if namespace != inherited {
        element
            .attributes
            .insert("xmlns".to_string(), namespace.unwrap_or_default().to_string());
    }

    match (descriptor.kind(), value) {
        (TypeKind::Composite(fields), Value::Composite(composite)) => {
            for present in composite.field_names() {
                if !fields.iter().any(|f| f.name == present) {
                    return Err(XsdError::UnknownField {
                        type_name: descriptor.qualified_name(),
                        field: present.to_string(),
                    });
                }
            }

            let ns = descriptor.namespace();
            for field in fields {
                match composite.get(&field.name) {
                    Some(v) => {
                        let child = build_element(v, &field.descriptor, &field.name, Some(ns), namespace)?;
                        element.children.push(XMLNode::Element(child));
                    }
                    None if field.optional => {}
                    None => {
                        return Err(XsdError::MissingField {
                            type_name: descriptor.qualified_name(),
                            field: field.name.clone(),
                        });
                    }
                }
            }
        }
        (TypeKind::Composite(_), v) => return Err(mismatch(descriptor, kind_name(v))),
        _ => {
            let text = encode_text(value, descriptor)?;
            if !text.is_empty() {
                element.children.push(XMLNode::Text(text));
            }
        }
    }

    Ok(element)
}

/// Namespace par défaut en vigueur pour les enfants de `element`.
fn default_namespace(element: &Element) -> Option<&str> {
    if element.prefix.is_none() {
        element.namespace.as_deref()
    } else {
        None
    }
}

fn element_name(element: &Element) -> QualifiedName {
    QualifiedName::new(element.namespace.clone().unwrap_or_default(), &element.name)
}

fn mismatch(descriptor: &TypeDescriptor, found: &str) -> XsdError {
    XsdError::TypeMismatch {
        expected: descriptor.qualified_name(),
        found: found.to_string(),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Primitive(_) => "primitive",
        Value::Enum(_) => "enumeration",
        Value::Composite(_) => "composite",
        Value::Binary(_) => "binary",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Field, PrimitiveType, TypeRegistry};
    use std::sync::Arc;

    const NS: &str = "urn:test:types";

    fn days() -> Arc<TypeDescriptor> {
        TypeDescriptor::enumeration(
            "DaysOfWeekEnum",
            NS,
            ["Monday", "Tuesday", "Wednesday", "Friday", "Saturday", "Sunday"],
        )
        .unwrap()
    }

    fn first_child(parent: &Element) -> &Element {
        parent
            .children
            .iter()
            .find_map(|n| n.as_element())
            .expect("child element")
    }

    #[test]
    fn test_enum_encodes_member_name() {
        let d = days();
        let mut parent = Element::new("test");
        encode(&EnumValue::of(&d, "Monday").unwrap().into(), &d, &mut parent).unwrap();

        let child = first_child(&parent);
        assert_eq!(child.name, "DaysOfWeekEnum");
        assert_eq!(child.namespace.as_deref(), Some(NS));
        assert_eq!(child.get_text().unwrap(), "Monday");
        assert_eq!(child.attributes.get("xmlns").map(String::as_str), Some(NS));
    }

    #[test]
    fn test_enum_round_trip() {
        let d = days();
        let v: Value = EnumValue::of(&d, "Saturday").unwrap().into();
        let mut parent = Element::new("test");
        encode(&v, &d, &mut parent).unwrap();

        let decoded = decode(first_child(&parent), &d).unwrap();
        assert_eq!(decoded, v);
    }

    #[test]
    fn test_decode_rejects_wrong_element_name() {
        let d = days();
        let mut e = Element::new("Weekday");
        e.namespace = Some(NS.to_string());
        e.children.push(XMLNode::Text("Monday".to_string()));
        assert!(matches!(decode(&e, &d), Err(XsdError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_decode_rejects_wrong_namespace() {
        let d = days();
        let mut e = Element::new("DaysOfWeekEnum");
        e.namespace = Some("urn:other".to_string());
        e.children.push(XMLNode::Text("Monday".to_string()));
        assert!(matches!(decode(&e, &d), Err(XsdError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_decode_unknown_member() {
        let d = days();
        let mut e = Element::new("DaysOfWeekEnum");
        e.namespace = Some(NS.to_string());
        e.children.push(XMLNode::Text("Thursday".to_string()));
        assert!(matches!(decode(&e, &d), Err(XsdError::UnknownMember { .. })));
    }

    #[test]
    fn test_binary_round_trip_and_malformed() {
        let b = TypeDescriptor::binary();
        let v = Value::Binary(vec![0, 1, 2, 250, 255]);
        let mut parent = Element::new("test");
        encode_named(&v, &b, "Data", None, &mut parent).unwrap();
        assert_eq!(decode_content(first_child(&parent), &b).unwrap(), v);

        let mut bad = Element::new("Data");
        bad.children.push(XMLNode::Text("not base64!!".to_string()));
        assert!(matches!(
            decode_content(&bad, &b),
            Err(XsdError::MalformedBinary(_))
        ));
    }

    #[test]
    fn test_composite_round_trip_with_optional_field() {
        let r = TypeRegistry::new();
        let point = TypeDescriptor::composite(
            "Point",
            NS,
            vec![
                Field::required("x", r.primitive(PrimitiveType::I4)),
                Field::required("y", r.primitive(PrimitiveType::I4)),
                Field::optional("label", r.primitive(PrimitiveType::String)),
            ],
        )
        .unwrap();

        let v: Value = CompositeValue::new().with("x", 3i32).with("y", -4i32).into();
        let mut parent = Element::new("test");
        encode(&v, &point, &mut parent).unwrap();

        let child = first_child(&parent);
        let names: Vec<_> = child
            .children
            .iter()
            .filter_map(|n| n.as_element())
            .map(|e| e.name.clone())
            .collect();
        assert_eq!(names, vec!["x", "y"]);
        // Les champs héritent du namespace par défaut de la structure
        let x = child.get_child("x").unwrap();
        assert!(!x.attributes.contains_key("xmlns"));

        assert_eq!(decode(child, &point).unwrap(), v);
    }

    #[test]
    fn test_composite_missing_required_field() {
        let r = TypeRegistry::new();
        let point = TypeDescriptor::composite(
            "Point",
            NS,
            vec![
                Field::required("x", r.primitive(PrimitiveType::I4)),
                Field::required("y", r.primitive(PrimitiveType::I4)),
            ],
        )
        .unwrap();

        let v: Value = CompositeValue::new().with("x", 3i32).into();
        let mut parent = Element::new("test");
        assert!(matches!(
            encode(&v, &point, &mut parent),
            Err(XsdError::MissingField { .. })
        ));
    }

    #[test]
    fn test_primitive_coercion_on_encode() {
        let ui4 = TypeDescriptor::primitive(PrimitiveType::UI4);
        let mut parent = Element::new("u:Resp");
        encode_named(&Value::from("17"), &ui4, "Count", None, &mut parent).unwrap();
        let child = first_child(&parent);
        assert_eq!(child.get_text().unwrap(), "17");
        assert!(!child.attributes.contains_key("xmlns"));

        let mut parent = Element::new("u:Resp");
        assert!(encode_named(&Value::from("x"), &ui4, "Count", None, &mut parent).is_err());
    }

    #[test]
    fn test_empty_string_round_trip() {
        let s = TypeDescriptor::primitive(PrimitiveType::String);
        let v = Value::from("");
        let mut parent = Element::new("test");
        encode_named(&v, &s, "Empty", None, &mut parent).unwrap();
        assert_eq!(decode_content(first_child(&parent), &s).unwrap(), v);
    }
}
