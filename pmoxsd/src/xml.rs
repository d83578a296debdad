//! Petits utilitaires de construction et d'écriture XML.

use xmltree::{Element, EmitterConfig, XMLNode};

use crate::XsdError;

/// Crée un élément avec ses attributs, dans l'ordre donné.
pub fn element(name: &str, attributes: &[(&str, &str)]) -> Element {
    let mut elem = Element::new(name);
    for (k, v) in attributes {
        elem.attributes.insert((*k).to_string(), (*v).to_string());
    }
    elem
}

/// Crée un élément ne contenant que du texte.
pub fn text_element(name: &str, text: &str) -> Element {
    let mut elem = Element::new(name);
    if !text.is_empty() {
        elem.children.push(XMLNode::Text(text.to_string()));
    }
    elem
}

pub fn push(parent: &mut Element, child: Element) {
    parent.children.push(XMLNode::Element(child));
}

/// Sérialise un document complet, indenté, avec déclaration XML.
pub fn to_document(root: &Element) -> Result<String, XsdError> {
    write(root, true, true)
}

/// Sérialise un fragment compact, sans déclaration.
pub fn to_fragment(root: &Element) -> Result<String, XsdError> {
    write(root, false, false)
}

fn write(root: &Element, indent: bool, declaration: bool) -> Result<String, XsdError> {
    let mut buf = Vec::new();
    let config = EmitterConfig::new()
        .perform_indent(indent)
        .indent_string("  ")
        .write_document_declaration(declaration);
    root.write_with_config(&mut buf, config)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
