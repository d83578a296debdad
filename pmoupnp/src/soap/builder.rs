//! Construction d'enveloppes SOAP

use xmltree::{Element, XMLNode};

use super::{NS_SOAP_ENVELOPE, SOAP_ENCODING_STYLE};

/// Enveloppe `body_child` dans `s:Envelope`/`s:Body` et sérialise le tout.
pub fn build_soap_envelope(body_child: Element) -> Result<String, xmltree::Error> {
    let mut body = Element::new("s:Body");
    body.children.push(XMLNode::Element(body_child));

    let mut envelope = Element::new("s:Envelope");
    envelope
        .attributes
        .insert("xmlns:s".to_string(), NS_SOAP_ENVELOPE.to_string());
    envelope
        .attributes
        .insert("s:encodingStyle".to_string(), SOAP_ENCODING_STYLE.to_string());
    envelope.children.push(XMLNode::Element(body));

    let mut buf = Vec::new();
    let config = xmltree::EmitterConfig::new()
        .write_document_declaration(true)
        .perform_indent(true)
        .indent_string("  ");
    envelope.write_with_config(&mut buf, config)?;

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Élément de réponse vide `<u:ActionResponse xmlns:u="urn">`.
///
/// Les arguments de sortie sont ajoutés ensuite comme enfants non qualifiés.
pub fn response_element(service_urn: &str, action: &str) -> Element {
    let mut response = Element::new(&format!("u:{}Response", action));
    response
        .attributes
        .insert("xmlns:u".to_string(), service_urn.to_string());
    response
}

/// Construit une requête SOAP (utilisée côté point de contrôle et en test)
pub fn build_soap_request(
    service_urn: &str,
    action: &str,
    args: &[(&str, &str)],
) -> Result<String, xmltree::Error> {
    let mut request = Element::new(&format!("u:{}", action));
    request
        .attributes
        .insert("xmlns:u".to_string(), service_urn.to_string());

    for (name, value) in args {
        let mut child = Element::new(name);
        child.children.push(XMLNode::Text((*value).to_string()));
        request.children.push(XMLNode::Element(child));
    }

    build_soap_envelope(request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_response_envelope() {
        let mut response = response_element("urn:schemas-upnp-org:service:AVTransport:1", "Stop");
        let mut track = Element::new("Track");
        track.children.push(XMLNode::Text("5".to_string()));
        response.children.push(XMLNode::Element(track));

        let xml = build_soap_envelope(response).unwrap();

        assert!(xml.contains("StopResponse"));
        assert!(xml.contains("<Track>5</Track>"));
        assert!(xml.contains("xmlns:s=\"http://schemas.xmlsoap.org/soap/envelope/\""));
        assert!(xml.contains("xmlns:u=\"urn:schemas-upnp-org:service:AVTransport:1\""));
    }

    #[test]
    fn test_build_request_round_trips_through_parser() {
        let xml = build_soap_request(
            "urn:schemas-upnp-org:service:RenderingControl:1",
            "SetVolume",
            &[("InstanceID", "0"), ("DesiredVolume", "42")],
        )
        .unwrap();

        let action = crate::soap::parse_soap_action(xml.as_bytes()).unwrap();
        assert_eq!(action.name, "SetVolume");
        assert_eq!(action.arg_text("DesiredVolume").as_deref(), Some("42"));
    }
}
