//! Parser SOAP pour actions UPnP

use std::io::BufReader;

use xmltree::Element;

/// Action UPnP extraite d'une enveloppe SOAP
#[derive(Debug, Clone)]
pub struct SoapAction {
    /// Nom local de l'action (ex: "Play", "SetAVTransportURI")
    pub name: String,

    /// Namespace de l'action (ex: "urn:schemas-upnp-org:service:AVTransport:1")
    pub namespace: Option<String>,

    /// Éléments arguments, dans l'ordre du document
    pub args: Vec<Element>,
}

impl SoapAction {
    /// Premier argument portant ce nom local.
    pub fn arg(&self, name: &str) -> Option<&Element> {
        self.args.iter().find(|e| e.name == name)
    }

    /// Texte du premier argument portant ce nom local.
    pub fn arg_text(&self, name: &str) -> Option<String> {
        self.arg(name)
            .map(|e| e.get_text().map(|t| t.into_owned()).unwrap_or_default())
    }
}

/// Erreur de parsing SOAP
#[derive(Debug, thiserror::Error)]
pub enum SoapParseError {
    #[error("XML parse error: {0}")]
    XmlError(#[from] xmltree::ParseError),

    #[error("Missing SOAP Envelope")]
    MissingEnvelope,

    #[error("Missing SOAP Body")]
    MissingBody,

    #[error("No action found in SOAP Body")]
    NoAction,
}

/// Parse une action SOAP à partir de bytes XML
pub fn parse_soap_action(xml: &[u8]) -> Result<SoapAction, SoapParseError> {
    let root = Element::parse(BufReader::new(xml))?;

    if root.name != "Envelope" {
        return Err(SoapParseError::MissingEnvelope);
    }

    let body = root
        .children
        .iter()
        .filter_map(|n| n.as_element())
        .find(|e| e.name == "Body")
        .ok_or(SoapParseError::MissingBody)?;

    // Format: <u:ActionName xmlns:u="service-urn">...</u:ActionName>
    let action = body
        .children
        .iter()
        .find_map(|n| n.as_element())
        .ok_or(SoapParseError::NoAction)?;

    let args = action
        .children
        .iter()
        .filter_map(|n| n.as_element())
        .cloned()
        .collect();

    Ok(SoapAction {
        name: action.name.clone(),
        namespace: action.namespace.clone(),
        args,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_action() {
        let xml = r#"<?xml version="1.0"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
  <s:Body>
    <u:Play xmlns:u="urn:schemas-upnp-org:service:AVTransport:1">
      <InstanceID>0</InstanceID>
      <Speed>1</Speed>
    </u:Play>
  </s:Body>
</s:Envelope>"#;

        let action = parse_soap_action(xml.as_bytes()).unwrap();
        assert_eq!(action.name, "Play");
        assert_eq!(
            action.namespace.as_deref(),
            Some("urn:schemas-upnp-org:service:AVTransport:1")
        );
        assert_eq!(action.arg_text("InstanceID").as_deref(), Some("0"));
        assert_eq!(action.arg_text("Speed").as_deref(), Some("1"));
        assert_eq!(action.arg_text("Missing"), None);
    }

    #[test]
    fn test_parse_action_no_args() {
        let xml = r#"<?xml version="1.0"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
  <s:Body>
    <u:Stop xmlns:u="urn:schemas-upnp-org:service:AVTransport:1"/>
  </s:Body>
</s:Envelope>"#;

        let action = parse_soap_action(xml.as_bytes()).unwrap();
        assert_eq!(action.name, "Stop");
        assert!(action.args.is_empty());
    }

    #[test]
    fn test_empty_argument_text() {
        let xml = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
  <s:Body><u:SetAVTransportURI xmlns:u="urn:x"><CurrentURIMetaData/></u:SetAVTransportURI></s:Body>
</s:Envelope>"#;

        let action = parse_soap_action(xml.as_bytes()).unwrap();
        assert_eq!(action.arg_text("CurrentURIMetaData").as_deref(), Some(""));
    }

    #[test]
    fn test_missing_parts() {
        assert!(matches!(
            parse_soap_action(b"<Foo/>"),
            Err(SoapParseError::MissingEnvelope)
        ));
        assert!(matches!(
            parse_soap_action(br#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"/>"#),
            Err(SoapParseError::MissingBody)
        ));
        assert!(matches!(
            parse_soap_action(
                br#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body/></s:Envelope>"#
            ),
            Err(SoapParseError::NoAction)
        ));
        assert!(matches!(
            parse_soap_action(b"not xml"),
            Err(SoapParseError::XmlError(_))
        ));
    }
}
