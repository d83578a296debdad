//! SOAP Faults pour UPnP

use xmltree::{Element, XMLNode};

use super::{NS_UPNP_CONTROL, build_soap_envelope, error_codes};

/// Erreur UPnP : code numérique et description lisible.
///
/// C'est la seule forme d'erreur qui traverse la frontière du protocole.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("UPnP error {code}: {description}")]
pub struct UpnpError {
    pub code: u16,
    pub description: String,
}

impl UpnpError {
    pub fn new(code: u16, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
        }
    }

    /// Erreur avec la description standard du code.
    pub fn from_code(code: u16) -> Self {
        Self::new(code, error_codes::description(code))
    }
}

fn text_child(name: &str, text: &str) -> Element {
    let mut elem = Element::new(name);
    elem.children.push(XMLNode::Text(text.to_string()));
    elem
}

/// Construit une enveloppe SOAP Fault portant un détail `UPnPError`.
pub fn build_soap_fault(error: &UpnpError) -> Result<String, xmltree::Error> {
    let mut upnp_error = Element::new("UPnPError");
    upnp_error
        .attributes
        .insert("xmlns".to_string(), NS_UPNP_CONTROL.to_string());
    upnp_error
        .children
        .push(XMLNode::Element(text_child("errorCode", &error.code.to_string())));
    upnp_error
        .children
        .push(XMLNode::Element(text_child("errorDescription", &error.description)));

    let mut detail = Element::new("detail");
    detail.children.push(XMLNode::Element(upnp_error));

    let mut fault = Element::new("s:Fault");
    fault
        .children
        .push(XMLNode::Element(text_child("faultcode", "s:Client")));
    fault
        .children
        .push(XMLNode::Element(text_child("faultstring", "UPnPError")));
    fault.children.push(XMLNode::Element(detail));

    build_soap_envelope(fault)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_upnp_fault() {
        let xml = build_soap_fault(&UpnpError::from_code(error_codes::INVALID_ACTION)).unwrap();

        assert!(xml.contains("<s:Fault>"));
        assert!(xml.contains("<faultcode>s:Client</faultcode>"));
        assert!(xml.contains("<faultstring>UPnPError</faultstring>"));
        assert!(xml.contains("<detail>"));
        assert!(xml.contains("<UPnPError xmlns=\"urn:schemas-upnp-org:control-1-0\">"));
        assert!(xml.contains("<errorCode>401</errorCode>"));
        assert!(xml.contains("<errorDescription>Invalid Action</errorDescription>"));
    }

    #[test]
    fn test_custom_description_is_kept() {
        let err = UpnpError::new(701, "Cannot seek in PAUSED_PLAYBACK");
        let xml = build_soap_fault(&err).unwrap();
        assert!(xml.contains("<errorCode>701</errorCode>"));
        assert!(xml.contains("Cannot seek in PAUSED_PLAYBACK"));
        assert_eq!(err.to_string(), "UPnP error 701: Cannot seek in PAUSED_PLAYBACK");
    }
}
