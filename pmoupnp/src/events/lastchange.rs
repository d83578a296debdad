//! Document `LastChange` regroupant les changements d'une instance.
//!
//! ```xml
//! <Event xmlns="urn:schemas-upnp-org:metadata-1-0/AVT/">
//!   <InstanceID val="0">
//!     <TransportState val="PLAYING"/>
//!   </InstanceID>
//! </Event>
//! ```

use pmoxsd::xml::{element, push, to_fragment};

use super::EventError;

/// Namespace d'évènements AVTransport
pub const NS_AVT_EVENT: &str = "urn:schemas-upnp-org:metadata-1-0/AVT/";

/// Namespace d'évènements RenderingControl
pub const NS_RCS_EVENT: &str = "urn:schemas-upnp-org:metadata-1-0/RCS/";

/// Rend le document pour l'instance 0, un enfant par variable, dans
/// l'ordre donné.
pub fn render_last_change(namespace: &str, changes: &[(String, String)]) -> Result<String, EventError> {
    let mut event = element("Event", &[("xmlns", namespace)]);
    let mut instance = element("InstanceID", &[("val", "0")]);
    for (name, value) in changes {
        push(&mut instance, element(name, &[("val", value.as_str())]));
    }
    push(&mut event, instance);
    Ok(to_fragment(&event)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xmltree::Element;

    #[test]
    fn test_render_last_change() {
        let xml = render_last_change(
            NS_AVT_EVENT,
            &[
                ("TransportState".to_string(), "PLAYING".to_string()),
                ("AVTransportURI".to_string(), "http://h/a&b.mp3".to_string()),
            ],
        )
        .unwrap();

        assert!(!xml.starts_with("<?xml"));
        let root = Element::parse(xml.as_bytes()).unwrap();
        assert_eq!(root.name, "Event");
        assert_eq!(root.namespace.as_deref(), Some(NS_AVT_EVENT));

        let instance = root.get_child("InstanceID").unwrap();
        assert_eq!(instance.attributes.get("val").map(String::as_str), Some("0"));

        let vars: Vec<_> = instance
            .children
            .iter()
            .filter_map(|n| n.as_element())
            .map(|e| (e.name.clone(), e.attributes.get("val").cloned().unwrap_or_default()))
            .collect();
        assert_eq!(
            vars,
            vec![
                ("TransportState".to_string(), "PLAYING".to_string()),
                ("AVTransportURI".to_string(), "http://h/a&b.mp3".to_string()),
            ]
        );
    }
}
