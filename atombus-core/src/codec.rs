//! XML descriptor serialization.
//!
//! Descriptors are plain serde structs; `quick-xml` maps them to and from the
//! PascalCase element names the service schema uses. The service additionally
//! requires namespace attributes on some descriptor roots, which serde cannot
//! express cleanly, so [`to_xml_with_attributes`] splices them into the root
//! start tag after serialization.

use quick_xml::escape::escape;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CodecError;

/// Serialize a descriptor to an XML fragment rooted at `root`.
pub fn to_xml<T: Serialize>(value: &T, root: &str) -> Result<String, CodecError> {
    quick_xml::se::to_string_with_root(root, value).map_err(|e| CodecError::Serialize(e.to_string()))
}

/// Serialize a descriptor and add attributes to its root start tag.
pub fn to_xml_with_attributes<T: Serialize>(
    value: &T,
    root: &str,
    attributes: &[(&str, &str)],
) -> Result<String, CodecError> {
    let xml = to_xml(value, root)?;
    if attributes.is_empty() {
        return Ok(xml);
    }
    // The serializer always emits "<{root}" first, so the attributes slot in
    // right after the tag name, before "/>" or ">".
    let insert_at = root.len() + 1;
    let mut out = String::with_capacity(xml.len() + attributes.len() * 16);
    out.push_str(&xml[..insert_at]);
    for (name, value) in attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape(*value));
        out.push('"');
    }
    out.push_str(&xml[insert_at..]);
    Ok(out)
}

/// Deserialize a descriptor from an XML fragment.
///
/// The root element name is not checked; namespace attributes and unknown
/// elements the service adds are ignored.
pub fn from_xml<T: DeserializeOwned>(xml: &str) -> Result<T, CodecError> {
    quick_xml::de::from_str(xml).map_err(|e| CodecError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct Sample {
        #[serde(skip_serializing_if = "Option::is_none")]
        lock_duration: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_delivery_count: Option<i32>,
    }

    #[test]
    fn test_to_xml_pascal_case_elements() {
        let sample = Sample {
            lock_duration: Some("PT1M".into()),
            max_delivery_count: Some(10),
        };
        let xml = to_xml(&sample, "Sample").unwrap();
        assert_eq!(
            xml,
            "<Sample><LockDuration>PT1M</LockDuration><MaxDeliveryCount>10</MaxDeliveryCount></Sample>"
        );
    }

    #[test]
    fn test_to_xml_skips_unset_fields() {
        let xml = to_xml(&Sample::default(), "Sample").unwrap();
        assert_eq!(xml, "<Sample/>");
    }

    #[test]
    fn test_to_xml_with_attributes_on_empty_root() {
        let xml = to_xml_with_attributes(&Sample::default(), "Sample", &[("xmlns", "urn:a")]).unwrap();
        assert_eq!(xml, "<Sample xmlns=\"urn:a\"/>");
    }

    #[test]
    fn test_to_xml_with_attributes_on_populated_root() {
        let sample = Sample {
            lock_duration: Some("PT30S".into()),
            max_delivery_count: None,
        };
        let xml = to_xml_with_attributes(&sample, "Sample", &[("xmlns:i", "urn:i"), ("xmlns", "urn:a")]).unwrap();
        assert_eq!(
            xml,
            "<Sample xmlns:i=\"urn:i\" xmlns=\"urn:a\"><LockDuration>PT30S</LockDuration></Sample>"
        );
    }

    #[test]
    fn test_from_xml_ignores_namespace_attributes() {
        let parsed: Sample =
            from_xml("<Sample xmlns=\"urn:a\"><LockDuration>PT1M</LockDuration></Sample>").unwrap();
        assert_eq!(parsed.lock_duration.as_deref(), Some("PT1M"));
        assert_eq!(parsed.max_delivery_count, None);
    }

    #[test]
    fn test_from_xml_missing_fields_decode_to_none() {
        let parsed: Sample = from_xml("<Sample/>").unwrap();
        assert_eq!(parsed, Sample::default());
    }

    #[test]
    fn test_from_xml_rejects_malformed_input() {
        let err = from_xml::<Sample>("<Sample><LockDuration>").unwrap_err();
        assert!(matches!(err, CodecError::Parse(_)));
    }

    #[test]
    fn test_round_trip() {
        let sample = Sample {
            lock_duration: Some("PT5M".into()),
            max_delivery_count: Some(3),
        };
        let xml = to_xml_with_attributes(&sample, "Sample", &[("xmlns", "urn:a")]).unwrap();
        let parsed: Sample = from_xml(&xml).unwrap();
        assert_eq!(parsed, sample);
    }
}
