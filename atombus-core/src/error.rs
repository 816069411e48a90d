//! Codec error types.

/// Errors raised while encoding or decoding wire payloads.
#[derive(Clone, Debug, thiserror::Error)]
pub enum CodecError {
    /// XML serialization of a descriptor failed.
    #[error("xml serialization failed: {0}")]
    Serialize(String),

    /// A payload is not well-formed XML.
    #[error("xml parse error: {0}")]
    Parse(String),

    /// An expected element is absent from the payload.
    #[error("missing {0} element")]
    MissingElement(&'static str),

    /// An Atom entry carries no `content` element.
    #[error("entry has no content")]
    MissingContent,

    /// The broker-properties header value is not valid JSON.
    #[error("invalid broker properties: {0}")]
    BrokerProperties(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CodecError::Parse("unexpected end of input".into());
        assert_eq!(err.to_string(), "xml parse error: unexpected end of input");

        let err = CodecError::MissingElement("entry");
        assert_eq!(err.to_string(), "missing entry element");

        let err = CodecError::MissingContent;
        assert_eq!(err.to_string(), "entry has no content");
    }
}
