//! Atom envelope reading and writing.
//!
//! The service's management API wraps every entity descriptor in an Atom
//! Publishing Protocol envelope: single entities travel as an `entry` whose
//! `content` element carries the descriptor XML, and list responses travel as
//! a `feed` of such entries.
//!
//! Writing builds the exact envelope the service expects; reading extracts
//! the pieces the client needs (`title`, `id`, `updated`, and the raw inner
//! XML of `content`) and ignores the rest of the envelope.

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};

use crate::error::CodecError;

/// The Atom namespace carried on every envelope the client writes.
pub const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// Media type of an Atom entry, used as the `Content-Type` of create requests.
pub const ENTRY_CONTENT_TYPE: &str = "application/atom+xml;type=entry;charset=utf-8";

/// The `content` element of an Atom entry.
///
/// `body` holds the raw inner XML of the element, unparsed; descriptor
/// decoding is the codec's job, not the envelope's.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AtomContent {
    /// Value of the `type` attribute, if present.
    pub content_type: Option<String>,
    /// Raw inner XML of the element.
    pub body: String,
}

/// An Atom `entry` envelope.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AtomEntry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub updated: Option<String>,
    pub content: Option<AtomContent>,
}

impl AtomEntry {
    /// Create an empty entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry title.
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the entry content from a media type and raw inner XML.
    pub fn with_content<S: Into<String>, B: Into<String>>(mut self, content_type: S, body: B) -> Self {
        self.content = Some(AtomContent {
            content_type: Some(content_type.into()),
            body: body.into(),
        });
        self
    }

    /// Render the entry as the XML envelope the service expects.
    ///
    /// The content body is spliced in verbatim; it is XML, not text.
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str("<entry xmlns=\"");
        xml.push_str(ATOM_NAMESPACE);
        xml.push_str("\">");
        if let Some(title) = &self.title {
            xml.push_str("<title type=\"text\">");
            xml.push_str(&escape(title.as_str()));
            xml.push_str("</title>");
        }
        if let Some(content) = &self.content {
            xml.push_str("<content type=\"");
            let content_type = content.content_type.as_deref().unwrap_or("application/xml");
            xml.push_str(&escape(content_type));
            xml.push_str("\">");
            xml.push_str(&content.body);
            xml.push_str("</content>");
        }
        xml.push_str("</entry>");
        xml
    }

    /// Parse the first `entry` element found in `xml`.
    pub fn parse(xml: &str) -> Result<Self, CodecError> {
        let mut reader = Reader::from_str(xml);
        loop {
            match read_event(&mut reader)? {
                Event::Start(e) if e.local_name().as_ref() == b"entry" => {
                    return read_entry(&mut reader, xml);
                }
                Event::Eof => return Err(CodecError::MissingElement("entry")),
                _ => {}
            }
        }
    }
}

/// An Atom `feed` envelope: a sequence of entries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AtomFeed {
    pub entries: Vec<AtomEntry>,
}

impl AtomFeed {
    /// Parse every `entry` element found in `xml`.
    ///
    /// A feed without entries parses to an empty sequence; that is how the
    /// service reports an empty listing.
    pub fn parse(xml: &str) -> Result<Self, CodecError> {
        let mut reader = Reader::from_str(xml);
        let mut entries = Vec::new();
        loop {
            match read_event(&mut reader)? {
                Event::Start(e) if e.local_name().as_ref() == b"entry" => {
                    entries.push(read_entry(&mut reader, xml)?);
                }
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(Self { entries })
    }
}

fn read_event<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Event<'a>, CodecError> {
    reader.read_event().map_err(|e| CodecError::Parse(e.to_string()))
}

/// Consume events up to the matching `</entry>`, collecting the pieces the
/// client cares about. The opening `entry` tag has already been consumed.
fn read_entry(reader: &mut Reader<&[u8]>, xml: &str) -> Result<AtomEntry, CodecError> {
    let mut entry = AtomEntry::default();
    let mut depth = 0usize;
    loop {
        match read_event(reader)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"id" if depth == 0 => {
                    entry.id = Some(read_text(reader, &e)?);
                }
                b"title" if depth == 0 => {
                    entry.title = Some(read_text(reader, &e)?);
                }
                b"updated" if depth == 0 => {
                    entry.updated = Some(read_text(reader, &e)?);
                }
                b"content" if depth == 0 => {
                    let content_type = attribute(&e, b"type")?;
                    let span = reader
                        .read_to_end(e.name())
                        .map_err(|err| CodecError::Parse(err.to_string()))?;
                    let body = xml[span.start as usize..span.end as usize].trim().to_string();
                    entry.content = Some(AtomContent { content_type, body });
                }
                _ => depth += 1,
            },
            Event::Empty(e) => {
                if depth == 0 && e.local_name().as_ref() == b"content" {
                    let content_type = attribute(&e, b"type")?;
                    entry.content = Some(AtomContent {
                        content_type,
                        body: String::new(),
                    });
                }
            }
            Event::End(e) => {
                if depth == 0 {
                    if e.local_name().as_ref() == b"entry" {
                        return Ok(entry);
                    }
                } else {
                    depth -= 1;
                }
            }
            Event::Eof => return Err(CodecError::Parse("unclosed entry element".into())),
            _ => {}
        }
    }
}

fn read_text(reader: &mut Reader<&[u8]>, start: &BytesStart<'_>) -> Result<String, CodecError> {
    reader
        .read_text(start.name())
        .map(|text| text.into_owned())
        .map_err(|e| CodecError::Parse(e.to_string()))
}

fn attribute(start: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>, CodecError> {
    for attr in start.attributes() {
        let attr = attr.map_err(|e| CodecError::Parse(e.to_string()))?;
        if attr.key.local_name().as_ref() == name {
            let value = attr
                .unescape_value()
                .map_err(|e| CodecError::Parse(e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_to_xml_with_title_and_content() {
        let entry = AtomEntry::new()
            .with_title("my-topic")
            .with_content("application/xml", "<TopicDescription/>");
        let xml = entry.to_xml();
        assert_eq!(
            xml,
            "<entry xmlns=\"http://www.w3.org/2005/Atom\">\
             <title type=\"text\">my-topic</title>\
             <content type=\"application/xml\"><TopicDescription/></content>\
             </entry>"
        );
    }

    #[test]
    fn test_entry_to_xml_escapes_title() {
        let entry = AtomEntry::new().with_title("a<b&c");
        assert!(entry.to_xml().contains("<title type=\"text\">a&lt;b&amp;c</title>"));
    }

    #[test]
    fn test_entry_to_xml_without_title() {
        let entry = AtomEntry::new().with_content("application/xml", "<QueueDescription/>");
        let xml = entry.to_xml();
        assert!(!xml.contains("<title"));
        assert!(xml.contains("<content type=\"application/xml\"><QueueDescription/></content>"));
    }

    #[test]
    fn test_entry_parse_round_trip() {
        let entry = AtomEntry::new()
            .with_title("orders")
            .with_content("application/xml", "<QueueDescription><MaxDeliveryCount>10</MaxDeliveryCount></QueueDescription>");
        let parsed = AtomEntry::parse(&entry.to_xml()).unwrap();
        assert_eq!(parsed.title.as_deref(), Some("orders"));
        let content = parsed.content.unwrap();
        assert_eq!(content.content_type.as_deref(), Some("application/xml"));
        assert_eq!(
            content.body,
            "<QueueDescription><MaxDeliveryCount>10</MaxDeliveryCount></QueueDescription>"
        );
    }

    #[test]
    fn test_entry_parse_service_response_shape() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
            <entry xmlns="http://www.w3.org/2005/Atom">
              <id>https://example.servicebus.windows.net/orders</id>
              <title type="text">orders</title>
              <updated>2024-01-15T10:00:00Z</updated>
              <author><name>example</name></author>
              <content type="application/xml">
                <QueueDescription xmlns="http://schemas.microsoft.com/netservices/2010/10/servicebus/connect">
                  <LockDuration>PT1M</LockDuration>
                </QueueDescription>
              </content>
            </entry>"#;
        let entry = AtomEntry::parse(xml).unwrap();
        assert_eq!(entry.id.as_deref(), Some("https://example.servicebus.windows.net/orders"));
        assert_eq!(entry.title.as_deref(), Some("orders"));
        assert_eq!(entry.updated.as_deref(), Some("2024-01-15T10:00:00Z"));
        let content = entry.content.unwrap();
        assert!(content.body.starts_with("<QueueDescription"));
        assert!(content.body.ends_with("</QueueDescription>"));
    }

    #[test]
    fn test_entry_parse_without_content() {
        let xml = "<entry xmlns=\"http://www.w3.org/2005/Atom\"><title>bare</title></entry>";
        let entry = AtomEntry::parse(xml).unwrap();
        assert_eq!(entry.title.as_deref(), Some("bare"));
        assert!(entry.content.is_none());
    }

    #[test]
    fn test_entry_parse_empty_content_element() {
        let xml = "<entry><content type=\"application/xml\"/></entry>";
        let entry = AtomEntry::parse(xml).unwrap();
        let content = entry.content.unwrap();
        assert_eq!(content.content_type.as_deref(), Some("application/xml"));
        assert_eq!(content.body, "");
    }

    #[test]
    fn test_entry_parse_missing_entry() {
        let err = AtomEntry::parse("<feed xmlns=\"http://www.w3.org/2005/Atom\"></feed>").unwrap_err();
        assert!(matches!(err, CodecError::MissingElement("entry")));
    }

    #[test]
    fn test_feed_parse_collects_entries() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
            <title type="text">Queues</title>
            <entry><title>first</title><content type="application/xml"><QueueDescription/></content></entry>
            <entry><title>second</title><content type="application/xml"><QueueDescription/></content></entry>
          </feed>"#;
        let feed = AtomFeed::parse(xml).unwrap();
        assert_eq!(feed.entries.len(), 2);
        assert_eq!(feed.entries[0].title.as_deref(), Some("first"));
        assert_eq!(feed.entries[1].title.as_deref(), Some("second"));
    }

    #[test]
    fn test_feed_parse_empty_feed() {
        let feed = AtomFeed::parse("<feed xmlns=\"http://www.w3.org/2005/Atom\"></feed>").unwrap();
        assert!(feed.entries.is_empty());
    }
}
