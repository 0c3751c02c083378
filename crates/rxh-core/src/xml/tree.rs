//! Owned element tree built from a quick-xml event stream.

use quick_xml::NsReader;
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{PrefixDeclaration, ResolveResult};
use tracing::trace;

use super::Result;
use crate::error::ExtractionError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A parsed XML document.
#[derive(Debug, Clone)]
pub struct Document {
    /// The root element.
    pub root: Element,
}

/// An XML element with its namespace already resolved.
#[derive(Debug, Clone, Default)]
pub struct Element {
    /// Namespace URI the element name is bound to, if any.
    pub namespace: Option<String>,

    /// Prefix as written in the source (e.g. `cbc` in `<cbc:ID>`).
    pub prefix: Option<String>,

    /// Local name without prefix.
    pub name: String,

    /// Namespace declarations made on this element. `None` is the default namespace.
    pub declarations: Vec<(Option<String>, String)>,

    /// Child elements in document order.
    pub children: Vec<Element>,

    /// Leading text and CDATA content, unescaped, up to the first child
    /// element, comment or processing instruction. `None` when there is none.
    pub text: Option<String>,
}

impl Element {
    /// Whether this element has the given namespace URI and local name.
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == Some(namespace)
    }

}

/// An element still being read, with whether its leading text has ended.
struct Open {
    element: Element,
    text_closed: bool,
}

impl Open {
    fn push_text(&mut self, content: &str) {
        if self.text_closed {
            return;
        }
        match &mut self.element.text {
            Some(text) => text.push_str(content),
            None => self.element.text = Some(content.to_string()),
        }
    }
}

impl Document {
    /// Parse a byte buffer into a document tree.
    ///
    /// The encoding named in the XML declaration is honoured (any
    /// ASCII-compatible one, e.g. ISO-8859-1). Fails with
    /// [`ExtractionError::InvalidXml`] if the buffer is not well-formed or
    /// cannot be decoded.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        let mut reader = NsReader::from_reader(bytes);
        reader.config_mut().expand_empty_elements = true;
        reader.config_mut().check_end_names = true;

        let mut stack: Vec<Open> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let (binding, event) = match reader.read_resolved_event() {
                Ok((resolved, event)) => (Binding::from(resolved), event),
                Err(e) => {
                    return Err(ExtractionError::invalid_xml(
                        e.to_string(),
                        Some(reader.error_position()),
                    ));
                }
            };
            let position = reader.buffer_position();
            // The declaration may switch the encoding, so read it per event
            let decoder = reader.decoder();

            match event {
                Event::Start(start) => {
                    if root.is_some() {
                        return Err(ExtractionError::invalid_xml(
                            "multiple root elements",
                            Some(position),
                        ));
                    }
                    let namespace = binding.into_uri(decoder, position)?;
                    let element = start_element(&start, namespace, decoder, position)?;
                    if let Some(parent) = stack.last_mut() {
                        parent.text_closed = true;
                    }
                    stack.push(Open {
                        element,
                        text_closed: false,
                    });
                }
                Event::End(_) => {
                    let open = stack.pop().ok_or_else(|| {
                        ExtractionError::invalid_xml("unexpected closing tag", Some(position))
                    })?;
                    match stack.last_mut() {
                        Some(parent) => parent.element.children.push(open.element),
                        None => root = Some(open.element),
                    }
                }
                Event::Text(text) => {
                    let content = text
                        .unescape()
                        .map_err(|e| ExtractionError::invalid_xml(e.to_string(), Some(position)))?;
                    match stack.last_mut() {
                        Some(current) => current.push_text(&content),
                        None if content.trim().is_empty() => {}
                        None => {
                            return Err(ExtractionError::invalid_xml(
                                "text outside of the root element",
                                Some(position),
                            ));
                        }
                    }
                }
                Event::CData(data) => {
                    let content = decode(decoder, &data, position)?;
                    match stack.last_mut() {
                        Some(current) => current.push_text(&content),
                        None => {
                            return Err(ExtractionError::invalid_xml(
                                "CDATA outside of the root element",
                                Some(position),
                            ));
                        }
                    }
                }
                // Comments and processing instructions end the leading text
                Event::Comment(_) | Event::PI(_) => {
                    if let Some(current) = stack.last_mut() {
                        current.text_closed = true;
                    }
                }
                Event::Decl(_) | Event::DocType(_) => {}
                // Never produced with expand_empty_elements
                Event::Empty(_) => {}
                Event::Eof => break,
            }
        }

        if let Some(open) = stack.last() {
            return Err(ExtractionError::invalid_xml(
                format!("unclosed element <{}>", qualified(&open.element)),
                Some(reader.buffer_position()),
            ));
        }

        let root = root.ok_or_else(|| ExtractionError::invalid_xml("document has no root element", None))?;
        trace!(root = %root.name, children = root.children.len(), "parsed XML document");

        Ok(Self { root })
    }
}

/// Owned copy of a namespace resolution, detached from the reader's borrow.
enum Binding {
    Bound(Vec<u8>),
    Unbound,
    Unknown(Vec<u8>),
}

impl From<ResolveResult<'_>> for Binding {
    fn from(resolved: ResolveResult<'_>) -> Self {
        match resolved {
            ResolveResult::Bound(ns) => Self::Bound(ns.as_ref().to_vec()),
            ResolveResult::Unbound => Self::Unbound,
            ResolveResult::Unknown(prefix) => Self::Unknown(prefix),
        }
    }
}

impl Binding {
    fn into_uri(self, decoder: Decoder, position: u64) -> Result<Option<String>> {
        match self {
            Self::Bound(uri) => Ok(Some(decode(decoder, &uri, position)?)),
            Self::Unbound => Ok(None),
            Self::Unknown(prefix) => Err(ExtractionError::invalid_xml(
                format!("undeclared namespace prefix '{}'", String::from_utf8_lossy(&prefix)),
                Some(position),
            )),
        }
    }
}

fn start_element(
    start: &BytesStart<'_>,
    namespace: Option<String>,
    decoder: Decoder,
    position: u64,
) -> Result<Element> {
    let qname = start.name();
    let mut element = Element {
        namespace,
        prefix: qname.prefix().map(|p| decode(decoder, p.as_ref(), position)).transpose()?,
        name: decode(decoder, qname.local_name().as_ref(), position)?,
        ..Element::default()
    };

    // Only namespace declarations are kept; other attributes are checked for well-formedness
    for attr in start.attributes() {
        let attr = attr.map_err(|e| ExtractionError::invalid_xml(e.to_string(), Some(position)))?;
        let prefix = match attr.key.as_namespace_binding() {
            Some(PrefixDeclaration::Default) => None,
            Some(PrefixDeclaration::Named(prefix)) => Some(decode(decoder, prefix, position)?),
            None => continue,
        };
        let uri = attr
            .decode_and_unescape_value(decoder)
            .map_err(|e| ExtractionError::invalid_xml(e.to_string(), Some(position)))?
            .into_owned();
        element.declarations.push((prefix, uri));
    }

    Ok(element)
}

fn decode(decoder: Decoder, bytes: &[u8], position: u64) -> Result<String> {
    decoder
        .decode(bytes)
        .map(|text| text.into_owned())
        .map_err(|e| ExtractionError::invalid_xml(e.to_string(), Some(position)))
}

fn qualified(element: &Element) -> String {
    match &element.prefix {
        Some(prefix) => format!("{}:{}", prefix, element.name),
        None => element.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_resolves_namespaces() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
            <Invoice xmlns="urn:inv" xmlns:cbc="urn:basic">
                <cbc:ID>F001-1</cbc:ID>
                <Note lang="es">hola</Note>
            </Invoice>"#;

        let doc = Document::parse(xml).unwrap();
        assert_eq!(doc.root.name, "Invoice");
        assert_eq!(doc.root.namespace.as_deref(), Some("urn:inv"));
        assert_eq!(
            doc.root.declarations,
            vec![
                (None, "urn:inv".to_string()),
                (Some("cbc".to_string()), "urn:basic".to_string()),
            ]
        );

        let id = &doc.root.children[0];
        assert!(id.is("urn:basic", "ID"));
        assert_eq!(id.prefix.as_deref(), Some("cbc"));
        assert_eq!(id.text.as_deref(), Some("F001-1"));

        let note = &doc.root.children[1];
        assert!(note.is("urn:inv", "Note"));
        assert!(note.declarations.is_empty());
    }

    #[test]
    fn test_text_is_unescaped_and_keeps_whitespace() {
        let xml = b"<r><a> A &amp; B </a><b><![CDATA[<raw>]]></b><c/></r>";
        let doc = Document::parse(xml).unwrap();
        assert_eq!(doc.root.children[0].text.as_deref(), Some(" A & B "));
        assert_eq!(doc.root.children[1].text.as_deref(), Some("<raw>"));
        assert_eq!(doc.root.children[2].text, None);
    }

    #[test]
    fn test_text_stops_at_comment_or_child() {
        let xml = b"<r><a>F001<!-- c -->-123</a><b>lead<i>x</i>tail</b><c>x<![CDATA[y]]>z</c></r>";
        let doc = Document::parse(xml).unwrap();
        assert_eq!(doc.root.children[0].text.as_deref(), Some("F001"));
        assert_eq!(doc.root.children[1].text.as_deref(), Some("lead"));
        assert_eq!(doc.root.children[1].children[0].text.as_deref(), Some("x"));
        assert_eq!(doc.root.children[2].text.as_deref(), Some("xyz"));
    }

    #[test]
    fn test_declared_latin1_is_decoded() {
        let mut xml = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><r n=\"".to_vec();
        xml.extend_from_slice(b"\xD1\"><a>PE\xD1A</a><b><![CDATA[\xE1]]></b></r>");
        let doc = Document::parse(&xml).unwrap();
        assert_eq!(doc.root.children[0].text.as_deref(), Some("PEÑA"));
        assert_eq!(doc.root.children[1].text.as_deref(), Some("á"));
    }

    #[test]
    fn test_undecodable_utf8_is_invalid() {
        let xml = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?><r><a>PE\xD1A</a></r>";
        let err = Document::parse(xml).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidXml);
    }

    #[test]
    fn test_byte_order_mark_is_skipped() {
        let mut xml = UTF8_BOM.to_vec();
        xml.extend_from_slice(b"<r>ok</r>");
        let doc = Document::parse(&xml).unwrap();
        assert_eq!(doc.root.text.as_deref(), Some("ok"));
    }

    #[test]
    fn test_unclosed_tag_is_invalid() {
        let err = Document::parse(b"<Invoice><ID>1</ID>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidXml);
    }

    #[test]
    fn test_mismatched_end_tag_is_invalid() {
        let err = Document::parse(b"<a><b></a></b>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidXml);
    }

    #[test]
    fn test_undeclared_prefix_is_invalid() {
        let err = Document::parse(b"<a><x:b>1</x:b></a>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidXml);
    }

    #[test]
    fn test_empty_and_non_xml_input_is_invalid() {
        assert_eq!(Document::parse(b"").unwrap_err().kind(), ErrorKind::InvalidXml);
        assert_eq!(
            Document::parse(b"not xml at all").unwrap_err().kind(),
            ErrorKind::InvalidXml
        );
        assert_eq!(
            Document::parse(b"<a/><b/>").unwrap_err().kind(),
            ErrorKind::InvalidXml
        );
    }
}
