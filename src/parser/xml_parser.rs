use crate::constants::{COORDS_TAG, ELEMENT_TAG, LABEL_ATTR, POINT_TYPE, TYPE_ATTR, X_ATTR, Y_ATTR};
use crate::errors::{AppError, AppResult, FormatIssue};
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesRef, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use std::io::Cursor;

/// Raw `x`/`y` attribute values of a `<coords>` element, before conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCoords {
    pub x: Option<String>,
    pub y: Option<String>,
}

/// A point element found in the descriptor.
///
/// `coords` holds the first direct `<coords>` child, if there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointCandidate {
    pub label: String,
    pub coords: Option<RawCoords>,
}

fn malformed(message: impl Into<String>) -> AppError {
    FormatIssue::MalformedDescriptor(message.into()).into()
}

/// All attributes of one tag, validated and entity-unescaped.
struct TagAttributes(Vec<(Vec<u8>, String)>);

impl TagAttributes {
    /// Reads every attribute of the tag, so a bad attribute fails the document
    /// even when it is not one the scanner looks at.
    fn read(element: &BytesStart, decoder: Decoder) -> AppResult<Self> {
        let mut attributes = element.attributes();
        attributes.with_checks(true);

        let mut values = Vec::new();
        for attr in attributes {
            let attr = attr.map_err(|e| malformed(format!("invalid attribute: {e}")))?;
            let key = attr.key.as_ref();
            check_name(key, "attribute")?;
            if attr.value.contains(&b'<') {
                return Err(malformed(format!(
                    "'<' not allowed in value of attribute '{}'",
                    String::from_utf8_lossy(key)
                )));
            }
            let value = attr.decode_and_unescape_value(decoder).map_err(|e| {
                malformed(format!(
                    "invalid value of attribute '{}': {e}",
                    String::from_utf8_lossy(key)
                ))
            })?;
            values.push((key.to_vec(), value.into_owned()));
        }
        Ok(Self(values))
    }

    fn get(&self, key: &[u8]) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.as_slice() == key)
            .map(|(_, v)| v.as_str())
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == ':' || !c.is_ascii()
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-' || c == '.'
}

/// Checks an element or attribute name against the XML `Name` production.
/// Non-ASCII characters are accepted without consulting the Unicode tables.
fn check_name(name: &[u8], kind: &str) -> AppResult<()> {
    let text = std::str::from_utf8(name)
        .map_err(|_| malformed(format!("{kind} name is not valid UTF-8")))?;
    let mut chars = text.chars();
    let valid = match chars.next() {
        Some(first) => is_name_start(first) && chars.all(is_name_char),
        None => false,
    };
    if !valid {
        return Err(malformed(format!("invalid {kind} name '{text}'")));
    }
    Ok(())
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

/// Accepts the five predefined entities and character references only.
fn check_reference(reference: &BytesRef) -> AppResult<()> {
    let name = reference
        .decode()
        .map_err(|e| malformed(format!("invalid entity reference: {e}")))?;

    let valid = match name.strip_prefix('#') {
        Some(code) => {
            let value = match code.strip_prefix('x') {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => code.parse::<u32>().ok(),
            };
            value.and_then(char::from_u32).is_some_and(is_xml_char)
        }
        None => matches!(&*name, "lt" | "gt" | "amp" | "apos" | "quot"),
    };

    if !valid {
        return Err(malformed(format!("undefined entity &{name};")));
    }
    Ok(())
}

/// Walk state for the descriptor tree.
///
/// `open` is a stack of (candidate index, element depth) for point elements that
/// have not been closed yet, so a `<coords>` tag can be matched to its parent.
struct PointScanner {
    candidates: Vec<PointCandidate>,
    open: Vec<(usize, usize)>,
    depth: usize,
    seen_root: bool,
}

impl PointScanner {
    fn new() -> Self {
        Self {
            candidates: Vec::new(),
            open: Vec::new(),
            depth: 0,
            seen_root: false,
        }
    }

    /// Content outside the root element is limited to whitespace and markup.
    fn check_top_level_content(&self) -> AppResult<()> {
        if self.depth > 0 {
            return Ok(());
        }
        if self.seen_root {
            Err(malformed("junk after document element"))
        } else {
            Err(malformed("content before document element"))
        }
    }

    fn text(&self, text: &BytesText) -> AppResult<()> {
        let blank = text
            .iter()
            .all(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'));
        if blank {
            Ok(())
        } else {
            self.check_top_level_content()
        }
    }

    fn open_element(
        &mut self,
        element: &BytesStart,
        decoder: Decoder,
        self_closing: bool,
    ) -> AppResult<()> {
        if self.depth == 0 {
            if self.seen_root {
                return Err(malformed("junk after document element"));
            }
            self.seen_root = true;
        }

        let name = element.name();
        check_name(name.as_ref(), "element")?;
        let attributes = TagAttributes::read(element, decoder)?;
        let depth = self.depth + 1;

        if name.as_ref() == ELEMENT_TAG {
            if attributes.get(TYPE_ATTR) == Some(POINT_TYPE) {
                let label = attributes.get(LABEL_ATTR).unwrap_or_default().to_string();
                self.candidates.push(PointCandidate {
                    label,
                    coords: None,
                });
                if !self_closing {
                    self.open.push((self.candidates.len() - 1, depth));
                }
            }
        } else if name.as_ref() == COORDS_TAG {
            self.attach_coords(&attributes, depth);
        }

        if !self_closing {
            self.depth = depth;
        }
        Ok(())
    }

    fn attach_coords(&mut self, attributes: &TagAttributes, depth: usize) {
        let Some(&(index, parent_depth)) = self.open.last() else {
            return;
        };
        // Only a direct child counts, and only the first one.
        if parent_depth + 1 != depth || self.candidates[index].coords.is_some() {
            return;
        }

        self.candidates[index].coords = Some(RawCoords {
            x: attributes.get(X_ATTR).map(str::to_string),
            y: attributes.get(Y_ATTR).map(str::to_string),
        });
    }

    fn close_element(&mut self) -> AppResult<()> {
        if matches!(self.open.last(), Some(&(_, depth)) if depth == self.depth) {
            self.open.pop();
        }
        self.depth = self
            .depth
            .checked_sub(1)
            .ok_or_else(|| malformed("closing tag without matching opening tag"))?;
        Ok(())
    }

    fn finish(self) -> AppResult<Vec<PointCandidate>> {
        if !self.seen_root {
            return Err(malformed("no element found"));
        }
        if self.depth != 0 {
            return Err(malformed(format!(
                "unexpected end of document: {} element(s) not closed",
                self.depth
            )));
        }
        Ok(self.candidates)
    }
}

/// Scans descriptor bytes for `<element type="point">` entries at any depth.
///
/// Candidates are returned in document order (order of their opening tags).
///
/// # Errors
///
/// Returns `FormatIssue::MalformedDescriptor` if the document is not well-formed:
/// syntax errors, mismatched closing tags, unclosed elements at end of input,
/// an empty document, text or a second element outside the root, invalid
/// element or attribute names, duplicate or badly escaped attributes, and
/// references to undefined entities.
pub fn scan_point_elements(content: &[u8]) -> AppResult<Vec<PointCandidate>> {
    let mut reader = Reader::from_reader(Cursor::new(content));
    let mut buf = Vec::with_capacity(1024);
    let mut scanner = PointScanner::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            malformed(format!("{e} (at byte {})", reader.error_position()))
        })?;
        match event {
            Event::Start(e) => scanner.open_element(&e, reader.decoder(), false)?,
            Event::Empty(e) => scanner.open_element(&e, reader.decoder(), true)?,
            Event::End(_) => scanner.close_element()?,
            Event::Text(e) => scanner.text(&e)?,
            Event::GeneralRef(e) => {
                scanner.check_top_level_content()?;
                check_reference(&e)?;
            }
            Event::CData(_) => scanner.check_top_level_content()?,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    scanner.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(x: &str, y: &str) -> Option<RawCoords> {
        Some(RawCoords {
            x: Some(x.to_string()),
            y: Some(y.to_string()),
        })
    }

    #[test]
    fn test_scan_finds_points_in_document_order() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<geogebra format="5.0">
  <construction>
    <element type="point" label="A">
      <show object="true" label="true"/>
      <coords x="1.5" y="-2.0" z="1.0"/>
    </element>
    <element type="line" label="f">
      <coords x="1" y="1" z="0"/>
    </element>
    <element type="point" label="B">
      <coords x="0" y="0" z="1"/>
    </element>
  </construction>
</geogebra>"#;

        let candidates = scan_point_elements(xml.as_bytes()).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].label, "A");
        assert_eq!(candidates[0].coords, raw("1.5", "-2.0"));
        assert_eq!(candidates[1].label, "B");
        assert_eq!(candidates[1].coords, raw("0", "0"));
    }

    #[test]
    fn test_scan_matches_points_at_any_depth() {
        let xml = r#"<geogebra><a><b><c>
            <element type="point" label="Deep"><coords x="3" y="4"/></element>
        </c></b></a></geogebra>"#;

        let candidates = scan_point_elements(xml.as_bytes()).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].label, "Deep");
        assert_eq!(candidates[0].coords, raw("3", "4"));
    }

    #[test]
    fn test_scan_ignores_coords_that_are_not_direct_children() {
        let xml = r#"<geogebra>
            <element type="point" label="A">
                <wrapper><coords x="9" y="9"/></wrapper>
            </element>
        </geogebra>"#;

        let candidates = scan_point_elements(xml.as_bytes()).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].coords, None);
    }

    #[test]
    fn test_scan_uses_first_coords_child() {
        let xml = r#"<geogebra>
            <element type="point" label="A">
                <coords x="1" y="2"/>
                <coords x="3" y="4"/>
            </element>
        </geogebra>"#;

        let candidates = scan_point_elements(xml.as_bytes()).unwrap();
        assert_eq!(candidates[0].coords, raw("1", "2"));
    }

    #[test]
    fn test_scan_missing_label_and_attributes() {
        let xml = r#"<geogebra>
            <element type="point"><coords x="5"/></element>
            <element type="point" label="Empty"/>
        </geogebra>"#;

        let candidates = scan_point_elements(xml.as_bytes()).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].label, "");
        assert_eq!(
            candidates[0].coords,
            Some(RawCoords {
                x: Some("5".to_string()),
                y: None,
            })
        );
        assert_eq!(candidates[1].label, "Empty");
        assert_eq!(candidates[1].coords, None);
    }

    #[test]
    fn test_scan_nested_point_does_not_steal_parent_coords() {
        let xml = r#"<geogebra>
            <element type="point" label="Outer">
                <element type="point" label="Inner"><coords x="1" y="1"/></element>
                <coords x="2" y="2"/>
            </element>
        </geogebra>"#;

        let candidates = scan_point_elements(xml.as_bytes()).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].label, "Outer");
        assert_eq!(candidates[0].coords, raw("2", "2"));
        assert_eq!(candidates[1].label, "Inner");
        assert_eq!(candidates[1].coords, raw("1", "1"));
    }

    #[test]
    fn test_scan_unescapes_attribute_values() {
        let xml = r#"<geogebra>
            <element type="point" label="P&amp;Q"><coords x="1" y="2"/></element>
        </geogebra>"#;

        let candidates = scan_point_elements(xml.as_bytes()).unwrap();
        assert_eq!(candidates[0].label, "P&Q");
    }

    #[test]
    fn test_scan_non_ascii_label() {
        let xml = r#"<geogebra>
            <element type="point" label="点A"><coords x="1" y="2"/></element>
        </geogebra>"#;

        let candidates = scan_point_elements(xml.as_bytes()).unwrap();
        assert_eq!(candidates[0].label, "点A");
    }

    #[test]
    fn test_scan_mismatched_end_tag_is_malformed() {
        let xml = r#"<geogebra><element type="point" label="A"></geogebra>"#;
        let err = scan_point_elements(xml.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Format(FormatIssue::MalformedDescriptor(_))
        ));
    }

    #[test]
    fn test_scan_unclosed_root_is_malformed() {
        let xml = r#"<geogebra><element type="point" label="A"><coords x="1" y="2"/>"#;
        let err = scan_point_elements(xml.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Format(FormatIssue::MalformedDescriptor(_))
        ));
    }

    #[test]
    fn test_scan_empty_document_is_malformed() {
        let err = scan_point_elements(b"").unwrap_err();
        assert!(err.to_string().contains("no element found"));
    }

    #[test]
    fn test_scan_two_roots_is_malformed() {
        let err = scan_point_elements(b"<a/><b/>").unwrap_err();
        assert!(matches!(
            err,
            AppError::Format(FormatIssue::MalformedDescriptor(_))
        ));
    }

    #[test]
    fn test_scan_document_without_points() {
        let xml = r#"<geogebra><construction title=""/></geogebra>"#;
        assert!(scan_point_elements(xml.as_bytes()).unwrap().is_empty());
    }

    fn assert_malformed(xml: &str) {
        match scan_point_elements(xml.as_bytes()) {
            Err(AppError::Format(FormatIssue::MalformedDescriptor(_))) => {}
            other => panic!("Expected MalformedDescriptor for {xml:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_scan_text_after_root_is_malformed() {
        assert_malformed("<geogebra/>junk");
        assert_malformed("<geogebra></geogebra>&amp;");
    }

    #[test]
    fn test_scan_text_before_root_is_malformed() {
        assert_malformed("junk<geogebra/>");
    }

    #[test]
    fn test_scan_whitespace_and_comments_around_root_are_fine() {
        let xml = "<?xml version=\"1.0\"?>\n<!-- saved -->\n<geogebra/>\n\n";
        assert!(scan_point_elements(xml.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_scan_undefined_entity_in_text_is_malformed() {
        assert_malformed("<geogebra>&bogus;</geogebra>");
    }

    #[test]
    fn test_scan_predefined_and_character_references_in_text() {
        let xml = r#"<geogebra><caption>&lt;a&gt; &amp; &quot;&apos; &#65; &#x42;</caption></geogebra>"#;
        assert!(scan_point_elements(xml.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_scan_invalid_character_reference_is_malformed() {
        assert_malformed("<geogebra>&#0;</geogebra>");
        assert_malformed("<geogebra>&#xZZ;</geogebra>");
    }

    #[test]
    fn test_scan_undefined_entity_in_unread_attribute_is_malformed() {
        assert_malformed(
            r#"<geogebra><element type="point" label="A" caption="&bogus;"><coords x="1" y="2"/></element></geogebra>"#,
        );
    }

    #[test]
    fn test_scan_duplicate_attribute_is_malformed() {
        assert_malformed(r#"<geogebra a="1" a="2"/>"#);
    }

    #[test]
    fn test_scan_lt_in_attribute_value_is_malformed() {
        assert_malformed(r#"<geogebra a="x<y"/>"#);
    }

    #[test]
    fn test_scan_unquoted_attribute_is_malformed() {
        assert_malformed(r#"<geogebra a=1/>"#);
    }

    #[test]
    fn test_scan_invalid_element_name_is_malformed() {
        assert_malformed("<geogebra><1bad/></geogebra>");
        assert_malformed("<geogebra><-x></-x></geogebra>");
    }

    #[test]
    fn test_scan_accepts_prefixed_and_dotted_names() {
        let xml = r#"<geogebra xmlns:ggb="urn:x"><ggb:kernel.v2 data-1="ok"/></geogebra>"#;
        assert!(scan_point_elements(xml.as_bytes()).unwrap().is_empty());
    }
}
