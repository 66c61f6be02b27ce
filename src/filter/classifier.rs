/// Structural classification of one line of an RDF/XML dump.
///
/// This is deliberately not an XML parser. The dumps this tool targets are
/// machine-written with one description element boundary per line, and the
/// filter only needs to recognize those boundaries. Anything beyond that
/// (namespaces, schema, nested elements) is out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// The line that completes the root element's opening tag.
    PreambleEnd,
    /// A description element opening with the given subject URI.
    DescriptionOpen(&'a str),
    /// A description element closing tag.
    DescriptionClose,
    /// Anything else.
    Other,
}

const DESCRIPTION_OPEN: &str = "<rdf:Description";
const ABOUT_ATTR: &str = "rdf:about=\"";
const DESCRIPTION_CLOSE: &str = "</rdf:Description>";
const ROOT_OPEN: &str = "<rdf:RDF";

/// The fixed line terminating the root element, appended unconditionally
/// at the end of every filtered document.
pub const CLOSING_MARKER: &str = "</rdf:RDF>";

/// Classify a single input line.
///
/// Known limitation: the subject URI is taken up to the next `"` byte, so
/// `rdf:about` values containing escaped quotes are not supported. Inputs
/// without escaped quotes classify exactly as before.
pub fn classify(line: &str) -> LineKind<'_> {
    if let Some(open) = line.find(DESCRIPTION_OPEN) {
        let rest = &line[open + DESCRIPTION_OPEN.len()..];
        if let Some(attr) = rest.find(ABOUT_ATTR) {
            let value = &rest[attr + ABOUT_ATTR.len()..];
            if let Some(end) = value.find('"') {
                return LineKind::DescriptionOpen(&value[..end]);
            }
        }
        return LineKind::Other;
    }

    let trimmed = line.trim();
    if trimmed == DESCRIPTION_CLOSE {
        return LineKind::DescriptionClose;
    }

    // Multi-line root open tags end on a bare ">"; serializers that keep the
    // root element on one line close its tag there instead.
    if trimmed == ">" || (trimmed.starts_with(ROOT_OPEN) && trimmed.ends_with('>')) {
        return LineKind::PreambleEnd;
    }

    LineKind::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_open_extracts_uri() {
        assert_eq!(
            classify("  <rdf:Description rdf:about=\"http://example.org/a\">"),
            LineKind::DescriptionOpen("http://example.org/a")
        );
    }

    #[test]
    fn test_description_open_tolerates_extra_attributes() {
        assert_eq!(
            classify("<rdf:Description rdf:about=\"http://example.org/a\" rdf:ID=\"x\">"),
            LineKind::DescriptionOpen("http://example.org/a")
        );
    }

    #[test]
    fn test_description_open_without_about_is_other() {
        assert_eq!(classify("<rdf:Description rdf:nodeID=\"b0\">"), LineKind::Other);
    }

    #[test]
    fn test_description_open_with_unterminated_value_is_other() {
        assert_eq!(classify("<rdf:Description rdf:about=\"http://no-close"), LineKind::Other);
    }

    #[test]
    fn test_description_close() {
        assert_eq!(classify("  </rdf:Description>"), LineKind::DescriptionClose);
        assert_eq!(classify("</rdf:Description>"), LineKind::DescriptionClose);
    }

    #[test]
    fn test_bare_angle_ends_preamble() {
        assert_eq!(classify(">"), LineKind::PreambleEnd);
        assert_eq!(classify("  >  "), LineKind::PreambleEnd);
    }

    #[test]
    fn test_single_line_root_open_ends_preamble() {
        assert_eq!(
            classify("<rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\">"),
            LineKind::PreambleEnd
        );
    }

    #[test]
    fn test_root_close_is_other() {
        // The closing marker is appended by the filter, never copied through;
        // during a re-filter it must not look like a preamble end.
        assert_eq!(classify("</rdf:RDF>"), LineKind::Other);
    }

    #[test]
    fn test_property_lines_are_other() {
        assert_eq!(
            classify("    <rdfs:label xml:lang=\"en\">cat</rdfs:label>"),
            LineKind::Other
        );
        assert_eq!(classify("<?xml version=\"1.0\"?>"), LineKind::Other);
        assert_eq!(classify(""), LineKind::Other);
    }
}
