use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rio_api::model::{Subject, Term};
use rio_api::parser::TriplesParser;
use rio_turtle::{NTriplesParser, TurtleError};
use tracing::{debug, info};

use crate::error::{FilterError, Result};

/// The two used-URI sets built from the alignment graph: every subject of an
/// alignment link lands in `left`, every object in `right`. Predicates and
/// confidence annotations are discarded. Built once per run and shared
/// read-only by both filter passes.
#[derive(Debug, Clone, Default)]
pub struct AlignmentIndex {
    left: HashSet<String>,
    right: HashSet<String>,
}

impl AlignmentIndex {
    /// Build the index from an N-Triples alignment file.
    ///
    /// Any record that cannot be decoded into a well-formed triple is fatal:
    /// filtering against a partial index would silently drop entities that
    /// do participate in alignment links.
    pub fn from_ntriples_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| FilterError::io("open", path, e))?;
        Self::from_reader(BufReader::new(file), path)
    }

    pub fn from_reader<R: BufRead>(reader: R, path: &Path) -> Result<Self> {
        let mut index = AlignmentIndex::default();
        let mut parser = NTriplesParser::new(reader);

        parser
            .parse_all(&mut |triple| {
                // Alignment links pair named resources; blank nodes and
                // literals carry no URI and are skipped.
                if let Subject::NamedNode(n) = triple.subject {
                    index.left.insert(n.iri.to_string());
                }
                if let Term::NamedNode(n) = triple.object {
                    index.right.insert(n.iri.to_string());
                }
                Ok(()) as std::result::Result<(), TurtleError>
            })
            .map_err(|e| FilterError::MalformedAlignment {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        debug!(
            "alignment index built from {}: {} left URIs, {} right URIs",
            path.display(),
            index.left.len(),
            index.right.len()
        );
        Ok(index)
    }

    pub fn left(&self) -> &HashSet<String> {
        &self.left
    }

    pub fn right(&self) -> &HashSet<String> {
        &self.right
    }

    pub fn log_summary(&self) {
        info!(
            "alignment index: {} left URIs, {} right URIs",
            self.left.len(),
            self.right.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn build(input: &str) -> Result<AlignmentIndex> {
        AlignmentIndex::from_reader(input.as_bytes(), &PathBuf::from("align.nt"))
    }

    #[test]
    fn test_subjects_and_objects_split_into_sides() {
        let index = build(
            "<http://left/a> <http://www.w3.org/2004/02/skos/core#exactMatch> <http://right/x> .\n\
             <http://left/b> <http://www.w3.org/2004/02/skos/core#exactMatch> <http://right/y> .\n",
        )
        .unwrap();

        assert_eq!(index.left().len(), 2);
        assert!(index.left().contains("http://left/a"));
        assert!(index.left().contains("http://left/b"));
        assert_eq!(index.right().len(), 2);
        assert!(index.right().contains("http://right/x"));
        assert!(index.right().contains("http://right/y"));
    }

    #[test]
    fn test_duplicate_links_collapse() {
        let index = build(
            "<http://left/a> <http://p> <http://right/x> .\n\
             <http://left/a> <http://q> <http://right/x> .\n",
        )
        .unwrap();

        assert_eq!(index.left().len(), 1);
        assert_eq!(index.right().len(), 1);
    }

    #[test]
    fn test_literal_objects_are_skipped() {
        let index = build(
            "<http://left/a> <http://p> <http://right/x> .\n\
             <http://left/a> <http://www.w3.org/2000/01/rdf-schema#label> \"a label\"@en .\n",
        )
        .unwrap();

        assert_eq!(index.right().len(), 1);
        assert!(index.right().contains("http://right/x"));
    }

    #[test]
    fn test_malformed_input_is_fatal() {
        let err = build("<http://left/a> <http://p> \"unterminated .\n").unwrap_err();
        assert!(matches!(err, FilterError::MalformedAlignment { .. }));
    }

    #[test]
    fn test_empty_input_yields_empty_sets() {
        let index = build("").unwrap();
        assert!(index.left().is_empty());
        assert!(index.right().is_empty());
    }
}
