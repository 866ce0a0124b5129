//! Rewriting of the root element of a finished XGMML document.
use std::io::{self, BufRead, Write};

use quick_xml::escape::escape;
use regex::Regex;

/// Matches the line holding the opening tag of the root element, and not
/// the `<graphics>` elements that follow it
pub const GRAPH_OPEN_PATTERN: &str = r"^\s*<graph\b";

/// The root element Cytoscape expects, with its namespaces and document version
pub fn graph_open_tag(label: &str) -> String {
    format!(
        "<graph id=\"1\" label=\"{}\" directed=\"1\" cy:documentVersion=\"3.0\" xmlns:dc=\"http://purl.org/dc/elements/1.1/\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\" xmlns:cy=\"http://www.cytoscape.org\" xmlns=\"http://www.cs.rpi.edu/XGMML\">",
        escape(label)
    )
}

/// Replaces the first line opening the root element with [`graph_open_tag`],
/// copying every other line unchanged
#[derive(Debug, Clone)]
pub struct HeaderRewriter {
    pattern: Regex,
    replacement: String,
}

impl HeaderRewriter {
    pub fn new(label: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(GRAPH_OPEN_PATTERN)?,
            replacement: graph_open_tag(label),
        })
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Copy `reader` to `writer` line by line. Returns whether a line was replaced.
    pub fn rewrite<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> io::Result<bool> {
        let mut replaced = false;
        for line in reader.lines() {
            let line = line?;
            if !replaced && self.pattern.is_match(&line) {
                writeln!(writer, "{}", self.replacement)?;
                replaced = true;
            } else {
                writeln!(writer, "{line}")?;
            }
        }
        writer.flush()?;
        Ok(replaced)
    }
}
