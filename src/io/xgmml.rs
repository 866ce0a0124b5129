//! Writing of XGMML, the graph markup consumed by Cytoscape.
//!
//! A document is first written to a temporary file next to its destination,
//! its root element is then rewritten into a second temporary file which
//! finally replaces the destination. A failure at any step leaves the
//! destination untouched.
use std::fs;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use log::debug;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::graph::Graph;

mod header;
mod writer;

pub use header::{graph_open_tag, HeaderRewriter, GRAPH_OPEN_PATTERN};
pub use writer::{WriterResult, XGMMLWriter};

#[derive(Debug, Error)]
pub enum XGMMLWriterError {
    #[error("An XML error occurred: {0}")]
    XMLError(#[from] quick_xml::Error),
    #[error("An IO error occurred: {0}")]
    IOError(#[from] io::Error),
    #[error("Failed to move the finished document into place: {0}")]
    PersistError(#[from] tempfile::PersistError),
    #[error("The header pattern could not be compiled: {0}")]
    PatternError(#[from] regex::Error),
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Rewrite the root element of `source` into a temporary file in `dir`
fn rewrite_header_into(
    source: fs::File,
    dir: &Path,
    label: &str,
) -> Result<NamedTempFile, XGMMLWriterError> {
    let rewriter = HeaderRewriter::new(label)?;
    let mut rewritten = NamedTempFile::new_in(dir)?;
    if !rewriter.rewrite(BufReader::new(source), BufWriter::new(&mut rewritten))? {
        debug!("No root element found to rewrite in {}", dir.display());
    }
    Ok(rewritten)
}

/// Write `graph` to `path` as XGMML, labelling the root element with `graph.label`
pub fn write_xgmml<P: AsRef<Path>>(graph: &Graph, path: P) -> Result<(), XGMMLWriterError> {
    let path = path.as_ref();
    let dir = parent_dir(path);
    fs::create_dir_all(dir)?;

    let mut raw = NamedTempFile::new_in(dir)?;
    let mut writer = XGMMLWriter::new(&mut raw);
    writer.write_graph(graph)?;
    writer.into_inner()?;

    let rewritten = rewrite_header_into(raw.reopen()?, dir, &graph.label)?;
    rewritten.persist(path)?;
    debug!("{} created", path.display());
    Ok(())
}

/// Rewrite the root element of an existing XGMML document in place
pub fn fix_header<P: AsRef<Path>>(path: P, label: &str) -> Result<(), XGMMLWriterError> {
    let path = path.as_ref();
    let source = fs::File::open(path)?;
    let rewritten = rewrite_header_into(source, parent_dir(path), label)?;
    rewritten.persist(path)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::GraphNode;

    #[test]
    fn test_write_xgmml() -> Result<(), XGMMLWriterError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("net.xgmml");
        let mut graph = Graph::new("net");
        graph.nodes.push(GraphNode::new("AAA"));
        write_xgmml(&graph, &path)?;

        let text = fs::read_to_string(&path)?;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], graph_open_tag("net"));
        assert!(text.contains("<node id=\"AAA\" label=\"\">"));
        assert_eq!(fs::read_dir(path.parent().unwrap())?.count(), 1);
        Ok(())
    }

    #[test]
    fn test_fix_header() -> Result<(), XGMMLWriterError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("plain.xgmml");
        fs::write(&path, "<?xml version=\"1.0\"?>\n<graph label=\"old\">\n</graph>\n")?;
        fix_header(&path, "new")?;
        let text = fs::read_to_string(&path)?;
        assert!(text.contains("label=\"new\" directed=\"1\" cy:documentVersion=\"3.0\""));
        assert!(!text.contains("old"));
        Ok(())
    }
}
