use std::fmt::Debug;
use std::io;
use std::io::{BufWriter, Write};

use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::Writer;

use super::XGMMLWriterError;
use crate::graph::format::to_html;
use crate::graph::{AttributeValue, Graph, GraphEdge, GraphNode};

const BUFFER_SIZE: usize = 10000;

macro_rules! bstart {
    ($e:tt) => {
        BytesStart::from_content($e, $e.len())
    };
}

macro_rules! attrib {
    ($name:expr, $value:expr, $elt:ident) => {
        let value: &str = &$value;
        $elt.push_attribute(($name, value));
    };
}

macro_rules! start_event {
    ($writer:ident, $target:ident) => {
        $writer.handle.write_event(Event::Start($target.borrow()))?;
    };
}

macro_rules! end_event {
    ($writer:ident, $target:ident) => {
        $writer.handle.write_event(Event::End($target.to_end()))?;
    };
}

/// The visual properties of the whole network
const NETWORK_GRAPHICS: [(&str, &str); 7] = [
    ("NETWORK_NODE_SELECTION", "true"),
    ("NETWORK_HEIGHT", "381.0"),
    ("NETWORK_EDGE_SELECTION", "true"),
    ("NETWORK_SCALE_FACTOR", "0.23"),
    ("NETWORK_WIDTH", "946.0"),
    ("NETWORK_DEPTH", "0.0"),
    ("NETWORK_BACKGROUND_PAINT", "#FFFFFF"),
];

pub type WriterResult = Result<(), XGMMLWriterError>;

/**
Writes a [`Graph`] as an XGMML document, one graph per writer.

The root element is written without the namespace declarations Cytoscape
expects, those are added by [`HeaderRewriter`](super::HeaderRewriter) once the
document is complete.
*/
pub struct XGMMLWriter<W: Write> {
    handle: Writer<BufWriter<W>>,
}

impl<W: Write> Debug for XGMMLWriter<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XGMMLWriter")
            .field("handle", &"...")
            .finish()
    }
}

impl<W: Write> XGMMLWriter<W> {
    const INDENT_CHAR: u8 = b'\t';
    const INDENT_SIZE: usize = 1;

    pub fn new(file: W) -> XGMMLWriter<W> {
        let handle = BufWriter::with_capacity(BUFFER_SIZE, file);
        Self {
            handle: Writer::new_with_indent(handle, Self::INDENT_CHAR, Self::INDENT_SIZE),
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.handle.get_mut().flush()
    }

    /// Flush the buffered output and return the underlying stream
    pub fn into_inner(self) -> Result<W, XGMMLWriterError> {
        self.handle
            .into_inner()
            .into_inner()
            .map_err(|e| XGMMLWriterError::IOError(e.into_error()))
    }

    fn write_att(&mut self, name: &str, value: &AttributeValue, with_cy_type: bool) -> WriterResult {
        let mut elt = bstart!("att");
        attrib!("name", name, elt);
        attrib!("value", value.to_string(), elt);
        attrib!("type", value.type_name(), elt);
        if with_cy_type {
            attrib!("cy:type", value.cy_type(), elt);
        }
        self.handle.write_event(Event::Empty(elt))?;
        Ok(())
    }

    /// Visual properties are always written as strings. A `None` value is
    /// written without a `value` attribute.
    fn write_visual_property(&mut self, name: &str, value: Option<&str>) -> WriterResult {
        let mut elt = bstart!("att");
        attrib!("name", name, elt);
        if let Some(value) = value {
            attrib!("value", value, elt);
        }
        attrib!("type", "string", elt);
        self.handle.write_event(Event::Empty(elt))?;
        Ok(())
    }

    fn write_network_graphics(&mut self, label: &str) -> WriterResult {
        let elt = bstart!("graphics");
        start_event!(self, elt);
        for (i, (name, value)) in NETWORK_GRAPHICS.iter().enumerate() {
            // The title sits between the height and the edge selection flag
            if i == 2 {
                self.write_visual_property("NETWORK_TITLE", Some(label))?;
            }
            self.write_visual_property(name, Some(value))?;
        }
        end_event!(self, elt);
        Ok(())
    }

    fn write_node_graphics(&mut self, node: &GraphNode) -> WriterResult {
        let graphics = &node.graphics;
        let mut elt = bstart!("graphics");
        attrib!("type", graphics.shape.name(), elt);
        attrib!("h", graphics.height.to_string(), elt);
        attrib!("w", graphics.width.to_string(), elt);
        attrib!("width", graphics.border_width.to_string(), elt);
        attrib!("outline", graphics.outline.to_hex(), elt);
        attrib!("fill", graphics.fill.to_hex(), elt);
        start_event!(self, elt);

        let tooltip = to_html(&node.tooltip);
        let label_color = graphics.label_color.to_hex();
        let properties = [
            ("NODE_TOOLTIP", tooltip.as_str()),
            ("NODE_NESTED_NETWORK_IMAGE_VISIBLE", "true"),
            ("NODE_BORDER_STROKE", graphics.border.name()),
            ("NODE_SELECTED", "false"),
            ("NODE_TRANSPARENCY", "255"),
            ("NODE_LABEL_WIDTH", "200"),
            ("NODE_LABEL", graphics.label.as_str()),
            ("NODE_LABEL_FONT_SIZE", "12"),
            ("NODE_LABEL_TRANSPARENCY", "255"),
            ("NODE_LABEL_COLOR", label_color.as_str()),
            ("NODE_VISIBLE", "true"),
            ("NODE_DEPTH", "0.0"),
            ("NODE_BORDER_TRANSPARENCY", "255"),
            ("NODE_LABEL_FONT_FACE", "Dialog,plain,12"),
            ("NODE_LABEL_TRANSPARENCY", "255"),
        ];
        for (name, value) in properties {
            self.write_visual_property(name, Some(value))?;
        }
        end_event!(self, elt);
        Ok(())
    }

    pub fn write_node(&mut self, node: &GraphNode) -> WriterResult {
        let mut elt = bstart!("node");
        attrib!("id", node.id, elt);
        attrib!("label", node.label, elt);
        start_event!(self, elt);
        for (name, value) in node.attributes.iter() {
            self.write_att(name, value, true)?;
        }
        self.write_node_graphics(node)?;
        end_event!(self, elt);
        Ok(())
    }

    fn write_edge_graphics(&mut self, edge: &GraphEdge) -> WriterResult {
        let graphics = &edge.graphics;
        let mut elt = bstart!("graphics");
        attrib!("fill", graphics.fill.to_hex(), elt);
        attrib!("width", graphics.width.to_string(), elt);
        start_event!(self, elt);

        let tooltip = edge.tooltip.as_deref().map(to_html);
        let label_color = graphics.label_color.to_hex();
        let properties = [
            ("EDGE_SELECTED", Some("false")),
            ("EDGE_LABEL_COLOR", Some(label_color.as_str())),
            ("EDGE_TARGET_ARROW_SHAPE", Some("none")),
            ("EDGE_SOURCE_ARROW_UNSELECTED_PAINT", Some("#000000")),
            ("EDGE_TARGET_ARROW_SELECTED_PAINT", Some("#FFFF00")),
            ("EDGE_LABEL_TRANSPARENCY", Some("255")),
            ("EDGE_STROKE_SELECTED_PAINT", Some("#FF0000")),
            ("EDGE_LINE_TYPE", Some("SOLID")),
            ("EDGE_TOOLTIP", tooltip.as_deref()),
            ("EDGE_CURVED", Some("true")),
            ("EDGE_TRANSPARENCY", Some("255")),
            ("EDGE_BEND", Some("")),
            ("EDGE_LABEL_FONT_FACE", Some("Dialog,plain,10")),
            ("EDGE_LABEL", edge.label.as_deref()),
            ("EDGE_SOURCE_ARROW_SHAPE", Some("none")),
            ("EDGE_TARGET_ARROW_UNSELECTED_PAINT", Some("#000000")),
            ("EDGE_SOURCE_ARROW_SELECTED_PAINT", Some("#FFFF00")),
            ("EDGE_VISIBLE", Some("true")),
        ];
        for (name, value) in properties {
            self.write_visual_property(name, value)?;
        }
        end_event!(self, elt);
        Ok(())
    }

    pub fn write_edge(&mut self, edge: &GraphEdge) -> WriterResult {
        let mut elt = bstart!("edge");
        attrib!("id", edge.id.to_string(), elt);
        if let Some(label) = &edge.label {
            attrib!("label", label, elt);
        }
        attrib!("source", edge.source, elt);
        attrib!("target", edge.target, elt);
        start_event!(self, elt);
        for (name, value) in edge.attributes.iter() {
            self.write_att(name, value, false)?;
        }
        self.write_edge_graphics(edge)?;
        end_event!(self, elt);
        Ok(())
    }

    /// Write the complete document for `graph`
    pub fn write_graph(&mut self, graph: &Graph) -> WriterResult {
        self.handle
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        let mut elt = bstart!("graph");
        attrib!("id", "1", elt);
        attrib!("label", graph.label, elt);
        attrib!("directed", "1", elt);
        start_event!(self, elt);

        for (name, value) in graph.attributes.iter() {
            self.write_att(name, value, false)?;
        }
        self.write_network_graphics(&graph.label)?;
        for node in graph.nodes.iter() {
            self.write_node(node)?;
        }
        for edge in graph.edges.iter() {
            self.write_edge(edge)?;
        }

        end_event!(self, elt);
        self.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::color::Color;
    use crate::graph::{IS_PROTEIN, PCQ_ID};

    fn render(graph: &Graph) -> String {
        let mut writer = XGMMLWriter::new(Vec::new());
        writer.write_graph(graph).unwrap();
        String::from_utf8(writer.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_write_graph() {
        let mut graph = Graph::new("demo_ALL");
        let mut node = GraphNode::new("P1");
        node.label = "P1".into();
        node.tooltip = "<b>Protein ACC(s):</b>\nP1".into();
        node.set_attribute(IS_PROTEIN, true);
        node.set_attribute("finalRatio", 1.0);
        node.graphics.label = "P1".into();
        node.graphics.fill = Color::new(255, 0, 0);
        graph.nodes.push(node);
        let mut edge = GraphEdge::new(1, "AAA", "P1");
        edge.set_attribute(PCQ_ID, "P1-AAA");
        graph.edges.push(edge);

        let text = render(&graph);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("<?xml version=\"1.0\""));
        assert_eq!(lines[1], "<graph id=\"1\" label=\"demo_ALL\" directed=\"1\">");
        assert!(lines[2].starts_with("\t<att "));
        assert!(text.contains("<att name=\"selected\" value=\"1\" type=\"boolean\"/>"));
        assert!(text.contains("<att name=\"NETWORK_TITLE\" value=\"demo_ALL\" type=\"string\"/>"));
        assert!(text.contains("<att name=\"finalRatio\" value=\"1.0\" type=\"real\" cy:type=\"Double\"/>"));
        assert!(text.contains("<att name=\"isProtein\" value=\"1\" type=\"integer\" cy:type=\"Integer\"/>"));
        assert!(text.contains("&lt;html&gt;&lt;b&gt;Protein ACC(s):&lt;/b&gt;&lt;br&gt;P1&lt;/html&gt;"));
        assert!(text.contains("fill=\"#FF0000\""));
        assert!(text.contains("<edge id=\"1\" source=\"AAA\" target=\"P1\">"));
        assert!(text.contains("<att name=\"EDGE_TOOLTIP\" type=\"string\"/>"));
        assert!(text.contains("<att name=\"PCQ_ID\" value=\"P1-AAA\" type=\"string\"/>"));
        assert!(text.trim_end().ends_with("</graph>"));
        assert_eq!(text.matches("NODE_LABEL_TRANSPARENCY").count(), 2);
    }

    #[test]
    fn test_network_graphics_order() {
        let text = render(&Graph::new("g"));
        let height = text.find("NETWORK_HEIGHT").unwrap();
        let title = text.find("NETWORK_TITLE").unwrap();
        let edge_selection = text.find("NETWORK_EDGE_SELECTION").unwrap();
        assert!(height < title && title < edge_selection);
        assert!(!text.contains("<node"));
    }
}
