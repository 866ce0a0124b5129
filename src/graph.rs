//! The engine-owned graph: nodes and edges with typed attributes and a
//! graphics record, built once per export pass and handed to a serializer.
use std::collections::BTreeSet;
use std::fmt::Display;

use indexmap::IndexMap;

use crate::color::Color;
use crate::model::ClassificationCase;

pub mod builder;
pub mod classification;
pub mod format;
pub mod registry;
pub mod scale;
pub mod sequence;

pub use crate::graph::builder::GraphBuilder;
pub use crate::graph::registry::{IdentityRegistry, LabelShortener};
pub use crate::graph::scale::{ColorScaler, ColorScalingState};

pub const PCQ_ID: &str = "PCQ_ID";
pub const FINAL_RATIO: &str = "finalRatio";
pub const COUNT_RATIO: &str = "countRatio";
pub const SIGNIFICANT: &str = "significant";
pub const IS_FILTERED: &str = "isFiltered";
pub const IS_PROTEIN: &str = "isProtein";
pub const CLASSIFICATION_CASE: &str = "Classification2Case";
pub const WEIGHT: &str = "Weight";
pub const VARIANCE: &str = "Variance";

/// The attributes whose value is read as a node's ratio when scaling colors
pub const RATIO_ATTRIBUTES: [&str; 2] = [FINAL_RATIO, COUNT_RATIO];

/// A typed attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    Boolean(bool),
    Real(f64),
    Integer(i64),
}

impl AttributeValue {
    /// The XGMML `type` of the value
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::Real(_) => "real",
            Self::Integer(_) => "integer",
        }
    }

    /// The `cy:type` of the value
    pub const fn cy_type(&self) -> &'static str {
        match self {
            Self::String(_) => "String",
            Self::Boolean(_) => "Boolean",
            Self::Real(_) => "Double",
            Self::Integer(_) => "Integer",
        }
    }

    /// Read the value as a number. Strings are parsed, Java's spellings of
    /// the non-finite values included.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Real(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            Self::Boolean(_) => None,
            Self::String(s) => format::parse_real(s),
        }
    }

    /// Whether the value is a set flag, either `true` or `1`
    pub fn is_set(&self) -> bool {
        match self {
            Self::Boolean(b) => *b,
            Self::Integer(v) => *v == 1,
            Self::Real(_) => false,
            Self::String(s) => s == "1" || s == "true",
        }
    }
}

impl Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Boolean(b) => f.write_str(if *b { "1" } else { "0" }),
            Self::Real(v) => f.write_str(&format::format_real(*v)),
            Self::Integer(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Integer(value as i64)
    }
}

impl From<usize> for AttributeValue {
    fn from(value: usize) -> Self {
        Self::Integer(value as i64)
    }
}

impl From<u64> for AttributeValue {
    fn from(value: u64) -> Self {
        Self::Integer(value as i64)
    }
}

/// Flags are written as the integers 0 and 1, which is what the consumer's
/// filters expect.
impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Integer(value as i64)
    }
}

pub type Attributes = IndexMap<String, AttributeValue>;

/// The shape of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum Shape {
    #[default]
    Ellipse,
    RoundRectangle,
    Rectangle,
    Triangle,
    Diamond,
    Hexagon,
    Octagon,
    Parallelogram,
    Vee,
}

impl Shape {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Ellipse => "ELLIPSE",
            Self::RoundRectangle => "ROUND_RECTANGLE",
            Self::Rectangle => "RECTANGLE",
            Self::Triangle => "TRIANGLE",
            Self::Diamond => "DIAMOND",
            Self::Hexagon => "HEXAGON",
            Self::Octagon => "OCTAGON",
            Self::Parallelogram => "PARALLELOGRAM",
            Self::Vee => "VEE",
        }
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderType {
    #[default]
    Solid,
    Dashed,
}

impl BorderType {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Solid => "SOLID",
            Self::Dashed => "DASHED",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeGraphics {
    /// The text displayed on the node
    pub label: String,
    pub shape: Shape,
    pub height: u32,
    pub width: u32,
    pub border_width: u32,
    pub outline: Color,
    pub fill: Color,
    pub label_color: Color,
    pub border: BorderType,
}

impl Default for NodeGraphics {
    fn default() -> Self {
        Self {
            label: String::new(),
            shape: Shape::Ellipse,
            height: 30,
            width: 70,
            border_width: 4,
            outline: Color::BLACK,
            fill: Color::WHITE,
            label_color: Color::BLACK,
            border: BorderType::Solid,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeGraphics {
    pub fill: Color,
    pub width: u32,
    pub label_color: Color,
}

impl Default for EdgeGraphics {
    fn default() -> Self {
        Self {
            fill: Color::BLACK,
            width: 3,
            label_color: Color::BLACK,
        }
    }
}

/// A protein or peptide node of the graph
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphNode {
    /// The identity key of the model node
    pub id: String,
    pub label: String,
    /// Plain text with `<b>` markup and newlines
    pub tooltip: String,
    pub attributes: Attributes,
    pub graphics: NodeGraphics,
    /// The classification cases of the protein pairs this node took part in
    pub cases: BTreeSet<ClassificationCase>,
    highlighted: bool,
}

impl GraphNode {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn set_attribute<K: Into<String>, V: Into<AttributeValue>>(&mut self, name: K, value: V) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Paint the outline with `color` and keep it. Once highlighted, a node
    /// stays highlighted for the rest of the pass.
    pub fn highlight(&mut self, color: Color) {
        self.graphics.outline = color;
        self.highlighted = true;
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }
}

/// An undirected relationship between two nodes. The serialized form still
/// names a source and a target, in the order of first discovery.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphEdge {
    pub id: u64,
    pub source: String,
    pub target: String,
    /// The text displayed on the edge, if any
    pub label: Option<String>,
    /// Plain text with `<b>` markup and newlines
    pub tooltip: Option<String>,
    pub attributes: Attributes,
    pub graphics: EdgeGraphics,
    pub cases: BTreeSet<ClassificationCase>,
    highlighted: bool,
}

impl GraphEdge {
    pub fn new<S: Into<String>, T: Into<String>>(id: u64, source: S, target: T) -> Self {
        Self {
            id,
            source: source.into(),
            target: target.into(),
            ..Default::default()
        }
    }

    pub fn set_attribute<K: Into<String>, V: Into<AttributeValue>>(&mut self, name: K, value: V) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn connects(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }

    /// Set the line color unless the edge was already highlighted
    pub fn paint(&mut self, color: Color) {
        if !self.highlighted {
            self.graphics.fill = color;
        }
    }

    /// Paint the line with `color` and keep it for the rest of the pass
    pub fn highlight(&mut self, color: Color) {
        self.graphics.fill = color;
        self.highlighted = true;
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }
}

/// A complete graph, ready to be serialized
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Graph {
    pub label: String,
    pub attributes: Attributes,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    pub const LAYOUT_ALGORITHM: &'static str = "Prefuse Force Directed Layout";

    /// An empty graph carrying the standard graph-level attributes
    pub fn new<S: Into<String>>(label: S) -> Self {
        let label: String = label.into();
        let mut attributes = Attributes::new();
        attributes.insert(PCQ_ID.into(), AttributeValue::String(label.clone()));
        attributes.insert("selected".into(), AttributeValue::Boolean(true));
        attributes.insert(
            "layoutAlgorithm".into(),
            AttributeValue::String(Self::LAYOUT_ALGORITHM.into()),
        );
        Self {
            label,
            attributes,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// The edge between `a` and `b`, in either direction
    pub fn edge_between(&self, a: &str, b: &str) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| e.connects(a, b))
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_attribute_rendering() {
        assert_eq!(AttributeValue::from(true).to_string(), "1");
        assert_eq!(AttributeValue::from(true).type_name(), "integer");
        assert_eq!(AttributeValue::Boolean(true).to_string(), "1");
        assert_eq!(AttributeValue::from(1.0).to_string(), "1.0");
        assert_eq!(AttributeValue::from(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(AttributeValue::from(0.25).cy_type(), "Double");
        assert_eq!(AttributeValue::from("-Infinity").as_f64(), Some(f64::NEG_INFINITY));
        assert_eq!(AttributeValue::from("abc").as_f64(), None);
    }

    #[test]
    fn test_highlight_is_sticky() {
        let mut edge = GraphEdge::new(1, "A", "B");
        edge.highlight(Color::RED);
        edge.paint(Color::BLACK);
        assert_eq!(edge.graphics.fill, Color::RED);
        assert!(edge.connects("B", "A"));

        let mut node = GraphNode::new("A");
        assert!(!node.is_highlighted());
        node.highlight(Color::RED);
        assert!(node.is_highlighted());
    }

    #[test]
    fn test_graph_attributes() {
        let graph = Graph::new("exp_1");
        assert_eq!(
            graph.attributes.get(PCQ_ID),
            Some(&AttributeValue::String("exp_1".into()))
        );
        assert_eq!(graph.attributes.get("selected").unwrap().type_name(), "boolean");
        assert!(graph.is_empty());
    }
}
