//! Global two-pass coloring of nodes by their ratio.
//!
//! The first pass discovers whether the graph holds any valid ratio at all
//! and its range, the second assigns each node a fill interpolated over the
//! configured ratio bounds.
use log::{debug, warn};

use super::{Graph, GraphNode, IS_FILTERED, RATIO_ATTRIBUTES, SIGNIFICANT};
use crate::color::Color;
use crate::params::ExportParameters;

/// The running range of valid ratio values seen in the current graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScalingState {
    pub min: f64,
    pub max: f64,
}

impl Default for ColorScalingState {
    fn default() -> Self {
        Self {
            min: f64::MAX,
            max: f64::MIN,
        }
    }
}

impl ColorScalingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether `value` takes part in range discovery. `NaN`, the infinities
    /// and the two extreme finite values used as "unset" markers do not.
    pub fn is_valid(value: f64) -> bool {
        value.is_finite() && value != f64::MAX && value != f64::MIN
    }

    pub fn observe(&mut self, value: f64) {
        if !Self::is_valid(value) {
            return;
        }
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn has_observations(&self) -> bool {
        self.min != f64::MAX && self.max != f64::MIN
    }

    /// The interpolation range, replaced by the configured bounds, or `None`
    /// when no valid value was observed. If the bounds are inverted the range
    /// collapses onto the upper bound.
    pub fn bounded(&self, lower: f64, upper: f64) -> Option<(f64, f64)> {
        if !self.has_observations() {
            return None;
        }
        let max = upper;
        let min = if lower > max { max } else { lower };
        Some((min, max))
    }
}

/// The ratio carried by a node
#[derive(Debug, Clone, Copy, PartialEq)]
enum NodeRatio {
    Absent,
    /// The attribute is present but cannot be read as a number
    Unparseable,
    Value(f64),
}

fn node_ratio(node: &GraphNode) -> NodeRatio {
    for name in RATIO_ATTRIBUTES {
        if let Some(value) = node.attribute(name) {
            return match value.as_f64() {
                Some(v) => NodeRatio::Value(v),
                None => {
                    warn!(
                        "Ignoring the unparseable {name} value {value:?} of node {}",
                        node.id
                    );
                    NodeRatio::Unparseable
                }
            };
        }
    }
    NodeRatio::Absent
}

fn flag(node: &GraphNode, name: &str) -> bool {
    node.attribute(name).map(|v| v.is_set()).unwrap_or(false)
}

/// Colors the nodes of a graph by ratio according to [`ExportParameters`]
#[derive(Debug)]
pub struct ColorScaler<'a> {
    params: &'a ExportParameters,
    state: ColorScalingState,
}

impl<'a> ColorScaler<'a> {
    pub fn new(params: &'a ExportParameters) -> Self {
        Self {
            params,
            state: ColorScalingState::new(),
        }
    }

    pub fn state(&self) -> &ColorScalingState {
        &self.state
    }

    fn color_for(&self, ratio: f64, min: f64, max: f64) -> Option<Color> {
        let ratio = if ratio == f64::INFINITY {
            max
        } else if ratio == f64::NEG_INFINITY {
            min
        } else if ratio < self.params.minimum_ratio_for_color {
            min
        } else if ratio > self.params.maximum_ratio_for_color {
            max
        } else if ratio.is_nan() {
            return None;
        } else {
            ratio
        };
        let colors = &self.params.colors;
        Some(Color::interpolate(
            ratio,
            min,
            max,
            colors.ratio_min,
            colors.ratio_max,
        ))
    }

    /// Recolor the nodes of `graph`, returning the number of nodes whose fill
    /// was assigned. Nothing changes if no node carries a valid ratio.
    pub fn scale(&mut self, graph: &mut Graph) -> usize {
        self.state.reset();
        for node in graph.nodes.iter() {
            if let NodeRatio::Value(ratio) = node_ratio(node) {
                self.state.observe(ratio);
            }
        }

        let Some((min, max)) = self.state.bounded(
            self.params.minimum_ratio_for_color,
            self.params.maximum_ratio_for_color,
        ) else {
            debug!("No valid ratio found in {}, colors left unscaled", graph.label);
            return 0;
        };

        let non_regulated = self.params.colors.non_regulated;
        let mut assigned = 0;
        for node in graph.nodes.iter_mut() {
            let fill = match node_ratio(node) {
                NodeRatio::Unparseable => continue,
                _ if flag(node, IS_FILTERED) => non_regulated,
                NodeRatio::Value(_) if !flag(node, SIGNIFICANT) && non_regulated.is_some() => {
                    non_regulated
                }
                NodeRatio::Value(ratio) => self.color_for(ratio, min, max),
                NodeRatio::Absent => non_regulated,
            };
            if let Some(fill) = fill {
                node.graphics.fill = fill;
                assigned += 1;
            }
        }
        debug!(
            "Scaled the colors of {assigned} nodes in {} over [{min}, {max}], observed [{}, {}]",
            graph.label, self.state.min, self.state.max
        );
        assigned
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::color::ColorManager;
    use crate::graph::{AttributeValue, FINAL_RATIO, IS_PROTEIN};

    fn peptide(id: &str, ratio: Option<AttributeValue>, significant: bool) -> GraphNode {
        let mut node = GraphNode::new(id);
        node.graphics.fill = Color::CYAN;
        node.set_attribute(IS_FILTERED, false);
        node.set_attribute(IS_PROTEIN, false);
        if let Some(ratio) = ratio {
            node.set_attribute(FINAL_RATIO, ratio);
        }
        node.set_attribute(SIGNIFICANT, significant);
        node
    }

    fn params() -> ExportParameters {
        ExportParameters::default()
            .with_ratio_bounds(-2.0, 2.0)
            .with_colors(ColorManager::default().with_ratio_colors(Color::BLACK, Color::new(200, 200, 200)))
    }

    fn graph_of(nodes: Vec<GraphNode>) -> Graph {
        let mut graph = Graph::new("test");
        graph.nodes = nodes;
        graph
    }

    #[test]
    fn test_state_skips_invalid_values() {
        let mut state = ColorScalingState::new();
        assert!(!state.has_observations());
        for v in [f64::NAN, f64::INFINITY, f64::MAX, f64::MIN] {
            state.observe(v);
        }
        assert!(!state.has_observations());
        state.observe(0.5);
        state.observe(-1.5);
        assert_eq!((state.min, state.max), (-1.5, 0.5));
        assert_eq!(state.bounded(-2.0, 2.0), Some((-2.0, 2.0)));
        assert_eq!(state.bounded(3.0, 2.0), Some((2.0, 2.0)));
    }

    #[test_log::test]
    fn test_interpolates_and_clamps() {
        let params = params();
        let mut graph = graph_of(vec![
            peptide("low", Some(AttributeValue::Real(-5.0)), true),
            peptide("mid", Some(AttributeValue::Real(0.0)), true),
            peptide("high", Some(AttributeValue::Real(f64::INFINITY)), true),
            peptide("nan", Some(AttributeValue::Real(f64::NAN)), true),
        ]);
        let assigned = ColorScaler::new(&params).scale(&mut graph);
        assert_eq!(assigned, 3);
        assert_eq!(graph.nodes[0].graphics.fill, Color::BLACK);
        assert_eq!(graph.nodes[1].graphics.fill, Color::new(100, 100, 100));
        assert_eq!(graph.nodes[2].graphics.fill, Color::new(200, 200, 200));
        assert_eq!(graph.nodes[3].graphics.fill, Color::CYAN);
    }

    #[test_log::test]
    fn test_no_valid_ratio_leaves_colors() {
        let params = params();
        let mut graph = graph_of(vec![
            peptide("inf", Some(AttributeValue::Real(f64::INFINITY)), true),
            peptide("junk", Some(AttributeValue::from("not a number")), true),
            peptide("none", None, true),
        ]);
        assert_eq!(ColorScaler::new(&params).scale(&mut graph), 0);
        assert!(graph.nodes.iter().all(|n| n.graphics.fill == Color::CYAN));
    }

    #[test]
    fn test_non_regulated() {
        let mut params = params();
        params.colors = params.colors.clone().with_non_regulated(Color::YELLOW);
        let mut filtered = peptide("filtered", Some(AttributeValue::Real(1.0)), true);
        filtered.set_attribute(IS_FILTERED, true);
        let protein = |id: &str, filtered: bool| {
            let mut node = GraphNode::new(id);
            node.set_attribute(IS_PROTEIN, true);
            node.set_attribute(IS_FILTERED, filtered);
            node.graphics.fill = Color::WHITE;
            node
        };
        let mut graph = graph_of(vec![
            peptide("sig", Some(AttributeValue::Real(2.0)), true),
            peptide("notsig", Some(AttributeValue::Real(2.0)), false),
            filtered,
            peptide("noratio", None, false),
            protein("P1", false),
            protein("P2", true),
        ]);
        ColorScaler::new(&params).scale(&mut graph);
        assert_eq!(graph.nodes[0].graphics.fill, Color::new(200, 200, 200));
        for node in graph.nodes.iter().skip(1) {
            assert_eq!(node.graphics.fill, Color::YELLOW, "{}", node.id);
        }
    }

    #[test]
    fn test_proteins_keep_fill_without_non_regulated() {
        let params = params();
        let mut protein = GraphNode::new("P1");
        protein.set_attribute(IS_PROTEIN, true);
        protein.set_attribute(IS_FILTERED, true);
        protein.graphics.fill = Color::WHITE;
        let mut graph = graph_of(vec![
            peptide("sig", Some(AttributeValue::Real(1.0)), true),
            protein,
        ]);
        ColorScaler::new(&params).scale(&mut graph);
        assert_eq!(graph.nodes[1].graphics.fill, Color::WHITE);
    }

    #[test_log::test]
    fn test_unparseable_ratio_is_left_alone() {
        let mut params = params();
        params.colors = params.colors.clone().with_non_regulated(Color::YELLOW);
        let mut junk = peptide("junk", Some(AttributeValue::from("1,5")), false);
        junk.set_attribute(IS_FILTERED, true);
        let mut graph = graph_of(vec![
            peptide("sig", Some(AttributeValue::Real(1.0)), true),
            junk,
        ]);
        assert_eq!(ColorScaler::new(&params).scale(&mut graph), 1);
        assert_eq!(graph.nodes[1].graphics.fill, Color::CYAN);
    }

    #[test]
    fn test_monotonic_over_range() {
        let params = params();
        let nodes = (0..=20)
            .map(|i| {
                let r = -2.0 + i as f64 * 0.2;
                peptide(&i.to_string(), Some(AttributeValue::Real(r)), true)
            })
            .collect();
        let mut graph = graph_of(nodes);
        ColorScaler::new(&params).scale(&mut graph);
        let reds: Vec<u8> = graph.nodes.iter().map(|n| n.graphics.fill.r).collect();
        assert!(reds.windows(2).all(|w| w[0] <= w[1]));
    }
}
