//! Accumulation of the classification cases contributed to a shared edge or
//! protein node by every protein pair it takes part in.
use std::collections::BTreeSet;

use super::{GraphEdge, GraphNode, CLASSIFICATION_CASE};
use crate::model::ClassificationCase;

pub const EDGE_TOOLTIP_PREAMBLE: &str = "This protein pair has been classified as:\n";

/// The identifiers of `cases` in ascending order, joined by `,`.
///
/// Returns `None` if no case remains after filtering.
pub fn case_ids<'a, I>(cases: I, only_inconsistent: bool) -> Option<String>
where
    I: IntoIterator<Item = &'a ClassificationCase>,
{
    let ids: BTreeSet<u32> = cases
        .into_iter()
        .filter(|c| !only_inconsistent || c.is_inconsistent())
        .map(|c| c.case_id())
        .collect();
    if ids.is_empty() {
        return None;
    }
    Some(
        ids.into_iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(","),
    )
}

/// One line per case, `id (explanation) `, with the inconsistent cases in bold
pub fn describe_for_edge(cases: &BTreeSet<ClassificationCase>) -> Option<String> {
    if cases.is_empty() {
        return None;
    }
    let lines: Vec<String> = cases
        .iter()
        .map(|case| {
            let text = format!("{} ({}) ", case.case_id(), case.explanation());
            if case.is_inconsistent() {
                format!("<b>{text}</b>")
            } else {
                text
            }
        })
        .collect();
    Some(lines.join("\n"))
}

/// One line per case, `id: explanation` with the identifier in bold
pub fn describe_for_protein(cases: &BTreeSet<ClassificationCase>) -> String {
    cases
        .iter()
        .map(|case| format!("<b>{}</b>: {}", case.case_id(), case.explanation()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Merges classification cases into edges and nodes and re-renders the
/// text derived from them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassificationAggregator {
    /// Write the inconsistent case identifiers as the edge label
    pub show_cases_in_edges: bool,
}

impl ClassificationAggregator {
    pub fn new(show_cases_in_edges: bool) -> Self {
        Self {
            show_cases_in_edges,
        }
    }

    /// Add `cases` to those already on `edge`. Merging the same cases again
    /// leaves the edge unchanged.
    pub fn merge_into_edge(&self, edge: &mut GraphEdge, cases: &[ClassificationCase]) {
        edge.cases.extend(cases.iter().copied());
        if edge.cases.is_empty() {
            return;
        }
        if let Some(ids) = case_ids(&edge.cases, false) {
            edge.set_attribute(CLASSIFICATION_CASE, ids);
        }
        if self.show_cases_in_edges {
            edge.label = case_ids(&edge.cases, true);
        }
        edge.tooltip =
            describe_for_edge(&edge.cases).map(|text| format!("{EDGE_TOOLTIP_PREAMBLE}{text}"));
    }

    /// Add `cases` to those already on a protein `node`. The tooltip that
    /// lists them is rendered once the pass is complete.
    pub fn merge_into_node(&self, node: &mut GraphNode, cases: &[ClassificationCase]) {
        node.cases.extend(cases.iter().copied());
        if let Some(ids) = case_ids(&node.cases, false) {
            node.set_attribute(CLASSIFICATION_CASE, ids);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::AttributeValue;
    use crate::model::ClassificationCase::*;

    fn label(edge: &GraphEdge) -> Option<&AttributeValue> {
        edge.attribute(CLASSIFICATION_CASE)
    }

    #[test]
    fn test_merge_is_sorted_and_idempotent() {
        let aggregator = ClassificationAggregator::new(false);
        let mut edge = GraphEdge::new(1, "P1", "BBB");
        aggregator.merge_into_edge(&mut edge, &[Consistent, UniqueProtein2Inconsistent]);
        aggregator.merge_into_edge(&mut edge, &[SharedInconsistent, UniqueProtein2Inconsistent]);
        assert_eq!(label(&edge), Some(&AttributeValue::from("1,3,5")));
        let before = edge.clone();
        aggregator.merge_into_edge(&mut edge, &[UniqueProtein2Inconsistent, SharedInconsistent]);
        assert_eq!(edge, before);
        assert_eq!(edge.label, None);
    }

    #[test]
    fn test_edge_label_shows_only_inconsistent() {
        let aggregator = ClassificationAggregator::new(true);
        let mut edge = GraphEdge::new(1, "P1", "BBB");
        aggregator.merge_into_edge(&mut edge, &[Consistent]);
        assert_eq!(edge.label, None);
        aggregator.merge_into_edge(&mut edge, &[UniqueBothInconsistent, UniqueProtein1Inconsistent]);
        assert_eq!(edge.label.as_deref(), Some("2,4"));
        let tooltip = edge.tooltip.unwrap();
        assert!(tooltip.starts_with(EDGE_TOOLTIP_PREAMBLE));
        assert!(tooltip.contains("\n<b>2 ("));
        assert!(tooltip.contains(&format!("1 ({}) ", Consistent.explanation())));
    }

    #[test]
    fn test_no_cases() {
        let aggregator = ClassificationAggregator::new(true);
        let mut edge = GraphEdge::new(1, "P1", "BBB");
        aggregator.merge_into_edge(&mut edge, &[]);
        assert!(edge.attributes.is_empty());
        assert!(edge.tooltip.is_none());
        assert_eq!(case_ids(&BTreeSet::<ClassificationCase>::new(), false), None);
    }

    #[test]
    fn test_protein_description() {
        let cases: BTreeSet<_> = [SharedInconsistent, Consistent].into_iter().collect();
        let text = describe_for_protein(&cases);
        assert!(text.starts_with("<b>1</b>: "));
        assert_eq!(text.lines().count(), 2);
    }
}
