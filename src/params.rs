//! Settings that control how a cluster model is turned into graphs and
//! where those graphs are written.
use std::path::PathBuf;

use crate::color::ColorManager;
use crate::graph::Shape;

/// What to display as the label of a protein node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProteinNodeLabel {
    /// The accession(s) in the node key
    #[default]
    Accession,
    /// The UniProt entry name, like `ALDOA_HUMAN`
    Id,
    /// The gene name(s)
    Gene,
}

/// The kind of quantification the ratios were derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnalysisInputType {
    /// Census output of labelled (isobaric or SILAC) quantification
    #[default]
    CensusOut,
    /// Census chromatogram output of isotopologue quantification, where both
    /// the integrated (`Ri`) and ion count (`Rc`) ratios are reported
    CensusChro,
}

/// Configuration of an export run.
///
/// Every component receives the parameters explicitly, there is no global
/// instance.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct ExportParameters {
    pub output_folder: PathBuf,
    pub output_prefix: String,
    pub output_suffix: String,

    /// Exclude discarded peptide nodes from the graphs entirely
    pub remove_filtered_nodes: bool,
    pub collapse_by_sites: bool,
    pub collapse_by_ptms: bool,
    /// The PTM codes used in keys of nodes collapsed by PTM, e.g. `*`
    pub ptm_codes: Vec<String>,
    pub collapse_indistinguishable_peptides: bool,
    pub collapse_indistinguishable_proteins: bool,

    /// Write one additional graph per classification case
    pub apply_classifications_by_protein_pair: bool,
    /// Label edges with the inconsistent classification cases they take part in
    pub show_cases_in_edges: bool,

    pub significant_fdr_threshold: Option<f64>,
    pub perform_ratio_integration: bool,

    pub minimum_ratio_for_color: f64,
    pub maximum_ratio_for_color: f64,

    pub protein_label: ProteinNodeLabel,
    pub analysis_input_type: AnalysisInputType,
    /// Annotation fields to copy onto protein nodes as attributes
    pub annotation_columns: Vec<String>,

    pub peptide_node_shape: Shape,
    pub peptide_node_height: u32,
    pub peptide_node_width: u32,
    pub protein_node_shape: Shape,
    pub protein_node_height: u32,
    pub protein_node_width: u32,

    pub colors: ColorManager,
}

impl Default for ExportParameters {
    fn default() -> Self {
        Self {
            output_folder: PathBuf::from("."),
            output_prefix: "pcq".into(),
            output_suffix: String::new(),
            remove_filtered_nodes: false,
            collapse_by_sites: false,
            collapse_by_ptms: false,
            ptm_codes: Vec::new(),
            collapse_indistinguishable_peptides: true,
            collapse_indistinguishable_proteins: true,
            apply_classifications_by_protein_pair: false,
            show_cases_in_edges: false,
            significant_fdr_threshold: Some(0.05),
            perform_ratio_integration: true,
            minimum_ratio_for_color: -10.0,
            maximum_ratio_for_color: 10.0,
            protein_label: ProteinNodeLabel::default(),
            analysis_input_type: AnalysisInputType::default(),
            annotation_columns: Vec::new(),
            peptide_node_shape: Shape::Ellipse,
            peptide_node_height: 30,
            peptide_node_width: 70,
            protein_node_shape: Shape::RoundRectangle,
            protein_node_height: 30,
            protein_node_width: 70,
            colors: ColorManager::default(),
        }
    }
}

impl ExportParameters {
    pub fn with_output<P: Into<PathBuf>, S: Into<String>, T: Into<String>>(
        mut self,
        folder: P,
        prefix: S,
        suffix: T,
    ) -> Self {
        self.output_folder = folder.into();
        self.output_prefix = prefix.into();
        self.output_suffix = suffix.into();
        self
    }

    pub fn with_ratio_bounds(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum_ratio_for_color = minimum;
        self.maximum_ratio_for_color = maximum;
        self
    }

    pub fn with_significant_fdr_threshold(mut self, threshold: Option<f64>) -> Self {
        self.significant_fdr_threshold = threshold;
        self
    }

    pub fn with_colors(mut self, colors: ColorManager) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_protein_label(mut self, label: ProteinNodeLabel) -> Self {
        self.protein_label = label;
        self
    }

    pub fn with_classifications(mut self, apply: bool, show_cases_in_edges: bool) -> Self {
        self.apply_classifications_by_protein_pair = apply;
        self.show_cases_in_edges = show_cases_in_edges;
        self
    }

    /// Whether residue positions should be emphasized in annotated sequences
    pub fn highlights_sites(&self) -> bool {
        self.collapse_by_sites || self.collapse_by_ptms
    }

    /// The per-classification graphs are only meaningful when both peptides
    /// and proteins were collapsed
    pub fn exports_classifications(&self) -> bool {
        self.apply_classifications_by_protein_pair
            && self.collapse_indistinguishable_peptides
            && self.collapse_indistinguishable_proteins
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_classification_gate() {
        let params = ExportParameters::default();
        assert!(!params.exports_classifications());
        let mut params = params.with_classifications(true, false);
        assert!(params.exports_classifications());
        params.collapse_indistinguishable_proteins = false;
        assert!(!params.exports_classifications());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_partial() {
        let params: ExportParameters = serde_json::from_str(
            r##"{"output_prefix": "exp1", "colors": {"highlight": "#00FF00"}}"##,
        )
        .unwrap();
        assert_eq!(params.output_prefix, "exp1");
        assert_eq!(params.colors.highlight, crate::color::Color::GREEN);
        assert_eq!(params.maximum_ratio_for_color, 10.0);
    }
}
