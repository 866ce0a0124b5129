//! The already-computed cluster model the exporter consumes: protein and
//! peptide nodes, the protein pairs compared within each cluster, their
//! classification and the ratios between the two compared conditions.
use thiserror::Error;

pub mod classification;
pub mod cluster;
pub mod node;
pub mod ratio;

pub use crate::model::classification::{ClassificationCase, UnknownClassificationCase};
pub use crate::model::cluster::{AlignmentResult, PeptideAlignment, ProteinCluster, ProteinPair};
pub use crate::model::node::{
    PeptideNode, PeptideNodeIx, ProteinNode, ProteinNodeIx, QuantNode, QuantifiedPeptide,
    PEPTIDE_SEQUENCE_SEPARATOR, PROTEIN_ACC_SEPARATOR, PROTEIN_DESCRIPTION_SEPARATOR,
};
pub use crate::model::ratio::{
    ConfidenceScore, IonCountRatio, Ratio, RepresentativeRatio, FDR_CONFIDENCE_SCORE_NAME,
};

/// Violations of the structural contract of the input model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("The peptide {sequence} is not in the peptide node {node_key}")]
    PeptideNotInNode { sequence: String, node_key: String },
    #[error("The cluster has no {0}")]
    DanglingProteinNode(ProteinNodeIx),
    #[error("The cluster has no {0}")]
    DanglingPeptideNode(PeptideNodeIx),
}
