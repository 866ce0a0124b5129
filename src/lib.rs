//! Build protein/peptide quantification networks from an already computed
//! cluster model and export them as XGMML documents for Cytoscape.
//!
//! The pipeline runs once per export pass: [`GraphBuilder`] walks the
//! clusters into a [`Graph`], [`ColorScaler`] colors its nodes by ratio and
//! [`io::xgmml`] writes it out. [`XGMMLExporter`] drives the passes.
pub mod annotation;
pub mod color;
pub mod export;
pub mod graph;
pub mod io;
pub mod model;
pub mod params;

pub use crate::annotation::{AnnotationSource, NoAnnotations, ProteinAnnotation};
pub use crate::color::{Color, ColorManager};

pub use crate::export::{ExportError, ExportStage, ExportSummary, XGMMLExporter};
#[cfg(feature = "serde")]
pub use crate::export::ExportJob;

pub use crate::graph::{ColorScaler, Graph, GraphBuilder, GraphEdge, GraphNode};
pub use crate::io::xgmml::{write_xgmml, XGMMLWriter, XGMMLWriterError};

pub use crate::model::{
    ClassificationCase, ModelError, PeptideNode, ProteinCluster, ProteinNode, ProteinPair,
    QuantifiedPeptide, Ratio,
};
pub use crate::params::{ExportParameters, ProteinNodeLabel};
