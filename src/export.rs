//! The export driver: one XGMML document per pass over the protein clusters.
//!
//! A run writes the entire network, then the clusters holding a
//! significantly changing peptide node, then one document per classification
//! case when classifications are enabled. Every pass builds its graph from
//! scratch. A pass whose document cannot be written is logged and the
//! remaining passes still run.
use std::fmt::Display;
use std::path::{Path, PathBuf};

use log::{debug, error, info};
use thiserror::Error;

use crate::annotation::AnnotationSource;
use crate::graph::format::format_real;
use crate::graph::{ColorScaler, Graph, GraphBuilder};
use crate::io::xgmml::{write_xgmml, XGMMLWriterError};
use crate::model::{ClassificationCase, ModelError, ProteinCluster};
use crate::params::ExportParameters;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("The cluster model is inconsistent: {0}")]
    ModelError(#[from] ModelError),
    #[error("Failed to write the network: {0}")]
    WriterError(#[from] XGMMLWriterError),
}

/// One pass of an export run and the subset of clusters it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExportStage {
    /// Every cluster
    Full,
    /// Clusters with a peptide node that passes the FDR threshold or has an
    /// infinite ratio
    Significant,
    /// Clusters with a protein pair classified as the given case
    Classification(ClassificationCase),
}

impl Display for ExportStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Full => write!(f, "the entire network"),
            Self::Significant => write!(
                f,
                "the cluster containing a peptide node that is significantly changing"
            ),
            Self::Classification(case) => {
                write!(f, "case {}({})", case.case_id(), case.explanation())
            }
        }
    }
}

impl ExportStage {
    /// The passes of an export run configured by `params`, in the order they run.
    ///
    /// The no-evidence case never gets a document of its own.
    pub fn stages(params: &ExportParameters) -> Vec<ExportStage> {
        let mut stages = vec![Self::Full, Self::Significant];
        if params.exports_classifications() {
            stages.extend(
                ClassificationCase::ALL
                    .iter()
                    .copied()
                    .filter(|case| *case != ClassificationCase::NoEvidence)
                    .map(Self::Classification),
            );
        }
        stages
    }

    fn threshold_text(params: &ExportParameters) -> String {
        params
            .significant_fdr_threshold
            .map(format_real)
            .unwrap_or_default()
    }

    /// The label of the graph, also used as the network title
    pub fn label(&self, params: &ExportParameters) -> String {
        let prefix = &params.output_prefix;
        let suffix = &params.output_suffix;
        match self {
            Self::Full => format!("{prefix}_{suffix}"),
            Self::Significant => {
                format!("{prefix}_FDR{}_{suffix}", Self::threshold_text(params))
            }
            Self::Classification(case) => {
                format!("{prefix}_{}-{}_{suffix}", case.case_id(), case.name())
            }
        }
    }

    pub fn file_name(&self, params: &ExportParameters) -> String {
        let prefix = &params.output_prefix;
        let suffix = &params.output_suffix;
        match self {
            Self::Full => format!("{prefix}_cytoscape_ALL_{suffix}.xgmml"),
            Self::Significant => {
                let fdr = match params.significant_fdr_threshold {
                    Some(_) if params.perform_ratio_integration => {
                        format!("{}_", Self::threshold_text(params))
                    }
                    _ => String::new(),
                };
                format!("{prefix}_cytoscape_Significants_{fdr}{suffix}.xgmml")
            }
            Self::Classification(case) => format!(
                "{prefix}_cytoscape_{}-{}_{suffix}.xgmml",
                case.case_id(),
                case.name()
            ),
        }
    }

    pub fn output_path(&self, params: &ExportParameters) -> PathBuf {
        params.output_folder.join(self.file_name(params))
    }

    pub fn includes(&self, cluster: &ProteinCluster, params: &ExportParameters) -> bool {
        match self {
            Self::Full => true,
            Self::Significant => {
                cluster.is_significantly_regulated(params.significant_fdr_threshold)
            }
            Self::Classification(case) => cluster.has_classification(*case),
        }
    }
}

/// What an export run produced
#[derive(Debug, Default)]
pub struct ExportSummary {
    pub written: Vec<(ExportStage, PathBuf)>,
    /// Passes with no qualifying cluster, for which nothing was written
    pub skipped: Vec<ExportStage>,
    pub failed: Vec<(ExportStage, XGMMLWriterError)>,
}

impl ExportSummary {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn path_for(&self, stage: ExportStage) -> Option<&Path> {
        self.written
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, p)| p.as_path())
    }
}

/// Runs the passes of an export over a set of clusters
pub struct XGMMLExporter<'a> {
    params: &'a ExportParameters,
    annotations: &'a dyn AnnotationSource,
}

impl<'a> XGMMLExporter<'a> {
    pub fn new(params: &'a ExportParameters, annotations: &'a dyn AnnotationSource) -> Self {
        Self {
            params,
            annotations,
        }
    }

    pub fn params(&self) -> &ExportParameters {
        self.params
    }

    /// Build and color the graph of `stage`, or `None` if no cluster
    /// qualifies for it. The entire network is always built.
    pub fn build_graph(
        &self,
        stage: ExportStage,
        clusters: &[ProteinCluster],
    ) -> Result<Option<Graph>, ModelError> {
        let subset: Vec<&ProteinCluster> = clusters
            .iter()
            .filter(|cluster| stage.includes(cluster, self.params))
            .collect();
        if subset.is_empty() && stage != ExportStage::Full {
            debug!("No cluster qualifies for {stage}");
            return Ok(None);
        }
        info!("Creating XGMML for {stage}...");
        let mut builder = GraphBuilder::new(self.params, self.annotations);
        let mut graph = builder.build(&stage.label(self.params), subset)?;
        ColorScaler::new(self.params).scale(&mut graph);
        Ok(Some(graph))
    }

    /// Build, color and write the document of `stage`, returning where it was written
    pub fn export_stage(
        &self,
        stage: ExportStage,
        clusters: &[ProteinCluster],
    ) -> Result<Option<PathBuf>, ExportError> {
        let Some(graph) = self.build_graph(stage, clusters)? else {
            return Ok(None);
        };
        let path = stage.output_path(self.params);
        write_xgmml(&graph, &path)?;
        Ok(Some(path))
    }

    /// Run every pass. A document that cannot be written is recorded in the
    /// summary and does not stop the run, while an inconsistent cluster
    /// model aborts it.
    pub fn export(&self, clusters: &[ProteinCluster]) -> Result<ExportSummary, ModelError> {
        info!("Creating XGMML files for Cytoscape...");
        let mut summary = ExportSummary::default();
        for stage in ExportStage::stages(self.params) {
            match self.export_stage(stage, clusters) {
                Ok(Some(path)) => summary.written.push((stage, path)),
                Ok(None) => summary.skipped.push(stage),
                Err(ExportError::WriterError(e)) => {
                    error!("Failed to create the XGMML for {stage}: {e}");
                    summary.failed.push((stage, e));
                }
                Err(ExportError::ModelError(e)) => return Err(e),
            }
        }
        Ok(summary)
    }
}

/// A complete export request: parameters, the cluster model and the
/// protein annotations, as read by the command line driver
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportJob {
    pub parameters: ExportParameters,
    pub clusters: Vec<ProteinCluster>,
    pub annotations: std::collections::BTreeMap<String, crate::annotation::ProteinAnnotation>,
}

#[cfg(feature = "serde")]
impl ExportJob {
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    pub fn run(&self) -> Result<ExportSummary, ModelError> {
        XGMMLExporter::new(&self.parameters, &self.annotations).export(&self.clusters)
    }
}
