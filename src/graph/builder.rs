//! Traversal of the cluster model into a [`Graph`].
//!
//! Each protein pair is laid out as five groups: the peptides unique to the
//! first protein (U1), the first protein (P1), the peptides shared by both
//! (S12), the second protein (P2) and the peptides unique to it (U2). Nodes
//! and edges are deduplicated by the [`IdentityRegistry`], so a peptide shared
//! by several pairs is drawn once and accumulates what every pair says about it.
use std::collections::{BTreeSet, HashMap};

use log::{debug, trace};

use super::classification::{describe_for_protein, ClassificationAggregator};
use super::format::{format_number, format_number_more_decimals, format_text_more_decimals};
use super::registry::{IdentityRegistry, LabelShortener};
use super::sequence::{annotate, annotate_all};
use super::{
    Graph, GraphEdge, GraphNode, COUNT_RATIO, FINAL_RATIO, IS_FILTERED, IS_PROTEIN, PCQ_ID,
    SIGNIFICANT, VARIANCE, WEIGHT,
};
use crate::annotation::AnnotationSource;
use crate::color::Color;
use crate::model::{
    AlignmentResult, ClassificationCase, IonCountRatio, ModelError, PeptideAlignment,
    PeptideNode, PeptideNodeIx, ProteinCluster, ProteinNode, ProteinNodeIx, ProteinPair, QuantNode,
    QuantifiedPeptide, RepresentativeRatio, PEPTIDE_SEQUENCE_SEPARATOR, PROTEIN_ACC_SEPARATOR,
    PROTEIN_DESCRIPTION_SEPARATOR,
};
use crate::params::{AnalysisInputType, ExportParameters, ProteinNodeLabel};

/// Which groups of a protein pair's peptide evidence disagree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Inconsistency {
    shared: bool,
    unique_1: bool,
    unique_2: bool,
}

impl From<&ProteinPair> for Inconsistency {
    fn from(pair: &ProteinPair) -> Self {
        Self {
            shared: pair.shared_peptides_inconsistent,
            unique_1: pair.unique_peptides_protein_1_inconsistent,
            unique_2: pair.unique_peptides_protein_2_inconsistent,
        }
    }
}

fn species<S: AsRef<str>, I: IntoIterator<Item = S>>(taxonomies: I) -> String {
    taxonomies
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn flag_string(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

fn plural(count: usize) -> &'static str {
    if count > 1 {
        "s"
    } else {
        ""
    }
}

/// `Ion count ratio Rc = v = log2( (a/b + ...) / (c/d + ...) )` over the
/// isobarically quantified members of a node
fn ion_count_line(ratio: &IonCountRatio, peptides: &[(&QuantifiedPeptide, Option<&[usize]>)]) -> String {
    let mut numerator = Vec::new();
    let mut denominator = Vec::new();
    for (peptide, _) in peptides.iter().filter(|(p, _)| p.is_isobaric()) {
        let term = |ions: Option<u32>| match ions {
            Some(n) => format!("{}/{}", n, peptide.psm_count),
            None => "0".to_string(),
        };
        numerator.push(term(peptide.ions_1));
        denominator.push(term(peptide.ions_2));
    }
    format!(
        "Ion count ratio Rc = {} = log2( ({}) / ({}) )",
        format_number_more_decimals(ratio.log2_ratio()),
        numerator.join(" + "),
        denominator.join(" + ")
    )
}

fn alignment_tooltip(result: &AlignmentResult) -> String {
    format!(
        "<b>Alignment Score=</b>{}\n<b>peptide 1:</b>{}\n<b>peptide 2:</b>{}\n<b>Lenth of alignment=</b>{}\n<b>Identical segment length=</b>{}\n<b>Identity=</b>{}%\n<b>Max consecutive identity=</b>{}\n<b>Alignment string=</b>\n{}",
        result.score,
        result.sequence_1,
        result.sequence_2,
        result.alignment_length,
        result.identical_length,
        format_number(result.sequence_identity * 100.0),
        result.max_consecutive_identical,
        result.alignment_string,
    )
}

fn set_alignment_attributes(edge: &mut GraphEdge, result: &AlignmentResult) {
    edge.set_attribute("Alignment score", result.score);
    edge.set_attribute("Alignment length", result.alignment_length);
    edge.set_attribute("Alignment identity", result.sequence_identity);
    edge.set_attribute("Alignment identical length", result.identical_length);
    edge.set_attribute(
        "Alignment segment maximum length",
        result.max_consecutive_identical,
    );
    edge.set_attribute("Homology connection", "true");
}

/// The parts of a protein tooltip that do not depend on classification. The
/// cases are only known once every pair of the pass has been visited.
#[derive(Debug, Clone, Default)]
struct ProteinTooltip {
    head: String,
    tail: String,
}

impl ProteinTooltip {
    fn render(&self, cases: &BTreeSet<ClassificationCase>) -> String {
        let mut text = self.head.clone();
        if !cases.is_empty() {
            text.push_str("\n<b>Classification case(s):</b>\n");
            text.push_str(&describe_for_protein(cases));
        }
        text.push_str(&self.tail);
        text
    }
}

/// The attributes shared by protein and peptide nodes
fn set_common_attributes<N: QuantNode>(node: &mut GraphNode, quant: &N) {
    node.set_attribute("shared name", quant.key());
    node.set_attribute(IS_FILTERED, quant.is_discarded());
    node.set_attribute(IS_PROTEIN, quant.is_protein());
    node.set_attribute("containsPTMs", quant.contains_ptms());
}

/// Fills in the attributes, graphics and tooltip of newly created nodes
#[derive(Clone, Copy)]
struct NodeRenderer<'a> {
    params: &'a ExportParameters,
    annotations: &'a dyn AnnotationSource,
}

impl<'a> NodeRenderer<'a> {
    /// A ratio is significant when its FDR passes the configured threshold or
    /// when it is infinite, whatever its score.
    fn is_significant(&self, ratio: Option<RepresentativeRatio<'_>>) -> bool {
        match ratio {
            Some(ratio) => {
                let passes = ratio
                    .confidence_score()
                    .map(|s| s.passes_fdr(self.params.significant_fdr_threshold))
                    .unwrap_or(false);
                passes || ratio.log2_ratio().is_infinite()
            }
            None => false,
        }
    }

    fn fill_peptide_node(
        &self,
        node: &mut GraphNode,
        cluster: &ProteinCluster,
        ix: PeptideNodeIx,
    ) -> Result<(), ModelError> {
        let params = self.params;
        let peptide = cluster.peptide_node(ix)?;
        let num_proteins = cluster.individual_proteins(ix)?.len();
        let taxonomies = cluster.peptide_taxonomies(ix)?;
        let representative = peptide.representative_ratio();
        let log2_ratio = representative.map(|r| r.log2_ratio());
        let significant = self.is_significant(representative);

        node.label = peptide.key.clone();
        node.set_attribute("PeptideSequences", peptide.full_sequence());
        node.set_attribute(PCQ_ID, peptide.key.as_str());
        set_common_attributes(node, peptide);
        node.set_attribute("numProteins", num_proteins);
        node.set_attribute("numPsms", peptide.psm_count());
        node.set_attribute("numMSRuns", peptide.ms_runs().len());
        node.set_attribute("numReplicates", peptide.replicates().len());
        node.set_attribute("numPeptideSequences", peptide.num_items());
        node.set_attribute("numConnectedProteinNodes", peptide.protein_nodes.len());
        if !taxonomies.is_empty() {
            node.set_attribute("Species", species(&taxonomies));
        }
        node.set_attribute("ionCount", peptide.ion_count());
        if let Some(value) = log2_ratio {
            node.set_attribute(FINAL_RATIO, value);
        }
        if params.analysis_input_type == AnalysisInputType::CensusChro {
            if let Some(ratio) = &peptide.consensus_ratio {
                node.set_attribute("Ri", ratio.log2_ratio);
            }
            if let Some(ratio) = &peptide.ion_count_ratio {
                node.set_attribute("Rc", ratio.log2_ratio());
            }
        }
        if let Some(representative) = representative {
            if let RepresentativeRatio::IonCount(ratio) = representative {
                if !ratio.ratio.is_nan() {
                    node.set_attribute("normLightIons", ratio.ion_count_1);
                    node.set_attribute("normHeavyIons", ratio.ion_count_2);
                }
            }
            node.set_attribute("lightIons", peptide.ions_1());
            node.set_attribute("heavyIons", peptide.ions_2());
            if let Some(score) = representative.confidence_score() {
                match score.numeric_value() {
                    Some(value) => node.set_attribute(score.name.clone(), value),
                    None => node.set_attribute(score.name.clone(), score.value.as_str()),
                }
            }
        }
        node.set_attribute(SIGNIFICANT, significant);
        if let Some(confidence) = peptide.confidence_value {
            node.set_attribute(WEIGHT, confidence);
            node.set_attribute(VARIANCE, 1.0 / confidence);
        }
        node.set_attribute("uniquePeptide", num_proteins <= 1);
        node.set_attribute("uniquePeptideNode", peptide.protein_nodes.len() <= 1);

        let mut label = log2_ratio
            .map(format_number)
            .unwrap_or_else(|| "N/A".to_string());
        if significant {
            label.push('*');
        }

        let colors = &params.colors;
        let graphics = &mut node.graphics;
        graphics.label = label;
        graphics.shape = params.peptide_node_shape;
        graphics.height = params.peptide_node_height;
        graphics.width = params.peptide_node_width;
        graphics.fill = colors.default_peptide_fill;
        graphics.label_color = Color::BLACK;
        if peptide.is_discarded() {
            graphics.fill = colors.discarded_node_fill;
            graphics.label_color = colors.discarded_node_label;
        }

        node.tooltip = self.peptide_tooltip(cluster, ix)?;
        Ok(())
    }

    fn peptide_tooltip(&self, cluster: &ProteinCluster, ix: PeptideNodeIx) -> Result<String, ModelError> {
        let peptide = cluster.peptide_node(ix)?;
        let highlight_sites = self.params.highlights_sites();
        let sequences = peptide.peptides_with_positions()?;
        let full_sequence = peptide.full_sequence();

        let mut text = String::new();
        if peptide.discarded {
            text.push_str("<b>Peptide node discarded by applied filters</b>\n");
        }
        if peptide.key != full_sequence {
            text.push_str(&annotate(&peptide.key, None, highlight_sites));
            text.push('\n');
        }
        let annotated = if self.params.collapse_by_sites {
            annotate_all(
                sequences
                    .iter()
                    .map(|(p, positions)| (p.full_sequence.as_str(), *positions)),
                highlight_sites,
            )
        } else {
            annotate(&full_sequence, None, highlight_sites)
        };
        text.push_str(&annotated);
        text.push('\n');

        text.push_str(&format!(
            "{} Peptide sequences\n{} PSMs\nShared by {} protein Nodes\nShared by {} proteins\nDetected in {} MS runs\nDetected in {} Replicates\n",
            peptide.peptides.len(),
            peptide.psm_count(),
            peptide.protein_nodes.len(),
            cluster.individual_proteins(ix)?.len(),
            peptide.ms_runs().len(),
            peptide.replicates().len(),
        ));
        if let Some(confidence) = peptide.confidence_value {
            text.push_str(&format!(
                "{WEIGHT} = {}\n{VARIANCE} = {}\n",
                format_number_more_decimals(confidence),
                format_number_more_decimals(1.0 / confidence)
            ));
        }

        match peptide.representative_ratio() {
            Some(representative) => {
                match representative {
                    RepresentativeRatio::IonCount(ratio) => {
                        text.push_str(&ion_count_line(ratio, &sequences));
                        text.push('\n');
                    }
                    RepresentativeRatio::Consensus(ratio) => {
                        text.push_str(&format!(
                            "{} = {}\n",
                            ratio.description_or_default(),
                            format_number(ratio.log2_ratio)
                        ));
                        if let Some(ion_count) = &peptide.ion_count_ratio {
                            text.push_str(&ion_count_line(ion_count, &sequences));
                            text.push('\n');
                        }
                    }
                }
                if let Some(score) = representative.confidence_score() {
                    text.push_str(&format!(
                        "{} = {}\n",
                        score.name,
                        format_text_more_decimals(&score.value)
                    ));
                }
            }
            None => text.push_str("No ratio calculated\n"),
        }

        text.push_str("Individual peptides in the node: \n");
        for (member, positions) in sequences.iter() {
            text.push_str(&annotate(&member.full_sequence, *positions, highlight_sites));
            text.push_str(&format!(
                ", {} PSMs, Shared by {} proteins, Detected in {} MS Runs, Detected in {} replicates",
                member.psm_count,
                member.protein_count,
                member.ms_runs.len(),
                member.replicates.len()
            ));
            if let Some(ratio) = &member.consensus_ratio {
                text.push_str(&format!(
                    ", {} = {}",
                    ratio.description_or_default(),
                    format_number_more_decimals(ratio.log2_ratio)
                ));
                if let Some(score) = &ratio.confidence_score {
                    text.push_str(&format!(
                        ", {} = {}",
                        score.name,
                        format_text_more_decimals(&score.value)
                    ));
                }
            }
            let singletons = member.singleton_psm_count;
            let non_singletons = member.non_singleton_psm_count();
            if singletons > 0 {
                text.push_str(&format!(" ,<b>{singletons} singleton{}", plural(singletons)));
                if non_singletons > 0 {
                    text.push_str(&format!(
                        " and {non_singletons} non singleton{}",
                        plural(non_singletons)
                    ));
                }
                text.push_str("</b>");
            }
            text.push('\n');
        }

        let taxonomies = cluster.peptide_taxonomies(ix)?;
        if !taxonomies.is_empty() {
            text.push_str("\n<b>TAX:</b> ");
            text.push_str(&species(&taxonomies));
        }
        Ok(text)
    }

    /// The known gene names of the proteins in the node, or `None` if there is none
    fn gene_string(&self, protein: &ProteinNode) -> Option<String> {
        let mut genes: Vec<&str> = Vec::new();
        for acc in protein.accessions.iter() {
            if let Some(gene) = self.annotations.gene(acc) {
                if !genes.contains(&gene) {
                    genes.push(gene);
                }
            }
        }
        if genes.is_empty() {
            None
        } else {
            Some(genes.join(PROTEIN_ACC_SEPARATOR))
        }
    }

    fn protein_names(&self, protein: &ProteinNode) -> String {
        protein
            .accessions
            .iter()
            .map(|acc| self.annotations.protein_name(acc))
            .collect::<Vec<_>>()
            .join(PROTEIN_ACC_SEPARATOR)
    }

    fn protein_label(&self, protein: &ProteinNode) -> String {
        match self.params.protein_label {
            ProteinNodeLabel::Accession => protein.key.clone(),
            ProteinNodeLabel::Id => self.protein_names(protein),
            ProteinNodeLabel::Gene => {
                let mut genes: Vec<&str> = Vec::new();
                for acc in protein.accessions.iter() {
                    let gene = self.annotations.gene_name(acc);
                    if !genes.contains(&gene) {
                        genes.push(gene);
                    }
                }
                let genes = genes.join(PROTEIN_ACC_SEPARATOR);
                if !self.params.collapse_by_ptms {
                    return genes;
                }
                let mut label = protein.key.replace(&protein.accession_string(), &genes);
                if let [code] = self.params.ptm_codes.as_slice() {
                    label = label.replace(&format!("({code})"), "");
                }
                label
            }
        }
    }

    fn taxonomy_fill(&self, protein: &ProteinNode) -> Color {
        let colors = &self.params.colors;
        if protein.is_discarded() {
            return colors.discarded_node_fill;
        }
        let mut taxonomies = protein.taxonomies.iter();
        match (taxonomies.next(), protein.taxonomies.len()) {
            (None, _) => Color::WHITE,
            (Some(taxonomy), 1) => colors.color_for_taxonomy(taxonomy),
            (Some(_), _) => colors.multi_taxonomy.unwrap_or(Color::WHITE),
        }
    }

    fn fill_protein_node(
        &self,
        node: &mut GraphNode,
        cluster: &ProteinCluster,
        ix: ProteinNodeIx,
        labels: &mut LabelShortener,
    ) -> Result<ProteinTooltip, ModelError> {
        let params = self.params;
        let protein = cluster.protein_node(ix)?;
        let sequences = cluster.protein_peptide_sequences(ix)?;

        node.set_attribute("UniprotKB", protein.key.as_str());
        set_common_attributes(node, protein);
        node.set_attribute("numProteins", protein.num_items());
        node.set_attribute("numPeptideSequencesInProteins", sequences.len());
        node.set_attribute("numPsmsInProtein", cluster.protein_psm_count(ix)?);
        node.set_attribute("numConnectedPeptideNodes", protein.peptide_nodes.len());

        let mut annotation_lines = String::new();
        for column in params.annotation_columns.iter() {
            let values = self
                .annotations
                .column_values(column, &protein.accessions)
                .join(", ");
            annotation_lines.push_str(&format!("\n<b>{column}:</b> {values}"));
            node.set_attribute(column.as_str(), values);
        }

        node.set_attribute(
            "ProteinDescription",
            protein.description().replace(
                PROTEIN_DESCRIPTION_SEPARATOR,
                &format!(" {PROTEIN_DESCRIPTION_SEPARATOR} "),
            ),
        );
        if !protein.taxonomies.is_empty() {
            node.set_attribute("Species", species(&protein.taxonomies));
        }
        let genes = self.gene_string(protein);
        if let Some(genes) = &genes {
            node.set_attribute("GeneName", genes.as_str());
        }
        node.set_attribute("ID", self.protein_names(protein));
        node.set_attribute("ACC", protein.key.as_str());
        let conclusive_node = !cluster.unique_peptide_nodes(ix, None, true)?.is_empty();
        node.set_attribute("conclusiveProteinNode", flag_string(conclusive_node));
        node.set_attribute("conclusiveProtein", flag_string(sequences.len() == 1));

        let label = labels.shorten(&self.protein_label(protein));
        node.label = label.clone();
        let graphics = &mut node.graphics;
        graphics.label = label;
        graphics.shape = params.protein_node_shape;
        graphics.height = params.protein_node_height;
        graphics.width = params.protein_node_width;
        graphics.fill = self.taxonomy_fill(protein);
        graphics.label_color = Color::BLACK;

        let head = format!(
            "<b>Protein ACC(s):</b>\n{}\n<b>Protein name(s):</b>\n {}",
            protein.key.replace(PROTEIN_ACC_SEPARATOR, "\n"),
            protein.description().replace(PROTEIN_DESCRIPTION_SEPARATOR, "\n")
        );
        let mut tail = String::new();
        if !protein.taxonomies.is_empty() {
            tail.push_str(&format!(
                "\n<b>TAX:</b> {}\n<b>Gene name:</b> {}",
                species(&protein.taxonomies),
                genes.as_deref().unwrap_or_default()
            ));
        }
        tail.push_str(&annotation_lines);
        Ok(ProteinTooltip { head, tail })
    }
}

/// Builds one [`Graph`] per export pass from a set of [`ProteinCluster`]s.
///
/// All identity state lives in the builder and is reset at the start of
/// every [`GraphBuilder::build`] call.
pub struct GraphBuilder<'a> {
    renderer: NodeRenderer<'a>,
    registry: IdentityRegistry,
    labels: LabelShortener,
    aggregator: ClassificationAggregator,
    protein_tooltips: HashMap<String, ProteinTooltip>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(params: &'a ExportParameters, annotations: &'a dyn AnnotationSource) -> Self {
        Self {
            renderer: NodeRenderer {
                params,
                annotations,
            },
            registry: IdentityRegistry::new(),
            labels: LabelShortener::default(),
            aggregator: ClassificationAggregator::new(params.show_cases_in_edges),
            protein_tooltips: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    /// Discard everything registered so far
    pub fn reset(&mut self) {
        self.registry.reset();
        self.labels.reset();
        self.protein_tooltips.clear();
    }

    /// Build the graph of `clusters` from scratch
    pub fn build<'c, I>(&mut self, label: &str, clusters: I) -> Result<Graph, ModelError>
    where
        I: IntoIterator<Item = &'c ProteinCluster>,
    {
        self.reset();
        for cluster in clusters {
            self.add_cluster(cluster)?;
        }
        Ok(self.finish(label))
    }

    /// Add the nodes and edges of `cluster` to the graph under construction
    pub fn add_cluster(&mut self, cluster: &ProteinCluster) -> Result<(), ModelError> {
        if cluster.protein_pairs.is_empty() {
            for ix in cluster.protein_node_indices() {
                self.add_protein_group(cluster, ix, None, Inconsistency::default(), &[])?;
            }
        } else {
            for pair in cluster.protein_pairs.iter() {
                self.add_protein_group(
                    cluster,
                    pair.protein_node_1,
                    Some(pair.protein_node_2),
                    pair.into(),
                    &pair.classification_cases,
                )?;
            }
            for ix in cluster.unpaired_protein_nodes() {
                self.add_protein_group(cluster, ix, None, Inconsistency::default(), &[])?;
            }
        }
        for alignment in cluster.alignments.iter() {
            self.add_alignment(cluster, alignment)?;
        }
        Ok(())
    }

    /// Move everything registered into a new graph labelled `label`
    pub fn finish(&mut self, label: &str) -> Graph {
        for node in self.registry.nodes_mut() {
            if let Some(tooltip) = self.protein_tooltips.get(&node.id) {
                node.tooltip = tooltip.render(&node.cases);
            }
        }
        let mut graph = Graph::new(label);
        self.registry.drain_into(&mut graph);
        self.reset();
        debug!(
            "Built {label} with {} nodes and {} edges",
            graph.nodes.len(),
            graph.edges.len()
        );
        graph
    }

    fn visit_peptide_node(
        &mut self,
        cluster: &ProteinCluster,
        ix: PeptideNodeIx,
        highlight: bool,
    ) -> Result<(), ModelError> {
        let renderer = self.renderer;
        let peptide = cluster.peptide_node(ix)?;
        let (node, created) = self.registry.get_or_create_node(peptide.key());
        if created {
            renderer.fill_peptide_node(node, cluster, ix)?;
        }
        if highlight {
            node.highlight(renderer.params.colors.highlight);
        }
        Ok(())
    }

    fn visit_protein_node(
        &mut self,
        cluster: &ProteinCluster,
        ix: ProteinNodeIx,
        highlight: bool,
        cases: &[ClassificationCase],
    ) -> Result<(), ModelError> {
        let renderer = self.renderer;
        let protein = cluster.protein_node(ix)?;
        let (node, created) = self.registry.get_or_create_node(protein.key());
        if created {
            let tooltip = renderer.fill_protein_node(node, cluster, ix, &mut self.labels)?;
            self.protein_tooltips.insert(protein.key.clone(), tooltip);
        }
        if highlight {
            node.highlight(renderer.params.colors.highlight);
        }
        self.aggregator.merge_into_node(node, cases);
        Ok(())
    }

    /// Register the edge between a protein node and one of its peptide
    /// nodes. `peptide_first` puts the peptide at the source end.
    fn link(
        &mut self,
        protein_key: &str,
        peptide: &PeptideNode,
        peptide_first: bool,
        highlight: bool,
        cases: &[ClassificationCase],
    ) {
        let colors = &self.renderer.params.colors;
        let (source, target) = if peptide_first {
            (peptide.key.as_str(), protein_key)
        } else {
            (protein_key, peptide.key.as_str())
        };
        let (edge, created) = self.registry.get_or_create_edge(source, target);
        if created {
            edge.set_attribute(PCQ_ID, format!("{protein_key}-{}", peptide.key));
            if let Some(ratio) = &peptide.consensus_ratio {
                edge.set_attribute(COUNT_RATIO, ratio.log2_ratio);
            }
            edge.paint(colors.default_edge);
        }
        if highlight {
            edge.highlight(colors.highlight);
        }
        self.aggregator.merge_into_edge(edge, cases);
    }

    fn add_protein_group(
        &mut self,
        cluster: &ProteinCluster,
        protein_1: ProteinNodeIx,
        protein_2: Option<ProteinNodeIx>,
        inconsistency: Inconsistency,
        cases: &[ClassificationCase],
    ) -> Result<(), ModelError> {
        let remove_filtered = self.renderer.params.remove_filtered_nodes;
        let key_1 = cluster.protein_node(protein_1)?.key.as_str();
        let key_2 = match protein_2 {
            Some(ix) => Some(cluster.protein_node(ix)?.key.as_str()),
            None => None,
        };
        trace!("Visiting protein group {key_1} / {key_2:?}");

        // U1
        let unique_1 = cluster.unique_peptide_nodes(protein_1, protein_2, remove_filtered)?;
        for ix in unique_1.iter() {
            self.visit_peptide_node(cluster, *ix, inconsistency.unique_1)?;
        }
        // P1
        self.visit_protein_node(
            cluster,
            protein_1,
            inconsistency.unique_1 || inconsistency.shared,
            cases,
        )?;
        for ix in unique_1 {
            let peptide = cluster.peptide_node(ix)?;
            self.link(key_1, peptide, true, inconsistency.unique_1, cases);
        }

        // S12
        let shared = cluster.shared_peptide_nodes(protein_1, protein_2, remove_filtered)?;
        for ix in shared {
            self.visit_peptide_node(cluster, ix, inconsistency.shared)?;
            let peptide = cluster.peptide_node(ix)?;
            self.link(key_1, peptide, false, inconsistency.shared, cases);
            if let Some(key_2) = key_2 {
                self.link(key_2, peptide, false, inconsistency.shared, cases);
            }
        }

        // P2 and U2
        if let (Some(protein_2), Some(key_2)) = (protein_2, key_2) {
            self.visit_protein_node(
                cluster,
                protein_2,
                inconsistency.unique_2 || inconsistency.shared,
                cases,
            )?;
            let unique_2 = cluster.unique_peptide_nodes(protein_2, Some(protein_1), remove_filtered)?;
            for ix in unique_2 {
                self.visit_peptide_node(cluster, ix, inconsistency.unique_2)?;
                let peptide = cluster.peptide_node(ix)?;
                self.link(key_2, peptide, false, inconsistency.unique_2, cases);
            }
        }
        Ok(())
    }

    fn add_alignment(
        &mut self,
        cluster: &ProteinCluster,
        alignment: &PeptideAlignment,
    ) -> Result<(), ModelError> {
        let key_1 = cluster.peptide_node(alignment.peptide_node_1)?.key.as_str();
        let key_2 = cluster.peptide_node(alignment.peptide_node_2)?.key.as_str();
        if !(self.registry.contains_node(key_1) && self.registry.contains_node(key_2)) {
            trace!("Skipping the alignment of {key_1} and {key_2}, one of them is not in the graph");
            return Ok(());
        }
        let color = self.renderer.params.colors.aligned_peptides_edge;
        let (edge, created) = self.registry.get_or_create_edge(key_1, key_2);
        if created {
            let mut keys = [key_1, key_2];
            keys.sort();
            edge.set_attribute(PCQ_ID, keys.join(PEPTIDE_SEQUENCE_SEPARATOR));
            set_alignment_attributes(edge, &alignment.result);
            edge.tooltip = Some(alignment_tooltip(&alignment.result));
            edge.paint(color);
        }
        Ok(())
    }
}
