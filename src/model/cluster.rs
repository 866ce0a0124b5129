use std::collections::BTreeSet;

use super::classification::ClassificationCase;
use super::node::{PeptideNode, PeptideNodeIx, ProteinNode, ProteinNodeIx};
use super::ModelError;

/// The outcome of aligning two peptide sequences
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct AlignmentResult {
    pub score: i32,
    pub sequence_1: String,
    pub sequence_2: String,
    pub alignment_length: usize,
    pub identical_length: usize,
    /// The fraction of identical positions, between 0 and 1
    pub sequence_identity: f64,
    pub max_consecutive_identical: usize,
    pub alignment_string: String,
}

/// Two peptide nodes that were found to be similar by sequence alignment
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeptideAlignment {
    pub peptide_node_1: PeptideNodeIx,
    pub peptide_node_2: PeptideNodeIx,
    pub result: AlignmentResult,
}

/// Two protein nodes of a cluster compared for ratio consistency
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProteinPair {
    pub protein_node_1: ProteinNodeIx,
    pub protein_node_2: ProteinNodeIx,
    pub shared_peptides_inconsistent: bool,
    pub unique_peptides_protein_1_inconsistent: bool,
    pub unique_peptides_protein_2_inconsistent: bool,
    pub classification_cases: Vec<ClassificationCase>,
}

impl ProteinPair {
    pub fn new(protein_node_1: ProteinNodeIx, protein_node_2: ProteinNodeIx) -> Self {
        Self {
            protein_node_1,
            protein_node_2,
            shared_peptides_inconsistent: false,
            unique_peptides_protein_1_inconsistent: false,
            unique_peptides_protein_2_inconsistent: false,
            classification_cases: Vec::new(),
        }
    }

    pub fn with_cases<I: IntoIterator<Item = ClassificationCase>>(mut self, cases: I) -> Self {
        self.classification_cases.extend(cases);
        self
    }

    pub fn contains(&self, protein_node: ProteinNodeIx) -> bool {
        self.protein_node_1 == protein_node || self.protein_node_2 == protein_node
    }
}

/// A connected group of protein nodes linked by shared peptide evidence.
///
/// Nodes refer to each other by index into this cluster's node lists.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct ProteinCluster {
    pub protein_nodes: Vec<ProteinNode>,
    pub peptide_nodes: Vec<PeptideNode>,
    pub protein_pairs: Vec<ProteinPair>,
    pub alignments: Vec<PeptideAlignment>,
}

impl ProteinCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_protein_node(&mut self, node: ProteinNode) -> ProteinNodeIx {
        let ix = ProteinNodeIx(self.protein_nodes.len() as u32);
        self.protein_nodes.push(node);
        ix
    }

    pub fn add_peptide_node(&mut self, node: PeptideNode) -> PeptideNodeIx {
        let ix = PeptideNodeIx(self.peptide_nodes.len() as u32);
        self.peptide_nodes.push(node);
        ix
    }

    /// Record that `peptide` is evidence for `protein`, in both directions
    pub fn link(&mut self, protein: ProteinNodeIx, peptide: PeptideNodeIx) -> Result<(), ModelError> {
        self.peptide_node(peptide)?;
        let prot = self
            .protein_nodes
            .get_mut(protein.0 as usize)
            .ok_or(ModelError::DanglingProteinNode(protein))?;
        if !prot.peptide_nodes.contains(&peptide) {
            prot.peptide_nodes.push(peptide);
        }
        let pep = &mut self.peptide_nodes[peptide.0 as usize];
        if !pep.protein_nodes.contains(&protein) {
            pep.protein_nodes.push(protein);
        }
        Ok(())
    }

    pub fn add_pair(&mut self, pair: ProteinPair) {
        self.protein_pairs.push(pair);
    }

    pub fn add_alignment(
        &mut self,
        peptide_node_1: PeptideNodeIx,
        peptide_node_2: PeptideNodeIx,
        result: AlignmentResult,
    ) {
        self.alignments.push(PeptideAlignment {
            peptide_node_1,
            peptide_node_2,
            result,
        });
    }

    pub fn protein_node(&self, ix: ProteinNodeIx) -> Result<&ProteinNode, ModelError> {
        self.protein_nodes
            .get(ix.0 as usize)
            .ok_or(ModelError::DanglingProteinNode(ix))
    }

    pub fn peptide_node(&self, ix: PeptideNodeIx) -> Result<&PeptideNode, ModelError> {
        self.peptide_nodes
            .get(ix.0 as usize)
            .ok_or(ModelError::DanglingPeptideNode(ix))
    }

    pub fn protein_node_indices(&self) -> impl Iterator<Item = ProteinNodeIx> {
        (0..self.protein_nodes.len() as u32).map(ProteinNodeIx)
    }

    fn keep_peptide_node(&self, ix: PeptideNodeIx, remove_filtered: bool) -> Result<bool, ModelError> {
        Ok(!(remove_filtered && self.peptide_node(ix)?.discarded))
    }

    fn sort_by_key(&self, mut nodes: Vec<PeptideNodeIx>) -> Result<Vec<PeptideNodeIx>, ModelError> {
        for ix in nodes.iter() {
            self.peptide_node(*ix)?;
        }
        nodes.sort_by(|a, b| {
            let ka = &self.peptide_nodes[a.0 as usize].key;
            let kb = &self.peptide_nodes[b.0 as usize].key;
            ka.cmp(kb).then(a.cmp(b))
        });
        nodes.dedup();
        Ok(nodes)
    }

    /// The peptide nodes of `protein` that are not evidence for `other`.
    ///
    /// When `other` is `None`, these are the peptide nodes connected to no
    /// protein node but `protein`. The result is ordered by node key.
    pub fn unique_peptide_nodes(
        &self,
        protein: ProteinNodeIx,
        other: Option<ProteinNodeIx>,
        remove_filtered: bool,
    ) -> Result<Vec<PeptideNodeIx>, ModelError> {
        let node = self.protein_node(protein)?;
        let mut acc = Vec::new();
        for ix in node.peptide_nodes.iter().copied() {
            let peptide = self.peptide_node(ix)?;
            let unique = match other {
                Some(other) => !peptide.protein_nodes.contains(&other),
                None => peptide.protein_nodes.iter().all(|p| *p == protein),
            };
            if unique && self.keep_peptide_node(ix, remove_filtered)? {
                acc.push(ix);
            }
        }
        self.sort_by_key(acc)
    }

    /// The peptide nodes of `protein` that are also evidence for `other`.
    ///
    /// When `other` is `None`, these are the peptide nodes of `protein` that
    /// are connected to any other protein node. The result is ordered by node key.
    pub fn shared_peptide_nodes(
        &self,
        protein: ProteinNodeIx,
        other: Option<ProteinNodeIx>,
        remove_filtered: bool,
    ) -> Result<Vec<PeptideNodeIx>, ModelError> {
        let node = self.protein_node(protein)?;
        let mut acc = Vec::new();
        for ix in node.peptide_nodes.iter().copied() {
            let peptide = self.peptide_node(ix)?;
            let shared = match other {
                Some(other) => peptide.protein_nodes.contains(&other),
                None => peptide.protein_nodes.iter().any(|p| *p != protein),
            };
            if shared && self.keep_peptide_node(ix, remove_filtered)? {
                acc.push(ix);
            }
        }
        self.sort_by_key(acc)
    }

    /// Protein nodes that take part in no protein pair, usually because their
    /// partner was discarded upstream
    pub fn unpaired_protein_nodes(&self) -> Vec<ProteinNodeIx> {
        self.protein_node_indices()
            .filter(|ix| !self.protein_pairs.iter().any(|pair| pair.contains(*ix)))
            .collect()
    }

    /// The distinct protein accessions a peptide node is evidence for
    pub fn individual_proteins(&self, peptide: PeptideNodeIx) -> Result<BTreeSet<&str>, ModelError> {
        let node = self.peptide_node(peptide)?;
        let mut acc = BTreeSet::new();
        for ix in node.protein_nodes.iter() {
            let prot = self.protein_node(*ix)?;
            acc.extend(prot.accessions.iter().map(|s| s.as_str()));
        }
        Ok(acc)
    }

    /// The taxonomies of the proteins a peptide node is evidence for
    pub fn peptide_taxonomies(&self, peptide: PeptideNodeIx) -> Result<BTreeSet<&str>, ModelError> {
        let node = self.peptide_node(peptide)?;
        let mut acc = BTreeSet::new();
        for ix in node.protein_nodes.iter() {
            let prot = self.protein_node(*ix)?;
            acc.extend(prot.taxonomies.iter().map(|s| s.as_str()));
        }
        Ok(acc)
    }

    /// The distinct peptide sequences supporting a protein node
    pub fn protein_peptide_sequences(&self, protein: ProteinNodeIx) -> Result<BTreeSet<&str>, ModelError> {
        let node = self.protein_node(protein)?;
        let mut acc = BTreeSet::new();
        for ix in node.peptide_nodes.iter() {
            let pep = self.peptide_node(*ix)?;
            acc.extend(pep.peptides.iter().map(|p| p.full_sequence.as_str()));
        }
        Ok(acc)
    }

    pub fn protein_psm_count(&self, protein: ProteinNodeIx) -> Result<usize, ModelError> {
        let node = self.protein_node(protein)?;
        let mut total = 0;
        for ix in node.peptide_nodes.iter() {
            total += self.peptide_node(*ix)?.psm_count();
        }
        Ok(total)
    }

    /// Whether any protein pair of this cluster was classified as `case`
    pub fn has_classification(&self, case: ClassificationCase) -> bool {
        self.protein_pairs
            .iter()
            .any(|pair| pair.classification_cases.contains(&case))
    }

    /// Whether some peptide node of this cluster has a consensus ratio that
    /// passes the FDR threshold or is infinite
    pub fn is_significantly_regulated(&self, fdr_threshold: Option<f64>) -> bool {
        self.peptide_nodes.iter().any(|node| match &node.consensus_ratio {
            Some(ratio) => {
                let passes = ratio
                    .confidence_score
                    .as_ref()
                    .map(|score| score.passes_fdr(fdr_threshold))
                    .unwrap_or(false);
                passes || ratio.is_infinite()
            }
            None => false,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{ConfidenceScore, QuantifiedPeptide, Ratio, FDR_CONFIDENCE_SCORE_NAME};

    fn pair_cluster() -> (ProteinCluster, ProteinNodeIx, ProteinNodeIx) {
        let mut cluster = ProteinCluster::new();
        let p1 = cluster.add_protein_node(ProteinNode::new(["P1"]));
        let p2 = cluster.add_protein_node(ProteinNode::new(["P2"]));
        let a = cluster.add_peptide_node(PeptideNode::new(vec![QuantifiedPeptide::new("AAA")]));
        let b = cluster.add_peptide_node(PeptideNode::new(vec![QuantifiedPeptide::new("BBB")]));
        let c = cluster
            .add_peptide_node(PeptideNode::new(vec![QuantifiedPeptide::new("CCC")]).discard());
        cluster.link(p1, a).unwrap();
        cluster.link(p1, b).unwrap();
        cluster.link(p2, b).unwrap();
        cluster.link(p2, c).unwrap();
        (cluster, p1, p2)
    }

    #[test]
    fn test_unique_and_shared() {
        let (cluster, p1, p2) = pair_cluster();
        let keys = |v: Vec<PeptideNodeIx>| -> Vec<String> {
            v.into_iter()
                .map(|ix| cluster.peptide_node(ix).unwrap().key.clone())
                .collect()
        };
        assert_eq!(keys(cluster.unique_peptide_nodes(p1, Some(p2), false).unwrap()), ["AAA"]);
        assert_eq!(keys(cluster.shared_peptide_nodes(p1, Some(p2), false).unwrap()), ["BBB"]);
        assert_eq!(keys(cluster.unique_peptide_nodes(p2, Some(p1), false).unwrap()), ["CCC"]);
        assert!(cluster.unique_peptide_nodes(p2, Some(p1), true).unwrap().is_empty());

        assert_eq!(keys(cluster.unique_peptide_nodes(p1, None, false).unwrap()), ["AAA"]);
        assert_eq!(keys(cluster.shared_peptide_nodes(p1, None, false).unwrap()), ["BBB"]);
    }

    #[test]
    fn test_unpaired() {
        let (mut cluster, p1, p2) = pair_cluster();
        assert_eq!(cluster.unpaired_protein_nodes().len(), 2);
        cluster.add_pair(ProteinPair::new(p1, p2));
        assert!(cluster.unpaired_protein_nodes().is_empty());
    }

    #[test]
    fn test_dangling_index() {
        let (mut cluster, p1, _) = pair_cluster();
        assert!(matches!(
            cluster.link(p1, PeptideNodeIx(42)),
            Err(ModelError::DanglingPeptideNode(PeptideNodeIx(42)))
        ));
    }

    #[test]
    fn test_significance() {
        let (mut cluster, _, _) = pair_cluster();
        assert!(!cluster.is_significantly_regulated(Some(0.05)));
        cluster.peptide_nodes[0].consensus_ratio = Some(
            Ratio::new(1.2)
                .with_confidence_score(ConfidenceScore::new(FDR_CONFIDENCE_SCORE_NAME, 0.01)),
        );
        assert!(cluster.is_significantly_regulated(Some(0.05)));
        assert!(!cluster.is_significantly_regulated(None));
        cluster.peptide_nodes[1].consensus_ratio = Some(Ratio::new(f64::NEG_INFINITY));
        assert!(cluster.is_significantly_regulated(None));
    }
}
