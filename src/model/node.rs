use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

use super::ratio::{IonCountRatio, Ratio, RepresentativeRatio};
use super::ModelError;

/// The separator between merged protein accessions in a protein node key
pub const PROTEIN_ACC_SEPARATOR: &str = " ";
/// The separator between the descriptions of merged proteins
pub const PROTEIN_DESCRIPTION_SEPARATOR: &str = "##";
/// The separator between merged peptide sequences in a peptide node key
pub const PEPTIDE_SEQUENCE_SEPARATOR: &str = "_";

/// The position of a [`ProteinNode`] within its [`ProteinCluster`](crate::model::ProteinCluster)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProteinNodeIx(pub u32);

/// The position of a [`PeptideNode`] within its [`ProteinCluster`](crate::model::ProteinCluster)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeptideNodeIx(pub u32);

impl Display for ProteinNodeIx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "protein node #{}", self.0)
    }
}

impl Display for PeptideNodeIx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "peptide node #{}", self.0)
    }
}

/// The common surface of protein and peptide nodes that graph construction
/// and color scaling rely on.
pub trait QuantNode {
    /// The identity key of the node, unique within an export pass
    fn key(&self) -> &str;

    fn is_discarded(&self) -> bool;

    /// The number of distinct underlying items merged into this node
    fn num_items(&self) -> usize;

    fn contains_ptms(&self) -> bool;

    /// The ratio that represents this node, if it was quantified
    fn representative_ratio(&self) -> Option<RepresentativeRatio<'_>> {
        None
    }

    fn is_protein(&self) -> bool;
}

/// A single peptide sequence as it was quantified, with its evidence counts
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct QuantifiedPeptide {
    /// The sequence including modification annotations, e.g. `PEPT[+79.966]IDE`
    pub full_sequence: String,
    pub psm_count: usize,
    /// How many of the PSMs were only quantified in one condition
    pub singleton_psm_count: usize,
    /// The number of individual proteins the sequence maps to
    pub protein_count: usize,
    pub ms_runs: BTreeSet<String>,
    pub replicates: BTreeSet<String>,
    pub consensus_ratio: Option<Ratio>,
    /// Isobaric ion counts in the numerator condition, when the peptide was
    /// quantified with isobaric labels
    pub ions_1: Option<u32>,
    /// Isobaric ion counts in the denominator condition
    pub ions_2: Option<u32>,
}

impl QuantifiedPeptide {
    pub fn new<S: Into<String>>(full_sequence: S) -> Self {
        Self {
            full_sequence: full_sequence.into(),
            ..Default::default()
        }
    }

    pub fn contains_ptms(&self) -> bool {
        self.full_sequence.contains(['(', '['])
    }

    pub fn is_isobaric(&self) -> bool {
        self.ions_1.is_some() || self.ions_2.is_some()
    }

    pub fn non_singleton_psm_count(&self) -> usize {
        self.psm_count.saturating_sub(self.singleton_psm_count)
    }
}

/// One or more indistinguishable peptides merged into a single quantification unit
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct PeptideNode {
    pub key: String,
    pub peptides: Vec<QuantifiedPeptide>,
    pub protein_nodes: Vec<ProteinNodeIx>,
    /// The integrated consensus ratio between the two compared conditions
    pub consensus_ratio: Option<Ratio>,
    /// Consensus ratios computed within single replicates, keyed by replicate name.
    /// Carried with the input, not rendered.
    pub replicate_ratios: BTreeMap<String, Ratio>,
    pub ion_count_ratio: Option<IonCountRatio>,
    pub confidence_value: Option<f64>,
    pub discarded: bool,
    /// For nodes collapsed by modification site, the 1-based residue positions
    /// of the site in each member peptide, keyed by full sequence
    pub positions_in_peptide: BTreeMap<String, Vec<usize>>,
}

impl PeptideNode {
    /// Create a node over `peptides`, keyed by their sorted full sequences
    pub fn new(peptides: Vec<QuantifiedPeptide>) -> Self {
        let mut this = Self {
            peptides,
            ..Default::default()
        };
        this.key = this.full_sequence();
        this
    }

    /// Create a node collapsed by modification site, under an explicit `key`
    pub fn new_site<K: Into<String>>(key: K, peptides: Vec<(QuantifiedPeptide, Vec<usize>)>) -> Self {
        let mut this = Self {
            key: key.into(),
            ..Default::default()
        };
        for (peptide, positions) in peptides {
            this.positions_in_peptide
                .insert(peptide.full_sequence.clone(), positions);
            this.peptides.push(peptide);
        }
        this
    }

    pub fn with_consensus_ratio(mut self, ratio: Ratio) -> Self {
        self.consensus_ratio = Some(ratio);
        self
    }

    pub fn with_ion_count_ratio(mut self, ratio: IonCountRatio) -> Self {
        self.ion_count_ratio = Some(ratio);
        self
    }

    pub fn with_confidence_value(mut self, value: f64) -> Self {
        self.confidence_value = Some(value);
        self
    }

    pub fn discard(mut self) -> Self {
        self.discarded = true;
        self
    }

    /// The distinct full sequences of the member peptides, sorted and joined
    pub fn full_sequence(&self) -> String {
        let sequences: BTreeSet<&str> = self
            .peptides
            .iter()
            .map(|p| p.full_sequence.as_str())
            .collect();
        sequences
            .into_iter()
            .collect::<Vec<_>>()
            .join(PEPTIDE_SEQUENCE_SEPARATOR)
    }

    /// The consensus ratio when it carries a value, otherwise the normalized
    /// ion count ratio.
    pub fn representative_ratio(&self) -> Option<RepresentativeRatio<'_>> {
        match (&self.consensus_ratio, &self.ion_count_ratio) {
            (Some(consensus), _) if !consensus.is_nan() => {
                Some(RepresentativeRatio::Consensus(consensus))
            }
            (_, Some(ion_count)) => Some(RepresentativeRatio::IonCount(ion_count)),
            (Some(consensus), None) => Some(RepresentativeRatio::Consensus(consensus)),
            (None, None) => None,
        }
    }

    /// The site positions for which this node was created in `peptide`.
    ///
    /// Asking for a peptide that is not a member of this node is a violation
    /// of the caller's contract and is reported as an error.
    pub fn position_in_peptide(&self, full_sequence: &str) -> Result<Option<&[usize]>, ModelError> {
        if !self.peptides.iter().any(|p| p.full_sequence == full_sequence) {
            return Err(ModelError::PeptideNotInNode {
                sequence: full_sequence.to_string(),
                node_key: self.key.clone(),
            });
        }
        Ok(self
            .positions_in_peptide
            .get(full_sequence)
            .map(|v| v.as_slice()))
    }

    /// The member peptides sorted by full sequence, paired with their site positions
    pub fn peptides_with_positions(
        &self,
    ) -> Result<Vec<(&QuantifiedPeptide, Option<&[usize]>)>, ModelError> {
        let mut peptides: Vec<_> = self.peptides.iter().collect();
        peptides.sort_by(|a, b| a.full_sequence.cmp(&b.full_sequence));
        peptides
            .into_iter()
            .map(|p| {
                self.position_in_peptide(&p.full_sequence)
                    .map(|positions| (p, positions))
            })
            .collect()
    }

    pub fn psm_count(&self) -> usize {
        self.peptides.iter().map(|p| p.psm_count).sum()
    }

    pub fn ms_runs(&self) -> BTreeSet<&str> {
        self.peptides
            .iter()
            .flat_map(|p| p.ms_runs.iter().map(|s| s.as_str()))
            .collect()
    }

    pub fn replicates(&self) -> BTreeSet<&str> {
        self.peptides
            .iter()
            .flat_map(|p| p.replicates.iter().map(|s| s.as_str()))
            .collect()
    }

    /// Total isobaric ions observed in the numerator condition
    pub fn ions_1(&self) -> u64 {
        self.peptides
            .iter()
            .map(|p| p.ions_1.unwrap_or_default() as u64)
            .sum()
    }

    /// Total isobaric ions observed in the denominator condition
    pub fn ions_2(&self) -> u64 {
        self.peptides
            .iter()
            .map(|p| p.ions_2.unwrap_or_default() as u64)
            .sum()
    }

    pub fn ion_count(&self) -> u64 {
        self.ions_1() + self.ions_2()
    }
}

impl QuantNode for PeptideNode {
    fn key(&self) -> &str {
        &self.key
    }

    fn is_discarded(&self) -> bool {
        self.discarded
    }

    fn num_items(&self) -> usize {
        self.peptides.len()
    }

    fn contains_ptms(&self) -> bool {
        self.peptides.iter().any(|p| p.contains_ptms())
    }

    fn representative_ratio(&self) -> Option<RepresentativeRatio<'_>> {
        PeptideNode::representative_ratio(self)
    }

    fn is_protein(&self) -> bool {
        false
    }
}

/// One or more indistinguishable proteins merged into a single node
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct ProteinNode {
    pub key: String,
    pub accessions: Vec<String>,
    pub descriptions: Vec<String>,
    pub taxonomies: BTreeSet<String>,
    pub peptide_nodes: Vec<PeptideNodeIx>,
    pub discarded: bool,
    /// Set when the node was collapsed by PTM and carries a modification code in its key
    pub contains_ptms: bool,
}

impl ProteinNode {
    /// Create a node over `accessions`, keyed by their sorted concatenation
    pub fn new<S: Into<String>, I: IntoIterator<Item = S>>(accessions: I) -> Self {
        let mut accessions: Vec<String> = accessions.into_iter().map(|s| s.into()).collect();
        accessions.sort();
        accessions.dedup();
        let key = accessions.join(PROTEIN_ACC_SEPARATOR);
        Self {
            key,
            accessions,
            ..Default::default()
        }
    }

    pub fn with_key<S: Into<String>>(mut self, key: S) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.descriptions.push(description.into());
        self
    }

    pub fn with_taxonomy<S: Into<String>>(mut self, taxonomy: S) -> Self {
        self.taxonomies.insert(taxonomy.into());
        self
    }

    pub fn discard(mut self) -> Self {
        self.discarded = true;
        self
    }

    pub fn accession_string(&self) -> String {
        self.accessions.join(PROTEIN_ACC_SEPARATOR)
    }

    pub fn description(&self) -> String {
        self.descriptions.join(PROTEIN_DESCRIPTION_SEPARATOR)
    }
}

impl QuantNode for ProteinNode {
    fn key(&self) -> &str {
        &self.key
    }

    fn is_discarded(&self) -> bool {
        self.discarded
    }

    fn num_items(&self) -> usize {
        self.accessions.len()
    }

    fn contains_ptms(&self) -> bool {
        self.contains_ptms
    }

    fn is_protein(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_peptide_node_key() {
        let node = PeptideNode::new(vec![
            QuantifiedPeptide::new("KLM"),
            QuantifiedPeptide::new("ABC"),
            QuantifiedPeptide::new("ABC"),
        ]);
        assert_eq!(node.key, "ABC_KLM");
        assert_eq!(node.num_items(), 3);
    }

    #[test]
    fn test_position_in_peptide() {
        let node = PeptideNode::new_site(
            "P12345#12",
            vec![
                (QuantifiedPeptide::new("AS[+80]K"), vec![2]),
                (QuantifiedPeptide::new("AAS[+80]K"), vec![3]),
            ],
        );
        assert_eq!(node.position_in_peptide("AS[+80]K").unwrap(), Some(&[2usize][..]));
        assert!(matches!(
            node.position_in_peptide("NOPE"),
            Err(ModelError::PeptideNotInNode { .. })
        ));
        let sorted = node.peptides_with_positions().unwrap();
        assert_eq!(sorted[0].0.full_sequence, "AAS[+80]K");
        assert!(node.contains_ptms());
    }

    #[test]
    fn test_representative_ratio() {
        let node = PeptideNode::new(vec![QuantifiedPeptide::new("PEPTIDE")]);
        assert!(node.representative_ratio().is_none());

        let node = node.with_ion_count_ratio(IonCountRatio::new(2.0, 1.0));
        assert!(matches!(
            node.representative_ratio(),
            Some(RepresentativeRatio::IonCount(_))
        ));

        let nan_consensus = node.clone().with_consensus_ratio(Ratio::new(f64::NAN));
        assert!(matches!(
            nan_consensus.representative_ratio(),
            Some(RepresentativeRatio::IonCount(_))
        ));

        let node = node.with_consensus_ratio(Ratio::new(0.5));
        assert_eq!(node.representative_ratio().unwrap().log2_ratio(), 0.5);
    }

    #[test]
    fn test_protein_node_key() {
        let node = ProteinNode::new(["Q2", "P1"]);
        assert_eq!(node.key, "P1 Q2");
        assert_eq!(node.num_items(), 2);
        assert!(node.is_protein());
    }
}
