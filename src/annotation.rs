//! Protein annotations (entry name, gene, description) keyed by accession,
//! used only to enrich protein node labels and tooltips.
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct ProteinAnnotation {
    /// The entry name, like `ALDOA_HUMAN`
    pub name: Option<String>,
    pub gene: Option<String>,
    pub description: Option<String>,
    /// Additional annotation fields by column name
    pub columns: BTreeMap<String, Vec<String>>,
}

impl ProteinAnnotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_gene<S: Into<String>>(mut self, gene: S) -> Self {
        self.gene = Some(gene.into());
        self
    }

    pub fn with_column<S: Into<String>, V: Into<String>>(mut self, column: S, value: V) -> Self {
        self.columns
            .entry(column.into())
            .or_default()
            .push(value.into());
        self
    }

    /// The entry name unless it is missing or marks an obsolete entry
    pub fn usable_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty() && !name.contains("obsolete"))
    }
}

/// A source of protein annotations. A missing entry is not an error, callers
/// fall back to the accession itself.
pub trait AnnotationSource {
    fn annotation(&self, accession: &str) -> Option<&ProteinAnnotation>;

    /// The entry name for `accession`, or the accession if none is usable
    fn protein_name<'a>(&'a self, accession: &'a str) -> &'a str {
        self.annotation(accession)
            .and_then(|a| a.usable_name())
            .unwrap_or(accession)
    }

    /// The gene name for `accession`, if it is known
    fn gene(&self, accession: &str) -> Option<&str> {
        self.annotation(accession)
            .and_then(|a| a.gene.as_deref())
            .filter(|g| !g.is_empty())
    }

    /// The gene name for `accession`, or the accession if none is known
    fn gene_name<'a>(&'a self, accession: &'a str) -> &'a str {
        self.gene(accession).unwrap_or(accession)
    }

    /// The sorted, distinct values of `column` over all `accessions`
    fn column_values(&self, column: &str, accessions: &[String]) -> Vec<String> {
        let mut values: Vec<String> = Vec::new();
        for acc in accessions {
            if let Some(found) = self.annotation(acc).and_then(|a| a.columns.get(column)) {
                for value in found {
                    if !values.contains(value) {
                        values.push(value.clone());
                    }
                }
            }
        }
        values.sort();
        values
    }
}

impl AnnotationSource for HashMap<String, ProteinAnnotation> {
    fn annotation(&self, accession: &str) -> Option<&ProteinAnnotation> {
        self.get(accession)
    }
}

impl AnnotationSource for BTreeMap<String, ProteinAnnotation> {
    fn annotation(&self, accession: &str) -> Option<&ProteinAnnotation> {
        self.get(accession)
    }
}

/// An annotation source that knows nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnnotations;

impl AnnotationSource for NoAnnotations {
    fn annotation(&self, _accession: &str) -> Option<&ProteinAnnotation> {
        None
    }
}
