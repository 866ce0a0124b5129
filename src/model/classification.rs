use std::fmt::Display;
use std::str::FromStr;

/// The consistency pattern observed between the ratios of the shared and
/// unique peptides of a [`ProteinPair`](crate::model::ProteinPair).
///
/// Cases are ordered by their numeric identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClassificationCase {
    /// Shared and unique peptides change consistently
    Consistent,
    /// The unique peptides of the first protein disagree with the shared ones
    UniqueProtein1Inconsistent,
    /// The unique peptides of the second protein disagree with the shared ones
    UniqueProtein2Inconsistent,
    /// The unique peptides of both proteins disagree with the shared ones
    UniqueBothInconsistent,
    /// The shared peptides disagree among themselves
    SharedInconsistent,
    /// There is not enough quantitative evidence to classify the pair
    NoEvidence,
}

impl ClassificationCase {
    pub const ALL: [ClassificationCase; 6] = [
        Self::Consistent,
        Self::UniqueProtein1Inconsistent,
        Self::UniqueProtein2Inconsistent,
        Self::UniqueBothInconsistent,
        Self::SharedInconsistent,
        Self::NoEvidence,
    ];

    pub const fn case_id(&self) -> u32 {
        match self {
            Self::Consistent => 1,
            Self::UniqueProtein1Inconsistent => 2,
            Self::UniqueProtein2Inconsistent => 3,
            Self::UniqueBothInconsistent => 4,
            Self::SharedInconsistent => 5,
            Self::NoEvidence => 6,
        }
    }

    pub fn from_case_id(case_id: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.case_id() == case_id)
    }

    /// The enumeration name, used when naming per-case output files
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Consistent => "CASE1",
            Self::UniqueProtein1Inconsistent => "CASE2",
            Self::UniqueProtein2Inconsistent => "CASE3",
            Self::UniqueBothInconsistent => "CASE4",
            Self::SharedInconsistent => "CASE5",
            Self::NoEvidence => "CASE6",
        }
    }

    pub const fn explanation(&self) -> &'static str {
        match self {
            Self::Consistent => "Shared and unique peptides are consistent",
            Self::UniqueProtein1Inconsistent => {
                "Unique peptides of protein 1 are inconsistent with the shared peptides"
            }
            Self::UniqueProtein2Inconsistent => {
                "Unique peptides of protein 2 are inconsistent with the shared peptides"
            }
            Self::UniqueBothInconsistent => {
                "Unique peptides of both proteins are inconsistent with the shared peptides"
            }
            Self::SharedInconsistent => "Shared peptides are inconsistent",
            Self::NoEvidence => "Not enough evidence to classify the protein pair",
        }
    }

    pub const fn is_inconsistent(&self) -> bool {
        matches!(
            self,
            Self::UniqueProtein1Inconsistent
                | Self::UniqueProtein2Inconsistent
                | Self::UniqueBothInconsistent
                | Self::SharedInconsistent
        )
    }
}

impl Display for ClassificationCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.case_id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown classification case identifier: {0:?}")]
pub struct UnknownClassificationCase(pub String);

impl FromStr for ClassificationCase {
    type Err = UnknownClassificationCase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(Self::from_case_id)
            .ok_or_else(|| UnknownClassificationCase(s.to_string()))
    }
}
