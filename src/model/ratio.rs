/// The name under which the ratio integration step reports false discovery rates
pub const FDR_CONFIDENCE_SCORE_NAME: &str = "FDR";

/// A named statistic attached to a ratio, usually an FDR or a standard deviation.
///
/// The value is kept as the text the upstream integration step produced, it is
/// only interpreted as a number when a numeric comparison is required.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfidenceScore {
    pub name: String,
    pub value: String,
}

impl ConfidenceScore {
    pub fn new<N: Into<String>, V: ToString>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            value: value.to_string(),
        }
    }

    /// The numeric value of the score, or `None` if it cannot be parsed
    pub fn numeric_value(&self) -> Option<f64> {
        self.value.trim().parse::<f64>().ok()
    }

    pub fn is_fdr(&self) -> bool {
        self.name == FDR_CONFIDENCE_SCORE_NAME
    }

    /// Whether this score is an FDR at or below `threshold`
    pub fn passes_fdr(&self, threshold: Option<f64>) -> bool {
        match (threshold, self.is_fdr()) {
            (Some(threshold), true) => self
                .numeric_value()
                .map(|fdr| fdr <= threshold)
                .unwrap_or(false),
            _ => false,
        }
    }
}

/// A log2 abundance ratio between the two compared conditions.
///
/// `log2_ratio` may be `NaN` or +/- infinity, the latter meaning that the
/// peptide was only observed in one condition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Ratio {
    #[cfg_attr(feature = "serde", serde(with = "real_serde"))]
    pub log2_ratio: f64,
    /// A human readable description of how the ratio was obtained
    pub description: Option<String>,
    pub confidence_score: Option<ConfidenceScore>,
}

impl Default for Ratio {
    fn default() -> Self {
        Self {
            log2_ratio: f64::NAN,
            description: None,
            confidence_score: None,
        }
    }
}

impl Ratio {
    pub fn new(log2_ratio: f64) -> Self {
        Self {
            log2_ratio,
            ..Default::default()
        }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_confidence_score(mut self, score: ConfidenceScore) -> Self {
        self.confidence_score = Some(score);
        self
    }

    pub fn is_infinite(&self) -> bool {
        self.log2_ratio.is_infinite()
    }

    pub fn is_nan(&self) -> bool {
        self.log2_ratio.is_nan()
    }

    pub fn description_or_default(&self) -> &str {
        self.description.as_deref().unwrap_or("RATIO")
    }
}

/// JSON has no spelling for the non-finite reals, so they are written as
/// `"Infinity"`, `"-Infinity"` and `"NaN"`. `null` reads as `NaN`.
#[cfg(feature = "serde")]
mod real_serde {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::graph::format::{format_real, parse_real};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Real {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_str(&format_real(*value))
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Option::<Real>::deserialize(deserializer)? {
            None => Ok(f64::NAN),
            Some(Real::Number(value)) => Ok(value),
            Some(Real::Text(text)) => parse_real(&text)
                .ok_or_else(|| D::Error::custom(format!("{text:?} is not a real number"))),
        }
    }
}

/// A ratio computed from normalized ion counts in each condition
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IonCountRatio {
    pub ratio: Ratio,
    /// Normalized ion count in the numerator condition
    pub ion_count_1: f64,
    /// Normalized ion count in the denominator condition
    pub ion_count_2: f64,
}

impl IonCountRatio {
    pub fn new(ion_count_1: f64, ion_count_2: f64) -> Self {
        let log2_ratio = (ion_count_1 / ion_count_2).log2();
        Self {
            ratio: Ratio::new(log2_ratio).with_description("Ion count ratio"),
            ion_count_1,
            ion_count_2,
        }
    }

    pub fn log2_ratio(&self) -> f64 {
        self.ratio.log2_ratio
    }
}

/// The ratio that best represents a node, as chosen by [`PeptideNode::representative_ratio`](crate::model::PeptideNode::representative_ratio)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RepresentativeRatio<'a> {
    /// The consensus ratio produced by the ratio integration step
    Consensus(&'a Ratio),
    /// The normalized ion count ratio, used when no consensus is available
    IonCount(&'a IonCountRatio),
}

impl<'a> RepresentativeRatio<'a> {
    pub fn ratio(&self) -> &'a Ratio {
        match self {
            Self::Consensus(r) => r,
            Self::IonCount(r) => &r.ratio,
        }
    }

    pub fn log2_ratio(&self) -> f64 {
        self.ratio().log2_ratio
    }

    pub fn confidence_score(&self) -> Option<&'a ConfidenceScore> {
        self.ratio().confidence_score.as_ref()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_fdr_threshold() {
        let score = ConfidenceScore::new(FDR_CONFIDENCE_SCORE_NAME, 0.01);
        assert!(score.passes_fdr(Some(0.05)));
        assert!(score.passes_fdr(Some(0.01)));
        assert!(!score.passes_fdr(Some(0.001)));
        assert!(!score.passes_fdr(None));

        let other = ConfidenceScore::new("stdev", 0.01);
        assert!(!other.passes_fdr(Some(0.05)));

        let garbage = ConfidenceScore::new(FDR_CONFIDENCE_SCORE_NAME, "n/a");
        assert_eq!(garbage.numeric_value(), None);
        assert!(!garbage.passes_fdr(Some(1.0)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_non_finite_ratios_in_json() {
        for value in [f64::INFINITY, f64::NEG_INFINITY, 1.5] {
            let text = serde_json::to_string(&Ratio::new(value)).unwrap();
            let ratio: Ratio = serde_json::from_str(&text).unwrap();
            assert_eq!(ratio.log2_ratio, value);
        }
        let text = serde_json::to_string(&Ratio::new(f64::INFINITY)).unwrap();
        assert!(text.contains(r#""log2_ratio":"Infinity""#));

        let nan: Ratio = serde_json::from_str(&serde_json::to_string(&Ratio::default()).unwrap()).unwrap();
        assert!(nan.is_nan());
        let nan: Ratio = serde_json::from_str(r#"{"log2_ratio": null}"#).unwrap();
        assert!(nan.is_nan());
        let missing: Ratio = serde_json::from_str("{}").unwrap();
        assert!(missing.is_nan());
        let whole: Ratio = serde_json::from_str(r#"{"log2_ratio": 2}"#).unwrap();
        assert_eq!(whole.log2_ratio, 2.0);
        let inf: Ratio =
            serde_json::from_str(r#"{"log2_ratio": "-Infinity", "description": "RATIO"}"#).unwrap();
        assert_eq!(inf.log2_ratio, f64::NEG_INFINITY);
        assert!(serde_json::from_str::<Ratio>(r#"{"log2_ratio": "lots"}"#).is_err());
    }

    #[test]
    fn test_ion_count_ratio() {
        let r = IonCountRatio::new(4.0, 1.0);
        assert_eq!(r.log2_ratio(), 2.0);
        let r = IonCountRatio::new(4.0, 0.0);
        assert!(r.ratio.is_infinite());
    }
}
