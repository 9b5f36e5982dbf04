//! The fixed emotion label set

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the six core emotions, plus `Neutral` for "no signal at all".
///
/// The canonical traversal order used everywhere lexicon entries overlap is
/// [`Emotion::CANONICAL`]; the first emotion in that order wins ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Joy,
    Sadness,
    Anger,
    Disgust,
    Fear,
    Surprise,
    Neutral,
}

impl Emotion {
    /// The six classifiable emotions, in canonical tie-break order.
    /// `Neutral` is deliberately excluded: it is a fallback outcome, never
    /// a lexicon key or training label.
    pub const CANONICAL: [Emotion; 6] = [
        Emotion::Joy,
        Emotion::Sadness,
        Emotion::Anger,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Surprise,
    ];

    /// The lowercase string form used in CSV files and artifact payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Joy => "joy",
            Emotion::Sadness => "sadness",
            Emotion::Anger => "anger",
            Emotion::Disgust => "disgust",
            Emotion::Fear => "fear",
            Emotion::Surprise => "surprise",
            Emotion::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "joy" => Ok(Emotion::Joy),
            "sadness" => Ok(Emotion::Sadness),
            "anger" => Ok(Emotion::Anger),
            "disgust" => Ok(Emotion::Disgust),
            "fear" => Ok(Emotion::Fear),
            "surprise" => Ok(Emotion::Surprise),
            "neutral" => Ok(Emotion::Neutral),
            other => Err(crate::Error::dataset(format!(
                "unknown emotion label: {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_strings() {
        for emotion in Emotion::CANONICAL {
            let parsed: Emotion = emotion.as_str().parse().unwrap();
            assert_eq!(parsed, emotion);
        }
        assert_eq!("neutral".parse::<Emotion>().unwrap(), Emotion::Neutral);
    }

    #[test]
    fn test_unknown_label_rejected() {
        assert!("ennui".parse::<Emotion>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Emotion::Joy).unwrap();
        assert_eq!(json, "\"joy\"");
        let back: Emotion = serde_json::from_str("\"disgust\"").unwrap();
        assert_eq!(back, Emotion::Disgust);
    }
}
