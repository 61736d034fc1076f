//! # NLP Analysis
//!
//! Result types for the backend's sentiment/entity/intent analysis, and the
//! pure summary the debug panel renders from them.
//!
//! The backend is best-effort, so parsing is deliberately forgiving: a
//! missing, `null` or non-numeric score reads as `0.0`, a malformed entity is
//! dropped, and a sentiment section of the wrong shape reads as absent. Only
//! a body that is not a JSON object at all fails to parse.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Compound scores strictly above this are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound scores strictly below this are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;
/// How many intents the panel lists.
pub const MAX_PANEL_INTENTS: usize = 4;

// ============================================================================
// Wire-facing types
// ============================================================================

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Sentiment {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub negative: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub neutral: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub positive: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub compound: f64,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Entity {
    pub text: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, deserialize_with = "lenient_offset")]
    pub start: Option<usize>,
    #[serde(default, deserialize_with = "lenient_offset")]
    pub end: Option<usize>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    #[serde(default, deserialize_with = "lenient_sentiment")]
    pub sentiment: Option<Sentiment>,
    #[serde(default, deserialize_with = "lenient_entities")]
    pub entities: Vec<Entity>,
    #[serde(default, deserialize_with = "lenient_intents")]
    pub intents: BTreeMap<String, f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub document_summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_entities")]
    pub document_entities: Option<Vec<Entity>>,
}

impl Analysis {
    /// Intents sorted by descending confidence, truncated to `n`.
    /// Ties keep label order.
    pub fn top_intents(&self, n: usize) -> Vec<(String, f64)> {
        let mut intents: Vec<(String, f64)> = self
            .intents
            .iter()
            .map(|(label, score)| (label.clone(), score.clamp(0.0, 1.0)))
            .collect();
        intents.sort_by(|a, b| b.1.total_cmp(&a.1));
        intents.truncate(n);
        intents
    }
}

// ============================================================================
// Lenient deserializers
// ============================================================================

fn number_or_zero(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}

fn entity_from(value: Value) -> Option<Entity> {
    match value {
        Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    }
}

fn entities_from(value: Value) -> Option<Vec<Entity>> {
    match value {
        Value::Array(items) => Some(items.into_iter().filter_map(entity_from).collect()),
        _ => None,
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(number_or_zero(&Value::deserialize(d)?))
}

fn lenient_offset<'de, D: Deserializer<'de>>(d: D) -> Result<Option<usize>, D::Error> {
    Ok(Value::deserialize(d)?
        .as_u64()
        .and_then(|n| usize::try_from(n).ok()))
}

fn lenient_sentiment<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Sentiment>, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match value {
        Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

fn lenient_entities<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Entity>, D::Error> {
    Ok(entities_from(Value::deserialize(d)?).unwrap_or_default())
}

fn lenient_optional_entities<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<Vec<Entity>>, D::Error> {
    Ok(entities_from(Value::deserialize(d)?))
}

fn lenient_intents<'de, D: Deserializer<'de>>(d: D) -> Result<BTreeMap<String, f64>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Object(map) => map
            .iter()
            .map(|(label, score)| (label.clone(), number_or_zero(score)))
            .collect(),
        _ => BTreeMap::new(),
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

// ============================================================================
// Panel summary
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn classify(compound: f64) -> Self {
        if compound > POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if compound < NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentSummary {
    pub label: SentimentLabel,
    /// Compound score clamped to [-1, 1].
    pub compound: f64,
    /// Bar fill in [0, 1]: `|compound|`.
    pub magnitude: f64,
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityTag {
    pub text: String,
    pub label: String,
}

/// Everything the NLP debug panel shows, already sanitized.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelSummary {
    /// No analysis arrived for this turn.
    Unavailable,
    Available {
        /// `None` when the backend omitted the sentiment section.
        sentiment: Option<SentimentSummary>,
        intents: Vec<(String, f64)>,
        entities: Vec<EntityTag>,
        document_summary: Option<String>,
    },
}

fn summarize_sentiment(sentiment: &Sentiment) -> SentimentSummary {
    let compound = sentiment.compound.clamp(-1.0, 1.0);
    SentimentSummary {
        label: SentimentLabel::classify(compound),
        compound,
        magnitude: compound.abs(),
        negative: sentiment.negative.clamp(0.0, 1.0),
        neutral: sentiment.neutral.clamp(0.0, 1.0),
        positive: sentiment.positive.clamp(0.0, 1.0),
    }
}

/// Reduce an optional analysis to what the debug panel displays.
pub fn summarize(analysis: Option<&Analysis>) -> PanelSummary {
    let Some(analysis) = analysis else {
        return PanelSummary::Unavailable;
    };

    let entities = analysis
        .entities
        .iter()
        .filter(|e| !e.text.trim().is_empty())
        .map(|e| EntityTag {
            text: e.text.clone(),
            label: e.label.clone(),
        })
        .collect();

    PanelSummary::Available {
        sentiment: analysis.sentiment.as_ref().map(summarize_sentiment),
        intents: analysis.top_intents(MAX_PANEL_INTENTS),
        entities,
        document_summary: analysis.document_summary.clone(),
    }
}
