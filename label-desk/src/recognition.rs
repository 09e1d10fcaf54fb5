//! Turning a recognition model's answer into label candidates.
//!
//! The model is asked for a bare JSON array but tends to wrap it in prose or
//! code fences, so everything outside the outermost `[` ... `]` is ignored.

use label_core::{LabelFields, MAX_QUANTITY, parse_quantity};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("no JSON array found in recognition output")]
    NoArray,
    #[error("invalid JSON in recognition output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognitionBatch {
    pub accepted: Vec<LabelFields>,
    /// Candidates dropped for a negative, oversized or unreadable quantity.
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default, alias = "comodo", deserialize_with = "lenient_text")]
    room: String,
    #[serde(default, alias = "peca", deserialize_with = "lenient_text")]
    part: String,
    #[serde(default, alias = "medida1", deserialize_with = "lenient_text")]
    dim1: String,
    #[serde(default, alias = "medida2", deserialize_with = "lenient_text")]
    dim2: String,
    #[serde(default, alias = "quantidade")]
    quantity: Option<Value>,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;
    Ok(match v {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    })
}

fn coerce_quantity(v: Option<&Value>) -> Option<u32> {
    let q = match v {
        None | Some(Value::Null) => Some(1),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                u32::try_from(i).ok()
            } else {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= f64::from(u32::MAX))
                    .map(|f| f as u32)
            }
        }
        Some(Value::String(s)) => parse_quantity(s).ok(),
        Some(_) => None,
    };
    q.filter(|q| *q <= MAX_QUANTITY)
}

pub fn parse_recognition_output(text: &str) -> Result<RecognitionBatch, RecognitionError> {
    let start = text.find('[').ok_or(RecognitionError::NoArray)?;
    let end = text.rfind(']').ok_or(RecognitionError::NoArray)?;
    if end < start {
        return Err(RecognitionError::NoArray);
    }
    let candidates: Vec<Candidate> = serde_json::from_str(&text[start..=end])?;

    let mut batch = RecognitionBatch::default();
    for (i, c) in candidates.into_iter().enumerate() {
        match coerce_quantity(c.quantity.as_ref()) {
            Some(quantity) => batch.accepted.push(LabelFields {
                room: c.room,
                part: c.part,
                dim1: c.dim1,
                dim2: c.dim2,
                quantity,
            }),
            None => {
                warn!(index = i, quantity = ?c.quantity, "skipping candidate with unusable quantity");
                batch.skipped += 1;
            }
        }
    }
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_array_from_prose() {
        let raw = "Claro! Aqui está:\n```json\n[\n  {\"comodo\": \"Banheiro\", \"peca\": \"Porta toalha\", \"medida1\": \"0300\", \"medida2\": \"0500\", \"quantidade\": 2}\n]\n```";
        let batch = parse_recognition_output(raw).unwrap();
        assert_eq!(batch.skipped, 0);
        assert_eq!(
            batch.accepted,
            vec![LabelFields::new("Banheiro", "Porta toalha", "0300", "0500", 2)]
        );
    }

    #[test]
    fn coerces_loose_values() {
        let raw = r#"[
            {"room": "Sala", "part": "Painel", "dim1": 1200, "dim2": "0600", "quantity": "3"},
            {"room": "Copa", "part": "Tampo", "quantity": 2.0},
            {"room": "Hall"}
        ]"#;
        let batch = parse_recognition_output(raw).unwrap();
        assert_eq!(batch.accepted.len(), 3);
        assert_eq!(batch.accepted[0].dim1, "1200");
        assert_eq!(batch.accepted[0].quantity, 3);
        assert_eq!(batch.accepted[1].dim1, "");
        assert_eq!(batch.accepted[1].quantity, 2);
        assert_eq!(batch.accepted[2].quantity, 1);
    }

    #[test]
    fn skips_unusable_quantities() {
        let raw = r#"[{"room": "a", "quantity": -2}, {"room": "b", "quantity": "muitos"}, {"room": "c", "quantity": 0}]"#;
        let batch = parse_recognition_output(raw).unwrap();
        assert_eq!(batch.skipped, 2);
        assert_eq!(batch.accepted.len(), 1);
        assert_eq!(batch.accepted[0].quantity, 0);
    }

    #[test]
    fn skips_quantities_above_limit() {
        let raw = r#"[{"room": "a", "quantity": 4000000000}, {"room": "b", "quantity": "10001"}, {"room": "c", "quantity": 1e12}, {"room": "d", "quantity": 10000}]"#;
        let batch = parse_recognition_output(raw).unwrap();
        assert_eq!(batch.skipped, 3);
        assert_eq!(batch.accepted.len(), 1);
        assert_eq!(batch.accepted[0].quantity, MAX_QUANTITY);
    }

    #[test]
    fn reports_missing_or_broken_array() {
        assert!(matches!(
            parse_recognition_output("nothing here"),
            Err(RecognitionError::NoArray)
        ));
        assert!(matches!(
            parse_recognition_output("] then ["),
            Err(RecognitionError::NoArray)
        ));
        assert!(matches!(
            parse_recognition_output("[{\"room\": }]"),
            Err(RecognitionError::Json(_))
        ));
    }
}
