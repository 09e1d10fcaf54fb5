use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Largest quantity a single label may ask for. Well past any real order,
/// small enough that a sheet of it still fits in memory (556 pages).
pub const MAX_QUANTITY: u32 = 10_000;

/// Store-assigned identifier. Monotonic, never reused.
pub type RecordId = u64;

/// Everything a label carries except its id.
///
/// The recognition step answers with the Portuguese field names used on the
/// printed sheets (`comodo`, `peca`, `medida1`, `medida2`, `quantidade`), so
/// those are accepted as aliases.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelFields {
    #[serde(alias = "comodo")]
    pub room: String,
    #[serde(alias = "peca")]
    pub part: String,
    #[serde(alias = "medida1")]
    pub dim1: String,
    #[serde(alias = "medida2")]
    pub dim2: String,
    #[serde(alias = "quantidade", deserialize_with = "bounded_quantity")]
    pub quantity: u32,
}

fn bounded_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let q = u32::deserialize(deserializer)?;
    if q > MAX_QUANTITY {
        return Err(D::Error::custom(format!(
            "quantity {q} exceeds the limit of {MAX_QUANTITY}"
        )));
    }
    Ok(q)
}

impl LabelFields {
    pub fn new(
        room: impl Into<String>,
        part: impl Into<String>,
        dim1: impl Into<String>,
        dim2: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            room: room.into(),
            part: part.into(),
            dim1: dim1.into(),
            dim2: dim2.into(),
            quantity,
        }
    }

    /// Text printed on the third line of a label, e.g. `0300 x 0500`.
    pub fn dimensions(&self) -> String {
        format!("{} x {}", self.dim1, self.dim2)
    }
}

/// A label as held by the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: LabelFields,
}

impl Record {
    pub fn room(&self) -> &str {
        &self.fields.room
    }

    pub fn part(&self) -> &str {
        &self.fields.part
    }

    pub fn quantity(&self) -> u32 {
        self.fields.quantity
    }

    pub fn dimensions(&self) -> String {
        self.fields.dimensions()
    }

    /// One-line summary used by list views: `[id] room | part | dims | xN`.
    pub fn summary_line(&self) -> String {
        format!(
            "[{}] {} | {} | {} | x{}",
            self.id,
            self.fields.room,
            self.fields.part,
            self.dimensions(),
            self.fields.quantity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_flat() {
        let rec = Record {
            id: 7,
            fields: LabelFields::new("Banheiro", "Porta toalha", "0300", "0500", 2),
        };
        let v = serde_json::to_value(&rec).unwrap();
        assert_eq!(v["id"], 7);
        assert_eq!(v["room"], "Banheiro");
        assert_eq!(v["dim2"], "0500");
        assert_eq!(v["quantity"], 2);
        let back: Record = serde_json::from_value(v).unwrap();
        assert_eq!(back, rec);
    }

    #[test]
    fn fields_accept_sheet_aliases() {
        let txt = r#"{"comodo":"Cozinha","peca":"Gaveta","medida1":"0400","medida2":"0150","quantidade":3}"#;
        let f: LabelFields = serde_json::from_str(txt).unwrap();
        assert_eq!(f, LabelFields::new("Cozinha", "Gaveta", "0400", "0150", 3));
    }

    #[test]
    fn negative_quantity_does_not_deserialize() {
        let txt = r#"{"room":"a","part":"b","dim1":"1","dim2":"2","quantity":-1}"#;
        assert!(serde_json::from_str::<LabelFields>(txt).is_err());
    }

    #[test]
    fn summary_line_matches_list_format() {
        let rec = Record {
            id: 3,
            fields: LabelFields::new("Sala", "Painel", "1200", "0600", 4),
        };
        assert_eq!(rec.summary_line(), "[3] Sala | Painel | 1200 x 0600 | x4");
    }

    #[test]
    fn oversized_quantity_does_not_deserialize() {
        let at_limit = format!(
            r#"{{"room":"a","part":"b","dim1":"1","dim2":"2","quantity":{MAX_QUANTITY}}}"#
        );
        assert_eq!(
            serde_json::from_str::<LabelFields>(&at_limit).unwrap().quantity,
            MAX_QUANTITY
        );
        let txt = r#"{"room":"a","part":"b","dim1":"1","dim2":"2","quantity":4000000000}"#;
        let err = serde_json::from_str::<LabelFields>(txt).unwrap_err();
        assert!(err.to_string().contains("exceeds"), "{err}");
    }
}
