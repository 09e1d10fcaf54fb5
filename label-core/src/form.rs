use crate::record::{LabelFields, MAX_QUANTITY, Record};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("field `{0}` is required")]
    MissingField(&'static str),
    #[error("quantity `{0}` is not a whole number")]
    InvalidQuantity(String),
    #[error("quantity {0} is negative")]
    NegativeQuantity(i64),
    #[error("quantity {0} is above the limit of {MAX_QUANTITY}")]
    QuantityTooLarge(i64),
}

/// Raw text as typed into the entry form, before any coercion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelForm {
    pub room: String,
    pub part: String,
    pub dim1: String,
    pub dim2: String,
    pub quantity: String,
}

impl LabelForm {
    /// Pre-fills the form for editing an existing record.
    pub fn from_record(rec: &Record) -> Self {
        Self {
            room: rec.fields.room.clone(),
            part: rec.fields.part.clone(),
            dim1: rec.fields.dim1.clone(),
            dim2: rec.fields.dim2.clone(),
            quantity: rec.fields.quantity.to_string(),
        }
    }

    /// Trims every field and coerces the quantity.
    ///
    /// The quantity is checked first so a typo there is reported even when
    /// other fields are still empty. Zero is accepted and yields a record that
    /// prints nothing.
    pub fn validate(&self) -> Result<LabelFields, ValidationError> {
        let quantity = parse_quantity(&self.quantity)?;
        let room = required("room", &self.room)?;
        let part = required("part", &self.part)?;
        let dim1 = required("dim1", &self.dim1)?;
        let dim2 = required("dim2", &self.dim2)?;
        Ok(LabelFields {
            room,
            part,
            dim1,
            dim2,
            quantity,
        })
    }
}

fn required(name: &'static str, value: &str) -> Result<String, ValidationError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ValidationError::MissingField(name));
    }
    Ok(v.to_string())
}

/// Parses a quantity the way the entry form does: surrounding whitespace is
/// ignored, anything that is not an integer is rejected, negatives and
/// values above [`MAX_QUANTITY`] are rejected separately.
pub fn parse_quantity(raw: &str) -> Result<u32, ValidationError> {
    let t = raw.trim();
    let n: i64 = t
        .parse()
        .map_err(|_| ValidationError::InvalidQuantity(t.to_string()))?;
    if n < 0 {
        return Err(ValidationError::NegativeQuantity(n));
    }
    match u32::try_from(n) {
        Ok(q) if q <= MAX_QUANTITY => Ok(q),
        _ => Err(ValidationError::QuantityTooLarge(n)),
    }
}
