pub mod form;
pub mod record;
pub mod store;

pub use form::{LabelForm, ValidationError, parse_quantity};
pub use record::{LabelFields, MAX_QUANTITY, Record, RecordId};
pub use store::{RecordStore, StoreError};
