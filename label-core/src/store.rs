use crate::record::{LabelFields, Record, RecordId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("label {0} not found")]
    NotFound(RecordId),
}

/// Insertion-ordered collection of records with its own id counter.
///
/// Edits keep a record's position, deletes never renumber, and `clear` leaves
/// the counter where it was so ids are never handed out twice.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    next_id: RecordId,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, fields: LabelFields) -> RecordId {
        let id = self.next_id;
        self.next_id += 1;
        self.records.push(Record { id, fields });
        id
    }

    pub fn list(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn update(&mut self, id: RecordId, fields: LabelFields) -> Result<(), StoreError> {
        let rec = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        rec.fields = fields;
        Ok(())
    }

    pub fn delete(&mut self, id: RecordId) -> Result<Record, StoreError> {
        let pos = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        Ok(self.records.remove(pos))
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Appends every candidate in order, each with a fresh id.
    pub fn import<I>(&mut self, candidates: I) -> Vec<Record>
    where
        I: IntoIterator<Item = LabelFields>,
    {
        candidates
            .into_iter()
            .map(|fields| {
                let id = self.create(fields.clone());
                Record { id, fields }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn next_id(&self) -> RecordId {
        self.next_id
    }
}
