use label_core::{LabelForm, Record, RecordId};
use sheet_core::{FontSizes, Pager, PreviewFrame, build_preview, total_instances, total_pages};

/// What the desktop view shows: the last fetched list, the selected record
/// (by id, never by position), the preview page and the record being edited.
#[derive(Debug, Clone, Default)]
pub struct Session {
    records: Vec<Record>,
    selected: Option<RecordId>,
    pager: Pager,
    editing: Option<RecordId>,
    refreshes: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Replaces the list with a fresh snapshot. The selection follows its id
    /// and is dropped when that id is gone.
    pub fn apply_refresh(&mut self, records: Vec<Record>) {
        let keep = self.selected;
        self.records = records;
        self.selected = keep.filter(|id| self.records.iter().any(|r| r.id == *id));
        self.pager.clamp(self.total_pages());
        self.refreshes += 1;
    }

    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }

    pub fn select_index(&mut self, index: usize) -> Option<RecordId> {
        self.selected = self.records.get(index).map(|r| r.id);
        self.selected
    }

    pub fn select_id(&mut self, id: RecordId) -> bool {
        if self.records.iter().any(|r| r.id == id) {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<RecordId> {
        self.selected
    }

    pub fn selected_index(&self) -> Option<usize> {
        let id = self.selected?;
        self.records.iter().position(|r| r.id == id)
    }

    pub fn selected_record(&self) -> Option<&Record> {
        let id = self.selected?;
        self.records.iter().find(|r| r.id == id)
    }

    /// Starts editing the selected record and returns its fields pre-filled.
    pub fn begin_edit(&mut self) -> Option<LabelForm> {
        let rec = self.selected_record()?;
        let form = LabelForm::from_record(rec);
        self.editing = Some(rec.id);
        Some(form)
    }

    pub fn editing_id(&self) -> Option<RecordId> {
        self.editing
    }

    /// Leaves edit mode, returning the id that was being edited.
    pub fn finish_edit(&mut self) -> Option<RecordId> {
        self.editing.take()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(total_instances(&self.records))
    }

    pub fn current_page(&self) -> usize {
        self.pager.current()
    }

    pub fn next_page(&mut self) -> bool {
        let total = self.total_pages();
        self.pager.next(total)
    }

    pub fn prev_page(&mut self) -> bool {
        self.pager.prev()
    }

    pub fn preview(&self, sizes: &FontSizes) -> PreviewFrame {
        build_preview(&self.records, self.pager.current(), sizes)
    }

    pub fn summary_lines(&self) -> Vec<String> {
        self.records.iter().map(Record::summary_line).collect()
    }
}
