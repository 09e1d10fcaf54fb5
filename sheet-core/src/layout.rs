//! Flattening records into printed instances and placing them on the grid.
//!
//! Nothing here knows which way is up: a [`Slot`] carries the row counted
//! from the top of the page, and each renderer picks its own orientation.

use label_core::Record;
use serde::Serialize;

use crate::geometry::{COLS, LABELS_PER_PAGE, ROWS};

/// One printed occurrence of a record.
#[derive(Clone, Copy, Debug)]
pub struct Instance<'a> {
    pub record: &'a Record,
    /// 0-based occurrence within the record's quantity.
    pub occurrence: u32,
}

/// Grid position of a global instance index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub index: usize,
    pub page: usize,
    pub col: usize,
    pub row: usize,
}

impl Slot {
    pub fn row_from_top(&self) -> usize {
        self.row
    }

    /// Row index for surfaces whose origin is the bottom-left corner.
    pub fn row_from_bottom(&self) -> usize {
        ROWS - 1 - self.row
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Placed<'a> {
    pub instance: Instance<'a>,
    pub slot: Slot,
}

pub fn slot_for(index: usize) -> Slot {
    let local = index % LABELS_PER_PAGE;
    Slot {
        index,
        page: index / LABELS_PER_PAGE,
        col: local % COLS,
        row: (local / COLS) % ROWS,
    }
}

pub fn total_instances(records: &[Record]) -> usize {
    records.iter().map(|r| r.quantity() as usize).sum()
}

/// An empty sheet still counts as one page.
pub fn total_pages(total_instances: usize) -> usize {
    total_instances.div_ceil(LABELS_PER_PAGE).max(1)
}

pub fn flatten(records: &[Record]) -> impl Iterator<Item = Instance<'_>> {
    records.iter().flat_map(|record| {
        (0..record.quantity()).map(move |occurrence| Instance { record, occurrence })
    })
}

pub fn place(records: &[Record]) -> impl Iterator<Item = Placed<'_>> {
    flatten(records)
        .enumerate()
        .map(|(i, instance)| Placed {
            instance,
            slot: slot_for(i),
        })
}

/// Instances that land on `page`, i.e. the global range
/// `[page * LABELS_PER_PAGE, (page + 1) * LABELS_PER_PAGE)`.
pub fn page_instances(records: &[Record], page: usize) -> Vec<Placed<'_>> {
    place(records)
        .skip(page * LABELS_PER_PAGE)
        .take(LABELS_PER_PAGE)
        .collect()
}
