//! Spare items read from spreadsheet exports.
//!
//! The prime worksheet is exported as CSV with a header row followed by one row per prime
//! set: the base name, then five label/quantity/ducats column triples (blueprint and four
//! components), then a status marker.
use crate::error::Error;
use crate::Result;
use common::url_name;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const NAME_COLUMN: usize = 0;
const PART_COLUMNS: [usize; 5] = [1, 4, 7, 10, 13];
const STATUS_COLUMN: usize = 16;
/// Status of a set that is complete, so none of its parts are wanted.
const COMPLETE_MARKER: &str = "YES";
/// Sets whose blueprint is not traded as `<set>_prime_blueprint`.
const UNTRADED_BLUEPRINTS: [&str; 1] = ["kavasa"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    pub item_identifier: String,
    pub quantity: i64,
}

impl InventoryEntry {
    pub fn new(item_identifier: impl Into<String>, quantity: i64) -> Self {
        Self {
            item_identifier: item_identifier.into(),
            quantity,
        }
    }
}

pub trait InventorySource {
    /// Items with a positive quantity that may be sold.
    fn list_sellable(&self) -> Result<Vec<InventoryEntry>>;
}

/// Merges repeated identifiers: the last quantity wins, the first position is kept.
pub fn dedupe(entries: impl IntoIterator<Item = InventoryEntry>) -> Vec<InventoryEntry> {
    let mut merged: Vec<InventoryEntry> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        match positions.get(&entry.item_identifier) {
            Some(&index) => merged[index].quantity = entry.quantity,
            None => {
                positions.insert(entry.item_identifier.clone(), merged.len());
                merged.push(entry);
            }
        }
    }

    merged
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimePart {
    /// Base name of the set, e.g. `Mag`.
    pub set: String,
    /// Part label, e.g. `Systems`.
    pub label: String,
    /// `None` when the quantity cell is blank.
    pub quantity: Option<i64>,
    pub ducats: Option<i64>,
    /// Marker of the row the part came from; parts of marked rows are not for sale.
    pub status: String,
}

impl PrimePart {
    pub fn identifier(&self) -> String {
        url_name(&format!("{} prime {}", self.set, self.label))
    }

    pub fn display_name(&self) -> String {
        format!("{} Prime {}", self.set, self.label)
    }

    pub fn set_name(&self) -> String {
        format!("{} Prime", self.set)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PrimeRow {
    parts: Vec<PrimePart>,
    status: String,
}

pub struct PrimeSheet {
    rows: Vec<PrimeRow>,
}

impl PrimeSheet {
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in reader.records() {
            if let Some(row) = parse_prime_row(&record?)? {
                rows.push(row);
            }
        }

        Ok(Self { rows })
    }

    pub fn parts(&self) -> impl Iterator<Item = &PrimePart> {
        self.rows.iter().flat_map(|row| row.parts.iter())
    }

    /// Parts tracked with a quantity of exactly zero on sets that are not complete.
    pub fn list_missing(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter(|row| !row.status.eq_ignore_ascii_case(COMPLETE_MARKER))
            .flat_map(|row| row.parts.iter())
            .filter(|part| part.quantity == Some(0))
            .map(PrimePart::identifier)
            .collect()
    }
}

impl InventorySource for PrimeSheet {
    fn list_sellable(&self) -> Result<Vec<InventoryEntry>> {
        Ok(dedupe(
            self.rows
                .iter()
                .filter(|row| row.status.is_empty())
                .flat_map(|row| row.parts.iter())
                .filter_map(|part| match part.quantity {
                    Some(quantity) if quantity > 0 => {
                        Some(InventoryEntry::new(part.identifier(), quantity))
                    }
                    _ => None,
                }),
        ))
    }
}

fn cell(record: &StringRecord, column: usize) -> &str {
    record.get(column).unwrap_or_default()
}

fn line(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or_default()
}

fn number(record: &StringRecord, column: usize) -> Result<Option<i64>> {
    let value = cell(record, column);
    if value.is_empty() {
        return Ok(None);
    }

    match value.parse::<i64>() {
        Ok(n) if n >= 0 => Ok(Some(n)),
        _ => Err(Error::Parse(format!(
            "line {}, column {}: expected a count, found {value:?}",
            line(record),
            column + 1
        ))),
    }
}

fn parse_prime_row(record: &StringRecord) -> Result<Option<PrimeRow>> {
    let set = cell(record, NAME_COLUMN);
    if set.is_empty() {
        return Ok(None);
    }
    let status = cell(record, STATUS_COLUMN);

    let mut parts = Vec::new();
    for (index, &column) in PART_COLUMNS.iter().enumerate() {
        let label = cell(record, column);
        if label.is_empty() {
            continue;
        }
        if index == 0 && UNTRADED_BLUEPRINTS.contains(&set.to_lowercase().as_str()) {
            continue;
        }

        parts.push(PrimePart {
            set: set.to_string(),
            label: label.to_string(),
            quantity: number(record, column + 1)?,
            ducats: number(record, column + 2)?,
            status: status.to_string(),
        });
    }

    Ok(Some(PrimeRow {
        parts,
        status: status.to_string(),
    }))
}

/// Two-column (name, quantity) export used for plain items and mods.
pub struct ItemSheet {
    entries: Vec<InventoryEntry>,
}

impl ItemSheet {
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut entries = Vec::new();
        for record in reader.records() {
            let record = record?;
            let name = cell(&record, 0);
            if name.is_empty() {
                continue;
            }
            let quantity = number(&record, 1)?.unwrap_or_default();
            entries.push(InventoryEntry::new(url_name(name), quantity));
        }

        Ok(Self { entries })
    }
}

impl InventorySource for ItemSheet {
    fn list_sellable(&self) -> Result<Vec<InventoryEntry>> {
        Ok(dedupe(
            self.entries
                .iter()
                .filter(|entry| entry.quantity > 0)
                .cloned(),
        ))
    }
}
