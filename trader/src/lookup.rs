use crate::Result;
use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Local copy of item url name -> marketplace item id, saved from earlier lookups.
#[derive(Debug, Default)]
pub struct ItemKeyTable {
    keys: HashMap<String, String>,
}

impl ItemKeyTable {
    /// A missing file gives an empty table; every key is then resolved live.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::warn!("Item key table {} not found", path.display());
            return Ok(Self::default());
        }
        let table = Self::from_reader(File::open(path)?)?;
        log::info!("Loaded {} item keys from {}", table.keys.len(), path.display());
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut keys = HashMap::new();
        for record in reader.records() {
            let record = record?;
            if let (Some(item), Some(key)) = (record.get(0), record.get(1)) {
                if !item.is_empty() && !key.is_empty() {
                    // first row wins, as a top-down scan would find it
                    keys.entry(item.to_string()).or_insert_with(|| key.to_string());
                }
            }
        }

        Ok(Self { keys })
    }

    pub fn get(&self, item: &str) -> Option<&str> {
        self.keys.get(item).map(String::as_str)
    }
}
