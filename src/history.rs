use crate::errors::HistoryError;

use serde::Deserialize;
use std::{fs::File, io::BufReader, io::Read, path::Path};

#[derive(Debug, Deserialize)]
pub struct ConsumptionRecord {
    pub placement_id: String,
    pub consumption: f64,
}

/// Historical consumption grouped by placement id, in order of first appearance.
#[derive(Debug, Default)]
pub struct History {
    consumption: Vec<(String, Vec<f64>)>,
}

impl History {
    pub fn from_records(records: impl IntoIterator<Item = ConsumptionRecord>) -> Self {
        let mut history = Self::default();
        for record in records {
            match history
                .consumption
                .iter()
                .position(|(id, _)| *id == record.placement_id)
            {
                Some(i) => history.consumption[i].1.push(record.consumption),
                None => history
                    .consumption
                    .push((record.placement_id, vec![record.consumption])),
            }
        }
        history
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, HistoryError> {
        let records: Vec<ConsumptionRecord> = serde_json::from_reader(reader)?;
        Ok(Self::from_records(records))
    }

    pub fn from_path(path: &Path) -> Result<Self, HistoryError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn consumption(&self, placement_id: &str) -> Option<&[f64]> {
        self.consumption
            .iter()
            .find(|(id, _)| id == placement_id)
            .map(|(_, values)| values.as_slice())
    }

    pub fn placement_ids(&self) -> impl Iterator<Item = &str> {
        self.consumption.iter().map(|(id, _)| id.as_str())
    }
}
