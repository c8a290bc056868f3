use serde::{Deserialize, Serialize};
use time::Date;

time::serde::format_description!(pub(crate) iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WeightEntry {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JournalError {
    #[error("weight must be a positive number")]
    InvalidWeight,
}

impl WeightEntry {
    pub fn new(date: Date, weight: f64) -> Result<Self, JournalError> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(JournalError::InvalidWeight);
        }
        Ok(Self { date, weight })
    }
}

/// Weight entries, at most one per date, ascending by date.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct WeightHistory(Vec<WeightEntry>);

impl WeightHistory {
    pub fn entries(&self) -> &[WeightEntry] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Restores the ordering and uniqueness invariants on data read back
    /// from storage. Later duplicates win.
    pub fn normalized(self) -> Self {
        let mut out = Self::default();
        for entry in self.0 {
            out.upsert(entry);
        }
        out
    }

    /// Inserts the entry, replacing any entry already recorded for its date.
    pub fn upsert(&mut self, entry: WeightEntry) {
        match self.0.binary_search_by(|e| e.date.cmp(&entry.date)) {
            Ok(idx) => self.0[idx] = entry,
            Err(idx) => self.0.insert(idx, entry),
        }
    }

    /// Returns whether an entry was removed.
    pub fn remove(&mut self, date: Date) -> bool {
        match self.0.binary_search_by(|e| e.date.cmp(&date)) {
            Ok(idx) => {
                self.0.remove(idx);
                true
            }
            Err(_) => false,
        }
    }

    pub fn summary(&self) -> Option<ProgressSummary> {
        let first = *self.0.first()?;
        let latest = *self.0.last()?;
        let weights = self.0.iter().map(|e| e.weight);
        let lowest = weights.clone().fold(f64::INFINITY, f64::min);
        let highest = weights.fold(f64::NEG_INFINITY, f64::max);
        Some(ProgressSummary {
            first,
            latest,
            change: latest.weight - first.weight,
            lowest,
            highest,
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProgressSummary {
    pub first: WeightEntry,
    pub latest: WeightEntry,
    pub change: f64,
    pub lowest: f64,
    pub highest: f64,
}
