//! Combinatorial construction of case and subcase parameter lists.

use serde::Serialize;

use crate::params::{to_param_value, ParamRecord};

/// A list of parameter records built up as a cartesian product.
///
/// ```
/// use casework_core::ParamGrid;
///
/// let grid = ParamGrid::new()
///     .combine("format", ["r8unorm", "rgba8unorm"])
///     .combine("size", [1, 4])
///     .filter(|p| p.get_as::<u32>("size") != Some(1) || p.get_as::<String>("format").as_deref() == Some("r8unorm"));
/// assert_eq!(grid.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParamGrid {
    records: Vec<ParamRecord>,
}

impl ParamGrid {
    /// A grid holding a single empty record.
    pub fn new() -> Self {
        ParamGrid {
            records: vec![ParamRecord::new()],
        }
    }

    /// Cross every record with each of `values` under `key`.
    ///
    /// # Panics
    ///
    /// If a value has no JSON form, as [`ParamRecord::insert`] does.
    #[track_caller]
    pub fn combine<V, I>(self, key: &str, values: I) -> Self
    where
        V: Serialize,
        I: IntoIterator<Item = V>,
    {
        let mut converted = Vec::new();
        for v in values {
            match to_param_value(&v) {
                Ok(value) => converted.push(value),
                Err(reason) => panic!("parameter {:?} cannot be recorded: {}", key, reason),
            }
        }
        let values = converted;
        let mut records = Vec::with_capacity(self.records.len() * values.len());
        for record in &self.records {
            for value in &values {
                let mut next = record.clone();
                next.insert(key, value);
                records.push(next);
            }
        }
        ParamGrid { records }
    }

    /// Cross every record with the records `f` derives from it.
    pub fn expand<I>(self, f: impl Fn(&ParamRecord) -> I) -> Self
    where
        I: IntoIterator<Item = ParamRecord>,
    {
        let records = self
            .records
            .iter()
            .flat_map(|record| {
                f(record)
                    .into_iter()
                    .map(|extra| record.merge(&extra))
                    .collect::<Vec<_>>()
            })
            .collect();
        ParamGrid { records }
    }

    /// Keep only records matching `pred`.
    pub fn filter(mut self, pred: impl Fn(&ParamRecord) -> bool) -> Self {
        self.records.retain(|r| pred(r));
        self
    }

    /// Drop records matching `pred`.
    pub fn unless(self, pred: impl Fn(&ParamRecord) -> bool) -> Self {
        self.filter(|r| !pred(r))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParamRecord> {
        self.records.iter()
    }
}

impl Default for ParamGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoIterator for ParamGrid {
    type Item = ParamRecord;
    type IntoIter = std::vec::IntoIter<ParamRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl From<ParamGrid> for Vec<ParamRecord> {
    fn from(grid: ParamGrid) -> Self {
        grid.records
    }
}
