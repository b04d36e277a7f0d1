//! In-memory record store.
//!
//! Records are keyed by the id of their `id` reference and kept in
//! insertion order. The store is also the [`Resolver`] for its own
//! filters, so `siteRef->dis` style paths resolve against sibling records.

use std::borrow::Cow;
use std::collections::HashMap;
use std::ops::ControlFlow;

use tracing::debug;

use crate::{
    ast::Filter,
    error::{Error, Result},
    evaluator::Resolver,
    value::{Dict, Grid, Reference, Value},
};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: HashMap<String, Dict>,
    order: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every row; each must carry an `id` reference.
    pub fn from_rows(rows: impl IntoIterator<Item = Dict>) -> Result<Self> {
        let mut store = Self::new();
        for row in rows {
            store.insert(row)?;
        }
        Ok(store)
    }

    pub fn from_grid(grid: &Grid) -> Result<Self> {
        Self::from_rows(grid.rows().iter().cloned())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Dict> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// Store `record`, replacing any record with the same id. Returns the
    /// replaced record.
    pub fn insert(&mut self, record: Dict) -> Result<Option<Dict>> {
        let id = record_id(&record)?;
        let previous = self.records.insert(id.clone(), record);
        if previous.is_none() {
            self.order.push(id);
        }
        Ok(previous)
    }

    /// Replace an existing record. Returns `false` when the id is unknown.
    pub fn update(&mut self, record: Dict) -> Result<bool> {
        let id = record_id(&record)?;
        match self.records.get_mut(&id) {
            Some(slot) => {
                *slot = record;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Dict> {
        let removed = self.records.remove(id)?;
        self.order.retain(|k| k != id);
        Some(removed)
    }

    pub fn get(&self, id: &str) -> Option<&Dict> {
        self.records.get(id)
    }

    /// First record in insertion order that matches.
    pub fn read(&self, filter: &Filter) -> Option<&Dict> {
        self.iter().find(|rec| filter.include(rec, self))
    }

    pub fn read_all(&self, filter: &Filter) -> Vec<&Dict> {
        let mut found = Vec::new();
        self.scan(filter, |rec| {
            found.push(rec);
            ControlFlow::Continue(())
        });
        found
    }

    /// Visit matching records in order until `visit` breaks. Returns the
    /// number of records visited.
    pub fn scan<'s>(
        &'s self,
        filter: &Filter,
        mut visit: impl FnMut(&'s Dict) -> ControlFlow<()>,
    ) -> usize {
        let mut scanned = 0;
        let mut included = 0;
        for rec in self.iter() {
            scanned += 1;
            if !filter.include(rec, self) {
                continue;
            }
            included += 1;
            if visit(rec).is_break() {
                break;
            }
        }
        debug!(%filter, scanned, included, "store scan finished");
        included
    }

    pub fn count(&self, filter: &Filter) -> usize {
        self.scan(filter, |_| ControlFlow::Continue(()))
    }

    /// Remove every matching record. Returns how many were removed.
    pub fn delete_all(&mut self, filter: &Filter) -> usize {
        let ids: Vec<String> = self
            .iter()
            .filter(|rec| filter.include(rec, self))
            .filter_map(|rec| rec.id().map(|r| r.id().to_string()))
            .collect();
        for id in &ids {
            self.remove(id);
        }
        ids.len()
    }

    /// Rewrite every non-`id` reference in `record` whose target is stored
    /// and has a display name, so the reference carries that name.
    pub fn fill_dis(&self, record: &mut Dict) {
        let filled: Vec<(String, Reference)> = record
            .iter()
            .filter(|(key, _)| *key != "id")
            .filter_map(|(key, value)| {
                let Value::Reference(r) = value else {
                    return None;
                };
                let dis = self.get(r.id())?.dis_or_none()?;
                Reference::with_dis(r.id(), dis)
                    .ok()
                    .map(|r| (key.to_string(), r))
            })
            .collect();
        for (key, reference) in filled {
            record.insert(key, reference);
        }
    }

    /// [`MemoryStore::read_all`] with references display-filled.
    pub fn read_all_with_dis(&self, filter: &Filter) -> Vec<Dict> {
        self.read_all(filter)
            .into_iter()
            .map(|rec| {
                let mut rec = rec.clone();
                self.fill_dis(&mut rec);
                rec
            })
            .collect()
    }
}

fn record_id(record: &Dict) -> Result<String> {
    record
        .id()
        .map(|r| r.id().to_string())
        .ok_or_else(|| Error::invalid_value("Record has no id reference"))
}

impl Resolver for MemoryStore {
    fn find(&self, id: &str) -> Option<Cow<'_, Dict>> {
        self.get(id).map(Cow::Borrowed)
    }
}
