//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;

use tableview_lib::error::FetchError;
use tableview_lib::model::CellValue;
use tableview_lib::model::ColumnCatalog;
use tableview_lib::model::ColumnDescriptor;
use tableview_lib::model::ColumnType;
use tableview_lib::model::Row;
use tableview_lib::query::PageRequest;
use tableview_lib::query::PageResult;
use tableview_lib::query::RemoteList;

#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub id: String,
    pub name: String,
    pub tokens: u64,
}

impl Row for Trace {
    fn id(&self) -> String {
        self.id.clone()
    }
}

pub fn trace(id: impl Into<String>) -> Trace {
    let id = id.into();
    Trace {
        name: format!("{} name", id),
        tokens: id.len() as u64,
        id,
    }
}

pub fn traces(count: usize) -> Vec<Trace> {
    (1..=count).map(|i| trace(format!("trace-{}", i))).collect()
}

/// Columns `A`, `B`, `C` in that catalog order.
pub fn abc_catalog() -> ColumnCatalog<Trace> {
    ColumnCatalog::new(vec![
        ColumnDescriptor::new("A", "Name", ColumnType::String).with_accessor(|t: &Trace| CellValue::from(t.name.as_str())),
        ColumnDescriptor::new("B", "Tokens", ColumnType::Number)
            .with_accessor(|t: &Trace| CellValue::from(t.tokens))
            .with_default_width(100),
        ColumnDescriptor::new("C", "Id", ColumnType::String).with_accessor(|t: &Trace| CellValue::from(t.id.as_str())),
    ])
    .unwrap()
}

/// A remote whose fetches block until the test releases their page.
#[derive(Default)]
pub struct GatedRemote {
    gates: Mutex<HashMap<u32, Arc<Notify>>>,
    failing: Mutex<HashMap<u32, FetchError>>,
    total: u64,
}

impl GatedRemote {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    fn gate(&self, page: u32) -> Arc<Notify> {
        self.gates.lock().unwrap().entry(page).or_default().clone()
    }

    /// Let the fetch for `page` finish (now or whenever it starts).
    pub fn release(&self, page: u32) {
        self.gate(page).notify_one();
    }

    /// Make the fetch for `page` fail once released.
    pub fn fail(&self, page: u32, error: FetchError) {
        self.failing.lock().unwrap().insert(page, error);
    }
}

#[async_trait]
impl RemoteList<Trace> for GatedRemote {
    async fn fetch(&self, request: PageRequest) -> Result<PageResult<Trace>, FetchError> {
        let gate = self.gate(request.page);
        gate.notified().await;

        if let Some(error) = self.failing.lock().unwrap().get(&request.page).cloned() {
            return Err(error);
        }
        let rows = (0..request.size)
            .map(|i| trace(format!("p{}-{}", request.page, i)))
            .collect();
        Ok(PageResult::new(rows, self.total))
    }
}
