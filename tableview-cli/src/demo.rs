//! Demo experiment listing served from memory.

use std::collections::BTreeMap;

use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;
use tableview_lib::error::CatalogError;
use tableview_lib::model::CellValue;
use tableview_lib::model::ColumnCatalog;
use tableview_lib::model::ColumnDescriptor;
use tableview_lib::model::ColumnType;
use tableview_lib::model::Row;

pub const DEFAULT_SELECTED: [&str; 4] = ["dataset", "created_at", "trace_count", "feedback_scores"];

#[derive(Debug, Clone)]
pub struct Experiment {
    pub id: String,
    pub name: String,
    pub dataset_name: String,
    pub created_at: DateTime<Utc>,
    pub trace_count: u64,
    pub feedback_scores: BTreeMap<String, f64>,
}

impl Row for Experiment {
    fn id(&self) -> String {
        self.id.clone()
    }
}

/// `name` is pinned; everything else is user-selectable.
pub fn catalog() -> Result<ColumnCatalog<Experiment>, CatalogError> {
    ColumnCatalog::with_pinned(
        vec![
            ColumnDescriptor::new("name", "Name", ColumnType::String)
                .with_accessor(|e: &Experiment| CellValue::from(e.name.as_str()))
                .with_default_width(200),
        ],
        vec![
            ColumnDescriptor::new("id", "ID", ColumnType::String)
                .with_accessor(|e: &Experiment| CellValue::from(e.id.as_str())),
            ColumnDescriptor::new("dataset", "Dataset", ColumnType::String)
                .with_accessor(|e: &Experiment| CellValue::from(e.dataset_name.as_str()))
                .with_custom_meta(serde_json::json!({
                    "nameKey": "dataset_name",
                    "idKey": "dataset_id",
                    "resource": "dataset",
                })),
            ColumnDescriptor::new("created_at", "Created", ColumnType::Time)
                .with_accessor(|e: &Experiment| CellValue::from(e.created_at)),
            ColumnDescriptor::new("trace_count", "Trace count", ColumnType::Number)
                .with_accessor(|e: &Experiment| CellValue::from(e.trace_count))
                .with_default_width(96),
            ColumnDescriptor::new("feedback_scores", "Feedback scores (average)", ColumnType::NumberDictionary)
                .with_accessor(|e: &Experiment| CellValue::from(e.feedback_scores.clone()))
                .with_default_width(280),
        ],
    )
}

/// Deterministic sample rows.
pub fn experiments(count: usize) -> Vec<Experiment> {
    let datasets = ["golden-qa", "support-tickets", "rag-eval"];
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).single().unwrap_or_default();

    (0..count)
        .map(|i| {
            let mut feedback_scores = BTreeMap::new();
            feedback_scores.insert("accuracy".to_string(), ((i * 37) % 100) as f64 / 100.0);
            if i % 3 == 0 {
                feedback_scores.insert("hallucination".to_string(), ((i * 11) % 10) as f64 / 10.0);
            }
            Experiment {
                id: format!("exp-{:04}", i + 1),
                name: format!("{}-run-{}", datasets[i % datasets.len()], i + 1),
                dataset_name: datasets[i % datasets.len()].to_string(),
                created_at: start + Duration::hours(i as i64 * 7),
                trace_count: (i as u64 * 13) % 250,
                feedback_scores,
            }
        })
        .collect()
}

/// Case-insensitive name match.
pub fn matches(experiment: &Experiment, search: &str) -> bool {
    experiment.name.to_lowercase().contains(&search.to_lowercase())
}
