//! Column materializer

use std::collections::HashSet;

use crate::model::ColumnCatalog;
use crate::model::ColumnDescriptor;
use crate::model::ColumnType;
use crate::model::RendererRef;
use crate::prefs::ViewPreferences;

/// Id of the row selector column.
pub const COLUMN_SELECT_ID: &str = "select";
/// Id of the row actions column.
pub const COLUMN_ACTIONS_ID: &str = "actions";

/// Resolved column width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnWidth {
    /// Fixed width in pixels.
    Fixed(u32),
    /// Left to the renderer.
    #[default]
    Auto,
}

impl ColumnWidth {
    /// Returns the pixel width, if fixed.
    pub fn px(self) -> Option<u32> {
        match self {
            ColumnWidth::Fixed(px) => Some(px),
            ColumnWidth::Auto => None,
        }
    }
}

/// What a rendered column shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// A selectable catalog column.
    Data(ColumnType),
    /// A pinned catalog column, always visible.
    Pinned(ColumnType),
    /// Row selection checkboxes.
    Selector,
    /// Per-row action menu.
    Actions,
}

/// Kind of a synthetic (non-data) column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticKind {
    Selector,
    Actions,
}

/// A non-data column occupying a fixed leading or trailing slot.
///
/// Synthetic columns never read or write preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticColumn {
    pub id: String,
    pub label: String,
    pub kind: SyntheticKind,
    pub width: Option<u32>,
}

impl SyntheticColumn {
    /// The standard row selector column.
    pub fn selector() -> Self {
        Self {
            id: COLUMN_SELECT_ID.to_string(),
            label: String::new(),
            kind: SyntheticKind::Selector,
            width: Some(50),
        }
    }

    /// The standard row actions column.
    pub fn actions() -> Self {
        Self {
            id: COLUMN_ACTIONS_ID.to_string(),
            label: String::new(),
            kind: SyntheticKind::Actions,
            width: Some(56),
        }
    }

    /// Overrides the width.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }
}

/// A column ready for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderColumn {
    pub id: String,
    pub label: String,
    pub width: ColumnWidth,
    /// Position in the final column list, starting at 0.
    pub order_index: usize,
    pub is_synthetic: bool,
    pub kind: ColumnKind,
    /// `None` for synthetic columns.
    pub renderer: Option<RendererRef>,
    pub custom_meta: Option<serde_json::Value>,
}

/// Merge a catalog with preferences into the ordered list of columns to
/// render.
///
/// Layout is `leading`, pinned catalog columns, selected catalog columns,
/// `trailing`. Selected columns follow `column_order`; selected columns it
/// does not mention come after, in catalog order. Preference ids that are
/// not in the catalog are ignored. Widths come from `column_widths`, then
/// the descriptor default, else [`ColumnWidth::Auto`].
///
/// Pure: the same inputs always give the same output.
///
/// # Example
///
/// ```
/// use tableview_lib::columns::{materialize, SyntheticColumn};
/// use tableview_lib::model::{ColumnCatalog, ColumnDescriptor, ColumnType};
/// use tableview_lib::prefs::ViewPreferences;
///
/// let catalog = ColumnCatalog::<()>::new(vec![
///     ColumnDescriptor::new("A", "A", ColumnType::String),
///     ColumnDescriptor::new("B", "B", ColumnType::String),
///     ColumnDescriptor::new("C", "C", ColumnType::String),
/// ])
/// .unwrap();
/// let mut prefs = ViewPreferences::with_selected(["A", "C", "gone"]);
/// prefs.column_order = vec!["C".into(), "A".into()];
///
/// let columns = materialize(&catalog, &prefs, &[SyntheticColumn::selector()], &[]);
/// let ids: Vec<_> = columns.iter().map(|c| c.id.as_str()).collect();
/// assert_eq!(ids, ["select", "C", "A"]);
/// ```
pub fn materialize<R>(
    catalog: &ColumnCatalog<R>,
    prefs: &ViewPreferences,
    leading: &[SyntheticColumn],
    trailing: &[SyntheticColumn],
) -> Vec<RenderColumn> {
    let data = ordered_columns(catalog, &prefs.column_order)
        .into_iter()
        .filter(|column| prefs.is_selected(&column.id));

    let mut out = Vec::with_capacity(leading.len() + catalog.pinned().len() + catalog.len() + trailing.len());

    out.extend(leading.iter().map(synthetic_column));
    out.extend(
        catalog
            .pinned()
            .iter()
            .map(|column| data_column(column, prefs, ColumnKind::Pinned(column.column_type))),
    );
    out.extend(data.map(|column| data_column(column, prefs, ColumnKind::Data(column.column_type))));
    out.extend(trailing.iter().map(synthetic_column));

    for (index, column) in out.iter_mut().enumerate() {
        column.order_index = index;
    }
    out
}

/// Every selectable catalog column in display order, selected or not.
///
/// Ids from `order` come first (unknown and repeated ids skipped), the
/// rest follow in catalog order.
pub fn ordered_columns<'a, R>(
    catalog: &'a ColumnCatalog<R>,
    order: &[String],
) -> Vec<&'a ColumnDescriptor<R>> {
    let mut placed = HashSet::with_capacity(catalog.len());
    let mut out = Vec::with_capacity(catalog.len());

    for id in order {
        if let Some(column) = catalog.columns().iter().find(|c| &c.id == id)
            && placed.insert(column.id.as_str())
        {
            out.push(column);
        }
    }
    for column in catalog.columns() {
        if placed.insert(column.id.as_str()) {
            out.push(column);
        }
    }
    out
}

fn data_column<R>(column: &ColumnDescriptor<R>, prefs: &ViewPreferences, kind: ColumnKind) -> RenderColumn {
    let width = prefs
        .column_widths
        .get(&column.id)
        .copied()
        .or(column.default_width)
        .map(ColumnWidth::Fixed)
        .unwrap_or_default();

    RenderColumn {
        id: column.id.clone(),
        label: column.label.clone(),
        width,
        order_index: 0,
        is_synthetic: false,
        kind,
        renderer: Some(column.renderer()),
        custom_meta: column.custom_meta.clone(),
    }
}

fn synthetic_column(column: &SyntheticColumn) -> RenderColumn {
    RenderColumn {
        id: column.id.clone(),
        label: column.label.clone(),
        width: column.width.map(ColumnWidth::Fixed).unwrap_or_default(),
        order_index: 0,
        is_synthetic: true,
        kind: match column.kind {
            SyntheticKind::Selector => ColumnKind::Selector,
            SyntheticKind::Actions => ColumnKind::Actions,
        },
        renderer: None,
        custom_meta: None,
    }
}
