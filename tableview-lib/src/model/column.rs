//! Column descriptors

use std::fmt;
use std::sync::Arc;
use std::sync::OnceLock;

use serde::Deserialize;
use serde::Serialize;

use super::CellValue;
use super::NumberMapRenderer;
use super::NumberRenderer;
use super::RendererRef;
use super::TextRenderer;
use super::TimeRenderer;

/// Semantic type of a column's values.
///
/// Each variant carries a default renderer; descriptors may override it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    #[default]
    String,
    Number,
    Time,
    /// Named numeric scores.
    NumberDictionary,
    List,
    Dictionary,
}

impl ColumnType {
    /// Returns the shared default renderer for this type.
    pub fn default_renderer(self) -> RendererRef {
        static TEXT: OnceLock<RendererRef> = OnceLock::new();
        static NUMBER: OnceLock<RendererRef> = OnceLock::new();
        static TIME: OnceLock<RendererRef> = OnceLock::new();
        static NUMBER_MAP: OnceLock<RendererRef> = OnceLock::new();

        match self {
            ColumnType::Number => NUMBER.get_or_init(|| RendererRef::new(NumberRenderer)).clone(),
            ColumnType::Time => TIME.get_or_init(|| RendererRef::new(TimeRenderer::default())).clone(),
            ColumnType::NumberDictionary => NUMBER_MAP
                .get_or_init(|| RendererRef::new(NumberMapRenderer))
                .clone(),
            ColumnType::String | ColumnType::List | ColumnType::Dictionary => {
                TEXT.get_or_init(|| RendererRef::new(TextRenderer)).clone()
            }
        }
    }
}

/// Extracts a cell value from a row.
pub type Accessor<R> = Arc<dyn Fn(&R) -> CellValue + Send + Sync>;

/// Static definition of one potential table column.
///
/// # Example
///
/// ```
/// use tableview_lib::model::{CellValue, ColumnDescriptor, ColumnType};
///
/// #[derive(Clone)]
/// struct Experiment { name: String, trace_count: u64 }
///
/// let name = ColumnDescriptor::<Experiment>::new("name", "Name", ColumnType::String)
///     .with_accessor(|e| CellValue::from(e.name.as_str()));
/// let traces = ColumnDescriptor::<Experiment>::new("trace_count", "Trace count", ColumnType::Number)
///     .with_accessor(|e| CellValue::from(e.trace_count))
///     .with_default_width(120);
/// ```
pub struct ColumnDescriptor<R> {
    /// Identifier, unique within a catalog.
    pub id: String,
    /// Header label.
    pub label: String,
    pub column_type: ColumnType,
    pub accessor: Option<Accessor<R>>,
    /// Renderer override; `None` uses the column type's default.
    pub renderer: Option<RendererRef>,
    /// Opaque metadata for the renderer (e.g. link targets).
    pub custom_meta: Option<serde_json::Value>,
    /// Width in pixels when no preference exists.
    pub default_width: Option<u32>,
}

impl<R> ColumnDescriptor<R> {
    /// Creates a descriptor with no accessor, renderer override or width.
    pub fn new(id: impl Into<String>, label: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            column_type,
            accessor: None,
            renderer: None,
            custom_meta: None,
            default_width: None,
        }
    }

    /// Sets the accessor.
    pub fn with_accessor(mut self, accessor: impl Fn(&R) -> CellValue + Send + Sync + 'static) -> Self {
        self.accessor = Some(Arc::new(accessor));
        self
    }

    /// Overrides the type's default renderer.
    pub fn with_renderer(mut self, renderer: RendererRef) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Attaches opaque renderer metadata.
    pub fn with_custom_meta(mut self, meta: serde_json::Value) -> Self {
        self.custom_meta = Some(meta);
        self
    }

    /// Sets the default width in pixels.
    pub fn with_default_width(mut self, width: u32) -> Self {
        self.default_width = Some(width);
        self
    }

    /// Returns the effective renderer: the override, else the type default.
    pub fn renderer(&self) -> RendererRef {
        self.renderer
            .clone()
            .unwrap_or_else(|| self.column_type.default_renderer())
    }

    /// Reads this column's value from a row. Null without an accessor.
    pub fn value(&self, row: &R) -> CellValue {
        self.accessor
            .as_ref()
            .map(|accessor| accessor(row))
            .unwrap_or_default()
    }

    /// Reads and renders this column's cell for a row.
    pub fn render(&self, row: &R) -> String {
        self.renderer().render(&self.value(row))
    }
}

impl<R> Clone for ColumnDescriptor<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            label: self.label.clone(),
            column_type: self.column_type,
            accessor: self.accessor.clone(),
            renderer: self.renderer.clone(),
            custom_meta: self.custom_meta.clone(),
            default_width: self.default_width,
        }
    }
}

impl<R> fmt::Debug for ColumnDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("column_type", &self.column_type)
            .field("accessor", &self.accessor.as_ref().map(|_| "<fn>"))
            .field("renderer", &self.renderer)
            .field("custom_meta", &self.custom_meta)
            .field("default_width", &self.default_width)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Prompt {
        versions: u32,
    }

    #[test]
    fn test_default_renderer_is_shared() {
        assert_eq!(ColumnType::Number.default_renderer(), ColumnType::Number.default_renderer());
        assert_eq!(ColumnType::List.default_renderer(), ColumnType::String.default_renderer());
        assert_ne!(ColumnType::Time.default_renderer(), ColumnType::String.default_renderer());
    }

    #[test]
    fn test_render_through_accessor() {
        let column = ColumnDescriptor::<Prompt>::new("version_count", "Versions", ColumnType::Number)
            .with_accessor(|p| CellValue::from(p.versions as i64));
        assert_eq!(column.render(&Prompt { versions: 3 }), "3");
    }

    #[test]
    fn test_missing_accessor_renders_empty() {
        let column = ColumnDescriptor::<Prompt>::new("description", "Description", ColumnType::String);
        assert_eq!(column.value(&Prompt { versions: 1 }), CellValue::Null);
        assert_eq!(column.render(&Prompt { versions: 1 }), "");
    }
}
