//! Cell renderers

use std::fmt;
use std::sync::Arc;

use super::CellValue;

/// Turns a cell value into display text.
///
/// Each [`ColumnType`](super::ColumnType) supplies a default renderer; a
/// descriptor can override it. The materializer never calls renderers, it
/// only carries the reference through to the rendering side.
pub trait Renderer: Send + Sync {
    /// Renders one cell.
    fn render(&self, value: &CellValue) -> String;
}

/// Shared handle to a renderer, compared by identity.
#[derive(Clone)]
pub struct RendererRef(Arc<dyn Renderer>);

impl RendererRef {
    /// Wraps a renderer.
    pub fn new(renderer: impl Renderer + 'static) -> Self {
        Self(Arc::new(renderer))
    }

    /// Renders one cell through the wrapped renderer.
    pub fn render(&self, value: &CellValue) -> String {
        self.0.render(value)
    }
}

impl PartialEq for RendererRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for RendererRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RendererRef({:p})", Arc::as_ptr(&self.0))
    }
}

impl<F> Renderer for F
where
    F: Fn(&CellValue) -> String + Send + Sync,
{
    fn render(&self, value: &CellValue) -> String {
        self(value)
    }
}

/// Plain text rendering; the fallback for every value shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn render(&self, value: &CellValue) -> String {
        format_value(value)
    }
}

/// Numeric rendering. Whole numbers drop the fraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberRenderer;

impl Renderer for NumberRenderer {
    fn render(&self, value: &CellValue) -> String {
        match value {
            CellValue::Number(n) => format_number(*n),
            other => format_value(other),
        }
    }
}

/// Timestamp rendering with a chrono format string.
#[derive(Debug, Clone, Copy)]
pub struct TimeRenderer {
    pub format: &'static str,
}

impl Default for TimeRenderer {
    fn default() -> Self {
        Self {
            format: "%m/%d/%y %I:%M %p",
        }
    }
}

impl Renderer for TimeRenderer {
    fn render(&self, value: &CellValue) -> String {
        match value {
            CellValue::Time(t) => t.format(self.format).to_string(),
            other => format_value(other),
        }
    }
}

/// Renders named scores as `name: value` pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberMapRenderer;

impl Renderer for NumberMapRenderer {
    fn render(&self, value: &CellValue) -> String {
        match value {
            CellValue::NumberMap(map) => map
                .iter()
                .map(|(name, score)| format!("{}: {}", name, format_number(*score)))
                .collect::<Vec<_>>()
                .join(", "),
            other => format_value(other),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", (n * 1000.0).round() / 1000.0)
    }
}

fn format_value(value: &CellValue) -> String {
    match value {
        CellValue::Null => String::new(),
        CellValue::String(s) => s.clone(),
        CellValue::Number(n) => format_number(*n),
        CellValue::Time(t) => t.to_rfc3339(),
        CellValue::NumberMap(map) => map
            .iter()
            .map(|(k, v)| format!("{}: {}", k, format_number(*v)))
            .collect::<Vec<_>>()
            .join(", "),
        CellValue::List(items) => items.iter().map(format_value).collect::<Vec<_>>().join(", "),
        CellValue::Map(map) => map
            .iter()
            .map(|(k, v)| format!("{}: {}", k, format_value(v)))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_number_renderer() {
        assert_eq!(NumberRenderer.render(&CellValue::Number(12.0)), "12");
        assert_eq!(NumberRenderer.render(&CellValue::Number(0.12345)), "0.123");
        assert_eq!(NumberRenderer.render(&CellValue::Null), "");
    }

    #[test]
    fn test_time_renderer() {
        let t = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap();
        assert_eq!(TimeRenderer::default().render(&CellValue::Time(t)), "03/05/24 02:30 PM");
    }

    #[test]
    fn test_number_map_renderer() {
        let mut scores = BTreeMap::new();
        scores.insert("accuracy".to_string(), 0.5);
        scores.insert("hallucination".to_string(), 1.0);
        assert_eq!(
            NumberMapRenderer.render(&CellValue::NumberMap(scores)),
            "accuracy: 0.5, hallucination: 1"
        );
    }

    #[test]
    fn test_renderer_ref_identity() {
        let a = RendererRef::new(TextRenderer);
        let b = a.clone();
        let c = RendererRef::new(TextRenderer);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_closure_renderer() {
        let upper = RendererRef::new(|v: &CellValue| v.as_str().unwrap_or_default().to_uppercase());
        assert_eq!(upper.render(&CellValue::from("abc")), "ABC");
    }
}
