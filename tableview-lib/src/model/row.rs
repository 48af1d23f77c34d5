//! Row identity

/// A record shown as one table row.
///
/// The id must be unique within a single page of results; it is the key
/// used by both the renderer and the selection tracker.
pub trait Row: Clone + Send + Sync + 'static {
    /// Returns the row's stable identifier.
    fn id(&self) -> String;
}
