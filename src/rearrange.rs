//! Slide reordering from a drag-and-drop list gesture.

#[cfg(test)]
#[path = "rearrange_test.rs"]
mod tests;

/// Where a dragged list item was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropResult {
    pub source: usize,
    /// `None` when released outside the list.
    pub destination: Option<usize>,
}

/// The reordered sequence, or `None` when the drop changes nothing.
///
/// A drop outside the list, onto its own position, from an index that does
/// not exist or past the end of the list aborts.
#[must_use]
pub fn reorder<T: Clone>(items: &[T], drop: DropResult) -> Option<Vec<T>> {
    let destination = drop.destination?;
    if destination == drop.source || drop.source >= items.len() || destination >= items.len() {
        return None;
    }
    let mut out = items.to_vec();
    let moved = out.remove(drop.source);
    out.insert(destination, moved);
    Some(out)
}
