//! Pagination window with negative-offset resolution

use crate::error::Result;

/// A resolved `[offset, offset + limit)` slice over a result sequence
///
/// The resolved offset is always non-negative; `None` for the limit means
/// the window never truncates. Skipped items are still advanced through by
/// the consuming loop, no engine-side seek is assumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderWindow {
    offset: usize,
    limit: Option<usize>,
}

impl RenderWindow {
    /// Resolve the requested offset and limit.
    ///
    /// A negative offset means "that many from the end" and is resolved
    /// against the total match count; `total` is only invoked in that case
    /// (counting can be expensive). Offsets past the front clamp to 0.
    pub fn resolve<F>(offset: i64, limit: Option<usize>, total: F) -> Result<Self>
    where
        F: FnOnce() -> anyhow::Result<usize>,
    {
        let offset = if offset < 0 {
            let total = total()? as i64;
            (total + offset).max(0) as usize
        } else {
            offset as usize
        };
        Ok(Self { offset, limit })
    }

    /// Index one past the last emitted item; `None` when unlimited
    pub fn end(&self) -> Option<usize> {
        self.limit.map(|limit| self.offset + limit)
    }

    /// Whether iteration can stop at 0-based `index`
    pub fn is_done(&self, index: usize) -> bool {
        self.end().is_some_and(|end| index >= end)
    }

    /// Whether the item at 0-based `index` falls inside the window
    pub fn contains(&self, index: usize) -> bool {
        index >= self.offset && !self.is_done(index)
    }
}
