// engine/src/engine/labels.rs
#![forbid(unsafe_code)]

/// Floating "N-chain" marker spawned at a removed group's centroid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChainLabel {
    /// Cell coordinates of the group centroid.
    pub x: f32,
    pub y: f32,
    /// 1-based chain number.
    pub step: u32,
    pub remaining_ms: u32,
}

impl ChainLabel {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.remaining_ms > 0
    }

    pub(crate) fn age(&mut self, elapsed_ms: u32) {
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
    }
}
