// engine/src/policy/base.rs
#![forbid(unsafe_code)]

use crate::engine::Grid;

/// Drives one grid: reads its state and issues commands each frame.
///
/// Object-safe so it can be used as `Box<dyn Controller>`.
pub trait Controller {
    fn update(&mut self, elapsed_ms: u32, grid: &mut Grid);

    /// Short label for logs and reports.
    fn name(&self) -> String {
        "controller".to_string()
    }
}
