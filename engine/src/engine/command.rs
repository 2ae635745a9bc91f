// engine/src/engine/command.rs
#![forbid(unsafe_code)]

/// Player input understood by `Grid::apply`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    MoveLeft,
    MoveRight,
    RotateClockwise,
    RotateCounterClockwise,
    MaxFallingSpeed,
    NormalFallingSpeed,
}
