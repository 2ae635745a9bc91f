// engine/src/engine/pair.rs
#![forbid(unsafe_code)]

use crate::engine::amoeba::Colour;
use crate::engine::arena::AmoebaId;
use crate::engine::constants::GRID_WIDTH;

/// Where the satellite sits relative to the main amoeba.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    #[default]
    Top,
    Right,
    Bottom,
    Left,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Top,
        Orientation::Right,
        Orientation::Bottom,
        Orientation::Left,
    ];

    /// Satellite offset from main in board coordinates (y grows downwards).
    #[inline]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Orientation::Top => (0, -1),
            Orientation::Right => (1, 0),
            Orientation::Bottom => (0, 1),
            Orientation::Left => (-1, 0),
        }
    }

    #[inline]
    pub fn clockwise(self) -> Self {
        match self {
            Orientation::Top => Orientation::Right,
            Orientation::Right => Orientation::Bottom,
            Orientation::Bottom => Orientation::Left,
            Orientation::Left => Orientation::Top,
        }
    }

    #[inline]
    pub fn counter_clockwise(self) -> Self {
        match self {
            Orientation::Top => Orientation::Left,
            Orientation::Left => Orientation::Bottom,
            Orientation::Bottom => Orientation::Right,
            Orientation::Right => Orientation::Top,
        }
    }

    fn quarter_turns(self) -> u8 {
        match self {
            Orientation::Top => 0,
            Orientation::Right => 1,
            Orientation::Bottom => 2,
            Orientation::Left => 3,
        }
    }

    /// Clockwise quarter turns needed to reach `target` (0..=3).
    #[inline]
    pub fn clockwise_turns_to(self, target: Orientation) -> u8 {
        (target.quarter_turns() + 4 - self.quarter_turns()) % 4
    }
}

/// Final resting transform of a pair: main column plus satellite orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub main_x: usize,
    pub orientation: Orientation,
}

impl Move {
    /// `None` if the satellite would leave the board.
    pub fn new(main_x: usize, orientation: Orientation) -> Option<Self> {
        let mv = Self {
            main_x,
            orientation,
        };
        let sx = main_x as i32 + orientation.offset().0;
        (main_x < GRID_WIDTH && sx >= 0 && (sx as usize) < GRID_WIDTH).then_some(mv)
    }

    #[inline]
    pub fn satellite_x(&self) -> usize {
        (self.main_x as i32 + self.orientation.offset().0) as usize
    }

    /// Every in-bounds move, in search order: columns ascending, then Top/Right/Bottom/Left.
    pub fn all() -> impl Iterator<Item = Move> {
        (0..GRID_WIDTH).flat_map(|x| Orientation::ALL.into_iter().filter_map(move |o| Move::new(x, o)))
    }
}

/// The live, player-controlled pair. Coordinates are board cells; `half_step` means the pair
/// sits half a cell below `y`, straddling rows `y` and `y + 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FallingPair {
    pub(crate) main: AmoebaId,
    pub(crate) satellite: AmoebaId,
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) orientation: Orientation,
    pub(crate) half_step: bool,
}

impl FallingPair {
    #[inline]
    pub(crate) fn satellite_pos(&self) -> (i32, i32) {
        let (dx, dy) = self.orientation.offset();
        (self.x + dx, self.y + dy)
    }

    #[inline]
    pub(crate) fn cells(&self) -> [(i32, i32); 2] {
        [(self.x, self.y), self.satellite_pos()]
    }
}

/// Read-only description of the live pair for controllers and renderers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FallingPairView {
    pub main: Colour,
    pub satellite: Colour,
    pub main_x: i32,
    pub main_y: i32,
    pub orientation: Orientation,
    pub half_step: bool,
    /// True while a rotation animation blocks further rotations.
    pub rotating: bool,
}

impl FallingPairView {
    #[inline]
    pub fn satellite_pos(&self) -> (i32, i32) {
        let (dx, dy) = self.orientation.offset();
        (self.main_x + dx, self.main_y + dy)
    }

    #[inline]
    pub fn current_move(&self) -> Option<Move> {
        usize::try_from(self.main_x)
            .ok()
            .and_then(|x| Move::new(x, self.orientation))
    }
}
