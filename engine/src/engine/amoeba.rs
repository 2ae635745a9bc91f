// engine/src/engine/amoeba.rs
#![forbid(unsafe_code)]

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Colour {
    Red,
    Blue,
    Green,
    Orange,
    Purple,
    /// Penalty filler: never groups, dies only next to a removed group.
    Ghost,
    /// Empty-cell sentinel.
    #[default]
    None,
}

impl Colour {
    /// Colours the pair generator draws from.
    pub const PLAYABLE: [Colour; 5] = [
        Colour::Red,
        Colour::Blue,
        Colour::Green,
        Colour::Orange,
        Colour::Purple,
    ];

    #[inline]
    pub fn is_playable(self) -> bool {
        !matches!(self, Colour::Ghost | Colour::None)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Colour::None
    }

    pub fn glyph(self) -> char {
        match self {
            Colour::Red => 'R',
            Colour::Blue => 'B',
            Colour::Green => 'G',
            Colour::Orange => 'O',
            Colour::Purple => 'P',
            Colour::Ghost => '#',
            Colour::None => '.',
        }
    }

    /// Inverse of `glyph()`; `' '` is accepted as empty.
    pub fn from_glyph(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'R' => Some(Colour::Red),
            'B' => Some(Colour::Blue),
            'G' => Some(Colour::Green),
            'O' => Some(Colour::Orange),
            'P' => Some(Colour::Purple),
            '#' => Some(Colour::Ghost),
            '.' | ' ' => Some(Colour::None),
            _ => None,
        }
    }
}

/// Same-colour orthogonal neighbours; selects the sprite variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NeighbourState(u8);

impl NeighbourState {
    pub const NONE: Self = Self(0);
    pub const TOP: Self = Self(1);
    pub const RIGHT: Self = Self(1 << 1);
    pub const BOTTOM: Self = Self(1 << 2);
    pub const LEFT: Self = Self(1 << 3);

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

/// One grid occupant. Positions are owned by whoever holds its id (board cell, pair, floating list).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Amoeba {
    colour: Colour,
    neighbours: NeighbourState,
    dying: bool,
    visible: bool,
}

impl Amoeba {
    pub fn new(colour: Colour) -> Self {
        Self {
            colour,
            neighbours: NeighbourState::NONE,
            dying: false,
            visible: true,
        }
    }

    #[inline]
    pub fn colour(&self) -> Colour {
        self.colour
    }

    #[inline]
    pub fn neighbours(&self) -> NeighbourState {
        self.neighbours
    }

    #[inline]
    pub fn is_dying(&self) -> bool {
        self.dying
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_neighbours(&mut self, n: NeighbourState) {
        self.neighbours = n;
    }

    pub(crate) fn mark_dying(&mut self) {
        self.dying = true;
    }

    pub(crate) fn toggle_visible(&mut self) {
        self.visible = !self.visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_roundtrip_covers_every_colour() {
        for c in Colour::PLAYABLE
            .iter()
            .copied()
            .chain([Colour::Ghost, Colour::None])
        {
            assert_eq!(Colour::from_glyph(c.glyph()), Some(c));
        }
        assert_eq!(Colour::from_glyph('x'), None);
    }

    #[test]
    fn neighbour_bits_accumulate() {
        let mut n = NeighbourState::NONE;
        n.insert(NeighbourState::TOP);
        n.insert(NeighbourState::LEFT);
        assert!(n.contains(NeighbourState::TOP));
        assert!(!n.contains(NeighbourState::RIGHT));
        assert_eq!(n.bits(), 0b1001);
    }
}
