// engine/src/engine/groups.rs
#![forbid(unsafe_code)]

use crate::engine::amoeba::{Colour, NeighbourState};
use crate::engine::constants::{cell_coords, checked_index, GRID_CELLS};

/// One 4-connected same-colour component.
#[derive(Clone, Debug, Default)]
pub(crate) struct Group {
    pub(crate) colour: Colour,
    pub(crate) cells: Vec<usize>,
    /// Ghost cells orthogonally touching the group (each listed once).
    pub(crate) contact_ghosts: Vec<usize>,
}

impl Group {
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    /// Mean cell coordinate, used to place chain labels.
    pub(crate) fn centroid(&self) -> (f32, f32) {
        let n = self.cells.len().max(1) as f32;
        let (sx, sy) = self.cells.iter().fold((0.0f32, 0.0f32), |(ax, ay), &i| {
            let (x, y) = cell_coords(i);
            (ax + x as f32, ay + y as f32)
        });
        (sx / n, sy / n)
    }
}

const DIRECTIONS: [(i32, i32, NeighbourState); 4] = [
    (0, -1, NeighbourState::TOP),
    (1, 0, NeighbourState::RIGHT),
    (0, 1, NeighbourState::BOTTOM),
    (-1, 0, NeighbourState::LEFT),
];

#[inline]
fn orthogonal(idx: usize) -> impl Iterator<Item = (usize, NeighbourState)> {
    let (x, y) = cell_coords(idx);
    DIRECTIONS
        .into_iter()
        .filter_map(move |(dx, dy, bit)| checked_index(x as i32 + dx, y as i32 + dy).map(|n| (n, bit)))
}

/// Partition the board into same-colour components.
///
/// A single visited set is shared by the whole scan, so every non-ghost cell ends up in
/// exactly one group. Ghost and empty cells never start or join a group.
pub(crate) fn find_groups<F>(colour_at: F) -> Vec<Group>
where
    F: Fn(usize) -> Colour,
{
    let mut visited = [false; GRID_CELLS];
    let mut groups = Vec::new();
    let mut stack: Vec<usize> = Vec::with_capacity(GRID_CELLS);

    for start in 0..GRID_CELLS {
        let colour = colour_at(start);
        if visited[start] || !colour.is_playable() {
            continue;
        }

        let mut group = Group {
            colour,
            ..Group::default()
        };
        visited[start] = true;
        stack.push(start);

        while let Some(cur) = stack.pop() {
            group.cells.push(cur);
            for (n, _) in orthogonal(cur) {
                let c = colour_at(n);
                if c == Colour::Ghost {
                    if !group.contact_ghosts.contains(&n) {
                        group.contact_ghosts.push(n);
                    }
                } else if c == colour && !visited[n] {
                    visited[n] = true;
                    stack.push(n);
                }
            }
        }

        groups.push(group);
    }

    groups
}

/// Same-colour neighbour mask of one cell. Ghosts and empty cells have no neighbours.
pub(crate) fn neighbour_mask<F>(colour_at: F, idx: usize) -> NeighbourState
where
    F: Fn(usize) -> Colour,
{
    let colour = colour_at(idx);
    let mut mask = NeighbourState::NONE;
    if !colour.is_playable() {
        return mask;
    }
    for (n, bit) in orthogonal(idx) {
        if colour_at(n) == colour {
            mask.insert(bit);
        }
    }
    mask
}
