// engine/src/engine/arena.rs
#![forbid(unsafe_code)]

use crate::engine::amoeba::Amoeba;

/// Handle to an amoeba stored in a grid's arena. Stale handles (after removal) never resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AmoebaId {
    index: u32,
    generation: u32,
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    amoeba: Option<Amoeba>,
}

/// Single-owner storage for every amoeba of one grid.
///
/// Freed slots are reused with a bumped generation, so ids held across a removal go stale
/// instead of aliasing the new occupant.
#[derive(Clone, Debug, Default)]
pub(crate) struct AmoebaArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl AmoebaArena {
    pub(crate) fn insert(&mut self, amoeba: Amoeba) -> AmoebaId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.amoeba = Some(amoeba);
            return AmoebaId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            amoeba: Some(amoeba),
        });
        AmoebaId {
            index,
            generation: 0,
        }
    }

    pub(crate) fn remove(&mut self, id: AmoebaId) -> Option<Amoeba> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let amoeba = slot.amoeba.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(amoeba)
    }

    #[inline]
    pub(crate) fn get(&self, id: AmoebaId) -> Option<&Amoeba> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.amoeba.as_ref()
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: AmoebaId) -> Option<&mut Amoeba> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.amoeba.as_mut()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.live
    }
}
