//! Fixed-capacity board registry.
//!
//! Boards live in an arena of [`REGISTRY_CAPACITY`] slots and are named by
//! [`BoardId`]. Iteration and address lookup follow insertion order, so
//! when two unconfigured boards both answer the probe, the one added first
//! wins.

use crate::board::{Board, BoardId, SlotHandle};
use crate::error::{IdeError, Result};
use crate::variant::Variant;

pub const REGISTRY_CAPACITY: usize = 10;

#[derive(Debug)]
struct Entry {
    board: Board,
    /// Prober slot waiting to pick this board up.
    handle: Option<SlotHandle>,
    /// Prober slot the board was allocated for.
    owner: SlotHandle,
}

#[derive(Debug)]
pub struct Registry {
    slots: Vec<Option<Entry>>,
    order: Vec<BoardId>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: (0..REGISTRY_CAPACITY).map(|_| None).collect(),
            order: Vec::with_capacity(REGISTRY_CAPACITY),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.order.len() == REGISTRY_CAPACITY
    }

    /// Store `board` in the first free slot, associated with `handle`.
    ///
    /// A handle that already owns a board gets that board back and the
    /// new one is dropped.
    pub fn allocate(&mut self, handle: SlotHandle, board: Board) -> Result<BoardId> {
        if let Some(id) = self.find_owner(handle) {
            return Ok(id);
        }
        let Some(index) = self.slots.iter().position(Option::is_none) else {
            return Err(IdeError::RegistryFull {
                capacity: REGISTRY_CAPACITY,
            });
        };
        self.slots[index] = Some(Entry {
            board,
            handle: Some(handle),
            owner: handle,
        });
        let id = BoardId(index);
        self.order.push(id);
        Ok(id)
    }

    /// Board allocated for `handle`, whether or not it has been resolved.
    #[must_use]
    pub fn find_owner(&self, handle: SlotHandle) -> Option<BoardId> {
        self.order
            .iter()
            .copied()
            .find(|id| self.entry(*id).is_some_and(|e| e.owner == handle))
    }

    /// Hand the board waiting on `handle` to the prober.
    ///
    /// Each handle resolves once; the association is consumed.
    pub fn resolve(&mut self, handle: SlotHandle) -> Option<BoardId> {
        let id = self
            .order
            .iter()
            .copied()
            .find(|id| self.entry(*id).is_some_and(|e| e.handle == Some(handle)))?;
        if let Some(entry) = self.slots[id.0].as_mut() {
            entry.handle = None;
        }
        Some(id)
    }

    /// Board occupying `(variant, instance)`. Both GVP halves share one
    /// family but are distinct boards.
    #[must_use]
    pub fn find_instance(&self, variant: Variant, instance: usize) -> Option<BoardId> {
        self.order.iter().copied().find(|id| {
            self.get(*id)
                .is_some_and(|b| b.variant() == variant && b.instance() == instance)
        })
    }

    /// First board, in insertion order, that answers `addr`.
    #[must_use]
    pub fn find_by_address(&self, addr: u32) -> Option<BoardId> {
        self.order
            .iter()
            .copied()
            .find(|id| self.get(*id).is_some_and(|b| b.claims(addr)))
    }

    pub fn remove(&mut self, id: BoardId) -> Option<Board> {
        let entry = self.slots.get_mut(id.0)?.take()?;
        self.order.retain(|&other| other != id);
        Some(entry.board)
    }

    #[must_use]
    pub fn get(&self, id: BoardId) -> Option<&Board> {
        self.entry(id).map(|e| &e.board)
    }

    pub fn get_mut(&mut self, id: BoardId) -> Option<&mut Board> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .map(|e| &mut e.board)
    }

    fn entry(&self, id: BoardId) -> Option<&Entry> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Boards in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (BoardId, &Board)> + '_ {
        self.order
            .iter()
            .filter_map(move |&id| self.get(id).map(|b| (id, b)))
    }

    /// Visit every board mutably, in insertion order.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(BoardId, &mut Board)) {
        for &id in &self.order {
            if let Some(entry) = self.slots[id.0].as_mut() {
                f(id, &mut entry.board);
            }
        }
    }

    /// Remove every board, oldest first.
    pub fn drain(&mut self) -> Vec<Board> {
        let order = std::mem::take(&mut self.order);
        order
            .into_iter()
            .filter_map(|id| self.slots[id.0].take().map(|e| e.board))
            .collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BoardConfig, BoardOptions, GvpModel};
    use zorro_autoconfig::{ExpansionBus, REG_BASE_ADDRESS};

    struct NullBus;

    impl ExpansionBus for NullBus {
        fn map_window(&mut self, _base: u32, _size: u32) {}
        fn shut_up(&mut self) {}
    }

    fn board(variant: Variant, instance: usize) -> Board {
        let layout = variant
            .layout(&BoardOptions::default(), GvpModel::SeriesII)
            .unwrap();
        Board::new(
            &BoardConfig::new(variant).instance(instance),
            GvpModel::SeriesII,
            layout,
            None,
            None,
        )
        .unwrap()
    }

    #[test]
    fn allocate_fills_first_free_slot() {
        let mut registry = Registry::new();
        let a = registry.allocate(SlotHandle(1), board(Variant::Alf, 0)).unwrap();
        let b = registry.allocate(SlotHandle(2), board(Variant::Mtec, 0)).unwrap();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        registry.remove(a).unwrap();
        let c = registry.allocate(SlotHandle(3), board(Variant::AdIde, 0)).unwrap();
        assert_eq!(c.index(), 0);
        // Iteration follows insertion, not slot index.
        let order: Vec<_> = registry.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![b, c]);
    }

    #[test]
    fn redundant_allocation_returns_existing_board() {
        let mut registry = Registry::new();
        let a = registry.allocate(SlotHandle(7), board(Variant::Alf, 0)).unwrap();
        let again = registry.allocate(SlotHandle(7), board(Variant::Mtec, 0)).unwrap();
        assert_eq!(a, again);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(a).unwrap().variant(), Variant::Alf);
    }

    #[test]
    fn full_registry_rejects() {
        let mut registry = Registry::new();
        for i in 0..REGISTRY_CAPACITY {
            registry
                .allocate(SlotHandle(i as u32), board(Variant::Alf, i % 4))
                .unwrap();
        }
        assert!(registry.is_full());
        assert_eq!(
            registry.allocate(SlotHandle(99), board(Variant::Alf, 0)),
            Err(IdeError::RegistryFull {
                capacity: REGISTRY_CAPACITY
            })
        );
    }

    #[test]
    fn resolve_consumes_the_association() {
        let mut registry = Registry::new();
        let a = registry.allocate(SlotHandle(5), board(Variant::Alf, 0)).unwrap();
        assert_eq!(registry.resolve(SlotHandle(4)), None);
        assert_eq!(registry.resolve(SlotHandle(5)), Some(a));
        assert_eq!(registry.resolve(SlotHandle(5)), None);
        // Still owned for redundant-allocation purposes.
        assert_eq!(registry.find_owner(SlotHandle(5)), Some(a));
    }

    #[test]
    fn find_instance_distinguishes_variants() {
        let mut registry = Registry::new();
        let alf = registry.allocate(SlotHandle(1), board(Variant::Alf, 1)).unwrap();
        registry.allocate(SlotHandle(2), board(Variant::Mtec, 1)).unwrap();
        assert_eq!(registry.find_instance(Variant::Alf, 1), Some(alf));
        assert_eq!(registry.find_instance(Variant::Alf, 0), None);
    }

    #[test]
    fn address_lookup_prefers_earliest_unconfigured() {
        let mut registry = Registry::new();
        let first = registry.allocate(SlotHandle(1), board(Variant::Alf, 0)).unwrap();
        let second = registry.allocate(SlotHandle(2), board(Variant::Mtec, 0)).unwrap();
        assert_eq!(registry.find_by_address(0xE8_0000), Some(first));

        registry
            .get_mut(first)
            .unwrap()
            .autoconfig_mut()
            .write(REG_BASE_ADDRESS, 0xE9, &mut NullBus);
        assert_eq!(registry.find_by_address(0xE9_0010), Some(first));
        assert_eq!(registry.find_by_address(0xE8_0000), Some(second));
    }

    #[test]
    fn drain_empties_in_insertion_order() {
        let mut registry = Registry::new();
        registry.allocate(SlotHandle(1), board(Variant::Alf, 0)).unwrap();
        registry.allocate(SlotHandle(2), board(Variant::Mtec, 0)).unwrap();
        let boards = registry.drain();
        assert_eq!(
            boards.iter().map(Board::variant).collect::<Vec<_>>(),
            vec![Variant::Alf, Variant::Mtec]
        );
        assert!(registry.is_empty());
        assert!(registry.slots.iter().all(Option::is_none));
    }
}
