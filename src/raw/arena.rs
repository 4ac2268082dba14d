use alloc::vec::Vec;

use super::handle::Handle;

/// Slot storage for tree nodes.
///
/// Every node is owned by exactly one slot. A slot emptied by [`Arena::take`] goes on the
/// free list and is handed to the next allocation; the node that lived there is gone.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Number of occupied slots.
    #[cfg(test)]
    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(handle) = self.free.pop() {
            self.slots[handle.slot()] = Some(element);
            return handle;
        }

        assert!(
            self.slots.len() <= Handle::MAX,
            "`Arena::alloc()` - arena is full ({} nodes)",
            Handle::MAX + 1
        );
        self.slots.push(Some(element));
        Handle::new(self.slots.len() - 1)
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.slot()].as_ref().expect("`Arena::get()` - `handle` is vacant!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.slot()].as_mut().expect("`Arena::get_mut()` - `handle` is vacant!")
    }

    /// Moves the element out of its slot and frees the slot.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.slot()].take().expect("`Arena::take()` - `handle` is vacant!");
        self.free.push(handle);
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
