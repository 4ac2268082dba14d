use core::num::NonZero;

// Small handles in unit tests so the capacity limit is reachable.
#[cfg(test)]
type Slot = u16;
#[cfg(not(test))]
type Slot = u32;

/// Index of a node slot in the tree's arena.
///
/// Stored off by one in a `NonZero` so that `Option<Handle>` (an absent child link)
/// costs nothing over a bare handle.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<Slot>);

impl Handle {
    /// The largest slot index a handle can name.
    pub(crate) const MAX: usize = (Slot::MAX - 1) as usize;

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn new(slot: usize) -> Self {
        assert!(slot <= Self::MAX, "`Handle::new()` - arena slot is out of range!");
        match NonZero::new((slot + 1) as Slot) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

/// Where a subtree hangs: the tree's root, or one side of a parent node.
///
/// Removal walks down with a `Link` in hand so the parent can be re-pointed without
/// recursing back up.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Link {
    Root,
    Left(Handle),
    Right(Handle),
}
