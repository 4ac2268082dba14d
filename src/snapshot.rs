use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;

/// One step of a [`Snapshot`] cursor.
///
/// Both variants carry the zero-based position: for `Yield` it is the position of `value`,
/// for `Done` it is the snapshot's length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step<T> {
    /// The cursor moved past one element.
    Yield {
        /// Position of `value` in the snapshot.
        index: usize,
        /// The element itself.
        value: T,
    },
    /// The cursor is exhausted or was cancelled.
    Done {
        /// The snapshot's length.
        index: usize,
    },
}

impl<T> Step<T> {
    /// Returns `true` for `Done`.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Step::Done { .. })
    }

    /// The position carried by either variant.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Step::Yield { index, .. } | Step::Done { index } => *index,
        }
    }

    /// Returns the yielded value, or `None` for `Done`.
    pub fn into_value(self) -> Option<T> {
        match self {
            Step::Yield { value, .. } => Some(value),
            Step::Done { .. } => None,
        }
    }
}

/// A cursor over a copy of a container's contents, taken in ascending key order.
///
/// The copy is made in full when the snapshot is created, so mutating the container
/// afterwards is never observed and never invalidates the snapshot. Each snapshot has its own
/// cursor; [`Clone`] forks one at its current position.
///
/// A snapshot runs once: after the last element, or after [`cancel`](Snapshot::cancel), every
/// further step is [`Step::Done`].
///
/// # Examples
///
/// ```
/// use somap::{SoMap, Step};
///
/// let mut map = SoMap::new();
/// map.set(2, "b").unwrap().set(1, "a").unwrap().set(3, "c").unwrap();
///
/// let mut keys = map.keys();
/// map.delete(&2).unwrap();
///
/// assert_eq!(keys.step(), Step::Yield { index: 0, value: 1 });
/// assert_eq!(keys.index(), 1);
/// assert_eq!(keys.cancel(), Step::Done { index: 3 });
/// assert_eq!(keys.step(), Step::Done { index: 3 });
/// ```
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Snapshot<T> {
    buffer: alloc::vec::IntoIter<T>,
    len: usize,
    cursor: usize,
}

impl<T> Snapshot<T> {
    pub(crate) fn new(buffer: Vec<T>) -> Self {
        Self {
            len: buffer.len(),
            buffer: buffer.into_iter(),
            cursor: 0,
        }
    }

    /// Advances the cursor by one.
    pub fn step(&mut self) -> Step<T> {
        match self.buffer.next() {
            Some(value) => {
                let index = self.cursor;
                self.cursor += 1;
                Step::Yield { index, value }
            }
            None => Step::Done { index: self.cursor },
        }
    }

    /// The number of elements yielded so far.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.cursor
    }

    /// The number of elements captured when the snapshot was taken.
    #[must_use]
    pub const fn snapshot_len(&self) -> usize {
        self.len
    }

    /// Ends the sequence early, dropping whatever was not yet yielded.
    ///
    /// Idempotent; the cursor moves to the end, so [`index`](Snapshot::index) reports the
    /// snapshot's length afterwards.
    pub fn cancel(&mut self) -> Step<T> {
        self.buffer = Vec::new().into_iter();
        self.cursor = self.len;
        Step::Done { index: self.cursor }
    }
}

impl<T> Iterator for Snapshot<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.step().into_value()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.cursor;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Snapshot<T> {}

impl<T> FusedIterator for Snapshot<T> {}

impl<T: Clone> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer.clone(),
            len: self.len,
            cursor: self.cursor,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("index", &self.cursor)
            .field("remaining", &self.buffer.as_slice())
            .finish()
    }
}

impl<T> Default for Snapshot<T> {
    /// An empty, already finished snapshot.
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
