use alloc::boxed::Box;
use alloc::string::String;
use core::cmp::Ordering;

use crate::error::Result;
use crate::value::cmp_f64;

/// A three-way ordering over keys of type `K`.
///
/// Maps and sets call [`compare`](Comparator::compare) with the probe key first and the
/// stored key second. Keys for which [`is_absent`](Comparator::is_absent) holds are never
/// handed to `compare`.
///
/// A comparator must be a total order over every key ever placed in one container:
/// reflexive, antisymmetric and transitive. This is not checked; an inconsistent comparator
/// leaves the container's ordering unspecified (though memory-safe).
///
/// Any `Fn(&K, &K) -> Ordering` is a comparator, so a plain closure works. A closure sees
/// every key it is handed, null-like or not:
///
/// ```
/// use somap::SoMap;
///
/// let mut map = SoMap::<&str, u32, _>::with_comparator(|a, b| b.cmp(a));
/// map.set("a", 1).unwrap().set("b", 2).unwrap();
/// assert_eq!(map.min(), Some((&"b", &2)));
/// ```
pub trait Comparator<K: ?Sized> {
    /// Orders `a` relative to `b`.
    ///
    /// # Errors
    ///
    /// Returns an error if the two keys cannot be ordered against each other.
    fn compare(&self, a: &K, b: &K) -> Result<Ordering>;

    /// Whether `key` is null-like and must stay out of every comparison.
    fn is_absent(&self, key: &K) -> bool {
        let _ = key;
        false
    }
}

/// Ordering and null-likeness a key type carries on its own.
///
/// Implemented for the primitive integer types, `bool`, `char`, `str`, `String`, the floats,
/// [`Value`](crate::Value), `Option<T>` and references/boxes of those.
pub trait NaturalOrder {
    /// The natural three-way order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`](crate::Error::TypeMismatch) when the two keys are
    /// dynamically of different kinds.
    fn natural_cmp(&self, other: &Self) -> Result<Ordering>;

    /// Whether this key is null-like. Defaults to `false`.
    fn is_absent(&self) -> bool {
        false
    }
}

/// The default comparator: each key's [`NaturalOrder`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Natural;

impl<K: NaturalOrder + ?Sized> Comparator<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Result<Ordering> {
        a.natural_cmp(b)
    }

    #[inline]
    fn is_absent(&self, key: &K) -> bool {
        key.is_absent()
    }
}

impl<K, F> Comparator<K> for F
where
    K: ?Sized,
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Result<Ordering> {
        Ok(self(a, b))
    }
}

/// Inverts another comparator.
///
/// ```
/// use somap::{Natural, Reversed, SoSet};
///
/// let mut set = SoSet::with_ordering(Reversed(Natural));
/// set.add(1).unwrap().add(3).unwrap().add(2).unwrap();
/// assert_eq!(set.to_string(), "SoSet 3 { 3, 2, 1 }");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Reversed<C>(pub C);

impl<K: ?Sized, C: Comparator<K>> Comparator<K> for Reversed<C> {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Result<Ordering> {
        self.0.compare(a, b).map(Ordering::reverse)
    }

    #[inline]
    fn is_absent(&self, key: &K) -> bool {
        self.0.is_absent(key)
    }
}

macro_rules! natural_order_from_ord {
    ($($t:ty),* $(,)?) => {$(
        impl NaturalOrder for $t {
            #[inline]
            fn natural_cmp(&self, other: &Self) -> Result<Ordering> {
                Ok(Ord::cmp(self, other))
            }
        }
    )*};
}

natural_order_from_ord!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, bool, char, str, String,
);

impl NaturalOrder for f64 {
    #[inline]
    fn natural_cmp(&self, other: &Self) -> Result<Ordering> {
        Ok(cmp_f64(*self, *other))
    }
}

impl NaturalOrder for f32 {
    #[inline]
    fn natural_cmp(&self, other: &Self) -> Result<Ordering> {
        Ok(cmp_f64(f64::from(*self), f64::from(*other)))
    }
}

/// `None` is null-like.
impl<T: NaturalOrder> NaturalOrder for Option<T> {
    fn natural_cmp(&self, other: &Self) -> Result<Ordering> {
        match (self, other) {
            (Some(a), Some(b)) => a.natural_cmp(b),
            _ => Ok(self.is_some().cmp(&other.is_some())),
        }
    }

    fn is_absent(&self) -> bool {
        self.is_none()
    }
}

impl<T: NaturalOrder + ?Sized> NaturalOrder for &T {
    #[inline]
    fn natural_cmp(&self, other: &Self) -> Result<Ordering> {
        (**self).natural_cmp(*other)
    }

    #[inline]
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

impl<T: NaturalOrder + ?Sized> NaturalOrder for Box<T> {
    #[inline]
    fn natural_cmp(&self, other: &Self) -> Result<Ordering> {
        (**self).natural_cmp(other)
    }

    #[inline]
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}
