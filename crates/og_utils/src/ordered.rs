use core::hash::Hash;

use crate::hash::FixedHashState;

// -----------------------------------------------------------------------------
// OrderedMap

/// An insertion-ordered map.
///
/// A type alias for [`indexmap::IndexMap`] with [`FixedHashState`].
///
/// Note that `IndexMap`'s own `PartialEq` ignores order; use [`ordered_eq`]
/// when the order of entries is significant.
pub type OrderedMap<K, V> = indexmap::IndexMap<K, V, FixedHashState>;

/// Compares two ordered maps entry by entry, including entry order.
///
/// # Examples
///
/// ```
/// use og_utils::{OrderedMap, ordered_eq};
///
/// let mut a = OrderedMap::default();
/// a.insert("a", 1);
/// a.insert("b", 2);
///
/// let mut b = OrderedMap::default();
/// b.insert("b", 2);
/// b.insert("a", 1);
///
/// assert!(a == b);
/// assert!(!ordered_eq(&a, &b, |x, y| x == y));
/// ```
pub fn ordered_eq<K, V>(
    lhs: &OrderedMap<K, V>,
    rhs: &OrderedMap<K, V>,
    mut value_eq: impl FnMut(&V, &V) -> bool,
) -> bool
where
    K: Hash + Eq,
{
    lhs.len() == rhs.len()
        && lhs
            .iter()
            .zip(rhs.iter())
            .all(|((ka, va), (kb, vb))| ka == kb && value_eq(va, vb))
}
