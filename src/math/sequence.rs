//! Order-preserving sequence helpers.

use std::collections::HashSet;
use std::hash::Hash;

/// Remove duplicates from a sequence, keeping the first occurrence of each
/// value in its original position.
///
/// Runs in linear time, tracking seen values in a [`HashSet`].
///
/// # Example
///
/// ```
/// use modal_vibs::math::stable_unique;
///
/// assert_eq!(stable_unique([3, 1, 3, 2, 1]), vec![3, 1, 2]);
/// ```
pub fn stable_unique<T, I>(seq: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let iter = seq.into_iter();
    let mut seen = HashSet::with_capacity(iter.size_hint().0);
    iter.filter(|x| seen.insert(x.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_unique() {
        assert_eq!(stable_unique(vec![3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }

    #[test]
    fn test_stable_unique_no_duplicates() {
        assert_eq!(stable_unique(vec![4usize, 0, 2]), vec![4, 0, 2]);
    }

    #[test]
    fn test_stable_unique_empty() {
        let empty: Vec<i32> = Vec::new();
        assert!(stable_unique(empty).is_empty());
    }

    #[test]
    fn test_stable_unique_strings() {
        let names = ["bend1", "tors1", "bend1", "bend2"];
        assert_eq!(stable_unique(names), vec!["bend1", "tors1", "bend2"]);
    }
}
