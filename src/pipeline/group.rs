//! Generic group-by over row collections

use std::collections::BTreeMap;

/// Group `items` by `key_fn` and reduce each group with `aggregate`.
///
/// Items whose key is `None` belong to no group. The result is ordered by key.
pub fn group_by<T, K, A, F, G>(items: impl IntoIterator<Item = T>, mut key_fn: F, mut aggregate: G) -> BTreeMap<K, A>
where
    K: Ord,
    F: FnMut(&T) -> Option<K>,
    G: FnMut(&[T]) -> A,
{
    let mut groups: BTreeMap<K, Vec<T>> = BTreeMap::new();
    for item in items {
        if let Some(key) = key_fn(&item) {
            groups.entry(key).or_default().push(item);
        }
    }

    groups
        .into_iter()
        .map(|(key, rows)| {
            let aggregated = aggregate(&rows);
            (key, aggregated)
        })
        .collect()
}
