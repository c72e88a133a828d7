use std::collections::HashMap;
use std::hash::Hash;

/// Most frequent value, or `None` for empty input.
///
/// Ties go to the value whose first occurrence comes earliest in `values`.
pub fn mode<T, I>(values: I) -> Option<T>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash + Clone,
{
    let mut counts: HashMap<T, usize> = HashMap::new();
    let mut first_seen: Vec<T> = Vec::new();

    for value in values {
        match counts.get_mut(&value) {
            Some(count) => *count += 1,
            None => {
                counts.insert(value.clone(), 1);
                first_seen.push(value);
            }
        }
    }

    let mut best: Option<(T, usize)> = None;
    for value in first_seen {
        let count = counts[&value];
        if best.as_ref().is_none_or(|(_, top)| count > *top) {
            best = Some((value, count));
        }
    }

    best.map(|(value, _)| value)
}

/// Smallest and largest value, or `None` for empty input.
pub fn min_max<T: Ord + Copy>(values: impl IntoIterator<Item = T>) -> Option<(T, T)> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
