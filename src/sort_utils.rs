use std::cmp::Ordering;

/// Sort direction for ranked lists.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Desc,
    Asc,
}

impl SortDirection {
    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Stable sort by an `f64` key. Ties keep their input order.
pub fn sort_by_f64<T>(items: &mut [T], direction: SortDirection, key: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| direction.apply(key(a).total_cmp(&key(b))));
}

/// Stable sort by absolute value of an `f64` key, largest magnitude first.
pub fn sort_by_magnitude<T>(items: &mut [T], key: impl Fn(&T) -> f64) {
    sort_by_f64(items, SortDirection::Desc, |item| key(item).abs());
}
