#[cfg(test)]
use crate::location::Location;

#[cfg(test)]
/// Creates a [`std::collections::HashSet`] containing the arguments, similar to [`vec!`].
macro_rules! hashset {
    ($( $x: expr ),* ) => {
        {
            let mut tmp = std::collections::HashSet::new();
            $(
                tmp.insert($x);
            )*
            tmp
        }
    };
}

#[cfg(test)]
/// Assert that the given vector does not contain duplicates, and contains the same items as
/// a comparison vector (ignoring order).
pub(crate) fn check_location_vec(actual: Vec<Location>, expected: Vec<Location>) {
    let actual_set: std::collections::HashSet<Location> = actual.iter().copied().collect();
    assert_eq!(actual_set.len(), actual.len(), "Vec contains duplicates");
    let mut actual_sorted = actual.clone();
    actual_sorted.sort();
    let mut expected_sorted = expected.clone();
    expected_sorted.sort();
    assert_eq!(actual_sorted, expected_sorted);
}
