use rand::seq::SliceRandom;
use serde::Deserialize;

/// Insert `value` at a modularly wrapped index: `-1` and `len + 1` both
/// land on valid positions (`len` and `0` of a wrapped revolution), so any
/// index is accepted.
pub fn insert_wrapped<T>(vec: &mut Vec<T>, index: isize, value: T) {
    let positions = vec.len() as isize + 1;
    let index = ((index % positions) + positions) % positions;
    vec.insert(index as usize, value);
}

/// Config shape accepting either a bare value or a list of values.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(values) => values,
            OneOrMany::One(value) => vec![value],
        }
    }
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        value.into_vec()
    }
}

/// Uniform in-place shuffle using the thread RNG.
pub fn shuffle<T>(slice: &mut [T]) {
    slice.shuffle(&mut rand::thread_rng());
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn insert_in_range() {
        let mut values = vec![1, 2, 3];
        insert_wrapped(&mut values, 1, 9);
        assert_eq!(values, [1, 9, 2, 3]);
    }

    #[test]
    fn insert_at_end() {
        let mut values = vec![1, 2, 3];
        insert_wrapped(&mut values, 3, 9);
        assert_eq!(values, [1, 2, 3, 9]);
    }

    #[test]
    fn negative_index_wraps_from_end() {
        let mut values = vec![1, 2, 3];
        insert_wrapped(&mut values, -1, 9);
        assert_eq!(values, [1, 2, 3, 9]);
        insert_wrapped(&mut values, -2, 8);
        assert_eq!(values, [1, 2, 3, 8, 9]);
    }

    #[test]
    fn overflowing_index_wraps_to_front() {
        let mut values = vec![1, 2, 3];
        insert_wrapped(&mut values, 4, 9);
        assert_eq!(values, [9, 1, 2, 3]);
    }

    #[test]
    fn insert_into_empty() {
        let mut values: Vec<u8> = Vec::new();
        insert_wrapped(&mut values, -7, 1);
        assert_eq!(values, [1]);
    }

    #[test]
    fn one_or_many_from_json() {
        let one: OneOrMany<u32> = serde_json::from_str("3").unwrap();
        assert_eq!(one.into_vec(), [3]);
        let many: OneOrMany<u32> = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(many.into_vec(), [1, 2, 3]);
    }

    #[test]
    fn one_or_many_from_ron() {
        let one: OneOrMany<String> = ron::de::from_str("\"a\"").unwrap();
        assert_eq!(one.into_vec(), ["a"]);
        let many: OneOrMany<String> = ron::de::from_str("[\"a\", \"b\"]").unwrap();
        assert_eq!(Vec::from(many), ["a", "b"]);
    }

    #[test]
    fn shuffle_keeps_elements() {
        let mut values: Vec<u32> = (0..100).collect();
        shuffle(&mut values);
        assert_eq!(values.len(), 100);
        let mut sorted = values.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..100).collect::<Vec<u32>>());
    }
}
