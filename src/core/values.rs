use serde::{Deserialize, Serialize};

/// Stream of content values handed from one step to the next.
///
/// `Single` carries a scalar value. Single-value-aware steps answer a scalar
/// with a scalar, while uniform-sequence steps always answer with a
/// `Sequence`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Values<T> {
    Single(T),
    Sequence(Vec<T>),
}

impl<T> Values<T> {
    pub fn single(value: T) -> Self {
        Values::Single(value)
    }

    pub fn sequence(values: impl IntoIterator<Item = T>) -> Self {
        Values::Sequence(values.into_iter().collect())
    }

    pub fn is_single(&self) -> bool {
        matches!(self, Values::Single(_))
    }

    /// Number of content values in the stream. A scalar counts as one.
    pub fn len(&self) -> usize {
        match self {
            Values::Single(_) => 1,
            Values::Sequence(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            Values::Single(value) => std::slice::from_ref(value).iter(),
            Values::Sequence(values) => values.iter(),
        }
    }

    pub fn into_vec(self) -> Vec<T> {
        match self {
            Values::Single(value) => vec![value],
            Values::Sequence(values) => values,
        }
    }

    /// Map every value one-to-one, keeping the shape of the stream.
    ///
    /// Stops at the first error; no partial stream is returned.
    pub fn try_map_ref<U, E, F>(&self, mut f: F) -> Result<Values<U>, E>
    where
        F: FnMut(&T) -> Result<U, E>,
    {
        match self {
            Values::Single(value) => f(value).map(Values::Single),
            Values::Sequence(values) => values
                .iter()
                .map(f)
                .collect::<Result<Vec<_>, _>>()
                .map(Values::Sequence),
        }
    }
}

impl<T> From<Vec<T>> for Values<T> {
    fn from(values: Vec<T>) -> Self {
        Values::Sequence(values)
    }
}

impl<T> IntoIterator for Values<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Values<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
