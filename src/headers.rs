/// Default separator used when several values of one key are joined.
pub const DEFAULT_VALUE_SEPARATOR: &str = ", ";

/// Ordered, multi-valued header container of one archive part.
///
/// Keys keep the order they were first seen in and the spelling of that
/// first occurrence; lookups ignore ASCII case. Repeated keys append, so
/// every value is retained in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Headers {
    entries: Vec<(String, Vec<String>)>,
}

impl Headers {
    /// Creates an empty header container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value for `key`, keeping any existing values.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(index) => self.entries[index].1.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Returns all values for `key` joined by `", "`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.get_with(key, DEFAULT_VALUE_SEPARATOR)
    }

    /// Returns all values for `key` joined by `separator`.
    pub fn get_with(&self, key: &str, separator: &str) -> Option<String> {
        self.position(key)
            .map(|index| self.entries[index].1.join(separator))
    }

    /// Returns the first value recorded for `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get_all(key).first().map(String::as_str)
    }

    /// Returns every value for `key` in insertion order.
    pub fn get_all(&self, key: &str) -> &[String] {
        match self.position(key) {
            Some(index) => &self.entries[index].1,
            None => &[],
        }
    }

    /// Returns `true` when `key` has at least one value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Iterates over keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Iterates over per-key values joined by `", "`.
    pub fn values(&self) -> impl Iterator<Item = String> + '_ {
        self.entries
            .iter()
            .map(|(_, values)| values.join(DEFAULT_VALUE_SEPARATOR))
    }

    /// Iterates over every value of every key.
    pub fn values_all(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .flat_map(|(_, values)| values.iter().map(String::as_str))
    }

    /// Iterates over `(key, joined values)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, String)> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.join(DEFAULT_VALUE_SEPARATOR)))
    }

    /// Iterates over every `(key, value)` pair, repeating keys with several values.
    pub fn iter_all(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().flat_map(|(key, values)| {
            values
                .iter()
                .map(move |value| (key.as_str(), value.as_str()))
        })
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no header was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(existing, _)| existing.eq_ignore_ascii_case(key))
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (key, value) in iter {
            headers.append(key, value);
        }
        headers
    }
}
