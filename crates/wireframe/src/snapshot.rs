use std::collections::BTreeMap;

use serde::Serialize;

/// Immutable view of every parameter value at one instant.
///
/// Surfaces read from a snapshot rather than the live store so a mesh is a
/// function of the values alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParameterSnapshot {
    values: BTreeMap<String, f64>,
}

impl ParameterSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Returns the named value, or `fallback` when the snapshot lacks it.
    pub fn value_or(&self, name: &str, fallback: f64) -> f64 {
        self.get(name).unwrap_or(fallback)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ParameterSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_or_falls_back_for_missing_names() {
        let snapshot = ParameterSnapshot::new().with("amp", 0.5);
        assert_eq!(snapshot.value_or("amp", 9.0), 0.5);
        assert_eq!(snapshot.value_or("freq", 9.0), 9.0);
    }

    #[test]
    fn iterates_in_name_order() {
        let snapshot: ParameterSnapshot = [("b", 2.0), ("a", 1.0)].into_iter().collect();
        let names: Vec<_> = snapshot.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
