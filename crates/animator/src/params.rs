use std::collections::{BTreeMap, HashMap};

use wireframe::ParameterSnapshot;

use crate::AnimationError;

/// Opaque identity of a running tween, used to claim parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: f64,
    pub default: f64,
}

/// Named scalar state shared by the scheduler and the mesh generator.
///
/// Each parameter has at most one writer at a time: a tween must claim a name
/// before interpolating it, and a second claim fails until the first is released.
#[derive(Debug, Default)]
pub struct ParameterStore {
    parameters: BTreeMap<String, Parameter>,
    claims: HashMap<String, TweenId>,
    next_id: u64,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` with `default` as its initial value. Re-registering an
    /// existing name is a no-op and keeps the current value.
    pub fn register(&mut self, name: impl Into<String>, default: f64) {
        let name = name.into();
        self.parameters
            .entry(name.clone())
            .or_insert(Parameter {
                name,
                value: default,
                default,
            });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<f64, AnimationError> {
        self.parameter(name).map(|parameter| parameter.value)
    }

    pub fn parameter(&self, name: &str) -> Result<&Parameter, AnimationError> {
        self.parameters
            .get(name)
            .ok_or_else(|| AnimationError::UnknownParameter(name.to_string()))
    }

    /// Direct write that bypasses tweening. Refused while a tween owns `name`.
    pub fn set(&mut self, name: &str, value: f64) -> Result<(), AnimationError> {
        if self.claims.contains_key(name) {
            tracing::warn!(parameter = name, "direct write ignored while a tween owns the parameter");
            return Err(AnimationError::ParameterConflict {
                name: name.to_string(),
            });
        }
        let parameter = self
            .parameters
            .get_mut(name)
            .ok_or_else(|| AnimationError::UnknownParameter(name.to_string()))?;
        parameter.value = value;
        Ok(())
    }

    /// Restores every parameter to its default and drops all claims.
    pub fn reset(&mut self) {
        for parameter in self.parameters.values_mut() {
            parameter.value = parameter.default;
        }
        self.claims.clear();
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.keys().map(String::as_str)
    }

    pub fn snapshot(&self) -> ParameterSnapshot {
        self.parameters
            .values()
            .map(|parameter| (parameter.name.clone(), parameter.value))
            .collect()
    }

    pub fn is_claimed(&self, name: &str) -> bool {
        self.claims.contains_key(name)
    }

    pub(crate) fn next_tween_id(&mut self) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Claims every name for `owner`, or none of them.
    pub(crate) fn claim_all<'a, I>(&mut self, owner: TweenId, names: I) -> Result<(), AnimationError>
    where
        I: IntoIterator<Item = &'a str> + Clone,
    {
        for name in names.clone() {
            if !self.parameters.contains_key(name) {
                return Err(AnimationError::UnknownParameter(name.to_string()));
            }
            if self.claims.get(name).is_some_and(|holder| *holder != owner) {
                return Err(AnimationError::ParameterConflict {
                    name: name.to_string(),
                });
            }
        }
        for name in names {
            self.claims.insert(name.to_string(), owner);
        }
        Ok(())
    }

    pub(crate) fn release_all(&mut self, owner: TweenId) {
        self.claims.retain(|_, holder| *holder != owner);
    }

    /// Tween-side write; the caller holds the claim.
    pub(crate) fn write(&mut self, name: &str, value: f64) {
        if let Some(parameter) = self.parameters.get_mut(name) {
            parameter.value = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_is_idempotent() {
        let mut store = ParameterStore::new();
        store.register("amp", 1.0);
        store.set("amp", 4.0).unwrap();
        store.register("amp", 9.0);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("amp"), Ok(4.0));
        assert_eq!(store.parameter("amp").unwrap().default, 1.0);
    }

    #[test]
    fn unknown_names_are_reported() {
        let mut store = ParameterStore::new();
        assert_eq!(
            store.get("missing"),
            Err(AnimationError::UnknownParameter("missing".into()))
        );
        assert!(matches!(
            store.set("missing", 1.0),
            Err(AnimationError::UnknownParameter(_))
        ));
    }

    #[test]
    fn claims_are_exclusive_and_atomic() {
        let mut store = ParameterStore::new();
        store.register("a", 0.0);
        store.register("b", 0.0);
        let first = store.next_tween_id();
        let second = store.next_tween_id();

        store.claim_all(first, ["a"]).unwrap();
        let err = store.claim_all(second, ["b", "a"]).unwrap_err();
        assert_eq!(err, AnimationError::ParameterConflict { name: "a".into() });
        assert!(!store.is_claimed("b"), "failed claim must not leak");

        store.release_all(first);
        store.claim_all(second, ["b", "a"]).unwrap();
        assert!(store.is_claimed("a"));
    }

    #[test]
    fn direct_set_is_refused_while_claimed() {
        let mut store = ParameterStore::new();
        store.register("amp", 0.0);
        let owner = store.next_tween_id();
        store.claim_all(owner, ["amp"]).unwrap();
        assert!(matches!(
            store.set("amp", 1.0),
            Err(AnimationError::ParameterConflict { .. })
        ));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut store = ParameterStore::new();
        store.register("amp", 0.25);
        store.set("amp", 2.0).unwrap();
        store.reset();
        assert_eq!(store.get("amp"), Ok(0.25));
        assert_eq!(store.snapshot().get("amp"), Some(0.25));
    }
}
