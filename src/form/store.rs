use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use super::controller::{FormError, FormResult};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldKey(&'static str);

impl FieldKey {
    pub const fn new(value: &'static str) -> Self {
        Self(value)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

impl Borrow<str> for FieldKey {
    fn borrow(&self) -> &str {
        self.0
    }
}

/// Current text of every declared field. The key set never changes after construction.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FormValues(BTreeMap<FieldKey, String>);

impl FormValues {
    pub fn empty(fields: &[FieldKey]) -> Self {
        Self(fields.iter().map(|key| (*key, String::new())).collect())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> + '_ {
        self.0.iter().map(|(key, value)| (*key, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn slot_mut(&mut self, name: &str) -> Option<(FieldKey, &mut String)> {
        self.0
            .iter_mut()
            .find(|(key, _)| key.as_str() == name)
            .map(|(key, value)| (*key, value))
    }
}

/// Validation messages keyed by field. A field without an error is absent.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FormErrors(BTreeMap<FieldKey, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: FieldKey, message: impl Into<String>) -> FormResult<()> {
        let message = message.into();
        if message.is_empty() {
            return Err(FormError::EmptyMessage(key));
        }
        self.0.insert(key, message);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, &str)> + '_ {
        self.0.iter().map(|(key, message)| (*key, message.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(super) fn put(&mut self, key: FieldKey, message: &str) {
        debug_assert!(!message.is_empty(), "rule messages are checked by RuleSet");
        self.0.insert(key, message.to_owned());
    }

    fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }
}

/// Values and errors of one form instance.
#[derive(Clone, Debug)]
pub struct FieldStore {
    initial: FormValues,
    values: FormValues,
    errors: FormErrors,
}

impl FieldStore {
    pub fn new(fields: &[FieldKey]) -> Self {
        let initial = FormValues::empty(fields);
        Self {
            values: initial.clone(),
            initial,
            errors: FormErrors::new(),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.values.keys()
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn value(&self, name: &str) -> FormResult<&str> {
        self.values
            .get(name)
            .ok_or_else(|| FormError::UnknownField(name.to_owned()))
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name)
    }

    /// Replaces the value of `name` and drops any error it currently carries.
    ///
    /// The error stays cleared even if the new value is still invalid; it only comes
    /// back on the next validation pass.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> FormResult<()> {
        let Some((key, slot)) = self.values.slot_mut(name) else {
            return Err(FormError::UnknownField(name.to_owned()));
        };
        *slot = value.into();
        self.errors.remove(key.as_str());
        Ok(())
    }

    pub fn set_errors(&mut self, errors: FormErrors) -> FormResult<()> {
        if let Some(unknown) = errors.keys().find(|key| !self.values.contains(key.as_str())) {
            return Err(FormError::UnknownField(unknown.to_string()));
        }
        self.errors = errors;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.errors = FormErrors::new();
    }
}
