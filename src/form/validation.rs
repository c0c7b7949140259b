use std::collections::BTreeMap;

use regex::Regex;

use super::controller::{FormError, FormResult};
use super::store::{FieldKey, FormErrors, FormValues};

/// A form declared as a plain struct of text fields.
///
/// Usually derived with `#[derive(FormModel)]`, which turns `#[field(...)]` attributes
/// into the [`RuleSet`].
pub trait FormModel: Sized + 'static {
    fn field_keys() -> &'static [FieldKey];
    fn rules() -> FormResult<RuleSet>;
    fn from_values(values: &FormValues) -> Self;
}

#[derive(Clone, Debug)]
struct LengthRule {
    min: usize,
    message: String,
}

#[derive(Clone, Debug)]
struct PatternRule {
    regex: Regex,
    message: String,
}

/// Constraints for one field, checked in order: required, minimum length, pattern.
#[derive(Clone, Debug)]
pub struct FieldRule {
    key: FieldKey,
    required: Option<String>,
    min_len: Option<LengthRule>,
    pattern: Option<PatternRule>,
}

impl FieldRule {
    pub fn new(key: FieldKey) -> Self {
        Self {
            key,
            required: None,
            min_len: None,
            pattern: None,
        }
    }

    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.required = Some(message.into());
        self
    }

    pub fn min_len(mut self, min: usize, message: impl Into<String>) -> Self {
        self.min_len = Some(LengthRule {
            min,
            message: message.into(),
        });
        self
    }

    pub fn pattern(mut self, pattern: &str, message: impl Into<String>) -> FormResult<Self> {
        let regex = Regex::new(pattern).map_err(|error| FormError::InvalidPattern {
            field: self.key,
            reason: error.to_string(),
        })?;
        self.pattern = Some(PatternRule {
            regex,
            message: message.into(),
        });
        Ok(self)
    }

    pub fn key(&self) -> FieldKey {
        self.key
    }

    pub fn is_required(&self) -> bool {
        self.required.is_some()
    }

    /// Returns the message of the first failing check, if any.
    ///
    /// Emptiness and length look at the trimmed value; the pattern sees the value as typed.
    /// A blank optional field passes without running the other checks.
    pub fn check(&self, value: &str) -> Option<&str> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return self.required.as_deref();
        }
        if let Some(length) = &self.min_len {
            if trimmed.chars().count() < length.min {
                return Some(length.message.as_str());
            }
        }
        if let Some(pattern) = &self.pattern {
            if !pattern.regex.is_match(value) {
                return Some(pattern.message.as_str());
            }
        }
        None
    }

    fn messages(&self) -> impl Iterator<Item = &str> {
        self.required
            .as_deref()
            .into_iter()
            .chain(self.min_len.as_ref().map(|rule| rule.message.as_str()))
            .chain(self.pattern.as_ref().map(|rule| rule.message.as_str()))
    }
}

#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: BTreeMap<FieldKey, FieldRule>,
}

impl RuleSet {
    pub fn new(rules: impl IntoIterator<Item = FieldRule>) -> FormResult<Self> {
        let mut set = BTreeMap::new();
        for rule in rules {
            if rule.messages().any(str::is_empty) {
                return Err(FormError::EmptyMessage(rule.key));
            }
            if set.contains_key(&rule.key) {
                return Err(FormError::DuplicateRule(rule.key));
            }
            set.insert(rule.key, rule);
        }
        Ok(Self { rules: set })
    }

    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.rules.get(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.rules.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Checks every field against its rule and reports all failures in one pass.
pub fn validate(values: &FormValues, rules: &RuleSet) -> FormErrors {
    let mut errors = FormErrors::new();
    for (key, value) in values.iter() {
        let Some(rule) = rules.get(key.as_str()) else {
            continue;
        };
        if let Some(message) = rule.check(value) {
            errors.put(key, message);
        }
    }
    errors
}
