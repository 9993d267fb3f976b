use std::collections::BTreeMap;

use crate::validate::validate_model::{FormInput, ValidInput, ValidationErrors};

/// A single predicate applied to one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRule {
    Required,
    Email,
    MinLength(usize),
    /// Only digits once spaces and dashes are removed, with a length in range
    Digits { min: usize, max: usize },
    /// `MM/YY` with a month between 01 and 12
    Expiry,
}

impl FieldRule {
    fn check(&self, value: &str) -> bool {
        match self {
            FieldRule::Required => !value.is_empty(),
            FieldRule::Email => is_valid_email(value),
            FieldRule::MinLength(n) => value.chars().count() >= *n,
            FieldRule::Digits { min, max } => {
                let digits = strip_separators(value);
                !digits.is_empty()
                    && digits.chars().all(|c| c.is_ascii_digit())
                    && (*min..=*max).contains(&digits.len())
            }
            FieldRule::Expiry => is_valid_expiry(value),
        }
    }

    fn default_message(&self, label: &str) -> String {
        match self {
            FieldRule::Required => format!("{} is required", label),
            FieldRule::Email => "Enter a valid email address".to_string(),
            FieldRule::MinLength(n) => format!("{} must be at least {} characters", label, n),
            FieldRule::Digits { min, max } if min == max => {
                format!("{} must be {} digits", label, min)
            }
            FieldRule::Digits { min, max } => {
                format!("{} must be {} to {} digits", label, min, max)
            }
            FieldRule::Expiry => format!("{} must look like MM/YY", label),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    rules: Vec<(FieldRule, Option<String>)>,
    trim: bool,
}

impl FieldSpec {
    pub fn new(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            rules: vec![],
            trim: true,
        }
    }

    pub fn rule(mut self, rule: FieldRule) -> Self {
        self.rules.push((rule, None));
        self
    }

    /// Add a rule with its own error message.
    pub fn rule_with_message(mut self, rule: FieldRule, message: &str) -> Self {
        self.rules.push((rule, Some(message.to_string())));
        self
    }

    pub fn required(self) -> Self {
        self.rule(FieldRule::Required)
    }

    pub fn email(self) -> Self {
        self.rule(FieldRule::Email)
    }

    /// Keep surrounding whitespace (passwords).
    pub fn untrimmed(mut self) -> Self {
        self.trim = false;
        self
    }

    fn is_required(&self) -> bool {
        self.rules.iter().any(|(r, _)| *r == FieldRule::Required)
    }
}

/// Declarative set of field predicates.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Check every field and report the first failing rule of each.
    ///
    /// Optional fields that are empty skip their remaining rules. Fields not
    /// named in the schema are dropped from the result.
    pub fn validate(&self, input: &FormInput) -> Result<ValidInput, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let mut values = BTreeMap::new();

        for spec in &self.fields {
            let raw = input.get(&spec.name).unwrap_or("");
            let value = if spec.trim { raw.trim() } else { raw };

            if value.is_empty() && !spec.is_required() {
                continue;
            }

            let failed = spec.rules.iter().find(|(rule, _)| !rule.check(value));
            match failed {
                Some((rule, message)) => {
                    let message = message
                        .clone()
                        .unwrap_or_else(|| rule.default_message(&spec.label));
                    errors.push(&spec.name, message);
                }
                None => {
                    values.insert(spec.name.clone(), value.to_string());
                }
            }
        }

        if errors.is_empty() {
            Ok(ValidInput { values })
        } else {
            Err(errors)
        }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = value.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(l), Some(d), None) => (l, d),
        _ => return false,
    };

    if local.is_empty() || domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}

fn is_valid_expiry(value: &str) -> bool {
    let (month, year) = match value.split_once('/') {
        Some(parts) => parts,
        None => return false,
    };

    let all_digits = |s: &str| s.len() == 2 && s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(month) || !all_digits(year) {
        return false;
    }

    matches!(month.parse::<u8>(), Ok(1..=12))
}

pub fn strip_separators(value: &str) -> String {
    value.chars().filter(|c| *c != ' ' && *c != '-').collect()
}
