//! Request builder and validator.
//!
//! The form keeps a draft [`LabResultRequest`] that is edited one field at a
//! time through a pure reducer, [`apply`]. Choosing a parameter always pulls
//! the unit from the catalog, so the two fields can never disagree.
//!
//! An invalid draft is not an error: it simply cannot be turned into a
//! request ([`DraftRequest::to_request`] returns `None`).
//!
//! # Example
//!
//! ```
//! use lab_insight::form::{apply, DraftRequest, FieldChange};
//!
//! let draft = DraftRequest::default();
//! let draft = apply(draft, FieldChange::Parameter("HbA1c".to_string()));
//! let draft = apply(draft, FieldChange::Value(6.4));
//! let draft = apply(draft, FieldChange::Age(58.0));
//!
//! assert_eq!(draft.unit(), "%");
//! assert!(draft.to_request().is_some());
//! ```

use crate::models::catalog;
use crate::models::{Gender, LabResultRequest};
use log::debug;

/// A single edit made to the draft.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldChange {
    /// Select a catalog parameter. Unknown names are ignored.
    Parameter(String),
    /// Set the measured value.
    Value(f64),
    /// Set the patient age in years.
    Age(f64),
    /// Set the patient gender.
    Gender(Gender),
}

/// The request being composed by the user.
///
/// Fields are private so the unit can only change together with the
/// parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftRequest {
    parameter: String,
    value: f64,
    unit: String,
    age: f64,
    gender: Gender,
}

impl Default for DraftRequest {
    /// A fresh form: first catalog parameter, no value, no age, male.
    fn default() -> Self {
        let param = catalog::default_parameter();
        Self {
            parameter: param.label.to_string(),
            value: 0.0,
            unit: param.unit.to_string(),
            age: 0.0,
            gender: Gender::default(),
        }
    }
}

impl DraftRequest {
    /// Creates a draft pre-filled from an existing request.
    ///
    /// Used when a history entry is selected so the form shows the inputs
    /// that produced it. The unit is re-derived from the catalog.
    pub fn from_request(request: &LabResultRequest) -> Self {
        let draft = Self {
            value: request.value,
            age: request.age,
            gender: request.gender,
            ..Self::default()
        };
        apply(draft, FieldChange::Parameter(request.parameter.clone()))
    }

    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn age(&self) -> f64 {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// Returns `true` when the draft can be submitted.
    ///
    /// The rule is `value > 0 AND age > 0 AND parameter is non-empty`.
    pub fn is_valid(&self) -> bool {
        self.value > 0.0 && self.age > 0.0 && !self.parameter.is_empty()
    }

    /// Builds the request to send, re-checking validity.
    ///
    /// # Returns
    ///
    /// `Some(LabResultRequest)` for a valid draft, `None` otherwise.
    pub fn to_request(&self) -> Option<LabResultRequest> {
        if !self.is_valid() {
            return None;
        }

        Some(LabResultRequest {
            parameter: self.parameter.clone(),
            value: self.value,
            unit: self.unit.clone(),
            age: self.age,
            gender: self.gender,
        })
    }

    /// Applies a textual field edit, as a form or command line provides it.
    ///
    /// Recognized field names are `parameter`, `value`, `age` and `gender`.
    /// Numbers that fail to parse (or are not finite) become zero, which
    /// leaves the draft unsubmittable. Unknown fields and genders are ignored.
    /// The unit is not a settable field.
    pub fn set_field(&mut self, name: &str, raw: &str) {
        let change = match name {
            "parameter" => FieldChange::Parameter(raw.trim().to_string()),
            "value" => FieldChange::Value(parse_number(raw)),
            "age" => FieldChange::Age(parse_number(raw)),
            "gender" => match Gender::from_str(raw.trim()) {
                Some(gender) => FieldChange::Gender(gender),
                None => {
                    debug!("Ignoring unknown gender '{}'", raw);
                    return;
                }
            },
            other => {
                debug!("Ignoring edit to unknown field '{}'", other);
                return;
            }
        };

        *self = apply(std::mem::take(self), change);
    }
}

/// Applies one field change to a draft and returns the new draft.
///
/// This is a pure function: the same draft and change always produce the
/// same result, with no side effects beyond the unit cascade.
pub fn apply(draft: DraftRequest, change: FieldChange) -> DraftRequest {
    match change {
        FieldChange::Parameter(name) => match catalog::find_parameter(&name) {
            Some(param) => DraftRequest {
                parameter: param.label.to_string(),
                unit: param.unit.to_string(),
                ..draft
            },
            None => {
                debug!("Ignoring unknown parameter '{}'", name);
                draft
            }
        },
        FieldChange::Value(value) => DraftRequest { value, ..draft },
        FieldChange::Age(age) => DraftRequest { age, ..draft },
        FieldChange::Gender(gender) => DraftRequest { gender, ..draft },
    }
}

fn parse_number(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}
