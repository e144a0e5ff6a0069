//! Lab result request data models.
//!
//! This module defines the request that is sent to the analysis service:
//! the measured parameter, its value and unit, and the patient context
//! (age and gender) the service needs to classify the value.

use super::catalog;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Patient gender as understood by the analysis service.
///
/// Serialized in lowercase. Uppercase spellings are accepted on input
/// because older clients sent `MALE` / `FEMALE`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male patient
    #[default]
    #[serde(alias = "MALE")]
    Male,
    /// Female patient
    #[serde(alias = "FEMALE")]
    Female,
}

impl Gender {
    /// Returns the wire representation of the gender.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    /// Parses a gender, ignoring ASCII case.
    ///
    /// # Returns
    ///
    /// `Some(Gender)` for "male" or "female" in any case, `None` otherwise.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A lab measurement submitted for analysis.
///
/// Invariant: once built through [`LabResultRequest::new`] or the form
/// reducer, `unit` is the catalog unit for `parameter`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabResultRequest {
    /// Name of the lab parameter (e.g., "Glucose").
    pub parameter: String,

    /// Measured value. Must be greater than zero.
    pub value: f64,

    /// Unit of `value`, taken from the parameter catalog.
    pub unit: String,

    /// Patient age in years. Must be greater than zero; fractions are kept
    /// so infants can be described in parts of a year.
    #[serde(serialize_with = "serialize_age")]
    pub age: f64,

    /// Patient gender.
    pub gender: Gender,
}

impl LabResultRequest {
    /// Creates a request for a catalog parameter, deriving the unit.
    ///
    /// # Returns
    ///
    /// `None` if `parameter` is not part of the catalog.
    pub fn new(parameter: &str, value: f64, age: f64, gender: Gender) -> Option<Self> {
        let unit = catalog::unit_for(parameter)?;
        Some(Self {
            parameter: parameter.to_string(),
            value,
            unit: unit.to_string(),
            age,
            gender,
        })
    }

    /// Checks whether this request may be sent to the analysis service.
    ///
    /// A request is submittable when the value and age are positive and a
    /// parameter is named.
    pub fn is_valid(&self) -> bool {
        self.value > 0.0 && self.age > 0.0 && !self.parameter.is_empty()
    }
}

/// Writes whole-year ages as JSON integers, which is what the analysis
/// service has always received.
fn serialize_age<S: Serializer>(age: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if age.fract() == 0.0 && *age >= 0.0 && *age <= u32::MAX as f64 {
        serializer.serialize_u32(*age as u32)
    } else {
        serializer.serialize_f64(*age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_unit() {
        let request = LabResultRequest::new("HbA1c", 6.1, 52.0, Gender::Female).unwrap();
        assert_eq!(request.unit, "%");
        assert_eq!(request.parameter, "HbA1c");
    }

    #[test]
    fn test_new_rejects_unknown_parameter() {
        assert!(LabResultRequest::new("Unobtainium", 1.0, 30.0, Gender::Male).is_none());
    }

    #[test]
    fn test_is_valid() {
        let mut request = LabResultRequest::new("Glucose", 110.0, 40.0, Gender::Male).unwrap();
        assert!(request.is_valid());

        request.value = 0.0;
        assert!(!request.is_valid());

        request.value = 110.0;
        request.age = 0.0;
        assert!(!request.is_valid());

        request.age = 0.5;
        assert!(request.is_valid());

        request.age = 40.0;
        request.parameter.clear();
        assert!(!request.is_valid());
    }

    #[test]
    fn test_nan_value_is_invalid() {
        let mut request = LabResultRequest::new("LDL", 1.0, 40.0, Gender::Male).unwrap();
        request.value = f64::NAN;
        assert!(!request.is_valid());
    }

    #[test]
    fn test_serialization_wire_format() {
        let request = LabResultRequest::new("Glucose", 110.0, 40.0, Gender::Male).unwrap();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["parameter"], "Glucose");
        assert_eq!(json["value"], 110.0);
        assert_eq!(json["unit"], "mg/dl");
        assert_eq!(json["age"], 40);
        assert_eq!(json["gender"], "male");
    }

    #[test]
    fn test_fractional_age_round_trips() {
        let request = LabResultRequest::new("CRP", 12.0, 0.5, Gender::Female).unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["age"], 0.5);

        let stored = r#"{"parameter":"LDL","value":130,"unit":"mg/dl","age":40.5,"gender":"male"}"#;
        let decoded: LabResultRequest = serde_json::from_str(stored).unwrap();
        assert_eq!(decoded.age, 40.5);
        assert!(decoded.is_valid());
    }

    #[test]
    fn test_gender_accepts_uppercase() {
        let json = r#"{"parameter":"CRP","value":3.5,"unit":"mg/l","age":61,"gender":"FEMALE"}"#;
        let request: LabResultRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.gender, Gender::Female);
    }

    #[test]
    fn test_gender_from_str() {
        assert_eq!(Gender::from_str("Male"), Some(Gender::Male));
        assert_eq!(Gender::from_str("FEMALE"), Some(Gender::Female));
        assert_eq!(Gender::from_str("other"), None);
    }
}
