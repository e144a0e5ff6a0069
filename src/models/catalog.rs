//! Catalog of supported lab parameters.
//!
//! The catalog is closed: every request names one of these parameters and
//! carries the unit defined here. The labels are sent to the analysis service
//! verbatim, so they match what the service expects.

/// A lab measurement type with its fixed unit of measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabParameter {
    /// Display and wire name of the parameter.
    pub label: &'static str,
    /// Unit the value is expressed in.
    pub unit: &'static str,
}

/// All parameters the analysis service understands, in form order.
pub const LAB_PARAMETERS: &[LabParameter] = &[
    LabParameter {
        label: "Glucose",
        unit: "mg/dl",
    },
    LabParameter {
        label: "Cholesterin",
        unit: "mg/dl",
    },
    LabParameter {
        label: "LDL",
        unit: "mg/dl",
    },
    LabParameter {
        label: "HDL",
        unit: "mg/dl",
    },
    LabParameter {
        label: "HbA1c",
        unit: "%",
    },
    LabParameter {
        label: "CRP",
        unit: "mg/l",
    },
    LabParameter {
        label: "Kreatinin",
        unit: "mg/dl",
    },
];

/// Looks up a parameter by its exact label.
pub fn find_parameter(label: &str) -> Option<&'static LabParameter> {
    LAB_PARAMETERS.iter().find(|p| p.label == label)
}

/// Returns the catalog unit for a parameter, if the parameter is known.
pub fn unit_for(label: &str) -> Option<&'static str> {
    find_parameter(label).map(|p| p.unit)
}

/// The parameter a fresh form starts with.
pub fn default_parameter() -> &'static LabParameter {
    &LAB_PARAMETERS[0]
}
