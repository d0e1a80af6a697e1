use crate::config::{CI_ENV, OVERRIDE_ENV};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateDecision {
    pub should_run: bool,
    pub reason: String,
}

/// A flag is unset when absent, empty, `"0"` or `"false"`. Anything else is
/// set, including `"FALSE"` and `"no"`.
pub fn is_enabled(value: Option<&str>) -> bool {
    match value {
        None => false,
        Some(value) => !value.is_empty() && value != "0" && value != "false",
    }
}

pub fn evaluate_gate(ci: Option<&str>, override_flag: Option<&str>) -> GateDecision {
    if !is_enabled(ci) {
        return GateDecision {
            should_run: true,
            reason: format!("{CI_ENV} is not set"),
        };
    }

    if is_enabled(override_flag) {
        return GateDecision {
            should_run: true,
            reason: format!("{CI_ENV} is set but {OVERRIDE_ENV} forces installation"),
        };
    }

    GateDecision {
        should_run: false,
        reason: format!("{CI_ENV} is set; set {OVERRIDE_ENV}=1 to install hooks in CI"),
    }
}
