//! Error type for rejected solver configuration.

use std::fmt;

use crate::math::Real;

#[derive(Debug, Clone, PartialEq)]
pub enum SphError {
    /// A tunable is outside the range the kernels and integrator can work with.
    InvalidParameter {
        name: &'static str,
        value: Real,
        reason: &'static str,
    },
    /// The simulation rectangle leaves no room inside the boundary margin.
    DegenerateDomain {
        width: Real,
        height: Real,
        margin: Real,
    },
}

impl SphError {
    pub(crate) fn invalid(name: &'static str, value: Real, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

impl fmt::Display for SphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SphError::InvalidParameter {
                name,
                value,
                reason,
            } => write!(f, "invalid parameter `{name}` = {value}: {reason}"),
            SphError::DegenerateDomain {
                width,
                height,
                margin,
            } => write!(
                f,
                "domain {width}x{height} is too small for a boundary margin of {margin}"
            ),
        }
    }
}

impl std::error::Error for SphError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_parameter() {
        let err = SphError::invalid("smoothing_radius", -1.0, "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid parameter `smoothing_radius` = -1: must be positive"
        );
    }
}
