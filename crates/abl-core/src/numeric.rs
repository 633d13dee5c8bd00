use crate::AblError;

/// Floating point type used throughout system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, AblError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(AblError::NonFinite { what, value: v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("not finite"));
    }

    #[test]
    fn ensure_finite_rejects_infinity() {
        assert_eq!(
            ensure_finite(Real::NEG_INFINITY, "latitude"),
            Err(AblError::NonFinite {
                what: "latitude",
                value: Real::NEG_INFINITY
            })
        );
    }

    proptest! {
        #[test]
        fn finite_values_pass_through(v in -1e12f64..1e12) {
            prop_assert_eq!(ensure_finite(v, "v"), Ok(v));
        }
    }
}
