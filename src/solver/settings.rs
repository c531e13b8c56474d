use crate::algebra::*;
use derive_builder::Builder;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Error type returned by settings validation
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Bad value assigned to a settings field
    #[error("Bad value for field \"{0}\"")]
    BadFieldValue(&'static str),
}

/// Solver settings for the dual active-set QP solver
///
/// Defaults are suitable for the small, well-scaled problems produced by a
/// whole-body controller.   The iteration cap is the only bound on solve
/// wall-clock time and should be chosen against the control tick budget.

#[derive(Builder, Debug, Clone)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverSettings<T: FloatT> {
    ///maximum number of outer iterations of the active-set loop
    #[builder(default = "100")]
    pub max_iter: u32,

    ///constraint violation scale below which the iterate is optimal
    #[builder(default = "T::epsilon()")]
    pub convergence_threshold: T,

    ///print a termination summary after each solve
    #[builder(default = "false")]
    pub verbose: bool,

    ///problem dimension for which workspace memory is pre-sized.
    ///Larger problems still solve, but force a reallocation at the
    ///start of the next `solve` call.
    #[builder(default = "100")]
    pub initial_capacity: usize,
}

impl<T> Default for SolverSettings<T>
where
    T: FloatT,
{
    fn default() -> SolverSettings<T> {
        SolverSettingsBuilder::<T>::default().build().unwrap()
    }
}

impl<T> SolverSettings<T>
where
    T: FloatT,
{
    /// Checks that the settings are valid.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_iter == 0 {
            return Err(SettingsError::BadFieldValue("max_iter"));
        }
        if self.convergence_threshold < T::zero() {
            return Err(SettingsError::BadFieldValue("convergence_threshold"));
        }
        Ok(())
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<SettingsError> for SolverSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        SolverSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl<T> SolverSettingsBuilder<T>
where
    T: FloatT,
{
    fn validate(&self) -> Result<(), SettingsError> {
        if let Some(max_iter) = self.max_iter {
            if max_iter == 0 {
                return Err(SettingsError::BadFieldValue("max_iter"));
            }
        }
        if let Some(threshold) = self.convergence_threshold {
            if threshold < T::zero() {
                return Err(SettingsError::BadFieldValue("convergence_threshold"));
            }
        }
        Ok(())
    }
}

#[test]
fn test_settings_validate() {
    // all standard settings
    SolverSettingsBuilder::<f64>::default().build().unwrap();

    // fail on a zero iteration cap
    assert!(SolverSettingsBuilder::<f64>::default()
        .max_iter(0)
        .build()
        .is_err());

    // fail on a negative convergence threshold
    assert!(SolverSettingsBuilder::<f64>::default()
        .convergence_threshold(-1.0)
        .build()
        .is_err());

    // directly construct bad settings and manually check
    let settings = SolverSettings::<f64> {
        max_iter: 0,
        ..SolverSettings::default()
    };
    assert!(settings.validate().is_err());
}
