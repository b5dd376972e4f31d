use crate::solver::core::traits::Settings;
use crate::{algebra::*, solver::core::SettingsError};
use derive_builder::Builder;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Standard-form solver type implementing the [`Settings`](crate::solver::core::traits::Settings) trait

#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DefaultSettings<T: FloatT> {
    ///absolute tolerance for feasibility, multiplier signs and rank decisions
    #[builder(default = "(1e-8).as_T()")]
    pub tol: T,

    ///maximum number of iterations, counted over both phases.
    ///Defaults to `10(n+m)` when unset.
    #[builder(default = "None", setter(strip_option))]
    pub max_iter: Option<u32>,

    ///starting point.  It is projected onto the equality constraints
    ///if it does not already satisfy them.
    #[builder(default = "None", setter(strip_option))]
    pub initial_point: Option<Vec<T>>,

    ///reject asymmetric `Q` rather than replacing it with `(Q+Q')/2`
    #[builder(default = "false")]
    pub strict_symmetry: bool,

    ///verbose printing
    #[builder(default = "true")]
    pub verbose: bool,
}

impl<T> Default for DefaultSettings<T>
where
    T: FloatT,
{
    fn default() -> DefaultSettings<T> {
        DefaultSettingsBuilder::<T>::default().build().unwrap()
    }
}

impl<T> Settings<T> for DefaultSettings<T>
where
    T: FloatT,
{
    //NB: CoreSettings is typedef'd to DefaultSettings
    fn core(&self) -> &DefaultSettings<T> {
        self
    }
    fn core_mut(&mut self) -> &mut DefaultSettings<T> {
        self
    }

    fn validate(&self) -> Result<(), SettingsError> {
        validate_tol(self.tol)?;
        if let Some(ref x) = self.initial_point {
            validate_initial_point(x)?;
        }
        Ok(())
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<SettingsError> for DefaultSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        DefaultSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl<T> DefaultSettingsBuilder<T>
where
    T: FloatT,
{
    /// check that any numerical fields specified are usable
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(tol) = self.tol {
            validate_tol(tol)?;
        }
        if let Some(Some(ref x)) = self.initial_point {
            validate_initial_point(x)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------
// individual validation functions go here
// ---------------------------------------------------------

fn validate_tol<T: FloatT>(tol: T) -> Result<(), SettingsError> {
    if tol.is_finite() && tol > T::zero() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("tol"))
    }
}

fn validate_initial_point<T: FloatT>(x: &[T]) -> Result<(), SettingsError> {
    if x.is_finite() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("initial_point"))
    }
}

#[test]
fn test_settings_validate() {
    // all standard settings
    let settings = DefaultSettingsBuilder::<f64>::default().build().unwrap();
    assert_eq!(settings.tol, 1e-8);
    assert_eq!(settings.max_iter, None);
    assert!(settings.verbose);

    let settings = DefaultSettingsBuilder::<f64>::default()
        .max_iter(5)
        .initial_point(vec![1.0, 2.0])
        .build()
        .unwrap();
    assert_eq!(settings.max_iter, Some(5));
    assert_eq!(settings.initial_point, Some(vec![1.0, 2.0]));

    // fail on bad tolerances
    assert!(DefaultSettingsBuilder::<f64>::default()
        .tol(0.0)
        .build()
        .is_err());
    assert!(DefaultSettingsBuilder::<f64>::default()
        .tol(f64::NAN)
        .build()
        .is_err());

    // fail on a non-finite starting point
    assert!(DefaultSettingsBuilder::<f64>::default()
        .initial_point(vec![f64::INFINITY])
        .build()
        .is_err());

    // directly construct a bad DefaultSettings and manually check
    let settings = DefaultSettings::<f64> {
        tol: -1.0,
        ..DefaultSettings::default()
    };
    assert_eq!(
        settings.validate(),
        Err(SettingsError::BadFieldValue("tol"))
    );
}
