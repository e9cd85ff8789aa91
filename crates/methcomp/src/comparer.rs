//! Compute-once wrapper binding a sample to an analysis.
//!
//! # Overview
//!
//! An [`Analysis`] is a validated set of options (confidence level, mode,
//! bootstrap settings, ...) that can turn a [`PairedSample`] into a result.
//! A [`Comparer`] owns one sample and one analysis and evaluates the analysis
//! at most once: the first successful [`Comparer::compute`] stores the result
//! and every later call returns the stored value.
//!
//! # Examples
//!
//! ```
//! use methcomp::{BlandAltman, Comparer, PairedSample};
//!
//! let sample = PairedSample::new([1.0, 2.0, 3.0], [1.0, 2.0, 3.0]).unwrap();
//! let mut comparer = Comparer::new(sample, BlandAltman::default());
//! assert!(!comparer.is_computed());
//!
//! let result = comparer.compute().unwrap();
//! assert_eq!(result.mean_diff, 0.0);
//! assert!(comparer.is_computed());
//! ```

use crate::{Error, PairedSample};

/// A method-comparison analysis over a paired sample.
pub trait Analysis {
    /// Result produced by the analysis.
    type Output;

    /// Short identifier used in logs and result maps.
    fn name(&self) -> &'static str;

    /// Runs the analysis.
    ///
    /// This is a pure function of `self` and `sample`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientData`] if the sample cannot support a
    /// finite result.
    fn analyze(&self, sample: &PairedSample) -> Result<Self::Output, Error>;
}

/// Lifecycle of a cached result.
#[derive(Debug, Clone, Default, PartialEq, derive_more::IsVariant)]
pub enum ComputeState<T> {
    #[default]
    Uninitialized,
    Computed(T),
}

impl<T> ComputeState<T> {
    /// Returns the computed value, if any.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Uninitialized => None,
            Self::Computed(value) => Some(value),
        }
    }

    fn get_or_try_compute<F>(&mut self, f: F) -> Result<&T, Error>
    where
        F: FnOnce() -> Result<T, Error>,
    {
        if self.is_uninitialized() {
            *self = Self::Computed(f()?);
        }
        let Self::Computed(value) = &*self else {
            unreachable!("state is computed after a successful evaluation");
        };
        Ok(value)
    }

    fn into_inner(self) -> Option<T> {
        match self {
            Self::Uninitialized => None,
            Self::Computed(value) => Some(value),
        }
    }
}

/// A paired sample bound to one analysis, computed at most once.
#[derive(Debug, Clone)]
pub struct Comparer<A>
where
    A: Analysis,
{
    sample: PairedSample,
    analysis: A,
    state: ComputeState<A::Output>,
}

impl<A> Comparer<A>
where
    A: Analysis,
{
    /// Binds an already validated sample to an analysis.
    #[must_use]
    pub fn new(sample: PairedSample, analysis: A) -> Self {
        Self {
            sample,
            analysis,
            state: ComputeState::Uninitialized,
        }
    }

    /// Validates raw sequences and binds them to an analysis.
    ///
    /// # Errors
    ///
    /// Returns any validation error from [`PairedSample::new`].
    pub fn from_values<I1, I2>(method1: I1, method2: I2, analysis: A) -> Result<Self, Error>
    where
        I1: IntoIterator<Item = f64>,
        I2: IntoIterator<Item = f64>,
    {
        Ok(Self::new(PairedSample::new(method1, method2)?, analysis))
    }

    #[must_use]
    pub fn sample(&self) -> &PairedSample {
        &self.sample
    }

    #[must_use]
    pub fn analysis(&self) -> &A {
        &self.analysis
    }

    #[must_use]
    pub fn state(&self) -> &ComputeState<A::Output> {
        &self.state
    }

    #[must_use]
    pub fn is_computed(&self) -> bool {
        self.state.is_computed()
    }

    /// Returns the cached result, computing it on first use.
    ///
    /// A failed computation leaves the comparer uninitialized.
    ///
    /// # Errors
    ///
    /// Propagates the analysis error.
    pub fn compute(&mut self) -> Result<&A::Output, Error> {
        let Self {
            sample,
            analysis,
            state,
        } = self;
        if state.is_uninitialized() {
            tracing::debug!(analysis = analysis.name(), n = sample.len(), "computing");
        }
        state.get_or_try_compute(|| analysis.analyze(sample))
    }

    /// Returns the cached result without computing.
    #[must_use]
    pub fn result(&self) -> Option<&A::Output> {
        self.state.get()
    }

    /// Computes if needed and returns the owned result.
    ///
    /// # Errors
    ///
    /// Propagates the analysis error.
    pub fn into_result(mut self) -> Result<A::Output, Error> {
        self.compute()?;
        self.state
            .into_inner()
            .ok_or(Error::insufficient("analysis produced no result"))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[derive(Debug, Default)]
    struct CountingMean {
        calls: Cell<usize>,
    }

    impl Analysis for CountingMean {
        type Output = f64;

        fn name(&self) -> &'static str {
            "counting-mean"
        }

        #[expect(clippy::cast_precision_loss)]
        fn analyze(&self, sample: &PairedSample) -> Result<f64, Error> {
            self.calls.set(self.calls.get() + 1);
            let diffs = sample.differences();
            Ok(diffs.iter().sum::<f64>() / diffs.len() as f64)
        }
    }

    #[derive(Debug)]
    struct AlwaysFails;

    impl Analysis for AlwaysFails {
        type Output = ();

        fn name(&self) -> &'static str {
            "always-fails"
        }

        fn analyze(&self, _sample: &PairedSample) -> Result<(), Error> {
            Err(Error::insufficient("always"))
        }
    }

    #[test]
    fn test_compute_is_cached() {
        let mut comparer =
            Comparer::from_values([3.0, 5.0], [1.0, 1.0], CountingMean::default()).unwrap();
        assert!(comparer.result().is_none());
        assert_eq!(*comparer.compute().unwrap(), 3.0);
        assert_eq!(*comparer.compute().unwrap(), 3.0);
        assert_eq!(comparer.analysis().calls.get(), 1);
        assert_eq!(comparer.result(), Some(&3.0));
        assert!(comparer.state().is_computed());
    }

    #[test]
    fn test_failed_compute_stays_uninitialized() {
        let mut comparer = Comparer::from_values([1.0, 2.0], [1.0, 2.0], AlwaysFails).unwrap();
        assert!(comparer.compute().unwrap_err().is_insufficient_data());
        assert!(!comparer.is_computed());
    }

    #[test]
    fn test_into_result() {
        let comparer =
            Comparer::from_values([2.0, 4.0], [1.0, 1.0], CountingMean::default()).unwrap();
        assert_eq!(comparer.into_result().unwrap(), 2.0);
    }

    #[test]
    fn test_validation_happens_at_construction() {
        let err = Comparer::from_values([1.0, 2.0], [1.0], CountingMean::default()).unwrap_err();
        assert!(err.is_shape_mismatch());
    }
}
