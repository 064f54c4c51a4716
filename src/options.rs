use error::Error;

/// Tolerance used to classify tableau entries as zero.
pub const EPSILON: f64 = 1e-10;
/// Safety cap on the number of pivots per simplex run.
pub const MAX_ITERATIONS: usize = 1000;
/// Penalty given to artificial variables by the Big-M method.
pub const BIG_M: f64 = 1e6;
/// Largest primal/dual objective gap still read as strong duality.
pub const DUALITY_TOLERANCE: f64 = 1e-3;

/// Knobs shared by all solvers.
///
/// ```ignore
/// let options = SolverOptions::default().max_iterations(50).big_m(1e8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    pub max_iterations: usize,
    pub epsilon: f64,
    pub big_m: f64,
    pub duality_tolerance: f64,
}

impl Default for SolverOptions {
    fn default() -> SolverOptions {
        SolverOptions {
            max_iterations: MAX_ITERATIONS,
            epsilon: EPSILON,
            big_m: BIG_M,
            duality_tolerance: DUALITY_TOLERANCE,
        }
    }
}

impl SolverOptions {
    pub fn max_iterations(mut self, max_iterations: usize) -> SolverOptions {
        self.max_iterations = max_iterations;
        self
    }

    pub fn epsilon(mut self, epsilon: f64) -> SolverOptions {
        self.epsilon = epsilon;
        self
    }

    pub fn big_m(mut self, big_m: f64) -> SolverOptions {
        self.big_m = big_m;
        self
    }

    pub fn duality_tolerance(mut self, tolerance: f64) -> SolverOptions {
        self.duality_tolerance = tolerance;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        let positive = |name, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(Error::InvalidOption { name: name, value: value })
            }
        };
        positive("epsilon", self.epsilon)?;
        positive("big_m", self.big_m)?;
        positive("duality_tolerance", self.duality_tolerance)?;
        Ok(())
    }
}

#[test]
fn defaults() {
    let options = SolverOptions::default();
    assert_eq!(options.max_iterations, 1000);
    assert_eq!(options.epsilon, 1e-10);
    assert_eq!(options.big_m, 1e6);
    assert!(options.validate().is_ok());
}

#[test]
fn rejects_bad_values() {
    let options = SolverOptions::default().epsilon(0.0);
    assert_eq!(options.validate(),
               Err(Error::InvalidOption { name: "epsilon", value: 0.0 }));
    let options = SolverOptions::default().big_m(::std::f64::NAN);
    assert!(options.validate().is_err());
}
