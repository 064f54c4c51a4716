//! Dense tableau simplex solvers for small linear programs.
//!
//! Problems with `<=` rows only can go through the plain simplex method; `>=` and `=` rows need
//! either the Big-M or the two phase method. `duality` derives the dual of a problem and checks
//! that both optima agree. Every solve records each pivot in its trace.

extern crate rulinalg;
#[macro_use]
extern crate log;
extern crate thiserror;

#[cfg(test)]
#[macro_use]
extern crate approx;
#[cfg(test)]
extern crate rand;

pub mod error;
pub mod options;
pub mod problem;
pub mod builder;
pub mod tableau;
pub mod standard_form;
pub mod solution;
pub mod simplex;
pub mod big_m;
pub mod two_phase;
pub mod duality;

mod test_util;
mod random_tests;

pub use duality::DualityResult;
pub use error::Error;
pub use options::SolverOptions;
pub use problem::{Direction, ProblemSpec, Sense};
pub use solution::{Iteration, Outcome, Phase, PhaseCounts, SolveResult};

fn problem_from_parts(c: &[f64],
                      a: &[Vec<f64>],
                      b: &[f64],
                      senses: &[Sense],
                      direction: Direction,
                      var_names: Option<&[String]>) -> Result<ProblemSpec, Error> {
    let problem = ProblemSpec::new(c.to_vec(), a.to_vec(), b.to_vec(), senses.to_vec(), direction)?;
    match var_names {
        Some(names) => problem.with_names(names.to_vec()),
        None => Ok(problem),
    }
}

/// Plain simplex on `max/min c^Tx, Ax <= b, x >= 0`.
pub fn solve_simplex(c: &[f64],
                     a: &[Vec<f64>],
                     b: &[f64],
                     direction: Direction,
                     var_names: Option<&[String]>) -> Result<SolveResult, Error> {
    let senses = vec![Sense::Leq; b.len()];
    let problem = problem_from_parts(c, a, b, &senses, direction, var_names)?;
    simplex::solve(&problem, &SolverOptions::default())
}

/// Big-M method; `m` overrides the default penalty.
pub fn solve_bigm(c: &[f64],
                  a: &[Vec<f64>],
                  b: &[f64],
                  senses: &[Sense],
                  direction: Direction,
                  var_names: Option<&[String]>,
                  m: Option<f64>) -> Result<SolveResult, Error> {
    let problem = problem_from_parts(c, a, b, senses, direction, var_names)?;
    let mut options = SolverOptions::default();
    if let Some(m) = m {
        options = options.big_m(m);
    }
    big_m::solve(&problem, &options)
}

pub fn solve_twophase(c: &[f64],
                      a: &[Vec<f64>],
                      b: &[f64],
                      senses: &[Sense],
                      direction: Direction,
                      var_names: Option<&[String]>) -> Result<SolveResult, Error> {
    let problem = problem_from_parts(c, a, b, senses, direction, var_names)?;
    two_phase::solve(&problem, &SolverOptions::default())
}

pub fn analyze_duality(c: &[f64],
                       a: &[Vec<f64>],
                       b: &[f64],
                       senses: &[Sense],
                       direction: Direction,
                       var_names: Option<&[String]>) -> Result<DualityResult, Error> {
    let problem = problem_from_parts(c, a, b, senses, direction, var_names)?;
    duality::analyze(&problem, &SolverOptions::default())
}

#[test]
fn scenarios_through_free_functions() {
    let names = vec!["x".to_string(), "y".to_string()];
    let result = solve_simplex(&[3.0, 2.0],
                               &[vec![1.0, 1.0], vec![2.0, 1.0]],
                               &[10.0, 15.0],
                               Direction::Maximize,
                               Some(&names))
        .expect("Solve should not fail");
    assert_eq!(result.iterations, 2);
    assert_abs_diff_eq!(result.value("x").expect("x exists"), 5.0, epsilon = 1e-9);

    let c = [2.0, 3.0];
    let a = [vec![1.0, 1.0], vec![1.0, 0.0], vec![0.0, 1.0]];
    let b = [5.0, 2.0, 1.0];
    let senses = [Sense::Geq, Sense::Geq, Sense::Geq];
    let two_phase = solve_twophase(&c, &a, &b, &senses, Direction::Minimize, None)
        .expect("Solve should not fail");
    let big_m = solve_bigm(&c, &a, &b, &senses, Direction::Minimize, None, Some(1e6))
        .expect("Solve should not fail");
    assert_abs_diff_eq!(two_phase.objective.expect("Optimal"), 11.0, epsilon = 1e-9);
    assert_abs_diff_eq!(big_m.objective.expect("Optimal"), 11.0, epsilon = 1e-3);

    let infeasible = [vec![1.0], vec![1.0]];
    let senses = [Sense::Leq, Sense::Geq];
    for result in vec![
        solve_bigm(&[1.0], &infeasible, &[1.0, 5.0], &senses, Direction::Maximize, None, None),
        solve_twophase(&[1.0], &infeasible, &[1.0, 5.0], &senses, Direction::Maximize, None),
    ] {
        assert_eq!(result.expect("Solve should not fail").outcome, Outcome::Infeasible);
    }

    let duality = analyze_duality(&[3.0, 5.0],
                                  &[vec![1.0, 0.0], vec![0.0, 2.0], vec![3.0, 2.0]],
                                  &[4.0, 12.0, 18.0],
                                  &[Sense::Leq, Sense::Leq, Sense::Leq],
                                  Direction::Maximize,
                                  None)
        .expect("Analysis should not fail");
    assert!(duality.strong_duality);
}

#[test]
fn free_functions_reject_bad_input() {
    let result = solve_twophase(&[1.0, ::std::f64::NAN], &[vec![1.0, 1.0]], &[1.0],
                                &[Sense::Leq], Direction::Maximize, None);
    assert_eq!(result.unwrap_err(), Error::NonFinite { what: "objective", index: 1 });
    let result = solve_bigm(&[1.0], &[vec![1.0]], &[1.0], &[Sense::Leq], Direction::Maximize,
                            None, Some(-1.0));
    assert_eq!(result.unwrap_err(), Error::InvalidOption { name: "big_m", value: -1.0 });
    let result = solve_simplex(&[1.0], &[vec![1.0]], &[1.0, 2.0], Direction::Maximize, None);
    assert!(result.is_err());
}

#[test]
fn negative_rhs_is_not_reported_optimal() {
    let c = [1.0];
    let a = [vec![1.0]];
    let b = [-1.0];
    let senses = [Sense::Leq];
    assert_eq!(solve_simplex(&c, &a, &b, Direction::Maximize, None).unwrap_err(),
               Error::NegativeRhs { row: 0 });
    let big_m = solve_bigm(&c, &a, &b, &senses, Direction::Maximize, None, None)
        .expect("Solve should not fail");
    let two_phase = solve_twophase(&c, &a, &b, &senses, Direction::Maximize, None)
        .expect("Solve should not fail");
    assert_eq!(big_m.outcome, Outcome::Infeasible);
    assert_eq!(two_phase.outcome, Outcome::Infeasible);
}
