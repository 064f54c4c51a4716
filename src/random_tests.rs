#![cfg(test)]

use big_m;
use duality;
use options::SolverOptions;
use problem::{Direction, ProblemSpec};
use simplex;
use solution::{Outcome, SolveResult};
use standard_form::ColumnTag;
use test_util::{dimensions, leq_seeded, mixed_seeded};
use two_phase;

const SEEDS: u64 = 40;

fn mixed_problems() -> Vec<ProblemSpec> {
    let mut problems = Vec::new();
    for seed in 0..SEEDS {
        let (rows, cols) = dimensions(seed);
        let direction = if seed % 2 == 0 { Direction::Maximize } else { Direction::Minimize };
        problems.push(mixed_seeded(rows, cols, direction, seed));
    }
    problems
}

fn solve_both(problem: &ProblemSpec) -> (SolveResult, SolveResult) {
    let options = SolverOptions::default();
    let big_m = big_m::solve(problem, &options).expect("Big-M should not fail");
    let two_phase = two_phase::solve(problem, &options).expect("Two phase should not fail");
    (big_m, two_phase)
}

fn objective(result: &SolveResult) -> f64 {
    assert_eq!(result.outcome, Outcome::Optimal);
    result.objective.expect("Optimal result has an objective")
}

fn check_trace(problem: &ProblemSpec, result: &SolveResult) {
    let m = problem.num_constraints();
    for step in result.trace.iter() {
        let t = &step.tableau;
        assert!((t[[step.leaving_row, step.entering]] - 1.0).abs() < 1e-9);
        for k in 0..m + 1 {
            if k != step.leaving_row {
                assert!(t[[k, step.entering]].abs() < 1e-9);
            }
        }
        assert_eq!(step.basis[step.leaving_row], step.entering);
        assert_eq!(step.basis.len(), m);
        let mut distinct = step.basis.clone();
        distinct.sort();
        distinct.dedup();
        assert_eq!(distinct.len(), m);
    }
}

#[test]
fn pivots_keep_basis_canonical() {
    for problem in mixed_problems() {
        let (big_m, two_phase) = solve_both(&problem);
        check_trace(&problem, &big_m);
        check_trace(&problem, &two_phase);
    }
}

#[test]
fn optimal_reduced_costs_are_nonnegative() {
    for problem in mixed_problems() {
        let (big_m, two_phase) = solve_both(&problem);
        for (result, tolerance) in vec![(big_m, 1e-6), (two_phase, 1e-9)] {
            let z = problem.num_constraints();
            let tags = ::standard_form::StandardFormBuilder::new(&problem).tags().to_vec();
            for (column, tag) in tags.iter().enumerate() {
                match *tag {
                    ColumnTag::Decision(_) | ColumnTag::Slack(_) => {
                        assert!(result.tableau[[z, column]] >= -tolerance);
                    },
                    _ => {},
                }
            }
        }
    }
}

#[test]
fn optimal_solutions_are_feasible() {
    for problem in mixed_problems() {
        let (big_m, two_phase) = solve_both(&problem);
        for result in vec![big_m, two_phase] {
            assert_eq!(result.outcome, Outcome::Optimal);
            let x = result.decision_values(problem.num_variables());
            assert!(problem.max_violation(&x) < 1e-4);
            assert!((problem.objective_value(&x) - objective(&result)).abs() < 1e-9);
        }
    }
}

#[test]
fn big_m_agrees_with_two_phase() {
    for problem in mixed_problems() {
        let (big_m, two_phase) = solve_both(&problem);
        assert!((objective(&big_m) - objective(&two_phase)).abs() < 1e-3);
    }
}

#[test]
fn simplex_agrees_with_two_phase() {
    for seed in 0..SEEDS {
        let (rows, cols) = dimensions(seed);
        let problem = leq_seeded(rows, cols, seed);
        let options = SolverOptions::default();
        let plain = simplex::solve(&problem, &options).expect("Simplex should not fail");
        let two_phase = two_phase::solve(&problem, &options).expect("Two phase should not fail");
        assert!((objective(&plain) - objective(&two_phase)).abs() < 1e-9);
        let counts = two_phase.phases.expect("Two phase reports phase counts");
        assert_eq!(counts.phase_one, 0);
    }
}

#[test]
fn strong_duality_holds() {
    for seed in 0..SEEDS {
        let (rows, cols) = dimensions(seed);
        let problems = vec![
            leq_seeded(rows, cols, seed),
            mixed_seeded(rows, cols, Direction::Maximize, seed),
            mixed_seeded(rows, cols, Direction::Minimize, seed),
        ];
        for problem in problems {
            let result = duality::analyze(&problem, &SolverOptions::default())
                .expect("Duality analysis should not fail");
            assert_eq!(result.primal.outcome, Outcome::Optimal);
            assert_eq!(result.dual.outcome, Outcome::Optimal);
            assert!(result.strong_duality, "gap {} for seed {}", result.gap, seed);
        }
    }
}

#[test]
fn negated_direction_negates_objective() {
    for problem in mixed_problems() {
        let negated = problem.negated();
        let (big_m, two_phase) = solve_both(&problem);
        let (big_m_negated, two_phase_negated) = solve_both(&negated);
        assert!((objective(&two_phase) + objective(&two_phase_negated)).abs() < 1e-9);
        assert!((objective(&big_m) + objective(&big_m_negated)).abs() < 1e-6);
    }
}

#[test]
fn repeated_solves_are_identical() {
    for problem in mixed_problems() {
        let (first_big_m, first_two_phase) = solve_both(&problem);
        let (second_big_m, second_two_phase) = solve_both(&problem);
        assert_eq!(first_big_m, second_big_m);
        assert_eq!(first_two_phase, second_two_phase);
    }
}
