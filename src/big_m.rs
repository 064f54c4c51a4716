use error::Error;
use options::SolverOptions;
use problem::ProblemSpec;
use simplex::{EntryRule, SimplexCore};
use solution::{Outcome, Phase, SolveResult};
use standard_form::{ObjectiveMode, StandardFormBuilder};

/// Solves a problem with mixed senses by the Big-M method.
///
/// Artificials carry a penalty of `options.big_m` in the objective and start in the basis. Once
/// an artificial has left it may not come back. An optimum that still holds an artificial at a
/// positive level means the problem is infeasible. Rows with a negative `b_i` are flipped first.
///
/// An `Unbounded` outcome is taken from the penalized problem as is. When an artificial is still
/// basic at a positive level at that point, the original problem is infeasible or unbounded;
/// `two_phase::solve` tells the two apart.
///
/// The fixed penalty makes this sensitive to scaling: if objective coefficients approach `M`, the
/// penalty no longer dominates and the reported outcome can be wrong.
pub fn solve(problem: &ProblemSpec, options: &SolverOptions) -> Result<SolveResult, Error> {
    options.validate()?;
    let problem = &problem.with_nonnegative_rhs();

    let builder = StandardFormBuilder::new(problem);
    let mut tableau = builder.build(ObjectiveMode::BigM(options.big_m), options.epsilon);
    debug!("big-M: {} rows, {} columns, M = {:e}",
           tableau.num_rows(), tableau.num_columns(), options.big_m);

    let mut trace = Vec::new();
    let core = SimplexCore::new(EntryRule::SkipArtificial, options.max_iterations, Phase::Single,
                                problem.names());
    let (termination, iterations) = core.run(&mut tableau, &mut trace)?;

    let mut outcome = termination.outcome();
    if outcome == Outcome::Optimal {
        let positive_artificial = tableau.basis().iter().enumerate()
            .find(|&(row, &column)| {
                tableau.tag(column).is_artificial() && tableau.rhs(row) > tableau.epsilon()
            });
        if let Some((row, _)) = positive_artificial {
            debug!("big-M: artificial in row {} stays at {}", row, tableau.rhs(row));
            outcome = Outcome::Infeasible;
        }
    }
    debug!("big-M: {:?} after {} iterations", outcome, iterations);

    Ok(SolveResult::from_tableau(problem, &tableau, outcome, trace, None))
}

#[cfg(test)]
use problem::{Direction, Sense};

#[test]
fn test_geq_minimize() {
    let problem = ProblemSpec::new(vec![2.0, 3.0],
                                   vec![vec![1.0, 1.0], vec![1.0, 0.0], vec![0.0, 1.0]],
                                   vec![5.0, 2.0, 1.0],
                                   vec![Sense::Geq, Sense::Geq, Sense::Geq],
                                   Direction::Minimize)
        .expect("Problem is well formed");
    let result = solve(&problem, &SolverOptions::default())
        .expect("Solve should not fail");
    assert_eq!(result.outcome, Outcome::Optimal);
    assert_abs_diff_eq!(result.objective.expect("Optimal has objective"), 11.0, epsilon = 1e-6);
    assert_abs_diff_eq!(result.value("x1").expect("x1 exists"), 4.0, epsilon = 1e-6);
    assert_abs_diff_eq!(result.value("x2").expect("x2 exists"), 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(result.value("e2").expect("e2 exists"), 2.0, epsilon = 1e-6);
    assert_eq!(result.value("a1"), Some(0.0));
}

#[test]
fn test_equality() {
    // max 3x1 + x2, x1 <= 10, x1 + x2 >= 1, -0.1x1 + x2 <= 8, x1 = 7
    let problem = ProblemSpec::new(vec![3.0, 1.0],
                                   vec![vec![1.0, 0.0], vec![1.0, 1.0],
                                        vec![-0.1, 1.0], vec![1.0, 0.0]],
                                   vec![10.0, 1.0, 8.0, 7.0],
                                   vec![Sense::Leq, Sense::Geq, Sense::Leq, Sense::Eq],
                                   Direction::Maximize)
        .expect("Problem is well formed");
    let result = solve(&problem, &SolverOptions::default())
        .expect("Solve should not fail");
    assert_eq!(result.outcome, Outcome::Optimal);
    assert_abs_diff_eq!(result.value("x1").expect("x1 exists"), 7.0, epsilon = 1e-6);
    assert_abs_diff_eq!(result.value("x2").expect("x2 exists"), 8.7, epsilon = 1e-6);
    assert_abs_diff_eq!(result.objective.expect("Optimal has objective"), 29.7, epsilon = 1e-6);
}

#[test]
fn test_solve_infeasible() {
    let problem = ProblemSpec::new(vec![1.0],
                                   vec![vec![1.0], vec![1.0]],
                                   vec![1.0, 5.0],
                                   vec![Sense::Leq, Sense::Geq],
                                   Direction::Maximize)
        .expect("Problem is well formed");
    let result = solve(&problem, &SolverOptions::default())
        .expect("Solve should not fail");
    assert_eq!(result.outcome, Outcome::Infeasible);
    assert_eq!(result.objective, None);
    assert!(result.basis.contains(&"a2".to_string()));
}

#[test]
fn test_solve_unbounded() {
    let problem = ProblemSpec::new(vec![1.0, 1.0],
                                   vec![vec![1.0, -1.0], vec![1.0, 1.0]],
                                   vec![1.0, 2.0],
                                   vec![Sense::Leq, Sense::Geq],
                                   Direction::Maximize)
        .expect("Problem is well formed");
    let result = solve(&problem, &SolverOptions::default())
        .expect("Solve should not fail");
    assert_eq!(result.outcome, Outcome::Unbounded);
}

#[test]
fn test_pure_leq_matches_simplex() {
    let problem = ProblemSpec::new(vec![3.0, 2.0],
                                   vec![vec![1.0, 1.0], vec![2.0, 1.0]],
                                   vec![10.0, 15.0],
                                   vec![Sense::Leq, Sense::Leq],
                                   Direction::Maximize)
        .expect("Problem is well formed");
    let big_m = solve(&problem, &SolverOptions::default()).expect("Solve should not fail");
    let plain = ::simplex::solve(&problem, &SolverOptions::default())
        .expect("Solve should not fail");
    assert_eq!(big_m.trace, plain.trace);
    assert_eq!(big_m.objective, plain.objective);
}

#[test]
fn test_negative_rhs() {
    // max x1 subject to x1 <= -1 has no point with x1 >= 0.
    let problem = ProblemSpec::new(vec![1.0], vec![vec![1.0]], vec![-1.0],
                                   vec![Sense::Leq], Direction::Maximize)
        .expect("Problem is well formed");
    let result = solve(&problem, &SolverOptions::default()).expect("Solve should not fail");
    assert_eq!(result.outcome, Outcome::Infeasible);
    assert_eq!(result.objective, None);

    // min x1 subject to x1 >= -2 is optimal at the origin.
    let problem = ProblemSpec::new(vec![1.0], vec![vec![1.0]], vec![-2.0],
                                   vec![Sense::Geq], Direction::Minimize)
        .expect("Problem is well formed");
    let result = solve(&problem, &SolverOptions::default()).expect("Solve should not fail");
    assert_eq!(result.outcome, Outcome::Optimal);
    assert_eq!(result.objective, Some(0.0));
    assert_eq!(result.value("x1"), Some(0.0));
}

#[test]
fn test_unbounded_penalized_problem() {
    // max x2, x1 >= 5, x1 <= 1: infeasible, but x2 is free to grow in the penalized problem.
    let problem = ProblemSpec::new(vec![0.0, 1.0],
                                   vec![vec![1.0, 0.0], vec![1.0, 0.0]],
                                   vec![5.0, 1.0],
                                   vec![Sense::Geq, Sense::Leq],
                                   Direction::Maximize)
        .expect("Problem is well formed");
    let result = solve(&problem, &SolverOptions::default()).expect("Solve should not fail");
    assert_eq!(result.outcome, Outcome::Unbounded);
    assert_eq!(result.basis, vec!["a1".to_string(), "x1".to_string()]);
    assert_abs_diff_eq!(result.tableau[[0, 5]], 4.0, epsilon = 1e-9);

    let two_phase = ::two_phase::solve(&problem, &SolverOptions::default())
        .expect("Solve should not fail");
    assert_eq!(two_phase.outcome, Outcome::Infeasible);
}
