use error::Error;
use options::SolverOptions;
use problem::ProblemSpec;
use simplex::{EntryRule, SimplexCore, Termination};
use solution::{Iteration, Outcome, Phase, PhaseCounts, SolveResult};
use standard_form::{ObjectiveMode, StandardFormBuilder};
use tableau::Tableau;

/// Solves a problem with mixed senses by the two phase method.
///
/// Phase 1 minimizes the sum of the artificials from the slack/artificial basis; a positive
/// minimum means the problem is infeasible. Phase 2 reloads the problem's own objective on the
/// feasible basis Phase 1 left behind and optimizes it with the artificial columns locked out.
/// Each phase gets `options.max_iterations` pivots. Rows with a negative `b_i` are flipped first.
pub fn solve(problem: &ProblemSpec, options: &SolverOptions) -> Result<SolveResult, Error> {
    options.validate()?;
    let problem = &problem.with_nonnegative_rhs();

    let builder = StandardFormBuilder::new(problem);
    let mut tableau = builder.build(ObjectiveMode::PhaseOne, options.epsilon);
    let mut trace = Vec::new();
    debug!("two-phase: {} rows, {} columns", tableau.num_rows(), tableau.num_columns());

    let phase_one = SimplexCore::new(EntryRule::AnyColumn, options.max_iterations, Phase::One,
                                     problem.names());
    let (termination, mut phase_one_iterations) = phase_one.run(&mut tableau, &mut trace)?;
    // The artificial sum is bounded below, so phase 1 cannot be unbounded.
    if termination != Termination::Optimal {
        debug!("two-phase: phase 1 stopped with {:?}", termination);
        let counts = PhaseCounts { phase_one: phase_one_iterations, phase_two: 0 };
        return Ok(SolveResult::from_tableau(
            problem, &tableau, termination.outcome(), trace, Some(counts)));
    }

    let infeasibility = -tableau.objective_rhs();
    if infeasibility > options.epsilon {
        debug!("two-phase: infeasible, artificial sum {}", infeasibility);
        let counts = PhaseCounts { phase_one: phase_one_iterations, phase_two: 0 };
        return Ok(SolveResult::from_tableau(
            problem, &tableau, Outcome::Infeasible, trace, Some(counts)));
    }
    phase_one_iterations += drive_out_artificials(&mut tableau, &phase_one, &mut trace)?;

    tableau.load_objective(&builder.costs(ObjectiveMode::Plain));
    let phase_two = SimplexCore::new(EntryRule::SkipArtificial, options.max_iterations,
                                     Phase::Two, problem.names());
    let (termination, phase_two_iterations) = phase_two.run(&mut tableau, &mut trace)?;
    debug!("two-phase: {:?} after {} + {} iterations",
           termination, phase_one_iterations, phase_two_iterations);

    let counts = PhaseCounts { phase_one: phase_one_iterations, phase_two: phase_two_iterations };
    Ok(SolveResult::from_tableau(problem, &tableau, termination.outcome(), trace, Some(counts)))
}

/// Replaces artificials that are still basic (at zero level) after a feasible phase 1.
///
/// Each one is pivoted out on the first non-artificial column with a nonzero entry in its row.
/// The row's right hand side is zero, so the pivot keeps every basic value. A row without such a
/// column is redundant; its artificial stays basic at zero and can never move since no column
/// entering in phase 2 touches that row.
fn drive_out_artificials(tableau: &mut Tableau,
                         core: &SimplexCore,
                         trace: &mut Vec<Iteration>) -> Result<usize, Error> {
    let mut pivots = 0;
    for row in 0..tableau.num_rows() {
        if !tableau.tag(tableau.basis()[row]).is_artificial() {
            continue;
        }
        let replacement = (0..tableau.num_columns())
            .filter(|&column| !tableau.tag(column).is_artificial() && !tableau.is_basic(column))
            .find(|&column| tableau.get(row, column).abs() > tableau.epsilon());
        match replacement {
            Some(column) => {
                core.pivot(tableau, row, column, trace)?;
                pivots += 1;
            },
            None => debug!("two-phase: row {} is redundant", row),
        }
    }
    Ok(pivots)
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
    assert_abs_diff_eq!(result.objective.expect("Optimal has objective"), 11.0, epsilon = 1e-9);
    assert_abs_diff_eq!(result.value("x1").expect("x1 exists"), 4.0, epsilon = 1e-9);
    assert_abs_diff_eq!(result.value("x2").expect("x2 exists"), 1.0, epsilon = 1e-9);

    let counts = result.phases.expect("Two phase reports phase counts");
    assert!(counts.phase_one > 0);
    assert_eq!(counts.phase_one + counts.phase_two, result.iterations);
    let phase_one_steps = result.trace.iter().filter(|step| step.phase == Phase::One).count();
    assert_eq!(phase_one_steps, counts.phase_one);
    // No artificial enters once phase 2 starts.
    assert!(result.trace.iter()
        .filter(|step| step.phase == Phase::Two)
        .all(|step| !step.entering_name.starts_with('a')));
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
    assert_eq!(result.phases.map(|counts| counts.phase_two), Some(0));
}

#[test]
fn test_equalities_infeasible() {
    // x1 + x2 = 2 and x1 + x2 = 3 cannot both hold.
    let problem = ProblemSpec::new(vec![1.0, 1.0],
                                   vec![vec![1.0, 1.0], vec![1.0, 1.0]],
                                   vec![2.0, 3.0],
                                   vec![Sense::Eq, Sense::Eq],
                                   Direction::Minimize)
        .expect("Problem is well formed");
    let result = solve(&problem, &SolverOptions::default())
        .expect("Solve should not fail");
    assert_eq!(result.outcome, Outcome::Infeasible);
}

#[test]
fn test_redundant_equality() {
    // The second row repeats the first; its artificial cannot be driven out.
    let problem = ProblemSpec::new(vec![1.0, 2.0],
                                   vec![vec![1.0, 1.0], vec![2.0, 2.0]],
                                   vec![4.0, 8.0],
                                   vec![Sense::Eq, Sense::Eq],
                                   Direction::Maximize)
        .expect("Problem is well formed");
    let result = solve(&problem, &SolverOptions::default())
        .expect("Solve should not fail");
    assert_eq!(result.outcome, Outcome::Optimal);
    assert_abs_diff_eq!(result.objective.expect("Optimal has objective"), 8.0, epsilon = 1e-9);
    assert_abs_diff_eq!(result.value("x2").expect("x2 exists"), 4.0, epsilon = 1e-9);
    assert!(result.value("a2").expect("a2 exists").abs() < 1e-9);
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
    assert_eq!(result.objective, None);
}

#[test]
fn test_phase_one_iteration_limit() {
    let problem = ProblemSpec::new(vec![2.0, 3.0],
                                   vec![vec![1.0, 1.0], vec![1.0, 0.0], vec![0.0, 1.0]],
                                   vec![5.0, 2.0, 1.0],
                                   vec![Sense::Geq, Sense::Geq, Sense::Geq],
                                   Direction::Minimize)
        .expect("Problem is well formed");
    let options = SolverOptions::default().max_iterations(1);
    let result = solve(&problem, &options).expect("Solve should not fail");
    assert_eq!(result.outcome, Outcome::IterationLimit);
    assert_eq!(result.phases, Some(PhaseCounts { phase_one: 1, phase_two: 0 }));
}

#[test]
fn test_negative_rhs() {
    let problem = ProblemSpec::new(vec![1.0], vec![vec![1.0]], vec![-1.0],
                                   vec![Sense::Leq], Direction::Maximize)
        .expect("Problem is well formed");
    let result = solve(&problem, &SolverOptions::default()).expect("Solve should not fail");
    assert_eq!(result.outcome, Outcome::Infeasible);
    assert!(result.values.is_empty());

    let problem = ProblemSpec::new(vec![1.0], vec![vec![1.0]], vec![-2.0],
                                   vec![Sense::Geq], Direction::Minimize)
        .expect("Problem is well formed");
    let result = solve(&problem, &SolverOptions::default()).expect("Solve should not fail");
    assert_eq!(result.outcome, Outcome::Optimal);
    assert_eq!(result.objective, Some(0.0));
    assert_eq!(result.value("x1"), Some(0.0));

    // x1 - x2 = -1 becomes -x1 + x2 = 1; max x1 with x2 <= 3 gives x1 = 2.
    let problem = ProblemSpec::new(vec![1.0, 0.0],
                                   vec![vec![1.0, -1.0], vec![0.0, 1.0]],
                                   vec![-1.0, 3.0],
                                   vec![Sense::Eq, Sense::Leq],
                                   Direction::Maximize)
        .expect("Problem is well formed");
    let result = solve(&problem, &SolverOptions::default()).expect("Solve should not fail");
    assert_eq!(result.outcome, Outcome::Optimal);
    assert_abs_diff_eq!(result.value("x1").expect("x1 exists"), 2.0, epsilon = 1e-9);
    assert_abs_diff_eq!(result.value("x2").expect("x2 exists"), 3.0, epsilon = 1e-9);
}
