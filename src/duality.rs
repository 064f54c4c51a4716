use std::f64;

use rulinalg::matrix::BaseMatrix;

use builder::{recover, VariableMapping};
use error::Error;
use options::SolverOptions;
use problem::{Direction, ProblemSpec, Sense};
use solution::SolveResult;
use two_phase;

#[derive(Debug, Clone)]
pub struct DualityResult {
    pub primal: SolveResult,
    pub dual: SolveResult,
    pub dual_problem: ProblemSpec,
    /// `y1..ym`, one per primal constraint; only set when the dual is optimal.
    pub dual_values: Vec<(String, f64)>,
    pub strong_duality: bool,
    /// `|z_primal - z_dual|`, infinite unless both problems are optimal.
    pub gap: f64,
}

/// Builds the dual of `primal`, whose variables are all nonnegative.
///
/// The dual optimizes in the opposite direction with objective `b` over `A^T`, one row per primal
/// variable with right hand side `c_j`; those rows are `>=` for a maximizing primal and `<=` for a
/// minimizing one. The dual variable of a primal row is nonnegative when the row has the natural
/// sense for the primal direction (`<=` when maximizing, `>=` when minimizing), nonpositive for the
/// opposite sense, and free for `=`. The latter two are encoded as a negated column and as a
/// `y+`/`y-` pair; the returned mappings recover `y` from the dual's columns.
///
/// A dual row whose right hand side is negative is multiplied by -1 and its sense flipped, so the
/// artificial basis of the solvers starts feasible.
pub fn dual_of(primal: &ProblemSpec) -> Result<(ProblemSpec, Vec<VariableMapping>), Error> {
    let (natural, row_sense) = match primal.direction() {
        Direction::Maximize => (Sense::Leq, Sense::Geq),
        Direction::Minimize => (Sense::Geq, Sense::Leq),
    };
    let a = primal.a();
    let b = primal.b();
    let c = primal.c();
    let n = primal.num_variables();

    let mut mapping = Vec::with_capacity(primal.num_constraints());
    let mut names = Vec::new();
    // Each dual column: its entries over the dual rows and its objective coefficient.
    let mut columns: Vec<(Vec<f64>, f64)> = Vec::new();
    for (i, &sense) in primal.senses().iter().enumerate() {
        let column: Vec<f64> = (0..n).map(|j| a[[i, j]]).collect();
        let negated: Vec<f64> = column.iter().map(|v| -v).collect();
        if sense == natural {
            mapping.push(VariableMapping::Direct(columns.len()));
            names.push(format!("y{}", i + 1));
            columns.push((column, b[i]));
        } else if sense == natural.flipped() {
            mapping.push(VariableMapping::Negated(columns.len()));
            names.push(format!("y{}-", i + 1));
            columns.push((negated, -b[i]));
        } else {
            mapping.push(VariableMapping::Difference(columns.len(), columns.len() + 1));
            names.push(format!("y{}+", i + 1));
            names.push(format!("y{}-", i + 1));
            columns.push((column, b[i]));
            columns.push((negated, -b[i]));
        }
    }
    debug_assert_eq!(a.cols(), n);

    let objective = columns.iter().map(|&(_, cost)| cost).collect();
    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(n);
    let mut rhs = Vec::with_capacity(n);
    let mut senses = Vec::with_capacity(n);
    for j in 0..n {
        let row: Vec<f64> = columns.iter().map(|&(ref entries, _)| entries[j]).collect();
        if c[j] < 0.0 {
            rows.push(row.iter().map(|v| -v).collect());
            rhs.push(-c[j]);
            senses.push(row_sense.flipped());
        } else {
            rows.push(row);
            rhs.push(c[j]);
            senses.push(row_sense);
        }
    }

    let dual = ProblemSpec::new(objective, rows, rhs, senses, primal.direction().opposite())?
        .with_names(names)?;
    Ok((dual, mapping))
}

/// Solves `primal` and its dual with the two phase method and compares the optima.
///
/// Free primal variables are not modelled here; split them with `builder::Model` first.
pub fn analyze(primal: &ProblemSpec, options: &SolverOptions) -> Result<DualityResult, Error> {
    options.validate()?;
    let (dual_problem, mapping) = dual_of(primal)?;

    let primal_result = two_phase::solve(primal, options)?;
    let dual_result = two_phase::solve(&dual_problem, options)?;

    let gap = match (primal_result.objective, dual_result.objective) {
        (Some(z_primal), Some(z_dual)) => (z_primal - z_dual).abs(),
        _ => f64::INFINITY,
    };
    let strong_duality = gap < options.duality_tolerance;
    debug!("duality: primal {:?} {:?}, dual {:?} {:?}, gap {}",
           primal_result.outcome, primal_result.objective,
           dual_result.outcome, dual_result.objective, gap);

    let dual_values = if dual_result.is_optimal() {
        let columns = dual_result.decision_values(dual_problem.num_variables());
        recover(&mapping, &columns).into_iter().enumerate()
            .map(|(i, y)| (format!("y{}", i + 1), y))
            .collect()
    } else {
        Vec::new()
    };

    Ok(DualityResult {
        primal: primal_result,
        dual: dual_result,
        dual_problem: dual_problem,
        dual_values: dual_values,
        strong_duality: strong_duality,
        gap: gap,
    })
}

#[cfg(test)]
use solution::Outcome;

#[cfg(test)]
fn dual_value(result: &DualityResult, name: &str) -> f64 {
    result.dual_values.iter()
        .find(|&&(ref n, _)| n == name)
        .map(|&(_, v)| v)
        .expect("Dual value exists")
}

#[test]
fn dual_of_leq_max() {
    let primal = ProblemSpec::new(vec![3.0, 5.0],
                                  vec![vec![1.0, 0.0], vec![0.0, 2.0], vec![3.0, 2.0]],
                                  vec![4.0, 12.0, 18.0],
                                  vec![Sense::Leq, Sense::Leq, Sense::Leq],
                                  Direction::Maximize)
        .expect("Problem is well formed");
    let (dual, mapping) = dual_of(&primal).expect("Dual is well formed");
    assert_eq!(dual.direction(), Direction::Minimize);
    assert_eq!(dual.c().data(), &vec![4.0, 12.0, 18.0]);
    assert_eq!(dual.a().data(), &vec![1.0, 0.0, 3.0,
                                      0.0, 2.0, 2.0]);
    assert_eq!(dual.b().data(), &vec![3.0, 5.0]);
    assert_eq!(dual.senses(), &[Sense::Geq, Sense::Geq]);
    assert_eq!(dual.names(), &["y1".to_string(), "y2".to_string(), "y3".to_string()]);
    assert_eq!(mapping, vec![VariableMapping::Direct(0),
                             VariableMapping::Direct(1),
                             VariableMapping::Direct(2)]);
}

#[test]
fn strong_duality_textbook() {
    let primal = ProblemSpec::new(vec![3.0, 5.0],
                                  vec![vec![1.0, 0.0], vec![0.0, 2.0], vec![3.0, 2.0]],
                                  vec![4.0, 12.0, 18.0],
                                  vec![Sense::Leq, Sense::Leq, Sense::Leq],
                                  Direction::Maximize)
        .expect("Problem is well formed");
    let result = analyze(&primal, &SolverOptions::default()).expect("Analysis should not fail");
    assert_eq!(result.primal.outcome, Outcome::Optimal);
    assert_eq!(result.dual.outcome, Outcome::Optimal);
    assert_abs_diff_eq!(result.primal.objective.expect("Primal optimal"), 36.0, epsilon = 1e-9);
    assert_abs_diff_eq!(result.primal.value("x1").expect("x1 exists"), 2.0, epsilon = 1e-9);
    assert_abs_diff_eq!(result.primal.value("x2").expect("x2 exists"), 6.0, epsilon = 1e-9);
    assert_abs_diff_eq!(result.dual.objective.expect("Dual optimal"), 36.0, epsilon = 1e-3);
    assert!(result.strong_duality);
    assert!(result.gap < 1e-3);
    // Shadow prices of the three resources.
    assert_abs_diff_eq!(dual_value(&result, "y1"), 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(dual_value(&result, "y2"), 1.5, epsilon = 1e-9);
    assert_abs_diff_eq!(dual_value(&result, "y3"), 1.0, epsilon = 1e-9);
}

#[test]
fn strong_duality_minimize() {
    let primal = ProblemSpec::new(vec![2.0, 3.0],
                                  vec![vec![1.0, 1.0], vec![1.0, 0.0], vec![0.0, 1.0]],
                                  vec![5.0, 2.0, 1.0],
                                  vec![Sense::Geq, Sense::Geq, Sense::Geq],
                                  Direction::Minimize)
        .expect("Problem is well formed");
    let result = analyze(&primal, &SolverOptions::default()).expect("Analysis should not fail");
    assert_eq!(result.dual_problem.direction(), Direction::Maximize);
    assert_eq!(result.dual_problem.senses(), &[Sense::Leq, Sense::Leq]);
    assert!(result.strong_duality);
    assert_abs_diff_eq!(result.dual.objective.expect("Dual optimal"), 11.0, epsilon = 1e-9);
    assert_abs_diff_eq!(dual_value(&result, "y1"), 2.0, epsilon = 1e-9);
    assert_abs_diff_eq!(dual_value(&result, "y3"), 1.0, epsilon = 1e-9);
}

#[test]
fn equality_row_gives_free_dual() {
    // max x1 + x2, x1 + x2 = 4, x1 <= 3
    let primal = ProblemSpec::new(vec![1.0, 1.0],
                                  vec![vec![1.0, 1.0], vec![1.0, 0.0]],
                                  vec![4.0, 3.0],
                                  vec![Sense::Eq, Sense::Leq],
                                  Direction::Maximize)
        .expect("Problem is well formed");
    let (dual, mapping) = dual_of(&primal).expect("Dual is well formed");
    assert_eq!(dual.names(), &["y1+".to_string(), "y1-".to_string(), "y2".to_string()]);
    assert_eq!(mapping[0], VariableMapping::Difference(0, 1));
    assert_eq!(dual.c().data(), &vec![4.0, -4.0, 3.0]);

    let result = analyze(&primal, &SolverOptions::default()).expect("Analysis should not fail");
    assert!(result.strong_duality);
    assert_abs_diff_eq!(result.dual.objective.expect("Dual optimal"), 4.0, epsilon = 1e-9);
    assert_abs_diff_eq!(dual_value(&result, "y1"), 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(dual_value(&result, "y2"), 0.0, epsilon = 1e-9);
}

#[test]
fn opposite_sense_gives_nonpositive_dual() {
    // max x1, x1 >= 1, x1 <= 5
    let primal = ProblemSpec::new(vec![1.0],
                                  vec![vec![1.0], vec![1.0]],
                                  vec![1.0, 5.0],
                                  vec![Sense::Geq, Sense::Leq],
                                  Direction::Maximize)
        .expect("Problem is well formed");
    let (dual, mapping) = dual_of(&primal).expect("Dual is well formed");
    assert_eq!(mapping[0], VariableMapping::Negated(0));
    assert_eq!(dual.c().data(), &vec![-1.0, 5.0]);
    assert_eq!(dual.a().data(), &vec![-1.0, 1.0]);

    let result = analyze(&primal, &SolverOptions::default()).expect("Analysis should not fail");
    assert!(result.strong_duality);
    assert_abs_diff_eq!(result.dual.objective.expect("Dual optimal"), 5.0, epsilon = 1e-9);
    assert_abs_diff_eq!(dual_value(&result, "y2"), 1.0, epsilon = 1e-9);
    assert!(dual_value(&result, "y1") <= 1e-9);
}

#[test]
fn negative_cost_flips_dual_row() {
    // max x2 - x1, x1 + x2 <= 4
    let primal = ProblemSpec::new(vec![-1.0, 1.0],
                                  vec![vec![1.0, 1.0]],
                                  vec![4.0],
                                  vec![Sense::Leq],
                                  Direction::Maximize)
        .expect("Problem is well formed");
    let (dual, _) = dual_of(&primal).expect("Dual is well formed");
    assert_eq!(dual.senses(), &[Sense::Leq, Sense::Geq]);
    assert_eq!(dual.b().data(), &vec![1.0, 1.0]);
    assert_eq!(dual.a().data(), &vec![-1.0, 1.0]);

    let result = analyze(&primal, &SolverOptions::default()).expect("Analysis should not fail");
    assert!(result.strong_duality);
    assert_abs_diff_eq!(result.primal.objective.expect("Primal optimal"), 4.0, epsilon = 1e-9);
}

#[test]
fn unbounded_primal_has_no_strong_duality() {
    let primal = ProblemSpec::new(vec![1.0, 1.0],
                                  vec![vec![1.0, -1.0]],
                                  vec![1.0],
                                  vec![Sense::Leq],
                                  Direction::Maximize)
        .expect("Problem is well formed");
    let result = analyze(&primal, &SolverOptions::default()).expect("Analysis should not fail");
    assert_eq!(result.primal.outcome, Outcome::Unbounded);
    assert_eq!(result.dual.outcome, Outcome::Infeasible);
    assert!(!result.strong_duality);
    assert!(result.gap.is_infinite());
    assert!(result.dual_values.is_empty());
}

#[test]
fn negative_primal_rhs() {
    // max x1, x1 + x2 <= 4, -x1 <= -1
    let primal = ProblemSpec::new(vec![1.0, 0.0],
                                  vec![vec![1.0, 1.0], vec![-1.0, 0.0]],
                                  vec![4.0, -1.0],
                                  vec![Sense::Leq, Sense::Leq],
                                  Direction::Maximize)
        .expect("Problem is well formed");
    let result = analyze(&primal, &SolverOptions::default()).expect("Analysis should not fail");
    assert_eq!(result.primal.outcome, Outcome::Optimal);
    assert_abs_diff_eq!(result.primal.value("x1").expect("x1 exists"), 4.0, epsilon = 1e-9);
    assert!(result.strong_duality);
    assert_abs_diff_eq!(dual_value(&result, "y1"), 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(dual_value(&result, "y2"), 0.0, epsilon = 1e-9);

    // Without a feasible point neither side has an optimum.
    let primal = ProblemSpec::new(vec![1.0], vec![vec![1.0]], vec![-1.0],
                                  vec![Sense::Leq], Direction::Maximize)
        .expect("Problem is well formed");
    let result = analyze(&primal, &SolverOptions::default()).expect("Analysis should not fail");
    assert_eq!(result.primal.outcome, Outcome::Infeasible);
    assert!(!result.strong_duality);
}
