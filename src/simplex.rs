use problem::{ProblemSpec, Sense};
use error::Error;
use options::SolverOptions;
use solution::{Iteration, Outcome, Phase, SolveResult};
use standard_form::{ColumnTag, ObjectiveMode, StandardFormBuilder};
use tableau::Tableau;

/// Which columns may enter the basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRule {
    AnyColumn,
    /// Artificial columns never (re)enter.
    SkipArtificial,
}

impl EntryRule {
    pub fn allows(&self, tag: ColumnTag) -> bool {
        match *self {
            EntryRule::AnyColumn => true,
            EntryRule::SkipArtificial => !tag.is_artificial(),
        }
    }
}

/// How a run of the simplex kernel ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Optimal,
    /// The entering column had no positive entry.
    Unbounded { entering: usize },
    IterationLimit,
}

impl Termination {
    pub fn outcome(&self) -> Outcome {
        match *self {
            Termination::Optimal => Outcome::Optimal,
            Termination::Unbounded { .. } => Outcome::Unbounded,
            Termination::IterationLimit => Outcome::IterationLimit,
        }
    }
}

/// The primal simplex iteration shared by every solver in this crate.
///
/// Dantzig entering rule over the columns `rule` allows, minimum ratio leaving rule, one trace
/// entry per pivot.
pub struct SimplexCore<'a> {
    rule: EntryRule,
    max_iterations: usize,
    phase: Phase,
    names: &'a [String],
}

impl<'a> SimplexCore<'a> {
    pub fn new(rule: EntryRule,
               max_iterations: usize,
               phase: Phase,
               names: &'a [String]) -> SimplexCore<'a> {
        SimplexCore {
            rule: rule,
            max_iterations: max_iterations,
            phase: phase,
            names: names,
        }
    }

    /// Most negative reduced cost among allowed columns; lowest index on ties.
    pub fn entering_column(&self, tableau: &Tableau) -> Option<usize> {
        let mut entering: Option<(usize, f64)> = None;
        for column in 0..tableau.num_columns() {
            if !self.rule.allows(tableau.tag(column)) {
                continue;
            }
            let cost = tableau.reduced_cost(column);
            if cost >= -tableau.epsilon() {
                continue;
            }
            match entering {
                Some((_, best)) if cost >= best => {},
                _ => entering = Some((column, cost)),
            }
        }
        entering.map(|(column, _)| column)
    }

    /// Pivots until optimal, unbounded or out of iterations, appending to `trace`.
    ///
    /// Returns how the run ended and how many pivots it made.
    pub fn run(&self, tableau: &mut Tableau, trace: &mut Vec<Iteration>)
        -> Result<(Termination, usize), Error> {
        let mut iterations = 0;
        loop {
            let entering = match self.entering_column(tableau) {
                Some(column) => column,
                None => return Ok((Termination::Optimal, iterations)),
            };
            if iterations >= self.max_iterations {
                debug!("{:?}: iteration cap of {} reached", self.phase, self.max_iterations);
                return Ok((Termination::IterationLimit, iterations));
            }
            let leaving_row = match tableau.min_ratio(entering) {
                Some(row) => row,
                None => return Ok((Termination::Unbounded { entering: entering }, iterations)),
            };
            self.pivot(tableau, leaving_row, entering, trace)?;
            iterations += 1;
        }
    }

    /// Pivots `entering` into `leaving_row` and records the step.
    pub fn pivot(&self,
                 tableau: &mut Tableau,
                 leaving_row: usize,
                 entering: usize,
                 trace: &mut Vec<Iteration>) -> Result<(), Error> {
        let leaving = tableau.basis()[leaving_row];
        let pivot = tableau.pivot(leaving_row, entering)?;
        let tags = tableau.tags();
        trace!("{:?} pivot {}: {} enters, {} leaves (pivot {})",
               self.phase, trace.len(), tags[entering].name(self.names),
               tags[leaving].name(self.names), pivot);
        trace.push(Iteration {
            index: trace.len(),
            phase: self.phase,
            entering: entering,
            entering_name: tags[entering].name(self.names),
            leaving_row: leaving_row,
            leaving: leaving,
            leaving_name: tags[leaving].name(self.names),
            pivot: pivot,
            basis: tableau.basis().to_vec(),
            tableau: tableau.matrix().clone(),
        });
        Ok(())
    }
}

/// Solves a problem whose constraints are all `<=` with the plain simplex method, starting from
/// the all-slack basis.
///
/// Every `b_i` must be nonnegative so the slack basis is feasible. `>=` rows have to be negated by
/// the caller; `=` rows are not supported here.
pub fn solve(problem: &ProblemSpec, options: &SolverOptions) -> Result<SolveResult, Error> {
    options.validate()?;
    if let Some(row) = problem.senses().iter().position(|&sense| sense != Sense::Leq) {
        return Err(Error::UnsupportedSense { row: row });
    }
    if let Some(row) = problem.b().iter().position(|&rhs| rhs < 0.0) {
        return Err(Error::NegativeRhs { row: row });
    }

    let builder = StandardFormBuilder::new(problem);
    let mut tableau = builder.build(ObjectiveMode::Plain, options.epsilon);
    debug!("simplex: {} rows, {} columns", tableau.num_rows(), tableau.num_columns());

    let mut trace = Vec::new();
    let core = SimplexCore::new(EntryRule::AnyColumn, options.max_iterations, Phase::Single,
                                problem.names());
    let (termination, iterations) = core.run(&mut tableau, &mut trace)?;
    debug!("simplex: {:?} after {} iterations", termination, iterations);

    Ok(SolveResult::from_tableau(problem, &tableau, termination.outcome(), trace, None))
}

#[cfg(test)]
use problem::Direction;

#[cfg(test)]
fn textbook(direction: Direction) -> ProblemSpec {
    ProblemSpec::new(vec![3.0, 2.0],
                     vec![vec![1.0, 1.0], vec![2.0, 1.0]],
                     vec![10.0, 15.0],
                     vec![Sense::Leq, Sense::Leq],
                     direction)
        .expect("Textbook problem is well formed")
}

#[test]
fn test_simplex() {
    let result = solve(&textbook(Direction::Maximize), &SolverOptions::default())
        .expect("Solve should not fail");
    assert_eq!(result.outcome, Outcome::Optimal);
    assert_eq!(result.iterations, 2);
    assert_abs_diff_eq!(result.objective.expect("Optimal has objective"), 25.0, epsilon = 1e-9);
    assert_abs_diff_eq!(result.value("x1").expect("x1 exists"), 5.0, epsilon = 1e-9);
    assert_abs_diff_eq!(result.value("x2").expect("x2 exists"), 5.0, epsilon = 1e-9);
    assert_eq!(result.basis, vec!["x2", "x1"]);
    assert!(result.phases.is_none());
}

#[test]
fn test_trace() {
    let result = solve(&textbook(Direction::Maximize), &SolverOptions::default())
        .expect("Solve should not fail");
    let first = &result.trace[0];
    assert_eq!((first.entering_name.as_str(), first.leaving_name.as_str()), ("x1", "s2"));
    assert_eq!(first.leaving_row, 1);
    assert_eq!(first.pivot, 2.0);
    assert_eq!(first.phase, Phase::Single);
    let second = &result.trace[1];
    assert_eq!((second.entering_name.as_str(), second.leaving_name.as_str()), ("x2", "s1"));
    assert_eq!(second.pivot, 0.5);
    assert_eq!(second.basis, vec![1, 0]);
    assert_eq!(&second.tableau, &result.tableau);
}

#[test]
fn test_minimize_stays_at_origin() {
    let result = solve(&textbook(Direction::Minimize), &SolverOptions::default())
        .expect("Solve should not fail");
    assert_eq!(result.outcome, Outcome::Optimal);
    assert_eq!(result.iterations, 0);
    assert_eq!(result.objective, Some(0.0));
}

#[test]
fn test_solve_unbounded() {
    let problem = ProblemSpec::new(vec![1.0, 1.0],
                                   vec![vec![1.0, -1.0]],
                                   vec![1.0],
                                   vec![Sense::Leq],
                                   Direction::Maximize)
        .expect("Problem is well formed");
    let result = solve(&problem, &SolverOptions::default())
        .expect("Solve should not fail");
    assert_eq!(result.outcome, Outcome::Unbounded);
    assert_eq!(result.objective, None);
}

#[test]
fn test_rejects_geq() {
    let problem = ProblemSpec::new(vec![1.0],
                                   vec![vec![1.0], vec![1.0]],
                                   vec![1.0, 5.0],
                                   vec![Sense::Leq, Sense::Geq],
                                   Direction::Maximize)
        .expect("Problem is well formed");
    assert_eq!(solve(&problem, &SolverOptions::default()).unwrap_err(),
               Error::UnsupportedSense { row: 1 });
}

#[test]
fn test_rejects_negative_rhs() {
    let problem = ProblemSpec::new(vec![1.0],
                                   vec![vec![1.0], vec![1.0]],
                                   vec![2.0, -1.0],
                                   vec![Sense::Leq, Sense::Leq],
                                   Direction::Maximize)
        .expect("Problem is well formed");
    assert_eq!(solve(&problem, &SolverOptions::default()).unwrap_err(),
               Error::NegativeRhs { row: 1 });
}

#[test]
fn test_iteration_limit() {
    let options = SolverOptions::default().max_iterations(1);
    let result = solve(&textbook(Direction::Maximize), &options)
        .expect("Solve should not fail");
    assert_eq!(result.outcome, Outcome::IterationLimit);
    assert_eq!(result.iterations, 1);
    // The tableau is left where the cap stopped it.
    assert_eq!(result.tableau[[1, 4]], 7.5);
}

#[test]
fn test_entry_rule() {
    assert!(EntryRule::AnyColumn.allows(ColumnTag::Artificial(0)));
    assert!(!EntryRule::SkipArtificial.allows(ColumnTag::Artificial(0)));
    assert!(EntryRule::SkipArtificial.allows(ColumnTag::Surplus(0)));
}
