use rulinalg::matrix::Matrix;

use problem::ProblemSpec;
use standard_form::ColumnTag;
use tableau::Tableau;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Optimal,
    Unbounded,
    Infeasible,
    IterationLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Single run of the simplex kernel (plain simplex, Big-M).
    Single,
    /// Minimizing the artificials.
    One,
    /// Optimizing the real objective from a feasible basis.
    Two,
}

/// One pivot, as recorded by the simplex kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct Iteration {
    /// Zero based position in the trace.
    pub index: usize,
    pub phase: Phase,
    pub entering: usize,
    pub entering_name: String,
    pub leaving_row: usize,
    pub leaving: usize,
    pub leaving_name: String,
    pub pivot: f64,
    pub basis: Vec<usize>,
    pub tableau: Matrix<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhaseCounts {
    pub phase_one: usize,
    pub phase_two: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult {
    pub outcome: Outcome,
    /// Objective in the problem's own direction and sign; only set when optimal.
    pub objective: Option<f64>,
    /// (name, value) for every tableau column, decision variables first; only set when optimal.
    pub values: Vec<(String, f64)>,
    /// Names of the basic columns, one per constraint row.
    pub basis: Vec<String>,
    pub column_names: Vec<String>,
    /// The tableau as it was when the solver stopped.
    pub tableau: Matrix<f64>,
    pub trace: Vec<Iteration>,
    pub iterations: usize,
    pub phases: Option<PhaseCounts>,
}

impl SolveResult {
    pub(crate) fn from_tableau(problem: &ProblemSpec,
                               tableau: &Tableau,
                               outcome: Outcome,
                               trace: Vec<Iteration>,
                               phases: Option<PhaseCounts>) -> SolveResult {
        let column_names = column_names(problem, tableau.tags());
        let basis = tableau.basis().iter().map(|&column| column_names[column].clone()).collect();

        let (objective, values) = if outcome == Outcome::Optimal {
            let column_values = tableau.column_values();
            let x = decision_values(tableau.tags(), &column_values, problem.num_variables());
            let values = column_names.iter().cloned().zip(column_values).collect();
            (Some(problem.objective_value(&x)), values)
        } else {
            (None, Vec::new())
        };

        SolveResult {
            outcome: outcome,
            objective: objective,
            values: values,
            basis: basis,
            column_names: column_names,
            tableau: tableau.matrix().clone(),
            iterations: trace.len(),
            trace: trace,
            phases: phases,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.outcome == Outcome::Optimal
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.iter().find(|&&(ref n, _)| n == name).map(|&(_, v)| v)
    }

    /// Values of the first `n` columns, which are the decision variables.
    pub fn decision_values(&self, n: usize) -> Vec<f64> {
        self.values.iter().take(n).map(|&(_, v)| v).collect()
    }
}

pub(crate) fn column_names(problem: &ProblemSpec, tags: &[ColumnTag]) -> Vec<String> {
    tags.iter().map(|tag| tag.name(problem.names())).collect()
}

fn decision_values(tags: &[ColumnTag], column_values: &[f64], n: usize) -> Vec<f64> {
    let mut x = vec![0.0; n];
    for (tag, &value) in tags.iter().zip(column_values) {
        if let ColumnTag::Decision(k) = *tag {
            x[k] = value;
        }
    }
    x
}

#[cfg(test)]
use problem::{Direction, Sense};
#[cfg(test)]
use standard_form::{ObjectiveMode, StandardFormBuilder};

#[test]
fn extraction_reads_basis() {
    let problem = ProblemSpec::new(vec![3.0, 2.0],
                                   vec![vec![1.0, 1.0], vec![2.0, 1.0]],
                                   vec![10.0, 15.0],
                                   vec![Sense::Leq, Sense::Leq],
                                   Direction::Maximize)
        .expect("Problem is well formed")
        .with_names(vec!["chairs".to_string(), "tables".to_string()])
        .expect("Two names for two variables");
    let mut tableau = StandardFormBuilder::new(&problem).build(ObjectiveMode::Plain, 1e-10);
    tableau.pivot(1, 0).expect("Pivot element is nonzero");

    let result = SolveResult::from_tableau(&problem, &tableau, Outcome::Optimal, vec![], None);
    assert_eq!(result.basis, vec!["s1", "chairs"]);
    assert_eq!(result.column_names, vec!["chairs", "tables", "s1", "s2"]);
    assert_eq!(result.value("chairs"), Some(7.5));
    assert_eq!(result.value("tables"), Some(0.0));
    assert_eq!(result.value("s1"), Some(2.5));
    assert_eq!(result.value("nope"), None);
    assert_eq!(result.decision_values(2), vec![7.5, 0.0]);
    assert_eq!(result.objective, Some(22.5));
    assert_eq!(result.iterations, 0);

    let result = SolveResult::from_tableau(&problem, &tableau, Outcome::Unbounded, vec![], None);
    assert_eq!(result.objective, None);
    assert!(result.values.is_empty());
    assert_eq!(result.basis.len(), 2);
}
