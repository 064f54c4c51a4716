use rulinalg::matrix::{BaseMatrix, Matrix};

use problem::{ProblemSpec, Sense};
use tableau::Tableau;

/// Origin of a tableau column. Row indices are zero based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnTag {
    Decision(usize),
    Slack(usize),
    Surplus(usize),
    Artificial(usize),
}

impl ColumnTag {
    pub fn is_artificial(&self) -> bool {
        match *self {
            ColumnTag::Artificial(_) => true,
            _ => false,
        }
    }

    /// Display name: the decision variable's own name, or `s{i}`, `e{i}`, `a{i}` with a one based
    /// constraint index.
    pub fn name(&self, names: &[String]) -> String {
        match *self {
            ColumnTag::Decision(k) => names[k].clone(),
            ColumnTag::Slack(row) => format!("s{}", row + 1),
            ColumnTag::Surplus(row) => format!("e{}", row + 1),
            ColumnTag::Artificial(row) => format!("a{}", row + 1),
        }
    }
}

/// How the z-row of a fresh tableau is initialized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObjectiveMode {
    /// The problem's own objective; only meaningful when every row is `<=`.
    Plain,
    /// The problem's objective with every artificial penalized by `M`.
    BigM(f64),
    /// Minimize the sum of the artificials.
    PhaseOne,
}

/// Translates a `ProblemSpec` into tableau form.
///
/// Per row: `<=` gets a slack, `>=` a surplus followed by an artificial, `=` an artificial. The
/// slack or artificial of each row starts in the basis, so the initial basis is an identity.
pub struct StandardFormBuilder<'a> {
    problem: &'a ProblemSpec,
    tags: Vec<ColumnTag>,
    basis: Vec<usize>,
}

impl<'a> StandardFormBuilder<'a> {
    pub fn new(problem: &'a ProblemSpec) -> StandardFormBuilder<'a> {
        let n = problem.num_variables();
        let mut tags: Vec<ColumnTag> = (0..n).map(ColumnTag::Decision).collect();
        let mut basis = Vec::with_capacity(problem.num_constraints());

        for (row, &sense) in problem.senses().iter().enumerate() {
            match sense {
                Sense::Leq => {
                    basis.push(tags.len());
                    tags.push(ColumnTag::Slack(row));
                },
                Sense::Geq => {
                    tags.push(ColumnTag::Surplus(row));
                    basis.push(tags.len());
                    tags.push(ColumnTag::Artificial(row));
                },
                Sense::Eq => {
                    basis.push(tags.len());
                    tags.push(ColumnTag::Artificial(row));
                },
            }
        }

        StandardFormBuilder {
            problem: problem,
            tags: tags,
            basis: basis,
        }
    }

    pub fn tags(&self) -> &[ColumnTag] {
        &self.tags
    }

    pub fn initial_basis(&self) -> &[usize] {
        &self.basis
    }

    /// Objective to maximize, one coefficient per tableau column.
    ///
    /// Minimization problems are negated here; the solvers always maximize internally.
    pub fn costs(&self, mode: ObjectiveMode) -> Vec<f64> {
        let sign = self.problem.direction().sign();
        let c = self.problem.c();
        self.tags.iter().map(|tag| {
            match (mode, *tag) {
                (ObjectiveMode::PhaseOne, ColumnTag::Artificial(_)) => -1.0,
                (ObjectiveMode::PhaseOne, _) => 0.0,
                (_, ColumnTag::Decision(k)) => sign * c[k],
                (ObjectiveMode::BigM(m), ColumnTag::Artificial(_)) => -m,
                _ => 0.0,
            }
        }).collect()
    }

    pub fn build(&self, mode: ObjectiveMode, epsilon: f64) -> Tableau {
        let m = self.problem.num_constraints();
        let n = self.problem.num_variables();
        let width = self.tags.len() + 1;
        let a = self.problem.a();
        let b = self.problem.b();

        let mut matrix = Matrix::zeros(m + 1, width);
        for row in 0..m {
            for j in 0..n {
                matrix[[row, j]] = a[[row, j]];
            }
            matrix[[row, width - 1]] = b[row];
        }
        debug_assert_eq!(a.rows(), m);

        for (column, tag) in self.tags.iter().enumerate() {
            match *tag {
                ColumnTag::Decision(_) => {},
                ColumnTag::Slack(row) | ColumnTag::Artificial(row) => matrix[[row, column]] = 1.0,
                ColumnTag::Surplus(row) => matrix[[row, column]] = -1.0,
            }
        }

        let mut tableau = Tableau::new(matrix, self.basis.clone(), self.tags.clone(), epsilon);
        tableau.load_objective(&self.costs(mode));
        tableau
    }
}

#[cfg(test)]
use problem::Direction;

#[cfg(test)]
fn mixed() -> ProblemSpec {
    // min 2x1 + 3x2, x1 + x2 >= 5, x1 <= 4, x1 - x2 = 1
    ProblemSpec::new(vec![2.0, 3.0],
                     vec![vec![1.0, 1.0], vec![1.0, 0.0], vec![1.0, -1.0]],
                     vec![5.0, 4.0, 1.0],
                     vec![Sense::Geq, Sense::Leq, Sense::Eq],
                     Direction::Minimize)
        .expect("Mixed problem is well formed")
}

#[test]
fn column_expansion() {
    let problem = mixed();
    let builder = StandardFormBuilder::new(&problem);
    assert_eq!(builder.tags(), &[
        ColumnTag::Decision(0),
        ColumnTag::Decision(1),
        ColumnTag::Surplus(0),
        ColumnTag::Artificial(0),
        ColumnTag::Slack(1),
        ColumnTag::Artificial(2),
    ]);
    assert_eq!(builder.initial_basis(), &[3, 4, 5]);

    let names = problem.names();
    let labels: Vec<String> = builder.tags().iter().map(|tag| tag.name(names)).collect();
    assert_eq!(labels, vec!["x1", "x2", "e1", "a1", "s2", "a3"]);
}

#[test]
fn big_m_tableau() {
    let problem = mixed();
    let builder = StandardFormBuilder::new(&problem);
    let tableau = builder.build(ObjectiveMode::BigM(100.0), 1e-10);
    assert_eq!(tableau.matrix().data(), &vec![
        1.0, 1.0, -1.0, 1.0, 0.0, 0.0, 5.0,
        1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 4.0,
        1.0, -1.0, 0.0, 0.0, 0.0, 1.0, 1.0,
        // z-row: (2, 3, 0, 100, 0, 100 | 0) minus 100 times rows 0 and 2
        -198.0, 3.0, 100.0, 0.0, 0.0, 0.0, -600.0,
    ]);
    assert!(tableau.is_canonical());
}

#[test]
fn phase_one_tableau() {
    let problem = mixed();
    let tableau = StandardFormBuilder::new(&problem).build(ObjectiveMode::PhaseOne, 1e-10);
    let z: Vec<f64> = (0..7).map(|j| tableau.get(3, j)).collect();
    assert_eq!(z, vec![-2.0, 0.0, 1.0, 0.0, 0.0, 0.0, -6.0]);
    assert!(tableau.is_canonical());
}

#[test]
fn plain_tableau_negates_minimization() {
    let problem = mixed();
    let costs = StandardFormBuilder::new(&problem).costs(ObjectiveMode::Plain);
    assert_eq!(costs, vec![-2.0, -3.0, 0.0, 0.0, 0.0, 0.0]);
    let costs = StandardFormBuilder::new(&problem.negated()).costs(ObjectiveMode::Plain);
    assert_eq!(costs, vec![-2.0, -3.0, 0.0, 0.0, 0.0, 0.0]);
}
