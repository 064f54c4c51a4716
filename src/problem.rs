use rulinalg::matrix::{BaseMatrix, Matrix};
use rulinalg::vector::Vector;

use error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sense {
    Leq,
    Geq,
    Eq,
}

impl Sense {
    /// `<=` and `>=` swap, `=` stays.
    pub fn flipped(self) -> Sense {
        match self {
            Sense::Leq => Sense::Geq,
            Sense::Geq => Sense::Leq,
            Sense::Eq => Sense::Eq,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Maximize,
    Minimize,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Maximize => Direction::Minimize,
            Direction::Minimize => Direction::Maximize,
        }
    }

    // Sign that turns this direction into maximization.
    pub(crate) fn sign(self) -> f64 {
        match self {
            Direction::Maximize => 1.0,
            Direction::Minimize => -1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProblemSpec {
    // Linear program as handed to the solvers:
    // Optimize c^Tx (in `direction`)
    // subject to a_i x (senses[i]) b_i for every row i
    // and x >= 0
    c: Vector<f64>,
    a: Matrix<f64>,
    b: Vector<f64>,
    senses: Vec<Sense>,
    direction: Direction,
    names: Vec<String>,
}

impl ProblemSpec {
    /// Builds a problem from an objective, the rows of the constraint matrix, a right hand side
    /// and one sense per row. Variables are named `x1..xn`.
    ///
    /// The right hand side is taken as is; see `with_nonnegative_rhs`.
    pub fn new(c: Vec<f64>,
               rows: Vec<Vec<f64>>,
               b: Vec<f64>,
               senses: Vec<Sense>,
               direction: Direction) -> Result<ProblemSpec, Error> {
        let n = c.len();
        let m = rows.len();
        if n == 0 {
            return Err(Error::Empty);
        }
        check_finite("objective", &c)?;
        check_length("right hand side", m, b.len())?;
        check_finite("right hand side", &b)?;
        check_length("senses", m, senses.len())?;

        let mut a_data = Vec::with_capacity(m * n);
        for row in rows {
            check_length("constraint row", n, row.len())?;
            a_data.extend(row);
        }
        check_finite("constraint matrix", &a_data)?;

        Ok(ProblemSpec {
            c: Vector::new(c),
            a: Matrix::new(m, n, a_data),
            b: Vector::new(b),
            senses: senses,
            direction: direction,
            names: (1..n + 1).map(|j| format!("x{}", j)).collect(),
        })
    }

    /// Replaces the default `x1..xn` variable names.
    pub fn with_names(mut self, names: Vec<String>) -> Result<ProblemSpec, Error> {
        check_length("variable names", self.num_variables(), names.len())?;
        self.names = names;
        Ok(self)
    }

    /// Same constraints, objective `-c` optimized in the opposite direction.
    pub fn negated(&self) -> ProblemSpec {
        let mut negated = self.clone();
        negated.c = Vector::new(self.c.iter().map(|&v| -v).collect::<Vec<_>>());
        negated.direction = self.direction.opposite();
        negated
    }

    /// Same feasible set with every row whose `b_i` is negative multiplied by -1 and its sense
    /// flipped, so the slack/artificial starting basis is feasible.
    pub fn with_nonnegative_rhs(&self) -> ProblemSpec {
        let mut normalized = self.clone();
        for i in 0..self.num_constraints() {
            if self.b[i] >= 0.0 {
                continue;
            }
            for j in 0..self.num_variables() {
                normalized.a[[i, j]] = -self.a[[i, j]];
            }
            normalized.b[i] = -self.b[i];
            normalized.senses[i] = self.senses[i].flipped();
        }
        normalized
    }

    pub fn num_variables(&self) -> usize {
        self.c.size()
    }

    pub fn num_constraints(&self) -> usize {
        self.b.size()
    }

    pub fn c(&self) -> &Vector<f64> {
        &self.c
    }

    pub fn a(&self) -> &Matrix<f64> {
        &self.a
    }

    pub fn b(&self) -> &Vector<f64> {
        &self.b
    }

    pub fn senses(&self) -> &[Sense] {
        &self.senses
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// `c^Tx` in the problem's own sign.
    pub fn objective_value(&self, x: &[f64]) -> f64 {
        self.c.iter().zip(x).map(|(c, x)| c * x).sum()
    }

    fn row_activity(&self, row: usize, x: &[f64]) -> f64 {
        (0..self.a.cols()).map(|j| self.a[[row, j]] * x[j]).sum()
    }

    /// Largest amount by which `x` violates a constraint or a nonnegativity bound.
    pub fn max_violation(&self, x: &[f64]) -> f64 {
        let mut worst = x.iter().fold(0.0f64, |worst, &v| worst.max(-v));
        for (i, &sense) in self.senses.iter().enumerate() {
            let lhs = self.row_activity(i, x);
            let rhs = self.b[i];
            let violation = match sense {
                Sense::Leq => lhs - rhs,
                Sense::Geq => rhs - lhs,
                Sense::Eq => (lhs - rhs).abs(),
            };
            worst = worst.max(violation);
        }
        worst
    }

    pub fn is_satisfied_by(&self, x: &[f64], tolerance: f64) -> bool {
        x.len() == self.num_variables() && self.max_violation(x) <= tolerance
    }
}

fn check_length(what: &'static str, expected: usize, found: usize) -> Result<(), Error> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::DimensionMismatch { what: what, expected: expected, found: found })
    }
}

fn check_finite(what: &'static str, values: &[f64]) -> Result<(), Error> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(Error::NonFinite { what: what, index: index }),
        None => Ok(()),
    }
}

#[cfg(test)]
fn textbook() -> ProblemSpec {
    ProblemSpec::new(vec![3.0, 2.0],
                     vec![vec![1.0, 1.0], vec![2.0, 1.0]],
                     vec![10.0, 15.0],
                     vec![Sense::Leq, Sense::Leq],
                     Direction::Maximize)
        .expect("Textbook problem is well formed")
}

#[test]
fn new_problem() {
    let problem = textbook();
    assert_eq!(problem.num_variables(), 2);
    assert_eq!(problem.num_constraints(), 2);
    assert_eq!(problem.a().data(), &vec![1.0, 1.0, 2.0, 1.0]);
    assert_eq!(problem.names(), &["x1".to_string(), "x2".to_string()]);
}

#[test]
fn rejects_ragged_rows() {
    let result = ProblemSpec::new(vec![1.0, 1.0],
                                  vec![vec![1.0, 1.0], vec![1.0]],
                                  vec![1.0, 1.0],
                                  vec![Sense::Leq, Sense::Leq],
                                  Direction::Maximize);
    assert_eq!(result.unwrap_err(),
               Error::DimensionMismatch { what: "constraint row", expected: 2, found: 1 });
}

#[test]
fn rejects_non_finite() {
    let result = ProblemSpec::new(vec![1.0, ::std::f64::INFINITY],
                                  vec![vec![1.0, 1.0]],
                                  vec![1.0],
                                  vec![Sense::Leq],
                                  Direction::Maximize);
    assert_eq!(result.unwrap_err(), Error::NonFinite { what: "objective", index: 1 });

    let result = ProblemSpec::new(vec![1.0, 1.0],
                                  vec![vec![1.0, 1.0], vec![::std::f64::NAN, 0.0]],
                                  vec![1.0, 2.0],
                                  vec![Sense::Leq, Sense::Geq],
                                  Direction::Maximize);
    assert_eq!(result.unwrap_err(), Error::NonFinite { what: "constraint matrix", index: 2 });
}

#[test]
fn rejects_bad_names_and_empty() {
    assert_eq!(textbook().with_names(vec!["x".to_string()]).unwrap_err(),
               Error::DimensionMismatch { what: "variable names", expected: 2, found: 1 });
    let empty = ProblemSpec::new(vec![], vec![], vec![], vec![], Direction::Minimize);
    assert_eq!(empty.unwrap_err(), Error::Empty);
}

#[test]
fn violations() {
    let problem = textbook();
    assert!(problem.is_satisfied_by(&[5.0, 5.0], 1e-9));
    assert!(!problem.is_satisfied_by(&[6.0, 5.0], 1e-9));
    assert_eq!(problem.max_violation(&[8.0, 0.0]), 1.0);
    assert_eq!(problem.max_violation(&[-2.0, 0.0]), 2.0);
    assert_eq!(problem.objective_value(&[5.0, 5.0]), 25.0);
}

#[test]
fn negation() {
    let negated = textbook().negated();
    assert_eq!(negated.direction(), Direction::Minimize);
    assert_eq!(negated.c().data(), &vec![-3.0, -2.0]);
}

#[test]
fn negative_rhs_rows_are_flipped() {
    // x1 - x2 >= -2 and x1 <= 3 describe the same set after normalizing.
    let problem = ProblemSpec::new(vec![1.0, 1.0],
                                   vec![vec![1.0, -1.0], vec![1.0, 0.0]],
                                   vec![-2.0, 3.0],
                                   vec![Sense::Geq, Sense::Leq],
                                   Direction::Maximize)
        .expect("Problem is well formed");
    let normalized = problem.with_nonnegative_rhs();
    assert_eq!(normalized.a().data(), &vec![-1.0, 1.0, 1.0, 0.0]);
    assert_eq!(normalized.b().data(), &vec![2.0, 3.0]);
    assert_eq!(normalized.senses(), &[Sense::Leq, Sense::Leq]);
    for x in vec![[0.0, 2.0], [3.0, 5.0], [0.0, 3.0], [4.0, 0.0]] {
        assert_eq!(problem.max_violation(&x), normalized.max_violation(&x));
    }
}
