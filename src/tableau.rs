use rulinalg::matrix::{BaseMatrix, Matrix};

use error::Error;
use standard_form::ColumnTag;

/// Dense simplex tableau `[A | b]` with the reduced cost row appended.
///
/// Rows `0..m` are constraints, row `m` is the z-row. Columns `0..N` are variables, column `N` is
/// the right hand side. `basis[i]` is the column that is basic in row `i`; those columns form an
/// identity on the constraint rows and have zero reduced cost.
#[derive(Debug, Clone)]
pub struct Tableau {
    matrix: Matrix<f64>,
    basis: Vec<usize>,
    tags: Vec<ColumnTag>,
    epsilon: f64,
}

impl Tableau {
    pub(crate) fn new(matrix: Matrix<f64>,
                      basis: Vec<usize>,
                      tags: Vec<ColumnTag>,
                      epsilon: f64) -> Tableau {
        debug_assert_eq!(matrix.rows(), basis.len() + 1);
        debug_assert_eq!(matrix.cols(), tags.len() + 1);
        Tableau {
            matrix: matrix,
            basis: basis,
            tags: tags,
            epsilon: epsilon,
        }
    }

    /// Number of constraint rows, `m`.
    pub fn num_rows(&self) -> usize {
        self.basis.len()
    }

    /// Number of variable columns, `N`.
    pub fn num_columns(&self) -> usize {
        self.tags.len()
    }

    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.matrix[[row, column]]
    }

    pub fn set(&mut self, row: usize, column: usize, value: f64) {
        self.matrix[[row, column]] = value;
    }

    pub fn rhs(&self, row: usize) -> f64 {
        self.matrix[[row, self.num_columns()]]
    }

    pub fn reduced_cost(&self, column: usize) -> f64 {
        self.matrix[[self.num_rows(), column]]
    }

    /// Current value of the maximized internal objective.
    pub fn objective_rhs(&self) -> f64 {
        self.matrix[[self.num_rows(), self.num_columns()]]
    }

    pub fn matrix(&self) -> &Matrix<f64> {
        &self.matrix
    }

    pub fn basis(&self) -> &[usize] {
        &self.basis
    }

    pub fn tags(&self) -> &[ColumnTag] {
        &self.tags
    }

    pub fn tag(&self, column: usize) -> ColumnTag {
        self.tags[column]
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn is_basic(&self, column: usize) -> bool {
        self.basis.contains(&column)
    }

    /// Value of every column variable in the current basic solution.
    pub fn column_values(&self) -> Vec<f64> {
        let mut values = vec![0.0; self.num_columns()];
        for (row, &column) in self.basis.iter().enumerate() {
            values[column] = self.rhs(row);
        }
        values
    }

    /// Gauss-Jordan pivot on `(row, column)`; `column` becomes basic in `row`.
    ///
    /// Returns the pivot element as it was before scaling.
    pub fn pivot(&mut self, row: usize, column: usize) -> Result<f64, Error> {
        let pivot = self.matrix[[row, column]];
        if pivot.abs() < self.epsilon {
            return Err(Error::DegeneratePivot { row: row, column: column, value: pivot });
        }

        let width = self.matrix.cols();
        for j in 0..width {
            self.matrix[[row, j]] /= pivot;
        }
        self.matrix[[row, column]] = 1.0;

        for i in 0..self.matrix.rows() {
            if i == row {
                continue;
            }
            let factor = self.matrix[[i, column]];
            if factor == 0.0 {
                continue;
            }
            for j in 0..width {
                let delta = factor * self.matrix[[row, j]];
                self.matrix[[i, j]] -= delta;
            }
            self.matrix[[i, column]] = 0.0;
        }

        self.basis[row] = column;
        Ok(pivot)
    }

    /// Minimum ratio test for an entering column.
    ///
    /// Among the rows whose entry in `column` exceeds epsilon, returns the one minimizing
    /// `rhs / entry`, the lowest row index winning ties. `None` means the column can grow without
    /// bound.
    pub fn min_ratio(&self, column: usize) -> Option<usize> {
        let mut leaving: Option<(usize, f64)> = None;
        for row in 0..self.num_rows() {
            let entry = self.matrix[[row, column]];
            if entry <= self.epsilon {
                continue;
            }
            let ratio = self.rhs(row) / entry;
            match leaving {
                Some((_, best)) if ratio >= best => {},
                _ => leaving = Some((row, ratio)),
            }
        }
        leaving.map(|(row, _)| row)
    }

    /// Replaces the z-row with the objective "maximize `costs^Tx`" and prices it out against the
    /// current basis, so that every basic column has zero reduced cost.
    pub(crate) fn load_objective(&mut self, costs: &[f64]) {
        debug_assert_eq!(costs.len(), self.num_columns());
        let z = self.num_rows();
        let n = self.num_columns();
        for j in 0..n {
            self.matrix[[z, j]] = -costs[j];
        }
        self.matrix[[z, n]] = 0.0;

        for row in 0..self.num_rows() {
            let cost = costs[self.basis[row]];
            if cost == 0.0 {
                continue;
            }
            for j in 0..n + 1 {
                let delta = cost * self.matrix[[row, j]];
                self.matrix[[z, j]] += delta;
            }
            self.matrix[[z, self.basis[row]]] = 0.0;
        }
    }

    /// Whether the basis columns form an identity on the constraint rows with zero reduced cost.
    pub fn is_canonical(&self) -> bool {
        for (row, &column) in self.basis.iter().enumerate() {
            for i in 0..self.matrix.rows() {
                let expected = if i == row { 1.0 } else { 0.0 };
                if (self.matrix[[i, column]] - expected).abs() > self.epsilon {
                    return false;
                }
            }
        }
        let mut sorted = self.basis.clone();
        sorted.sort();
        sorted.dedup();
        sorted.len() == self.basis.len()
    }
}

#[cfg(test)]
fn sample() -> Tableau {
    // max 3x1 + 2x2, x1 + x2 <= 10, 2x1 + x2 <= 15
    let matrix = Matrix::new(3, 5, vec![
        1.0, 1.0, 1.0, 0.0, 10.0,
        2.0, 1.0, 0.0, 1.0, 15.0,
        -3.0, -2.0, 0.0, 0.0, 0.0,
    ]);
    let tags = vec![
        ColumnTag::Decision(0),
        ColumnTag::Decision(1),
        ColumnTag::Slack(0),
        ColumnTag::Slack(1),
    ];
    Tableau::new(matrix, vec![2, 3], tags, 1e-10)
}

#[test]
fn min_ratio_picks_tightest_row() {
    let tableau = sample();
    assert_eq!(tableau.min_ratio(0), Some(1));
    assert_eq!(tableau.min_ratio(1), Some(0));
}

#[test]
fn min_ratio_breaks_ties_by_row() {
    let matrix = Matrix::new(3, 3, vec![
        2.0, 1.0, 4.0,
        1.0, 0.0, 2.0,
        -1.0, 0.0, 0.0,
    ]);
    let tags = vec![ColumnTag::Decision(0), ColumnTag::Slack(0)];
    let tableau = Tableau::new(matrix, vec![1, 1], tags, 1e-10);
    assert_eq!(tableau.min_ratio(0), Some(0));
}

#[test]
fn min_ratio_detects_unbounded_column() {
    let matrix = Matrix::new(2, 3, vec![
        -1.0, 1.0, 1.0,
        -1.0, 0.0, 0.0,
    ]);
    let tags = vec![ColumnTag::Decision(0), ColumnTag::Slack(0)];
    let tableau = Tableau::new(matrix, vec![1], tags, 1e-10);
    assert_eq!(tableau.min_ratio(0), None);
}

#[test]
fn pivot_keeps_identity() {
    let mut tableau = sample();
    let pivot = tableau.pivot(1, 0).expect("Pivot element is nonzero");
    assert_eq!(pivot, 2.0);
    assert_eq!(tableau.basis(), &[2, 0]);
    assert!(tableau.is_canonical());
    assert_eq!(tableau.rhs(1), 7.5);
    assert_eq!(tableau.rhs(0), 2.5);
    assert_eq!(tableau.objective_rhs(), 22.5);
    assert_eq!(tableau.reduced_cost(1), -0.5);
    assert_eq!(tableau.column_values(), vec![7.5, 0.0, 2.5, 0.0]);
}

#[test]
fn pivot_on_zero_fails() {
    let mut tableau = sample();
    tableau.set(0, 0, 0.0);
    assert_eq!(tableau.pivot(0, 0),
               Err(Error::DegeneratePivot { row: 0, column: 0, value: 0.0 }));
    assert_eq!(tableau.basis(), &[2, 3]);
}

#[test]
fn load_objective_prices_out_basis() {
    let mut tableau = sample();
    tableau.pivot(1, 0).expect("Pivot element is nonzero");
    // Reload the original objective; x1 is basic so its reduced cost must vanish.
    tableau.load_objective(&[3.0, 2.0, 0.0, 0.0]);
    assert_eq!(tableau.reduced_cost(0), 0.0);
    assert_eq!(tableau.reduced_cost(1), -0.5);
    assert_eq!(tableau.reduced_cost(3), 1.5);
    assert_eq!(tableau.objective_rhs(), 22.5);
}
