use std::cmp::Ordering;
use std::collections::HashMap;
use std::vec::Vec;

use error::Error;
use problem::{Direction, ProblemSpec, Sense};

#[derive(Debug, Clone)]
pub struct Constraint {
    coefficients: HashMap<usize, f64>,
    direction: Ordering,
    value: f64,
}

impl Constraint {
    pub fn new() -> Constraint {
        Constraint {
            coefficients: HashMap::new(),
            direction: Ordering::Equal,
            value: 0.0,
        }
    }

    pub fn add(mut self, var_index: usize, coeff: f64) -> Constraint {
        *self.coefficients.entry(var_index).or_insert(0.0) += coeff;
        self
    }

    /// `Less` reads as `<=`, `Greater` as `>=`.
    pub fn value(mut self, dir: Ordering, val: f64) -> Constraint {
        self.direction = dir;
        self.value = val;
        self
    }

    fn sense(&self) -> Sense {
        match self.direction {
            Ordering::Less => Sense::Leq,
            Ordering::Greater => Sense::Geq,
            Ordering::Equal => Sense::Eq,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Objective {
    coefficients: HashMap<usize, f64>,
    direction: Direction,
}

impl Objective {
    pub fn new() -> Objective {
        Objective {
            coefficients: HashMap::new(),
            direction: Direction::Maximize,
        }
    }

    pub fn add(mut self, var_index: usize, coeff: f64) -> Objective {
        *self.coefficients.entry(var_index).or_insert(0.0) += coeff;
        self
    }

    pub fn direction(mut self, dir: Direction) -> Objective {
        self.direction = dir;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    Free,
    NonNegative,
}

/// A linear program stated over named variables, some of which may be free.
#[derive(Debug, Clone)]
pub struct Model {
    variables: Vec<(String, VariableType)>,
    constraints: Vec<Constraint>,
    objective: Objective,
}

/// Where a model variable ended up among the columns of the lowered problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableMapping {
    Direct(usize),
    /// The column holds the variable's negation.
    Negated(usize),
    /// The variable is the first column minus the second.
    Difference(usize, usize),
}

impl VariableMapping {
    pub fn value(&self, x: &[f64]) -> f64 {
        match *self {
            VariableMapping::Direct(j) => x[j],
            VariableMapping::Negated(j) => -x[j],
            VariableMapping::Difference(pos, neg) => x[pos] - x[neg],
        }
    }
}

/// Model-level values from the columns of a lowered problem.
pub fn recover(mapping: &[VariableMapping], x: &[f64]) -> Vec<f64> {
    mapping.iter().map(|m| m.value(x)).collect()
}

impl Model {
    pub fn new() -> Model {
        Model {
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: Objective::new(),
        }
    }

    pub fn new_variable(&mut self, name: &str, var_type: VariableType) -> usize {
        let result = self.variables.len();
        self.variables.push((name.to_string(), var_type));
        result
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = objective;
    }

    /// Lowers the model to a `ProblemSpec` over nonnegative columns.
    ///
    /// A free variable `v` becomes the two columns `v+` and `v-`.
    pub fn to_problem(&self) -> Result<(ProblemSpec, Vec<VariableMapping>), Error> {
        let mut var_count: usize = 0;
        let mut var_mapping: Vec<VariableMapping> = Vec::new();
        let mut names = Vec::new();

        for &(ref name, var_type) in self.variables.iter() {
            match var_type {
                VariableType::NonNegative => {
                    var_mapping.push(VariableMapping::Direct(var_count));
                    names.push(name.clone());
                    var_count += 1;
                },
                VariableType::Free => {
                    var_mapping.push(VariableMapping::Difference(var_count, var_count + 1));
                    names.push(format!("{}+", name));
                    names.push(format!("{}-", name));
                    var_count += 2;
                },
            }
        }

        let mut rows = Vec::with_capacity(self.constraints.len());
        let mut b = Vec::with_capacity(self.constraints.len());
        let mut senses = Vec::with_capacity(self.constraints.len());
        for constraint in self.constraints.iter() {
            let mut row = vec![0.0; var_count];
            scatter(&constraint.coefficients, &var_mapping, &mut row)?;
            rows.push(row);
            b.push(constraint.value);
            senses.push(constraint.sense());
        }

        let mut c = vec![0.0; var_count];
        scatter(&self.objective.coefficients, &var_mapping, &mut c)?;

        let problem = ProblemSpec::new(c, rows, b, senses, self.objective.direction)?
            .with_names(names)?;
        Ok((problem, var_mapping))
    }
}

fn scatter(coefficients: &HashMap<usize, f64>,
           var_mapping: &[VariableMapping],
           row: &mut [f64]) -> Result<(), Error> {
    for (&var, &coeff) in coefficients {
        match var_mapping.get(var) {
            Some(&VariableMapping::Direct(j)) => row[j] = coeff,
            Some(&VariableMapping::Negated(j)) => row[j] = -coeff,
            Some(&VariableMapping::Difference(pos, neg)) => {
                row[pos] = coeff;
                row[neg] = -coeff;
            },
            None => return Err(Error::UnknownVariable { index: var }),
        }
    }
    Ok(())
}

#[cfg(test)]
use rulinalg::matrix::BaseMatrix;

#[test]
fn build_constraint() {
    let constraint = Constraint::new()
        .add(0, 1.0)
        .add(1, 2.0)
        .add(0, -3.0)
        .value(Ordering::Less, 5.0);
    assert_eq!(constraint.coefficients.len(), 2);
    assert_eq!(constraint.coefficients[&0], -2.0);
    assert_eq!(constraint.coefficients[&1], 2.0);
    assert_eq!(constraint.sense(), Sense::Leq);
    assert_eq!(constraint.value, 5.0);
}

#[cfg(test)]
fn sample_model() -> Model {
    let mut model = Model::new();
    let var1 = model.new_variable("x", VariableType::NonNegative);
    let var2 = model.new_variable("y", VariableType::Free);
    model.add_constraint(Constraint::new()
        .add(var1, 1.0)
        .add(var2, 2.0)
        .value(Ordering::Less, 5.0));
    model.add_constraint(Constraint::new()
        .add(var1, 5.0)
        .add(var2, 3.0)
        .value(Ordering::Less, 10.0));
    model.add_constraint(Constraint::new()
        .add(var2, 1.0)
        .value(Ordering::Greater, 2.0));
    model.set_objective(Objective::new()
        .add(var1, 1.0)
        .add(var2, 1.0)
        .direction(Direction::Maximize));
    model
}

#[test]
fn lower_model() {
    let (problem, mapping) = sample_model().to_problem().expect("Model is well formed");
    assert_eq!(problem.a().data(),
               &vec![1.0, 2.0, -2.0,
                     5.0, 3.0, -3.0,
                     0.0, 1.0, -1.0]);
    assert_eq!(problem.a().rows(), 3);
    assert_eq!(problem.a().cols(), 3);
    assert_eq!(problem.b().data(), &vec![5.0, 10.0, 2.0]);
    assert_eq!(problem.c().data(), &vec![1.0, 1.0, -1.0]);
    assert_eq!(problem.senses(), &[Sense::Leq, Sense::Leq, Sense::Geq]);
    assert_eq!(problem.names(), &["x".to_string(), "y+".to_string(), "y-".to_string()]);
    assert_eq!(mapping[0], VariableMapping::Direct(0));
    assert_eq!(mapping[1], VariableMapping::Difference(1, 2));
    assert_eq!(recover(&mapping, &[1.0, 0.5, 3.0]), vec![1.0, -2.5]);
}

#[test]
fn solve_model_with_free_variable() {
    // max x + y, x + 2y <= 5, 5x + 3y <= 10, y >= 2, y free: optimum x = 5/7, y = 15/7
    let (problem, mapping) = sample_model().to_problem().expect("Model is well formed");
    let result = ::two_phase::solve(&problem, &::options::SolverOptions::default())
        .expect("Solve should not fail");
    assert!(result.is_optimal());
    let values = recover(&mapping, &result.decision_values(problem.num_variables()));
    assert_abs_diff_eq!(values[0], 5.0 / 7.0, epsilon = 1e-9);
    assert_abs_diff_eq!(values[1], 15.0 / 7.0, epsilon = 1e-9);
    assert_abs_diff_eq!(result.objective.expect("Optimal has objective"), 20.0 / 7.0,
                        epsilon = 1e-9);
}

#[test]
fn unknown_variable() {
    let mut model = Model::new();
    model.new_variable("x", VariableType::NonNegative);
    model.add_constraint(Constraint::new().add(3, 1.0).value(Ordering::Less, 1.0));
    assert_eq!(model.to_problem().unwrap_err(), Error::UnknownVariable { index: 3 });
}
