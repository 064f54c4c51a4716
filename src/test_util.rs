#![cfg(test)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use problem::{Direction, ProblemSpec, Sense};

// Generate a random dense LP that is feasible by construction: every row is laid out around a
// point x0 > 0 that satisfies it. Row 0 is a <= row with positive coefficients, which bounds all
// variables, so both directions have a finite optimum.
pub fn mixed_seeded(rows: usize, cols: usize, direction: Direction, seed: u64) -> ProblemSpec {
    assert!(rows >= 1 && cols >= 1);
    let mut rng = StdRng::seed_from_u64(seed);
    let x0: Vec<f64> = (0..cols).map(|_| rng.gen_range(0.5..3.0)).collect();

    let mut a = Vec::with_capacity(rows);
    let mut b = Vec::with_capacity(rows);
    let mut senses = Vec::with_capacity(rows);
    for i in 0..rows {
        let row: Vec<f64> = (0..cols).map(|_| {
            if i == 0 || rng.gen_bool(0.8) {
                rng.gen_range(0.5..5.0)
            } else {
                0.0
            }
        }).collect();
        let activity: f64 = row.iter().zip(&x0).map(|(a, x)| a * x).sum();
        let sense = if i == 0 {
            Sense::Leq
        } else {
            match rng.gen_range(0..3) {
                0 => Sense::Leq,
                1 => Sense::Geq,
                _ => Sense::Eq,
            }
        };
        let rhs = match sense {
            Sense::Leq => activity + rng.gen_range(0.5..5.0),
            Sense::Geq => activity * rng.gen_range(0.3..0.9),
            Sense::Eq => activity,
        };
        a.push(row);
        b.push(rhs);
        senses.push(sense);
    }
    let c = (0..cols).map(|_| rng.gen_range(1.0..10.0)).collect();

    ProblemSpec::new(c, a, b, senses, direction)
        .expect("Generated problem is well formed")
}

// Random `max c^Tx, Ax <= b` with positive data; the origin is feasible and every variable is
// bounded.
pub fn leq_seeded(rows: usize, cols: usize, seed: u64) -> ProblemSpec {
    let mut rng = StdRng::seed_from_u64(seed);
    let a = (0..rows)
        .map(|_| (0..cols).map(|_| rng.gen_range(0.5..5.0)).collect())
        .collect();
    let b = (0..rows).map(|_| rng.gen_range(5.0..50.0)).collect();
    let c = (0..cols).map(|_| rng.gen_range(1.0..10.0)).collect();
    ProblemSpec::new(c, a, b, vec![Sense::Leq; rows], Direction::Maximize)
        .expect("Generated problem is well formed")
}

// Sizes for seed `seed`, between 2 and 6 rows and columns.
pub fn dimensions(seed: u64) -> (usize, usize) {
    let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);
    (rng.gen_range(2..7), rng.gen_range(2..7))
}
