use log::trace;

/// Searches for integers `a` with `a · x = 0` using the PSLQ algorithm.
/// Returns `None` if no relation with entries bounded by
/// `max_coefficient` exists (up to the given tolerance).
pub fn find_integer_relation(
    values: &[f64],
    tolerance: f64,
    max_coefficient: i64,
) -> Option<Vec<i64>> {
    let n = values.len();
    if n < 2 || values.iter().any(|x| !x.is_finite()) {
        return None;
    }
    if let Some(zero) = values.iter().position(|x| x.abs() < tolerance) {
        let mut relation = vec![0; n];
        relation[zero] = 1;
        return Some(relation);
    }
    let mut state = PslqState::new(values);
    for step in 0..MAX_STEPS {
        state.iterate();
        if let Some(relation) = state.smallest_relation(tolerance, max_coefficient) {
            trace!("Integer relation {:?} found after {} steps", relation, step);
            return Some(normalize_sign(relation));
        }
        if state.norm_bound() > max_coefficient as f64 {
            return None;
        }
    }
    None
}

const MAX_STEPS: usize = 1000;

struct PslqState {
    n: usize,
    gamma: f64,
    y: Vec<f64>,
    h: Vec<Vec<f64>>,
    b: Vec<Vec<i64>>,
}

impl PslqState {
    fn new(values: &[f64]) -> Self {
        let n = values.len();
        let scale = values.iter().fold(0.0f64, |m, x| m.max(x.abs()));
        let x: Vec<f64> = values.iter().map(|v| v / scale).collect();
        let mut s: Vec<f64> = (0..n)
            .map(|k| x[k..].iter().map(|v| v * v).sum::<f64>().sqrt())
            .collect();
        let s0 = s[0];
        let y: Vec<f64> = x.iter().map(|v| v / s0).collect();
        s.iter_mut().for_each(|v| *v /= s0);
        let mut h = vec![vec![0.0; n - 1]; n];
        for i in 0..n {
            for j in 0..(n - 1).min(i + 1) {
                h[i][j] = if i == j {
                    s[j + 1] / s[j]
                } else {
                    -y[i] * y[j] / (s[j] * s[j + 1])
                };
            }
        }
        let b = (0..n)
            .map(|i| (0..n).map(|j| i64::from(i == j)).collect())
            .collect();
        let mut state = Self {
            n,
            gamma: (4.0f64 / 3.0).sqrt(),
            y,
            h,
            b,
        };
        for i in 1..n {
            state.reduce_row(i, i);
        }
        state
    }

    /// Hermite reduction of row `i` against the rows above, using the
    /// first `up_to` columns.
    fn reduce_row(&mut self, i: usize, up_to: usize) {
        for j in (0..up_to).rev() {
            if self.h[j][j] == 0.0 {
                continue;
            }
            let t = (self.h[i][j] / self.h[j][j]).round();
            if t == 0.0 {
                continue;
            }
            self.y[j] += t * self.y[i];
            for k in 0..=j {
                self.h[i][k] -= t * self.h[j][k];
            }
            let t = t as i64;
            for k in 0..self.n {
                self.b[k][j] += t * self.b[k][i];
            }
        }
    }

    fn iterate(&mut self) {
        let n = self.n;
        let m = (0..n - 1)
            .max_by(|a, b| {
                let weight = |i: usize| self.gamma.powi(i as i32 + 1) * self.h[i][i].abs();
                weight(*a).total_cmp(&weight(*b))
            })
            .unwrap_or(0);
        self.y.swap(m, m + 1);
        self.h.swap(m, m + 1);
        for row in self.b.iter_mut() {
            row.swap(m, m + 1);
        }
        if m + 2 < n {
            let t0 = self.h[m][m].hypot(self.h[m][m + 1]);
            let t1 = self.h[m][m] / t0;
            let t2 = self.h[m][m + 1] / t0;
            for i in m..n {
                let t3 = self.h[i][m];
                let t4 = self.h[i][m + 1];
                self.h[i][m] = t1 * t3 + t2 * t4;
                self.h[i][m + 1] = -t2 * t3 + t1 * t4;
            }
        }
        for i in m + 1..n {
            self.reduce_row(i, i.min(m + 2));
        }
    }

    fn smallest_relation(&self, tolerance: f64, max_coefficient: i64) -> Option<Vec<i64>> {
        (0..self.n)
            .filter(|j| self.y[*j].abs() < tolerance)
            .map(|j| self.b.iter().map(|row| row[j]).collect::<Vec<_>>())
            .filter(|relation| max_abs(relation) <= max_coefficient)
            .min_by_key(|relation| max_abs(relation))
    }

    /// Lower bound for the norm of any relation not found yet.
    fn norm_bound(&self) -> f64 {
        let largest = (0..self.n - 1).fold(0.0f64, |m, j| m.max(self.h[j][j].abs()));
        if largest == 0.0 {
            f64::INFINITY
        } else {
            1.0 / largest
        }
    }
}

fn max_abs(relation: &[i64]) -> i64 {
    relation.iter().map(|a| a.abs()).max().unwrap_or(0)
}

fn normalize_sign(relation: Vec<i64>) -> Vec<i64> {
    match relation.iter().find(|a| **a != 0) {
        Some(first) if *first < 0 => relation.into_iter().map(|a| -a).collect(),
        _ => relation,
    }
}
