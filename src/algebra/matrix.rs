use std::ops::Mul;

use super::field::Field;

/// Dense matrix, stored row by row.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix<F> {
    rows: Vec<Vec<F>>,
    num_columns: usize,
}

impl<F: Field> Matrix<F> {
    pub fn zeros(num_rows: usize, num_columns: usize) -> Self {
        Self {
            rows: vec![vec![F::zero(); num_columns]; num_rows],
            num_columns,
        }
    }

    /// All rows must have `num_columns` entries.
    pub fn from_rows(rows: Vec<Vec<F>>, num_columns: usize) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == num_columns));
        Self { rows, num_columns }
    }

    pub fn from_integers(rows: &[Vec<i64>], num_columns: usize) -> Self {
        Self::from_rows(
            rows.iter()
                .map(|row| row.iter().map(|x| F::from_int(*x)).collect())
                .collect(),
            num_columns,
        )
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    pub fn get(&self, row: usize, column: usize) -> &F {
        &self.rows[row][column]
    }

    pub fn set(&mut self, row: usize, column: usize, value: F) {
        self.rows[row][column] = value;
    }

    pub fn rows(&self) -> &[Vec<F>] {
        &self.rows
    }

    pub fn column(&self, column: usize) -> Vec<F> {
        self.rows.iter().map(|row| row[column].clone()).collect()
    }

    pub fn columns(&self) -> Vec<Vec<F>> {
        (0..self.num_columns).map(|c| self.column(c)).collect()
    }

    pub fn transpose(&self) -> Self {
        Self::from_rows(self.columns(), self.num_rows())
    }

    pub fn is_zero(&self) -> bool {
        self.rows.iter().flatten().all(|x| x.is_zero())
    }

    /// The matrix applied to a column vector.
    pub fn apply(&self, vector: &[F]) -> Vec<F> {
        self.rows
            .iter()
            .map(|row| dot(row, vector))
            .collect()
    }

    /// Reduced row echelon form and the pivot column of each nonzero row.
    pub fn reduced_row_echelon_form(&self) -> (Self, Vec<usize>) {
        let mut rows = self.rows.clone();
        let mut pivots = vec![];
        let mut r = 0;
        for c in 0..self.num_columns {
            let pivot_row = match (r..rows.len()).find(|i| !rows[*i][c].is_zero()) {
                Some(i) => i,
                None => continue,
            };
            rows.swap(r, pivot_row);
            let inverse = F::one() / rows[r][c].clone();
            rows[r] = rows[r].iter().map(|x| x.clone() * inverse.clone()).collect();
            for i in 0..rows.len() {
                if i != r && !rows[i][c].is_zero() {
                    let factor = rows[i][c].clone();
                    rows[i] = rows[i]
                        .iter()
                        .zip(rows[r].iter())
                        .map(|(x, y)| x.clone() - factor.clone() * y.clone())
                        .collect();
                }
            }
            pivots.push(c);
            r += 1;
        }
        (Self::from_rows(rows, self.num_columns), pivots)
    }

    pub fn rank(&self) -> usize {
        self.reduced_row_echelon_form().1.len()
    }

    /// A basis of the null space, one vector per non-pivot column.
    pub fn kernel_basis(&self) -> Vec<Vec<F>> {
        let (reduced, pivots) = self.reduced_row_echelon_form();
        (0..self.num_columns)
            .filter(|c| !pivots.contains(c))
            .map(|free| {
                let mut v = vec![F::zero(); self.num_columns];
                v[free] = F::one();
                for (row, pivot) in pivots.iter().enumerate() {
                    v[*pivot] = -reduced.rows[row][free].clone();
                }
                v
            })
            .collect()
    }
}

fn dot<F: Field>(a: &[F], b: &[F]) -> F {
    a.iter()
        .zip(b.iter())
        .fold(F::zero(), |acc, (x, y)| acc + x.clone() * y.clone())
}

impl<F: Field> Mul for &Matrix<F> {
    type Output = Matrix<F>;

    fn mul(self, other: &Matrix<F>) -> Matrix<F> {
        debug_assert_eq!(self.num_columns, other.num_rows());
        let columns = other.columns();
        Matrix::from_rows(
            self.rows
                .iter()
                .map(|row| columns.iter().map(|column| dot(row, column)).collect())
                .collect(),
            other.num_columns,
        )
    }
}

/// Incrementally built basis of a subspace, kept in echelon form so
/// that membership can be tested by reduction.
#[derive(Clone, Debug)]
pub struct EchelonBasis<F> {
    rows: Vec<(usize, Vec<F>)>,
}

impl<F: Field> Default for EchelonBasis<F> {
    fn default() -> Self {
        Self { rows: vec![] }
    }
}

impl<F: Field> EchelonBasis<F> {
    pub fn dimension(&self) -> usize {
        self.rows.len()
    }

    fn reduce(&self, vector: &[F]) -> Vec<F> {
        let mut v = vector.to_vec();
        for (pivot, row) in self.rows.iter() {
            if !v[*pivot].is_zero() {
                let factor = v[*pivot].clone() / row[*pivot].clone();
                v = v
                    .iter()
                    .zip(row.iter())
                    .map(|(x, y)| x.clone() - factor.clone() * y.clone())
                    .collect();
            }
        }
        v
    }

    pub fn contains(&self, vector: &[F]) -> bool {
        self.reduce(vector).iter().all(|x| x.is_zero())
    }

    /// Adds the vector if it is independent of the basis. Returns
    /// whether it was added.
    pub fn insert(&mut self, vector: &[F]) -> bool {
        let reduced = self.reduce(vector);
        match reduced.iter().position(|x| !x.is_zero()) {
            Some(pivot) => {
                self.rows.push((pivot, reduced));
                true
            }
            None => false,
        }
    }
}

/// Representatives of a basis of `ker(a) / im(b)`, given as vectors in
/// the domain of `a`. Kernel vectors are taken in the order of
/// `kernel_basis` and kept if they are independent of the image and of
/// the previously chosen ones.
pub fn quotient_basis<F: Field>(a: &Matrix<F>, b: &Matrix<F>) -> Vec<Vec<F>> {
    let mut span = EchelonBasis::default();
    for column in b.columns() {
        span.insert(&column);
    }
    a.kernel_basis()
        .into_iter()
        .filter(|v| span.insert(v))
        .collect()
}
