use crate::algebra::{FloatT, VectorMath};
use std::ops::{Index, IndexMut};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Matrix orientation marker
#[derive(PartialEq, Eq, Copy, Clone)]
pub enum MatrixShape {
    /// Normal matrix orientation
    N,
    /// Transposed matrix orientation
    T,
}

/// Dense matrix in column-major format
///
/// All internal matrix representations in the solver are dense and
/// column-major, as is the API.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Matrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// vector of data in column major format
    pub data: Vec<T>,
}

impl<T> Matrix<T>
where
    T: FloatT,
{
    pub fn zeros(size: (usize, usize)) -> Self {
        let (m, n) = size;
        let data = vec![T::zero(); m * n];
        Self { m, n, data }
    }

    pub fn identity(n: usize) -> Self {
        let mut mat = Matrix::zeros((n, n));
        mat.set_identity();
        mat
    }

    pub fn set_identity(&mut self) {
        assert!(self.m == self.n);
        self.data_mut().set(T::zero());
        for i in 0..self.n {
            self[(i, i)] = T::one();
        }
    }

    pub fn new_from_slice(size: (usize, usize), src: &[T]) -> Self {
        let (m, n) = size;
        assert!(m * n == src.len());
        Self {
            m,
            n,
            data: src.to_vec(),
        }
    }

    /// Resize to `size` and zero all contents.   Storage only ever grows,
    /// so reshaping to a dimension at or below a previous high-water mark
    /// does not allocate.
    pub fn reshape(&mut self, size: (usize, usize)) -> &mut Self {
        let (m, n) = size;
        self.m = m;
        self.n = n;
        // resize never releases capacity, so reshaping below a previous
        // high-water mark does not allocate
        self.data.resize(m * n, T::zero());
        self.data.set(T::zero());
        self
    }

    pub fn copy_from_slice(&mut self, src: &[T]) -> &mut Self {
        self.data.copy_from_slice(src);
        self
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub(crate) fn index_linear(&self, idx: (usize, usize)) -> usize {
        idx.0 + self.m * idx.1
    }

    pub fn col_slice(&self, col: usize) -> &[T] {
        assert!(col < self.n);
        &self.data[(col * self.m)..(col + 1) * self.m]
    }

    pub fn col_slice_mut(&mut self, col: usize) -> &mut [T] {
        assert!(col < self.n);
        &mut self.data[(col * self.m)..(col + 1) * self.m]
    }

    pub fn nrows(&self) -> usize {
        self.m
    }

    pub fn ncols(&self) -> usize {
        self.n
    }

    pub fn size(&self) -> (usize, usize) {
        (self.m, self.n)
    }

    pub fn is_square(&self) -> bool {
        self.m == self.n
    }

    /// Sum of diagonal entries
    pub fn trace(&self) -> T {
        assert!(self.is_square());
        (0..self.n).fold(T::zero(), |sum, i| sum + self[(i, i)])
    }

    /// Dense gemv: `y = a*A*x + b*y` (or with `Aᵀ` for [`MatrixShape::T`])
    pub fn gemv(&self, y: &mut [T], trans: MatrixShape, x: &[T], a: T, b: T) {
        match trans {
            MatrixShape::N => {
                assert!(self.m == y.len() && self.n == x.len());
                y.scale(b);
                for (col, &xj) in x.iter().enumerate() {
                    y.axpy(a * xj, self.col_slice(col));
                }
            }
            MatrixShape::T => {
                assert!(self.n == y.len() && self.m == x.len());
                for (col, yi) in y.iter_mut().enumerate() {
                    *yi = a * self.col_slice(col).dot(x) + b * *yi;
                }
            }
        }
    }

    /// Quadratic form `xᵀAx`
    pub fn quad_form(&self, x: &[T]) -> T {
        assert!(self.is_square() && self.n == x.len());
        let mut out = T::zero();
        for (col, &xj) in x.iter().enumerate() {
            out += xj * self.col_slice(col).dot(x);
        }
        out
    }
}

impl<T> Index<(usize, usize)> for Matrix<T>
where
    T: FloatT,
{
    type Output = T;
    #[inline]
    fn index(&self, idx: (usize, usize)) -> &Self::Output {
        &self.data[self.index_linear(idx)]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T>
where
    T: FloatT,
{
    #[inline]
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut Self::Output {
        let lidx = self.index_linear(idx);
        &mut self.data[lidx]
    }
}

impl<'a, T, const NR: usize, const NC: usize> From<&'a [[T; NC]; NR]> for Matrix<T>
where
    T: FloatT,
{
    fn from(rows: &'a [[T; NC]; NR]) -> Self {
        let mut mat = Matrix::zeros((NR, NC));
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                mat[(i, j)] = v;
            }
        }
        mat
    }
}

impl<T> std::fmt::Display for Matrix<T>
where
    T: FloatT,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f)?;
        for i in 0..self.nrows() {
            write!(f, "[ ")?;
            for j in 0..self.ncols() {
                write!(f, " {:?}", self[(i, j)])?;
            }
            writeln!(f, "]")?;
        }
        writeln!(f)?;
        Ok(())
    }
}
