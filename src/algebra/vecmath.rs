use super::FloatT;
use std::iter::zip;

/// Dense vector operations on float slices.
pub trait VectorMath {
    type T;

    /// Copy values from `src` to `self`
    fn copy_from(&mut self, src: &Self) -> &mut Self;

    /// Apply an elementwise operation on a vector.
    fn scalarop(&mut self, op: impl Fn(Self::T) -> Self::T) -> &mut Self;

    /// set all elements to the same value
    fn set(&mut self, c: Self::T) -> &mut Self;

    /// Elementwise scaling.
    fn scale(&mut self, c: Self::T) -> &mut Self;

    /// Elementwise negation of entries.
    fn negate(&mut self) -> &mut Self;

    /// Dot product
    fn dot(&self, y: &Self) -> Self::T;

    /// Standard axpy: `self += a*x`
    fn axpy(&mut self, a: Self::T, x: &Self) -> &mut Self;

    /// 2-norm
    fn norm(&self) -> Self::T;

    /// Infinity norm
    fn norm_inf(&self) -> Self::T;

    /// Infinity norm of vector difference
    fn norm_inf_diff(&self, b: &Self) -> Self::T;

    /// 2-norm of vector difference
    fn dist(&self, y: &Self) -> Self::T;
}

impl<T: FloatT> VectorMath for [T] {
    type T = T;

    fn copy_from(&mut self, src: &[T]) -> &mut Self {
        self.copy_from_slice(src);
        self
    }

    fn scalarop(&mut self, op: impl Fn(T) -> T) -> &mut Self {
        for x in &mut *self {
            *x = op(*x);
        }
        self
    }

    fn set(&mut self, c: T) -> &mut Self {
        self.scalarop(|_x| c)
    }

    fn scale(&mut self, c: T) -> &mut Self {
        if c == T::one() {
            return self;
        }
        if c == T::zero() {
            return self.set(T::zero());
        }
        self.scalarop(|x| x * c)
    }

    fn negate(&mut self) -> &mut Self {
        self.scalarop(|x| -x)
    }

    fn dot(&self, y: &[T]) -> T {
        zip(self, y).fold(T::zero(), |acc, (&x, &y)| acc + x * y)
    }

    fn axpy(&mut self, a: T, x: &[T]) -> &mut Self {
        assert_eq!(self.len(), x.len());
        if a != T::zero() {
            for (y, &x) in zip(&mut *self, x) {
                *y += a * x;
            }
        }
        self
    }

    fn norm(&self) -> T {
        T::sqrt(self.dot(self))
    }

    fn norm_inf(&self) -> T {
        let mut out = T::zero();
        for v in self.iter().map(|v| v.abs()) {
            out = if v > out { v } else { out };
        }
        out
    }

    fn norm_inf_diff(&self, b: &[T]) -> T {
        let mut out = T::zero();
        for (&a, &b) in zip(self, b) {
            let v = T::abs(a - b);
            out = if v > out { v } else { out };
        }
        out
    }

    fn dist(&self, y: &[T]) -> T {
        let dist2 = zip(self, y).fold(T::zero(), |acc, (&x, &y)| acc + (x - y) * (x - y));
        T::sqrt(dist2)
    }
}
