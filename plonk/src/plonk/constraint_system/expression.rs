use crate::plonk::constraint_system::Rotation;
use lumen_algebra::prelude::*;

/// A polynomial expression over column queries.
///
/// Queries carry both the index of the query (into the per-query
/// evaluations of a proof) and the column and rotation, used when
/// evaluating over the rows or over the extended coset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expression<F> {
    /// A constant.
    Constant(F),
    /// A fixed column query.
    Fixed {
        /// The index of the query.
        query_index: usize,
        /// The column index.
        column_index: usize,
        /// The rotation of the query.
        rotation: Rotation,
    },
    /// An advice column query.
    Advice {
        /// The index of the query.
        query_index: usize,
        /// The column index.
        column_index: usize,
        /// The rotation of the query.
        rotation: Rotation,
    },
    /// An instance column query.
    Instance {
        /// The index of the query.
        query_index: usize,
        /// The column index.
        column_index: usize,
        /// The rotation of the query.
        rotation: Rotation,
    },
    /// The negation.
    Negated(Box<Expression<F>>),
    /// The sum.
    Sum(Box<Expression<F>>, Box<Expression<F>>),
    /// The product.
    Product(Box<Expression<F>>, Box<Expression<F>>),
    /// Multiplication by a constant.
    Scaled(Box<Expression<F>>, F),
}

impl<F: Scalar> Expression<F> {
    /// Fold the expression with one closure per variant.
    pub fn evaluate<T>(
        &self,
        constant: &impl Fn(F) -> T,
        fixed: &impl Fn(usize, usize, Rotation) -> T,
        advice: &impl Fn(usize, usize, Rotation) -> T,
        instance: &impl Fn(usize, usize, Rotation) -> T,
        negated: &impl Fn(T) -> T,
        sum: &impl Fn(T, T) -> T,
        product: &impl Fn(T, T) -> T,
        scaled: &impl Fn(T, F) -> T,
    ) -> T {
        let recurse = |e: &Expression<F>| {
            e.evaluate(
                constant, fixed, advice, instance, negated, sum, product, scaled,
            )
        };
        match self {
            Expression::Constant(c) => constant(*c),
            Expression::Fixed {
                query_index,
                column_index,
                rotation,
            } => fixed(*query_index, *column_index, *rotation),
            Expression::Advice {
                query_index,
                column_index,
                rotation,
            } => advice(*query_index, *column_index, *rotation),
            Expression::Instance {
                query_index,
                column_index,
                rotation,
            } => instance(*query_index, *column_index, *rotation),
            Expression::Negated(a) => negated(recurse(a)),
            Expression::Sum(a, b) => sum(recurse(a), recurse(b)),
            Expression::Product(a, b) => product(recurse(a), recurse(b)),
            Expression::Scaled(a, f) => scaled(recurse(a), *f),
        }
    }

    /// Evaluate with field arithmetic, reading queries through the three
    /// closures.
    pub fn evaluate_field(
        &self,
        fixed: &impl Fn(usize, usize, Rotation) -> F,
        advice: &impl Fn(usize, usize, Rotation) -> F,
        instance: &impl Fn(usize, usize, Rotation) -> F,
    ) -> F {
        self.evaluate(
            &|c| c,
            fixed,
            advice,
            instance,
            &|a: F| a.neg(),
            &|a: F, b: F| a.add(&b),
            &|a: F, b: F| a.mul(&b),
            &|a: F, f: F| a.mul(&f),
        )
    }

    /// The degree of the expression as a polynomial in the column queries.
    pub fn degree(&self) -> usize {
        match self {
            Expression::Constant(_) => 0,
            Expression::Fixed { .. } | Expression::Advice { .. } | Expression::Instance { .. } => {
                1
            }
            Expression::Negated(a) => a.degree(),
            Expression::Sum(a, b) => a.degree().max(b.degree()),
            Expression::Product(a, b) => a.degree() + b.degree(),
            Expression::Scaled(a, _) => a.degree(),
        }
    }

    /// Square the expression.
    pub fn square(self) -> Self {
        self.clone() * self
    }
}

impl<F: Scalar> Neg for Expression<F> {
    type Output = Expression<F>;
    fn neg(self) -> Self::Output {
        Expression::Negated(Box::new(self))
    }
}

impl<F: Scalar> Add for Expression<F> {
    type Output = Expression<F>;
    fn add(self, rhs: Expression<F>) -> Expression<F> {
        Expression::Sum(Box::new(self), Box::new(rhs))
    }
}

impl<F: Scalar> Sub for Expression<F> {
    type Output = Expression<F>;
    fn sub(self, rhs: Expression<F>) -> Expression<F> {
        Expression::Sum(Box::new(self), Box::new(-rhs))
    }
}

impl<F: Scalar> Mul for Expression<F> {
    type Output = Expression<F>;
    fn mul(self, rhs: Expression<F>) -> Expression<F> {
        Expression::Product(Box::new(self), Box::new(rhs))
    }
}

impl<F: Scalar> Mul<F> for Expression<F> {
    type Output = Expression<F>;
    fn mul(self, rhs: F) -> Expression<F> {
        Expression::Scaled(Box::new(self), rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::Expression;
    use crate::plonk::constraint_system::Rotation;
    use lumen_algebra::{bn254::BN254Scalar, prelude::*};

    fn advice(i: usize) -> Expression<BN254Scalar> {
        Expression::Advice {
            query_index: i,
            column_index: i,
            rotation: Rotation::cur(),
        }
    }

    #[test]
    fn degree_and_evaluation() {
        let three = BN254Scalar::from(3u32);
        let e = (advice(0) + advice(1)) * advice(2) - Expression::Constant(three) * three;
        assert_eq!(e.degree(), 2);
        assert_eq!(advice(0).square().degree(), 2);

        let values = [2u32, 5, 7].map(BN254Scalar::from);
        let v = e.evaluate_field(
            &|_, _, _| BN254Scalar::zero(),
            &|q, _, _| values[q],
            &|_, _, _| BN254Scalar::zero(),
        );
        // (2 + 5) * 7 - 9
        assert_eq!(v, BN254Scalar::from(40u32));
    }
}
