//! The lookup argument: every row of the compressed input expressions
//! appears among the rows of the compressed table expressions.
use crate::plonk::constraint_system::Expression;
use ark_std::cfg_iter_mut;
use lumen_algebra::prelude::*;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Module for the prover side.
pub mod prover;

/// Module for the verifier side.
pub mod verifier;

pub use prover::{LookupCommitted, LookupEvaluated, LookupPermuted};

/// A lookup of tuples of input expressions into tuples of table expressions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupArgument<F> {
    name: String,
    input_expressions: Vec<Expression<F>>,
    table_expressions: Vec<Expression<F>>,
}

impl<F: Scalar> LookupArgument<F> {
    /// Build a lookup from `(input, table)` pairs.
    pub fn new<S: Into<String>>(name: S, pairs: Vec<(Expression<F>, Expression<F>)>) -> Self {
        let (input_expressions, table_expressions) = pairs.into_iter().unzip();
        Self {
            name: name.into(),
            input_expressions,
            table_expressions,
        }
    }

    /// The name of the lookup.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The input expressions.
    pub fn input_expressions(&self) -> &[Expression<F>] {
        &self.input_expressions
    }

    /// The table expressions.
    pub fn table_expressions(&self) -> &[Expression<F>] {
        &self.table_expressions
    }

    /// The degree of the argument's constraints.
    pub fn required_degree(&self) -> usize {
        let input_degree = self
            .input_expressions
            .iter()
            .map(|e| e.degree())
            .fold(1, usize::max);
        let table_degree = self
            .table_expressions
            .iter()
            .map(|e| e.degree())
            .fold(1, usize::max);
        // l_active * Z(omega X) * (A' + beta) * (S' + gamma)
        // against l_active * Z(X) * (A + beta) * (S + gamma)
        ark_std::cmp::max(4, 2 + input_degree + table_degree)
    }
}

/// The evaluations of one lookup sent in a proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupEvals<F> {
    /// `Z(x)`.
    pub product_eval: F,
    /// `Z(omega x)`.
    pub product_next_eval: F,
    /// `A'(x)`.
    pub permuted_input_eval: F,
    /// `A'(omega^{-1} x)`.
    pub permuted_input_inv_eval: F,
    /// `S'(x)`.
    pub permuted_table_eval: F,
}

/// `sum_i theta^i values_i`.
pub(crate) fn compress<F: Scalar>(values: &[F], theta: &F) -> F {
    values
        .iter()
        .rev()
        .fold(F::zero(), |acc, v| acc.mul(theta).add(v))
}

/// Compress equal-length columns row by row.
pub(crate) fn compress_columns<F: Scalar>(columns: &[Vec<F>], theta: &F, len: usize) -> Vec<F> {
    let mut acc = vec![F::zero(); len];
    for column in columns.iter().rev() {
        cfg_iter_mut!(acc)
            .zip(column)
            .for_each(|(a, v)| *a = a.mul(theta).add(v));
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::{compress, compress_columns, LookupArgument};
    use crate::plonk::constraint_system::{ConstraintSystem, Rotation};
    use lumen_algebra::{bn254::BN254Scalar, prelude::*};

    #[test]
    fn degree_counts_both_sides() {
        let mut cs = ConstraintSystem::<BN254Scalar>::default();
        let a = cs.advice_column();
        let t = cs.fixed_column();
        let q = cs.selector();
        let index = cs.lookup("range", |cs| {
            let q = cs.query_selector(q);
            let a = cs.query_advice(a, Rotation::cur());
            let t = cs.query_fixed(t, Rotation::cur());
            vec![(q * a, t)]
        });
        assert_eq!(index, 0);
        assert_eq!(cs.lookups()[0].required_degree(), 5);
        assert_eq!(cs.lookups()[0].name(), "range");
        assert_eq!(cs.degree(), 5);

        let empty = LookupArgument::<BN254Scalar>::new("empty", vec![]);
        assert_eq!(empty.required_degree(), 4);
    }

    #[test]
    fn compression_is_a_power_sum() {
        let theta = BN254Scalar::from(3u32);
        let values = [
            BN254Scalar::from(2u32),
            BN254Scalar::from(5u32),
            BN254Scalar::from(7u32),
        ];
        // 2 + 5 * 3 + 7 * 9
        assert_eq!(compress(&values, &theta), BN254Scalar::from(80u32));

        let columns: Vec<Vec<BN254Scalar>> = values.iter().map(|v| vec![*v, *v]).collect();
        let rows = compress_columns(&columns, &theta, 2);
        assert_eq!(rows, vec![BN254Scalar::from(80u32); 2]);
    }
}
