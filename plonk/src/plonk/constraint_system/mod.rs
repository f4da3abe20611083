use crate::errors::{PlonkError, Result};
use crate::plonk::{lookup::LookupArgument, permutation::PermutationArgument};
use ark_std::{fmt::Debug, hash::Hash};
use lumen_algebra::prelude::*;

/// Module for expressions over column queries.
pub mod expression;

/// Module for circuits and their assignments.
pub mod circuit;

pub use circuit::{Assignment, Cell, Circuit};
pub use expression::Expression;

/// Each advice column is queried at least this many times for the
/// purpose of counting blinding rows.
pub const MIN_BLINDING_FACTORS: usize = 3;

/// A column type.
pub trait ColumnType:
    'static + Sized + Copy + Debug + PartialEq + Eq + Hash + Ord + Into<Any>
{
}

/// An advice column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Advice;

/// A fixed column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fixed;

/// An instance column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Instance;

/// Any column type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Any {
    /// An advice column.
    Advice,
    /// A fixed column.
    Fixed,
    /// An instance column.
    Instance,
}

impl From<Advice> for Any {
    fn from(_: Advice) -> Any {
        Any::Advice
    }
}

impl From<Fixed> for Any {
    fn from(_: Fixed) -> Any {
        Any::Fixed
    }
}

impl From<Instance> for Any {
    fn from(_: Instance) -> Any {
        Any::Instance
    }
}

impl ColumnType for Advice {}
impl ColumnType for Fixed {}
impl ColumnType for Instance {}
impl ColumnType for Any {}

/// A column with an index and a type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Column<C: ColumnType> {
    index: usize,
    column_type: C,
}

impl<C: ColumnType> Column<C> {
    pub(crate) fn new(index: usize, column_type: C) -> Self {
        Column { index, column_type }
    }

    /// The index of the column among the columns of its type.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The type of the column.
    pub fn column_type(&self) -> &C {
        &self.column_type
    }
}

impl From<Column<Advice>> for Column<Any> {
    fn from(column: Column<Advice>) -> Column<Any> {
        Column::new(column.index, Any::Advice)
    }
}

impl From<Column<Fixed>> for Column<Any> {
    fn from(column: Column<Fixed>) -> Column<Any> {
        Column::new(column.index, Any::Fixed)
    }
}

impl From<Column<Instance>> for Column<Any> {
    fn from(column: Column<Instance>) -> Column<Any> {
        Column::new(column.index, Any::Instance)
    }
}

/// A rotation relative to the current row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rotation(pub i32);

impl Rotation {
    /// The current row.
    pub fn cur() -> Rotation {
        Rotation(0)
    }

    /// The previous row.
    pub fn prev() -> Rotation {
        Rotation(-1)
    }

    /// The next row.
    pub fn next() -> Rotation {
        Rotation(1)
    }
}

/// A selector, a fixed column holding 0 or 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selector(pub(crate) Column<Fixed>);

impl Selector {
    /// The fixed column backing the selector.
    pub fn column(&self) -> Column<Fixed> {
        self.0
    }
}

/// A named set of constraints, each of which must vanish on every row.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Gate<F> {
    name: String,
    polys: Vec<Expression<F>>,
}

impl<F> Gate<F> {
    /// The name of the gate.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The constraints of the gate.
    pub fn polynomials(&self) -> &[Expression<F>] {
        &self.polys
    }
}

/// The columns, queries, gates, lookups and copy-constrained columns of a
/// circuit.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConstraintSystem<F> {
    pub(crate) num_fixed_columns: usize,
    pub(crate) num_advice_columns: usize,
    pub(crate) num_instance_columns: usize,
    pub(crate) num_selectors: usize,

    pub(crate) advice_queries: Vec<(Column<Advice>, Rotation)>,
    pub(crate) num_advice_queries: Vec<usize>,
    pub(crate) instance_queries: Vec<(Column<Instance>, Rotation)>,
    pub(crate) fixed_queries: Vec<(Column<Fixed>, Rotation)>,

    pub(crate) permutation: PermutationArgument,
    pub(crate) lookups: Vec<LookupArgument<F>>,
    pub(crate) gates: Vec<Gate<F>>,
}

impl<F: Scalar> ConstraintSystem<F> {
    /// Allocate a new advice column.
    pub fn advice_column(&mut self) -> Column<Advice> {
        let column = Column::new(self.num_advice_columns, Advice);
        self.num_advice_columns += 1;
        self.num_advice_queries.push(0);
        column
    }

    /// Allocate a new fixed column.
    pub fn fixed_column(&mut self) -> Column<Fixed> {
        let column = Column::new(self.num_fixed_columns, Fixed);
        self.num_fixed_columns += 1;
        column
    }

    /// Allocate a new instance column.
    pub fn instance_column(&mut self) -> Column<Instance> {
        let column = Column::new(self.num_instance_columns, Instance);
        self.num_instance_columns += 1;
        column
    }

    /// Allocate a new selector.
    pub fn selector(&mut self) -> Selector {
        self.num_selectors += 1;
        Selector(self.fixed_column())
    }

    fn advice_query_index(&mut self, column: Column<Advice>, rotation: Rotation) -> usize {
        if let Some(i) = self
            .advice_queries
            .iter()
            .position(|q| *q == (column, rotation))
        {
            return i;
        }
        self.advice_queries.push((column, rotation));
        self.num_advice_queries[column.index()] += 1;
        self.advice_queries.len() - 1
    }

    fn fixed_query_index(&mut self, column: Column<Fixed>, rotation: Rotation) -> usize {
        if let Some(i) = self
            .fixed_queries
            .iter()
            .position(|q| *q == (column, rotation))
        {
            return i;
        }
        self.fixed_queries.push((column, rotation));
        self.fixed_queries.len() - 1
    }

    fn instance_query_index(&mut self, column: Column<Instance>, rotation: Rotation) -> usize {
        if let Some(i) = self
            .instance_queries
            .iter()
            .position(|q| *q == (column, rotation))
        {
            return i;
        }
        self.instance_queries.push((column, rotation));
        self.instance_queries.len() - 1
    }

    /// Query an advice column at a rotation.
    pub fn query_advice(&mut self, column: Column<Advice>, rotation: Rotation) -> Expression<F> {
        Expression::Advice {
            query_index: self.advice_query_index(column, rotation),
            column_index: column.index(),
            rotation,
        }
    }

    /// Query a fixed column at a rotation.
    pub fn query_fixed(&mut self, column: Column<Fixed>, rotation: Rotation) -> Expression<F> {
        Expression::Fixed {
            query_index: self.fixed_query_index(column, rotation),
            column_index: column.index(),
            rotation,
        }
    }

    /// Query an instance column at a rotation.
    pub fn query_instance(
        &mut self,
        column: Column<Instance>,
        rotation: Rotation,
    ) -> Expression<F> {
        Expression::Instance {
            query_index: self.instance_query_index(column, rotation),
            column_index: column.index(),
            rotation,
        }
    }

    /// Query a selector at the current row.
    pub fn query_selector(&mut self, selector: Selector) -> Expression<F> {
        self.query_fixed(selector.0, Rotation::cur())
    }

    /// Add a column to the copy constraints.
    pub fn enable_equality<C: Into<Column<Any>>>(&mut self, column: C) {
        let column: Column<Any> = column.into();
        match column.column_type() {
            Any::Advice => {
                self.advice_query_index(Column::new(column.index(), Advice), Rotation::cur());
            }
            Any::Fixed => {
                self.fixed_query_index(Column::new(column.index(), Fixed), Rotation::cur());
            }
            Any::Instance => {
                self.instance_query_index(Column::new(column.index(), Instance), Rotation::cur());
            }
        }
        self.permutation.add_column(column);
    }

    /// Create a gate from the constraints returned by `constraints`.
    pub fn create_gate<S: Into<String>>(
        &mut self,
        name: S,
        constraints: impl FnOnce(&mut Self) -> Vec<Expression<F>>,
    ) {
        let polys = constraints(self);
        self.gates.push(Gate {
            name: name.into(),
            polys,
        });
    }

    /// Add a lookup of input expressions into table expressions, returning
    /// the index of the lookup.
    pub fn lookup<S: Into<String>>(
        &mut self,
        name: S,
        table_map: impl FnOnce(&mut Self) -> Vec<(Expression<F>, Expression<F>)>,
    ) -> usize {
        let pairs = table_map(self);
        self.lookups.push(LookupArgument::new(name, pairs));
        self.lookups.len() - 1
    }

    /// Return the index of the query of `column` at the current row.
    pub fn get_any_query_index(&self, column: Column<Any>) -> Result<usize> {
        let position = match column.column_type() {
            Any::Advice => self
                .advice_queries
                .iter()
                .position(|(c, r)| c.index() == column.index() && *r == Rotation::cur()),
            Any::Fixed => self
                .fixed_queries
                .iter()
                .position(|(c, r)| c.index() == column.index() && *r == Rotation::cur()),
            Any::Instance => self
                .instance_queries
                .iter()
                .position(|(c, r)| c.index() == column.index() && *r == Rotation::cur()),
        };
        position.ok_or_else(|| PlonkError::Message(format!("no query of column {:?}", column)))
    }

    /// The number of rows at the end of the domain filled with randomness.
    pub fn blinding_factors(&self) -> usize {
        let factors = self.num_advice_queries.iter().copied().max().unwrap_or(1);
        factors.max(MIN_BLINDING_FACTORS) + 2
    }

    /// The least number of rows a circuit must have.
    pub fn minimum_rows(&self) -> usize {
        // blinding rows, the last row, and one usable row
        self.blinding_factors() + 2
    }

    /// The largest degree of a constraint, at least that of the
    /// permutation argument.
    pub fn degree(&self) -> usize {
        let mut degree = PermutationArgument::required_degree();
        for lookup in &self.lookups {
            degree = degree.max(lookup.required_degree());
        }
        for gate in &self.gates {
            for poly in gate.polynomials() {
                degree = degree.max(poly.degree());
            }
        }
        degree
    }

    /// The number of advice columns.
    pub fn num_advice_columns(&self) -> usize {
        self.num_advice_columns
    }

    /// The number of fixed columns, selectors included.
    pub fn num_fixed_columns(&self) -> usize {
        self.num_fixed_columns
    }

    /// The number of instance columns.
    pub fn num_instance_columns(&self) -> usize {
        self.num_instance_columns
    }

    /// The number of selectors.
    pub fn num_selectors(&self) -> usize {
        self.num_selectors
    }

    /// The gates.
    pub fn gates(&self) -> &[Gate<F>] {
        &self.gates
    }

    /// The lookups.
    pub fn lookups(&self) -> &[LookupArgument<F>] {
        &self.lookups
    }

    /// The copy-constrained columns.
    pub fn permutation(&self) -> &PermutationArgument {
        &self.permutation
    }

    /// The advice queries.
    pub fn advice_queries(&self) -> &[(Column<Advice>, Rotation)] {
        &self.advice_queries
    }

    /// The fixed queries.
    pub fn fixed_queries(&self) -> &[(Column<Fixed>, Rotation)] {
        &self.fixed_queries
    }

    /// The instance queries.
    pub fn instance_queries(&self) -> &[(Column<Instance>, Rotation)] {
        &self.instance_queries
    }
}

#[cfg(test)]
mod tests {
    use super::{Any, Column, ConstraintSystem, Rotation};
    use lumen_algebra::bn254::BN254Scalar;

    #[test]
    fn queries_are_registered_once() {
        let mut cs = ConstraintSystem::<BN254Scalar>::default();
        let a = cs.advice_column();
        let b = cs.advice_column();
        let q = cs.selector();
        let inst = cs.instance_column();
        cs.enable_equality(a);
        cs.enable_equality(inst);
        cs.enable_equality(a);
        cs.create_gate("mul", |cs| {
            let q = cs.query_selector(q);
            let a_next = cs.query_advice(a, Rotation::next());
            let a = cs.query_advice(a, Rotation::cur());
            let b = cs.query_advice(b, Rotation::cur());
            vec![q * (a * b - a_next)]
        });

        assert_eq!(cs.advice_queries().len(), 3);
        assert_eq!(cs.num_advice_queries, vec![2, 1]);
        assert_eq!(cs.permutation().columns().len(), 2);
        assert_eq!(cs.degree(), 3);
        assert_eq!(cs.blinding_factors(), 5);
        assert_eq!(cs.minimum_rows(), 7);
        assert_eq!(
            cs.get_any_query_index(Column::new(0, Any::Instance)).unwrap(),
            0
        );
        assert!(cs.get_any_query_index(Column::new(1, Any::Fixed)).is_err());
    }
}
