use crate::errors::Result;
use crate::plonk::constraint_system::{
    Advice, Any, Column, ConstraintSystem, Fixed, Instance, Selector,
};
use lumen_algebra::prelude::*;

/// An assigned cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    /// The column of the cell.
    pub column: Column<Any>,
    /// The row of the cell.
    pub row: usize,
}

/// The interface through which a circuit assigns its cells. Rows are
/// restricted to the usable rows of the domain.
pub trait Assignment<F: Scalar> {
    /// Set the selector to 1 at `row`.
    fn enable_selector(&mut self, selector: &Selector, row: usize) -> Result<()>;

    /// Assign an advice cell.
    fn assign_advice(&mut self, column: Column<Advice>, row: usize, value: F) -> Result<Cell>;

    /// Assign a fixed cell.
    fn assign_fixed(&mut self, column: Column<Fixed>, row: usize, value: F) -> Result<Cell>;

    /// Constrain two cells to be equal.
    fn copy(&mut self, left: Cell, right: Cell) -> Result<()>;

    /// Read a public input. Zero when generating keys.
    fn query_instance(&self, column: Column<Instance>, row: usize) -> Result<F>;

    /// Assign an advice cell to a public input and constrain them equal.
    fn assign_advice_from_instance(
        &mut self,
        instance: Column<Instance>,
        instance_row: usize,
        advice: Column<Advice>,
        advice_row: usize,
    ) -> Result<(Cell, F)> {
        let value = self.query_instance(instance, instance_row)?;
        let cell = self.assign_advice(advice, advice_row, value)?;
        self.copy(
            cell,
            Cell {
                column: instance.into(),
                row: instance_row,
            },
        )?;
        Ok((cell, value))
    }
}

/// A circuit: its columns and constraints, and how it assigns them.
pub trait Circuit<F: Scalar> {
    /// The columns and selectors the circuit uses.
    type Config: Clone;

    /// Declare the columns, gates and lookups.
    fn configure(cs: &mut ConstraintSystem<F>) -> Self::Config;

    /// Assign the cells.
    fn synthesize<A: Assignment<F>>(&self, config: Self::Config, assignment: &mut A)
        -> Result<()>;
}
