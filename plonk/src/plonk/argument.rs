//! The state of one proof across its stages.
//!
//! An [`Argument`] owns the instance and advice columns of every circuit in
//! the proof and borrows the fixed columns from the proving key. Each stage
//! draws on the challenges recorded by the previous stages, so calling a
//! stage out of order is a [`PlonkError::PhaseError`].
use crate::errors::{PlonkError, Result};
use crate::plonk::{
    blinder::Blinder,
    constraint_system::{
        Advice, Any, Assignment, Cell, Circuit, Column, ConstraintSystem, Expression, Fixed,
        Instance, Rotation, Selector,
    },
    domain::EvaluationDomain,
    helpers::PlonkChallenges,
    indexer::PlonkPK,
    lookup::{LookupCommitted, LookupEvaluated, LookupPermuted},
    permutation::{PermutationCommitted, PermutationEvaluated},
    vanishing::{VanishingArgument, VanishingCommitted, VanishingEvaluated, VanishingRandom},
};
use crate::poly_commit::{
    field_polynomial::FpPolynomial,
    pcs::{PolyComScheme, PolynomialOpening},
    point_set::PointSet,
    transcript::PolyComTranscript,
};
use ark_std::{cfg_into_iter, cfg_iter, cfg_iter_mut, end_timer, mem, start_timer};
use lumen_algebra::prelude::*;
use merlin::Transcript;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

/// The storage of one column: first its values over the rows, then its
/// coefficients. Never both.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColumnForm<F> {
    /// Moved out during a transformation.
    Uncomputed,
    /// The values over the rows.
    Evaluation(Vec<F>),
    /// The coefficients.
    Coefficient(FpPolynomial<F>),
}

/// A read-only view of the fixed, advice and instance columns of one
/// circuit in a single representation.
#[derive(Clone, Debug)]
pub struct Table<'t, T> {
    /// The fixed columns, selectors included.
    pub fixed: Vec<&'t T>,
    /// The advice columns.
    pub advice: Vec<&'t T>,
    /// The instance columns.
    pub instance: Vec<&'t T>,
}

impl<'t, T> Table<'t, T> {
    /// The column of any type.
    pub fn column(&self, column: Column<Any>) -> Result<&'t T> {
        let columns = match column.column_type() {
            Any::Fixed => &self.fixed,
            Any::Advice => &self.advice,
            Any::Instance => &self.instance,
        };
        columns
            .get(column.index())
            .copied()
            .ok_or(PlonkError::ColumnSizeError)
    }
}

impl<'t, F: Scalar> Table<'t, Vec<F>> {
    /// Evaluate `expression` at each of `len` positions, reading the query
    /// at rotation `r` of position `i` at `rotate(i, r)`.
    pub(crate) fn evaluate(
        &self,
        expression: &Expression<F>,
        len: usize,
        rotate: impl Fn(usize, Rotation) -> usize + Sync,
    ) -> Vec<F> {
        cfg_into_iter!(0..len)
            .map(|i| {
                expression.evaluate_field(
                    &|_, column, rotation| self.fixed[column][rotate(i, rotation)],
                    &|_, column, rotation| self.advice[column][rotate(i, rotation)],
                    &|_, column, rotation| self.instance[column][rotate(i, rotation)],
                )
            })
            .collect()
    }
}

/// The results of the commit stage, moved out one at a time.
#[derive(Debug)]
pub struct StepReturns<P, L, V> {
    /// Per circuit, the committed permutation argument.
    pub permutations: Vec<P>,
    /// Per circuit, the committed lookups.
    pub lookups_vec: Vec<Vec<L>>,
    /// The committed random polynomial.
    pub vanishing: Option<V>,
}

impl<P, L, V> StepReturns<P, L, V> {
    /// Move the permutation arguments out.
    pub fn take_permutations(&mut self) -> Vec<P> {
        mem::take(&mut self.permutations)
    }

    /// Move the lookups out.
    pub fn take_lookups(&mut self) -> Vec<Vec<L>> {
        mem::take(&mut self.lookups_vec)
    }

    /// Move the random polynomial out.
    pub fn take_vanishing(&mut self) -> Result<V> {
        self.vanishing
            .take()
            .ok_or(PlonkError::PhaseError("vanishing already taken"))
    }
}

/// Everything evaluated at `x`.
#[derive(Debug)]
pub struct ArgumentEvaluated<F> {
    /// Per circuit, the instance evaluations. Empty unless the commitment
    /// scheme opens instance columns.
    pub instance_evals: Vec<Vec<F>>,
    /// Per circuit, the advice evaluations.
    pub advice_evals: Vec<Vec<F>>,
    /// The fixed evaluations.
    pub fixed_evals: Vec<F>,
    /// The sigma evaluations.
    pub permutation_common_evals: Vec<F>,
    /// Per circuit, the evaluated permutation argument.
    pub permutations: Vec<PermutationEvaluated<F>>,
    /// Per circuit, the evaluated lookups.
    pub lookups: Vec<Vec<LookupEvaluated<F>>>,
    /// The evaluated vanishing argument.
    pub vanishing: VanishingEvaluated<F>,
}

/// Collects the advice values of one circuit.
struct WitnessCollection<'a, F> {
    usable_rows: usize,
    advice: Vec<Vec<F>>,
    instances: &'a [Vec<F>],
}

impl<'a, F: Scalar> WitnessCollection<'a, F> {
    fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.usable_rows {
            return Err(PlonkError::NotEnoughRowsAvailable);
        }
        Ok(())
    }
}

impl<'a, F: Scalar> Assignment<F> for WitnessCollection<'a, F> {
    fn enable_selector(&mut self, _: &Selector, row: usize) -> Result<()> {
        self.check_row(row)
    }

    fn assign_advice(&mut self, column: Column<Advice>, row: usize, value: F) -> Result<Cell> {
        self.check_row(row)?;
        let cell = self
            .advice
            .get_mut(column.index())
            .and_then(|c| c.get_mut(row))
            .ok_or(PlonkError::ColumnSizeError)?;
        *cell = value;
        Ok(Cell {
            column: column.into(),
            row,
        })
    }

    fn assign_fixed(&mut self, column: Column<Fixed>, row: usize, _: F) -> Result<Cell> {
        self.check_row(row)?;
        Ok(Cell {
            column: column.into(),
            row,
        })
    }

    fn copy(&mut self, left: Cell, right: Cell) -> Result<()> {
        self.check_row(left.row)?;
        self.check_row(right.row)
    }

    fn query_instance(&self, column: Column<Instance>, row: usize) -> Result<F> {
        self.check_row(row)?;
        self.instances
            .get(column.index())
            .and_then(|c| c.get(row))
            .copied()
            .ok_or(PlonkError::ColumnSizeError)
    }
}

/// The state of one proof over one or more circuits sharing a proving key.
pub struct Argument<'a, PCS: PolyComScheme> {
    pk: &'a PlonkPK<PCS>,
    domain: EvaluationDomain<PCS::Field>,
    num_circuits: usize,
    instance_values: Vec<Vec<Vec<PCS::Field>>>,
    instance_polys: Vec<Vec<FpPolynomial<PCS::Field>>>,
    instance_commitments: Vec<Vec<PCS::Commitment>>,
    advice: Vec<Vec<ColumnForm<PCS::Field>>>,
    advice_blinds: Vec<Vec<Vec<PCS::Field>>>,
    advice_commitments: Vec<Vec<PCS::Commitment>>,
    challenges: PlonkChallenges<PCS::Field>,
    transformed: bool,
}

impl<'a, PCS: PolyComScheme> Argument<'a, PCS> {
    /// Pad and commit the instances, synthesize the witness of every
    /// circuit, blind and commit the advice columns.
    pub fn create<C: Circuit<PCS::Field>, R: CryptoRng + RngCore>(
        pk: &'a PlonkPK<PCS>,
        pcs: &mut PCS,
        circuits: &[C],
        instances: &[Vec<Vec<PCS::Field>>],
        prng: &mut R,
        transcript: &mut Transcript,
    ) -> Result<Self> {
        let create_time = start_timer!(|| "Create the argument");
        let vk = pk.get_verifier_params_ref();
        let cs = &vk.cs;
        let domain = vk.get_domain()?;
        let n = domain.n();
        let blinding_factors = cs.blinding_factors();
        let usable_rows = n - (blinding_factors + 1);

        let num_circuits = circuits.len();
        if num_circuits == 0 || instances.len() != num_circuits {
            return Err(PlonkError::CircuitCountMismatch);
        }

        let mut instance_values = Vec::with_capacity(num_circuits);
        for circuit_instances in instances.iter() {
            if circuit_instances.len() != cs.num_instance_columns() {
                return Err(PlonkError::ColumnSizeError);
            }
            let mut padded_columns = Vec::with_capacity(circuit_instances.len());
            for values in circuit_instances.iter() {
                if values.len() > usable_rows {
                    debug!(len = values.len(), usable_rows, "instance column too long");
                    return Err(PlonkError::ColumnSizeError);
                }
                let mut padded = values.clone();
                padded.resize(n, PCS::Field::zero());
                padded_columns.push(padded);
            }
            instance_values.push(padded_columns);
        }
        let instance_polys: Vec<Vec<FpPolynomial<PCS::Field>>> = instance_values
            .iter()
            .map(|columns| {
                cfg_iter!(columns)
                    .map(|values| domain.lagrange_to_coeff(values))
                    .collect()
            })
            .collect();

        let instance_commitments = if PCS::QUERY_INSTANCE {
            let commitments = batch_commit_columns(pcs, &instance_values)?;
            for c in commitments.iter().flatten() {
                transcript.append_commitment(c);
            }
            commitments
        } else {
            for values in instance_values.iter().flatten() {
                transcript.append_field_elems(values);
            }
            vec![vec![]; num_circuits]
        };

        let mut advice = Vec::with_capacity(num_circuits);
        let mut advice_blinds = Vec::with_capacity(num_circuits);
        for (circuit, circuit_instances) in circuits.iter().zip(instance_values.iter()) {
            let mut config_cs = ConstraintSystem::default();
            let config = C::configure(&mut config_cs);
            let mut witness = WitnessCollection {
                usable_rows,
                advice: vec![vec![PCS::Field::zero(); n]; cs.num_advice_columns()],
                instances: circuit_instances,
            };
            circuit.synthesize(config, &mut witness)?;

            let blinder = Blinder::new(blinding_factors, true);
            let mut blinds = Vec::with_capacity(witness.advice.len());
            for column in witness.advice.iter_mut() {
                blinds.push(blinder.blind(column, prng));
            }
            advice.push(witness.advice);
            advice_blinds.push(blinds);
        }

        let advice_commitments = batch_commit_columns(pcs, &advice)?;
        for c in advice_commitments.iter().flatten() {
            transcript.append_commitment(c);
        }
        end_timer!(create_time);

        Ok(Self {
            pk,
            domain,
            num_circuits,
            instance_values,
            instance_polys,
            instance_commitments,
            advice: advice
                .into_iter()
                .map(|columns| columns.into_iter().map(ColumnForm::Evaluation).collect())
                .collect(),
            advice_blinds,
            advice_commitments,
            challenges: PlonkChallenges::new(),
            transformed: false,
        })
    }

    /// The number of circuits in the proof.
    pub fn num_circuits(&self) -> usize {
        self.num_circuits
    }

    /// The evaluation domains.
    pub fn domain(&self) -> &EvaluationDomain<PCS::Field> {
        &self.domain
    }

    /// Per circuit, the instance commitments.
    pub fn instance_commitments(&self) -> &[Vec<PCS::Commitment>] {
        &self.instance_commitments
    }

    /// Per circuit, the advice commitments.
    pub fn advice_commitments(&self) -> &[Vec<PCS::Commitment>] {
        &self.advice_commitments
    }

    /// Per circuit and advice column, the random values of the blinding
    /// rows.
    pub fn advice_blinds(&self) -> &[Vec<Vec<PCS::Field>>] {
        &self.advice_blinds
    }

    /// The challenges drawn so far.
    pub fn challenges(&self) -> Vec<PCS::Field> {
        self.challenges.to_vec()
    }

    fn cs(&self) -> &'a ConstraintSystem<PCS::Field> {
        &self.pk.get_verifier_params_ref().cs
    }

    /// Replace every advice column by its coefficients, one column at a time.
    pub fn transform_advice(&mut self) -> Result<()> {
        if self.transformed {
            return Err(PlonkError::PhaseError("advice already transformed"));
        }
        let transform_time = start_timer!(|| "Transform advice");
        let domain = &self.domain;
        for columns in self.advice.iter_mut() {
            cfg_iter_mut!(columns).try_for_each(|column| -> Result<()> {
                match mem::replace(column, ColumnForm::Uncomputed) {
                    ColumnForm::Evaluation(values) => {
                        *column = ColumnForm::Coefficient(domain.lagrange_to_coeff(&values));
                        Ok(())
                    }
                    _ => Err(PlonkError::PhaseError("advice is not in evaluation form")),
                }
            })?;
        }
        self.transformed = true;
        end_timer!(transform_time);
        debug!("advice transformed to coefficient form");
        Ok(())
    }

    /// Per circuit, the columns as values over the rows. Only before the
    /// advice is transformed.
    pub fn export_column_tables(&self) -> Result<Vec<Table<'_, Vec<PCS::Field>>>> {
        if self.transformed {
            return Err(PlonkError::PhaseError("column tables after transform"));
        }
        let fixed: Vec<&Vec<PCS::Field>> = self.pk.fixed_values.iter().collect();
        self.advice
            .iter()
            .zip(self.instance_values.iter())
            .map(|(advice, instance)| {
                let advice = advice
                    .iter()
                    .map(|column| match column {
                        ColumnForm::Evaluation(values) => Ok(values),
                        _ => Err(PlonkError::PhaseError("advice is not in evaluation form")),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Table {
                    fixed: fixed.clone(),
                    advice,
                    instance: instance.iter().collect(),
                })
            })
            .collect()
    }

    /// Per circuit, the columns as polynomials. Only after the advice is
    /// transformed.
    pub fn export_poly_tables(&self) -> Result<Vec<Table<'_, FpPolynomial<PCS::Field>>>> {
        if !self.transformed {
            return Err(PlonkError::PhaseError("poly tables before transform"));
        }
        let fixed: Vec<&FpPolynomial<PCS::Field>> = self.pk.fixed_polys.iter().collect();
        self.advice
            .iter()
            .zip(self.instance_polys.iter())
            .map(|(advice, instance)| {
                let advice = advice
                    .iter()
                    .map(|column| match column {
                        ColumnForm::Coefficient(poly) => Ok(poly),
                        _ => Err(PlonkError::PhaseError("advice is not in coefficient form")),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Table {
                    fixed: fixed.clone(),
                    advice,
                    instance: instance.iter().collect(),
                })
            })
            .collect()
    }

    /// Permute and commit every lookup of every circuit.
    pub fn compress_lookup_step<R: CryptoRng + RngCore>(
        &mut self,
        pcs: &PCS,
        theta: PCS::Field,
        prng: &mut R,
        transcript: &mut Transcript,
    ) -> Result<Vec<Vec<LookupPermuted<PCS::Commitment, PCS::Field>>>> {
        self.challenges.insert_theta(theta)?;
        let cs = self.cs();
        let blinding_factors = cs.blinding_factors();
        let tables = self.export_column_tables()?;
        tables
            .iter()
            .map(|table| {
                cs.lookups()
                    .iter()
                    .map(|lookup| {
                        lookup.permute(
                            pcs,
                            &self.domain,
                            blinding_factors,
                            table,
                            &theta,
                            prng,
                            transcript,
                        )
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect()
    }

    /// Commit the permutation grand products, then the lookup grand
    /// products, then the random polynomial.
    pub fn commit_circuit_step<R: CryptoRng + RngCore>(
        &mut self,
        pcs: &PCS,
        lookups: Vec<Vec<LookupPermuted<PCS::Commitment, PCS::Field>>>,
        beta: PCS::Field,
        gamma: PCS::Field,
        prng: &mut R,
        transcript: &mut Transcript,
    ) -> Result<
        StepReturns<
            PermutationCommitted<PCS::Commitment, PCS::Field>,
            LookupCommitted<PCS::Commitment, PCS::Field>,
            VanishingRandom<PCS::Commitment, PCS::Field>,
        >,
    > {
        if lookups.len() != self.num_circuits {
            return Err(PlonkError::CircuitCountMismatch);
        }
        self.challenges.insert_beta_gamma(beta, gamma)?;
        let cs = self.cs();
        let blinding_factors = cs.blinding_factors();
        let vk = self.pk.get_verifier_params_ref();
        let tables = self.export_column_tables()?;

        let permutations = tables
            .iter()
            .map(|table| {
                cs.permutation().commit(
                    pcs,
                    &self.pk.permutation,
                    &vk.ks,
                    cs.degree(),
                    blinding_factors,
                    &self.domain,
                    table,
                    &beta,
                    &gamma,
                    prng,
                    transcript,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        let lookups_vec = lookups
            .into_iter()
            .map(|circuit_lookups| {
                circuit_lookups
                    .into_iter()
                    .map(|lookup| {
                        lookup.commit_product(
                            pcs,
                            &self.domain,
                            blinding_factors,
                            &beta,
                            &gamma,
                            prng,
                            transcript,
                        )
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        let vanishing =
            VanishingArgument::commit_random_poly(pcs, &self.domain, prng, transcript)?;

        Ok(StepReturns {
            permutations,
            lookups_vec,
            vanishing: Some(vanishing),
        })
    }

    /// Fold every constraint of every circuit with `y` over the extended
    /// coset, divide by the vanishing polynomial and commit the pieces.
    pub fn generate_circuit_polynomial(
        &mut self,
        pcs: &PCS,
        permutations: &[PermutationCommitted<PCS::Commitment, PCS::Field>],
        lookups: &[Vec<LookupCommitted<PCS::Commitment, PCS::Field>>],
        vanishing: VanishingRandom<PCS::Commitment, PCS::Field>,
        y: PCS::Field,
        transcript: &mut Transcript,
    ) -> Result<VanishingCommitted<PCS::Commitment, PCS::Field>> {
        if permutations.len() != self.num_circuits || lookups.len() != self.num_circuits {
            return Err(PlonkError::CircuitCountMismatch);
        }
        self.challenges.insert_y(y)?;
        let theta = *self.challenges.get_theta()?;
        let (beta, gamma) = self.challenges.get_beta_gamma()?;
        let (beta, gamma) = (*beta, *gamma);

        let quotient_time = start_timer!(|| "Fold the constraints");
        let poly_tables = self.export_poly_tables()?;
        let cs = self.cs();
        let vk = self.pk.get_verifier_params_ref();
        let domain = &self.domain;
        let len = domain.extended_len();
        let extended_points = domain.extended_points();
        let l_common = (
            self.pk.l0.as_slice(),
            self.pk.l_last.as_slice(),
            self.pk.l_active_row.as_slice(),
        );
        let fixed_cosets: Vec<&Vec<PCS::Field>> = self.pk.fixed_cosets.iter().collect();

        let mut h_ext = vec![PCS::Field::zero(); len];
        let mut fold = |values: &[PCS::Field]| {
            cfg_iter_mut!(h_ext)
                .zip(values)
                .for_each(|(acc, v)| *acc = acc.mul(&y).add(v));
        };

        for ((poly_table, permutation), circuit_lookups) in poly_tables
            .iter()
            .zip(permutations.iter())
            .zip(lookups.iter())
        {
            let advice_cosets: Vec<Vec<PCS::Field>> = cfg_iter!(poly_table.advice)
                .map(|p| domain.coeff_to_extended(p))
                .collect();
            let instance_cosets: Vec<Vec<PCS::Field>> = cfg_iter!(poly_table.instance)
                .map(|p| domain.coeff_to_extended(p))
                .collect();
            let cosets = Table {
                fixed: fixed_cosets.clone(),
                advice: advice_cosets.iter().collect(),
                instance: instance_cosets.iter().collect(),
            };

            for gate in cs.gates() {
                for poly in gate.polynomials() {
                    let values =
                        cosets.evaluate(poly, len, |i, r| domain.rotate_extended(i, r));
                    fold(&values);
                }
            }
            for values in permutation.constraints(
                cs.permutation(),
                &self.pk.permutation,
                &vk.ks,
                cs.degree(),
                cs.blinding_factors(),
                domain,
                &cosets,
                l_common,
                &extended_points,
                &beta,
                &gamma,
            )? {
                fold(&values);
            }
            for (lookup, argument) in circuit_lookups.iter().zip(cs.lookups()) {
                for values in lookup.constraints(
                    argument, domain, &cosets, l_common, &theta, &beta, &gamma,
                ) {
                    fold(&values);
                }
            }
        }
        end_timer!(quotient_time);

        vanishing.construct_h(h_ext, domain).commit_h(pcs, transcript)
    }

    /// Evaluate every queried column, the vanishing argument, the sigma
    /// polynomials, the permutation and the lookups at `x`.
    pub fn evaluate_circuit_step(
        &mut self,
        x: PCS::Field,
        permutations: Vec<PermutationCommitted<PCS::Commitment, PCS::Field>>,
        lookups: Vec<Vec<LookupCommitted<PCS::Commitment, PCS::Field>>>,
        vanishing: VanishingCommitted<PCS::Commitment, PCS::Field>,
        transcript: &mut Transcript,
    ) -> Result<ArgumentEvaluated<PCS::Field>> {
        if permutations.len() != self.num_circuits || lookups.len() != self.num_circuits {
            return Err(PlonkError::CircuitCountMismatch);
        }
        self.challenges.insert_x(x)?;
        let evaluate_time = start_timer!(|| "Evaluate at x");
        let poly_tables = self.export_poly_tables()?;
        let cs = self.cs();
        let domain = &self.domain;
        let eval_at = |poly: &FpPolynomial<PCS::Field>, rotation: Rotation| {
            poly.eval(&domain.rotate_omega(x, rotation))
        };

        let instance_evals: Vec<Vec<PCS::Field>> = if PCS::QUERY_INSTANCE {
            poly_tables
                .iter()
                .map(|table| {
                    cs.instance_queries()
                        .iter()
                        .map(|(column, rotation)| eval_at(table.instance[column.index()], *rotation))
                        .collect()
                })
                .collect()
        } else {
            vec![]
        };
        for evals in instance_evals.iter() {
            transcript.append_field_elems(evals);
        }

        let advice_evals: Vec<Vec<PCS::Field>> = poly_tables
            .iter()
            .map(|table| {
                cs.advice_queries()
                    .iter()
                    .map(|(column, rotation)| eval_at(table.advice[column.index()], *rotation))
                    .collect()
            })
            .collect();
        for evals in advice_evals.iter() {
            transcript.append_field_elems(evals);
        }

        let fixed_evals: Vec<PCS::Field> = cs
            .fixed_queries()
            .iter()
            .map(|(column, rotation)| eval_at(&self.pk.fixed_polys[column.index()], *rotation))
            .collect();
        transcript.append_field_elems(&fixed_evals);

        let xn = x.pow(&[domain.n() as u64]);
        let vanishing = vanishing.evaluate(&x, &xn, transcript);

        let permutation_common_evals = self.pk.permutation.evaluate(&x, transcript);

        let blinding_factors = cs.blinding_factors();
        let permutations = permutations
            .into_iter()
            .map(|p| p.evaluate(domain, blinding_factors, &x, transcript))
            .collect();

        let lookups = lookups
            .into_iter()
            .map(|circuit_lookups| {
                circuit_lookups
                    .into_iter()
                    .map(|l| l.evaluate(domain, &x, transcript))
                    .collect()
            })
            .collect();
        end_timer!(evaluate_time);

        Ok(ArgumentEvaluated {
            instance_evals,
            advice_evals,
            fixed_evals,
            permutation_common_evals,
            permutations,
            lookups,
            vanishing,
        })
    }

    /// Collect every opening claim of the proof through `points`.
    pub fn construct_openings<'b>(
        &'b self,
        evaluated: &'b ArgumentEvaluated<PCS::Field>,
        points: &mut PointSet<PCS::Field>,
    ) -> Result<Vec<PolynomialOpening<'b, PCS::Field>>> {
        let x = *self.challenges.get_x()?;
        let poly_tables = self.export_poly_tables()?;
        let cs = self.cs();
        let domain = &self.domain;
        let blinding_factors = cs.blinding_factors();
        let mut openings = vec![];

        for (c, table) in poly_tables.iter().enumerate() {
            if PCS::QUERY_INSTANCE {
                for ((column, rotation), eval) in cs
                    .instance_queries()
                    .iter()
                    .zip(evaluated.instance_evals[c].iter())
                {
                    let point = points.insert(domain.rotate_omega(x, *rotation));
                    openings.push(PolynomialOpening::new(
                        table.instance[column.index()],
                        point,
                        *eval,
                    ));
                }
            }
            for ((column, rotation), eval) in cs
                .advice_queries()
                .iter()
                .zip(evaluated.advice_evals[c].iter())
            {
                let point = points.insert(domain.rotate_omega(x, *rotation));
                openings.push(PolynomialOpening::new(
                    table.advice[column.index()],
                    point,
                    *eval,
                ));
            }
            openings.extend(evaluated.permutations[c].open(domain, blinding_factors, &x, points));
            for lookup in evaluated.lookups[c].iter() {
                openings.extend(lookup.open(domain, &x, points));
            }
        }

        for ((column, rotation), eval) in cs
            .fixed_queries()
            .iter()
            .zip(evaluated.fixed_evals.iter())
        {
            let point = points.insert(domain.rotate_omega(x, *rotation));
            openings.push(PolynomialOpening::new(
                &self.pk.fixed_polys[column.index()],
                point,
                *eval,
            ));
        }
        openings.extend(
            self.pk
                .permutation
                .open(&evaluated.permutation_common_evals, &x, points),
        );
        openings.extend(evaluated.vanishing.open(&x, points));
        Ok(openings)
    }
}

/// Commit every column of every circuit in one batch, returning the
/// commitments per circuit.
fn batch_commit_columns<PCS: PolyComScheme>(
    pcs: &mut PCS,
    columns: &[Vec<Vec<PCS::Field>>],
) -> Result<Vec<Vec<PCS::Commitment>>> {
    let commit_time = start_timer!(|| "Batch commit columns");
    let count = columns.iter().map(|c| c.len()).sum();
    pcs.set_batch_mode(count);
    for (slot, values) in columns.iter().flatten().enumerate() {
        pcs.batch_commit_lagrange(values, slot)?;
    }
    let mut commitments = pcs.get_batch_commitments()?.into_iter();
    let mut per_circuit = Vec::with_capacity(columns.len());
    for circuit_columns in columns.iter() {
        per_circuit.push(commitments.by_ref().take(circuit_columns.len()).collect());
    }
    end_timer!(commit_time);
    Ok(per_circuit)
}
