use crate::errors::{PlonkError, Result};
use crate::plonk::constraint_system::Rotation;
use crate::poly_commit::field_polynomial::{FftDomain, FpPolynomial};
use ark_poly::EvaluationDomain as _;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{cfg_iter_mut, end_timer, start_timer};
use lumen_algebra::prelude::*;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The row domain of size `n` together with the extended coset
/// `zeta * <omega_ext>` on which the quotient is computed.
#[derive(Clone, Debug)]
pub struct EvaluationDomain<F: Domain> {
    n: usize,
    k: u32,
    quotient_poly_degree: usize,
    domain: FftDomain<F>,
    extended_domain: FftDomain<F>,
    omega: F,
    omega_inv: F,
    zeta: F,
    zeta_inv: F,
    t_evaluations: Vec<F>,
}

impl<F: Domain> EvaluationDomain<F> {
    /// Build the domains for a constraint system of degree `degree` over
    /// `n` rows, `n` a power of two.
    pub fn new(degree: usize, n: usize) -> Result<Self> {
        if n < 2 || !n.is_power_of_two() {
            return Err(PlonkError::GroupNotFound(n));
        }
        let domain =
            FpPolynomial::<F>::evaluation_domain(n).ok_or(PlonkError::GroupNotFound(n))?;
        Self::from_base(degree, domain)
    }

    fn from_base(degree: usize, domain: FftDomain<F>) -> Result<Self> {
        let n = domain.size();
        let quotient_poly_degree = degree.max(2) - 1;
        let extended_len = (n * quotient_poly_degree).next_power_of_two();
        let extended_domain = FpPolynomial::<F>::evaluation_domain(extended_len)
            .ok_or(PlonkError::GroupNotFound(extended_len))?;
        if extended_domain.size() != extended_len {
            return Err(PlonkError::GroupNotFound(extended_len));
        }

        let zeta = F::multiplicative_generator();
        let zeta_inv = zeta.inv()?;

        // Z_H(zeta * omega_ext^i) only depends on i modulo extended_len / n.
        let period = extended_len / n;
        let zeta_n = zeta.pow(&[n as u64]);
        let omega_ext_n = F::from_field(extended_domain.group_gen).pow(&[n as u64]);
        let mut t_evaluations = Vec::with_capacity(period);
        let mut cur = zeta_n;
        for _ in 0..period {
            t_evaluations.push(cur.sub(&F::one()));
            cur.mul_assign(&omega_ext_n);
        }
        batch_inv(&mut t_evaluations).map_err(|_| PlonkError::DivisionByZero)?;

        Ok(Self {
            n,
            k: n.trailing_zeros(),
            quotient_poly_degree,
            omega: F::from_field(domain.group_gen),
            omega_inv: F::from_field(domain.group_gen_inv),
            domain,
            extended_domain,
            zeta,
            zeta_inv,
            t_evaluations,
        })
    }

    /// Serialize the row domain.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = vec![];
        self.domain
            .serialize_uncompressed(&mut bytes)
            .map_err(|_| PlonkError::DeserializationError)?;
        Ok(bytes)
    }

    /// Rebuild the domains from the bytes of `to_bytes`.
    pub fn from_bytes(degree: usize, bytes: &[u8]) -> Result<Self> {
        let domain = FftDomain::<F>::deserialize_uncompressed_unchecked(bytes)
            .map_err(|_| PlonkError::DeserializationError)?;
        Self::from_base(degree, domain)
    }

    /// The number of rows.
    pub fn n(&self) -> usize {
        self.n
    }

    /// `log2(n)`.
    pub fn k(&self) -> u32 {
        self.k
    }

    /// The size of the extended coset.
    pub fn extended_len(&self) -> usize {
        self.extended_domain.size()
    }

    /// The number of `n`-coefficient pieces of the quotient.
    pub fn quotient_poly_degree(&self) -> usize {
        self.quotient_poly_degree
    }

    /// The generator of the row domain.
    pub fn get_omega(&self) -> F {
        self.omega
    }

    /// The inverse of the generator of the row domain.
    pub fn get_omega_inv(&self) -> F {
        self.omega_inv
    }

    /// The shift of the extended coset.
    pub fn get_zeta(&self) -> F {
        self.zeta
    }

    /// Interpolate the values over the row domain.
    pub fn lagrange_to_coeff(&self, values: &[F]) -> FpPolynomial<F> {
        FpPolynomial::ffti_with_domain(&self.domain, values)
    }

    /// Evaluate a polynomial of degree below `n` over the row domain.
    pub fn coeff_to_lagrange(&self, poly: &FpPolynomial<F>) -> Vec<F> {
        poly.fft_with_domain(&self.domain)
    }

    /// Evaluate a polynomial over the extended coset.
    pub fn coeff_to_extended(&self, poly: &FpPolynomial<F>) -> Vec<F> {
        poly.coset_fft_with_domain(&self.extended_domain, &self.zeta)
    }

    /// Interpolate values over the extended coset, keeping the
    /// `n * quotient_poly_degree` low coefficients.
    pub fn extended_to_coeff(&self, values: &[F]) -> Vec<F> {
        let poly =
            FpPolynomial::coset_ffti_with_domain(&self.extended_domain, values, &self.zeta_inv);
        let mut coefs = poly.coefs;
        coefs.resize(self.n * self.quotient_poly_degree, F::zero());
        coefs
    }

    /// Divide values over the extended coset by `X^n - 1`.
    pub fn divide_by_vanishing_poly(&self, values: &mut [F]) {
        let divide_time = start_timer!(|| "Divide by the vanishing polynomial");
        let period = self.t_evaluations.len();
        cfg_iter_mut!(values)
            .enumerate()
            .for_each(|(i, v)| v.mul_assign(&self.t_evaluations[i % period]));
        end_timer!(divide_time);
    }

    /// The index shift on the extended coset for a rotation.
    pub fn rotate_extended(&self, idx: usize, rotation: Rotation) -> usize {
        let len = self.extended_len() as i64;
        let step = (self.extended_len() / self.n) as i64;
        (idx as i64 + rotation.0 as i64 * step).rem_euclid(len) as usize
    }

    /// The row index reached from `idx` by a rotation.
    pub fn rotate_row(&self, idx: usize, rotation: Rotation) -> usize {
        (idx as i64 + rotation.0 as i64).rem_euclid(self.n as i64) as usize
    }

    /// Multiply `x` by `omega^rotation`.
    pub fn rotate_omega(&self, x: F, rotation: Rotation) -> F {
        let base = if rotation.0 >= 0 {
            self.omega
        } else {
            self.omega_inv
        };
        x.mul(&base.pow(&[rotation.0.unsigned_abs() as u64]))
    }

    /// The points `zeta * omega_ext^i` of the extended coset.
    pub fn extended_points(&self) -> Vec<F> {
        let omega_ext = F::from_field(self.extended_domain.group_gen);
        let mut points = Vec::with_capacity(self.extended_len());
        let mut cur = self.zeta;
        for _ in 0..self.extended_len() {
            points.push(cur);
            cur.mul_assign(&omega_ext);
        }
        points
    }

    /// All Lagrange basis polynomials of the row domain evaluated at `x`.
    pub fn lagrange_coefficients(&self, x: &F) -> Vec<F> {
        self.domain
            .evaluate_all_lagrange_coefficients(x.get_field())
            .into_iter()
            .map(F::from_field)
            .collect()
    }

    /// `x^n - 1`.
    pub fn vanishing_eval(&self, x: &F) -> F {
        x.pow(&[self.n as u64]).sub(&F::one())
    }
}
