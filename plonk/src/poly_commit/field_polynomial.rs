use crate::errors::{PlonkError, Result};
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};
use lumen_algebra::prelude::*;

/// The radix-2 FFT domain over the arkworks field behind `F`.
pub type FftDomain<F> = Radix2EvaluationDomain<<F as Domain>::Field>;

/// Field polynomial in coefficient form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FpPolynomial<F> {
    /// Coefficients of the polynomial, low-order first.
    pub coefs: Vec<F>,
}

impl<F: Scalar> FpPolynomial<F> {
    /// Return the polynomial coefs reference.
    pub fn get_coefs_ref(&self) -> &[F] {
        self.coefs.as_slice()
    }

    /// Return the constant zero polynomial
    /// # Example
    /// ```
    /// use lumen_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use lumen_algebra::bn254::BN254Scalar;
    /// use lumen_algebra::{Zero, One};
    /// let poly = FpPolynomial::<BN254Scalar>::zero();
    /// let zero = BN254Scalar::zero();
    /// assert_eq!(poly.degree(), 0);
    /// assert_eq!(poly.eval(&zero), zero);
    /// assert_eq!(poly.eval(&BN254Scalar::one()), zero);
    /// ```
    pub fn zero() -> Self {
        Self::from_coefs(vec![F::zero()])
    }

    /// Return the constant one polynomial.
    pub fn one() -> Self {
        Self::from_coefs(vec![F::one()])
    }

    /// Build a polynomial from the coefficient vector, low-order coefficient first.
    /// High-order zero coefficient are trimmed.
    /// # Example
    /// ```
    /// use lumen_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use lumen_algebra::bn254::BN254Scalar;
    /// use lumen_algebra::{Zero, One, ops::*};
    /// let zero = BN254Scalar::zero();
    /// let one = BN254Scalar::one();
    /// let two = one.add(&one);
    /// let five = two.add(&two).add(&one);
    /// let poly = FpPolynomial::from_coefs(vec![one, zero, one]);
    /// assert_eq!(poly.degree(), 2);
    /// assert_eq!(poly.eval(&two), five);
    /// let poly2 = FpPolynomial::from_coefs(vec![one, zero, one, zero, zero, zero]);
    /// assert_eq!(poly, poly2);
    /// ```
    pub fn from_coefs(coefs: Vec<F>) -> Self {
        let mut p = FpPolynomial { coefs };
        p.trim_coefs();
        p
    }

    /// Build a polynomial from its zeroes/roots.
    pub fn from_zeroes(zeroes: &[F]) -> Self {
        let roots_ref: Vec<&F> = zeroes.iter().collect();
        Self::from_zeroes_ref(&roots_ref[..])
    }

    /// Build a polynomial from its zeroes/roots given as reference.
    pub fn from_zeroes_ref(zeroes: &[&F]) -> Self {
        let mut r = Self::one();
        for root in zeroes.iter() {
            let mut p = r.clone();
            r.coefs.insert(0, F::zero()); // multiply by X
            p.mul_scalar_assign(*root);
            r.sub_assign(&p);
        }
        r.trim_coefs();
        r
    }

    /// Return a polynomial of `degree` + 1 uniformly random coefficients.
    pub fn random<R: CryptoRng + RngCore>(prng: &mut R, degree: usize) -> FpPolynomial<F> {
        let coefs = (0..=degree).map(|_| F::random(prng)).collect();
        Self::from_coefs(coefs)
    }

    /// Remove high degree zero-coefficients
    fn trim_coefs(&mut self) {
        while self.coefs.len() > 1 && self.coefs.last().map_or(false, |c| c.is_zero()) {
            self.coefs.pop();
        }
    }

    /// Return degree of the polynomial
    pub fn degree(&self) -> usize {
        self.coefs.len().saturating_sub(1)
    }

    /// Test if polynomial is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.coefs.iter().all(|c| c.is_zero())
    }

    /// Evaluate a polynomial on a point.
    pub fn eval(&self, point: &F) -> F {
        self.coefs
            .iter()
            .rev()
            .fold(F::zero(), |acc, coef| acc.mul(point).add(coef))
    }

    /// Add another polynomial to self.
    pub fn add_assign(&mut self, other: &Self) {
        for (self_coef, other_coef) in self.coefs.iter_mut().zip(other.coefs.iter()) {
            self_coef.add_assign(other_coef);
        }
        let n = self.coefs.len();
        if n < other.coefs.len() {
            self.coefs.extend_from_slice(&other.coefs[n..]);
        }
        self.trim_coefs();
    }

    /// Add with another polynomial, producing a new polynomial.
    pub fn add(&self, other: &Self) -> Self {
        let mut new = self.clone();
        new.add_assign(other);
        new
    }

    /// Subtracts another polynomial from self.
    /// # Example:
    /// ```
    /// use lumen_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use lumen_algebra::bn254::BN254Scalar;
    /// use lumen_algebra::{Zero, One, ops::*};
    /// let zero = BN254Scalar::zero();
    /// let one = BN254Scalar::one();
    /// let two = one.add(&one);
    /// let three = two.add(&one);
    /// let mut poly1 = FpPolynomial::from_coefs(vec![three, three, two]);
    /// let poly2 = FpPolynomial::from_coefs(vec![three, two, one, one]);
    /// poly1.sub_assign(&poly2);
    /// let poly_expected = FpPolynomial::from_coefs(vec![zero, one, one, one.neg()]);
    /// assert_eq!(poly1, poly_expected);
    /// ```
    pub fn sub_assign(&mut self, other: &Self) {
        for (self_coef, other_coef) in self.coefs.iter_mut().zip(other.coefs.iter()) {
            self_coef.sub_assign(other_coef);
        }
        let n = self.coefs.len();
        if other.coefs.len() > n {
            self.coefs
                .extend(other.coefs[n..].iter().map(|other_coef| other_coef.neg()));
        }
        self.trim_coefs();
    }

    /// Subtract another polynomial from self, producing a new polynomial.
    pub fn sub(&self, other: &Self) -> Self {
        let mut new = self.clone();
        new.sub_assign(other);
        new
    }

    /// Negate the coefficients.
    pub fn neg(&self) -> Self {
        let mut new = self.clone();
        new.mul_scalar_assign(&F::one().neg());
        new
    }

    /// Multiply polynomial by a constant scalar.
    pub fn mul_scalar_assign(&mut self, scalar: &F) {
        for coef in self.coefs.iter_mut() {
            coef.mul_assign(scalar)
        }
        self.trim_coefs();
    }

    /// Multiply polynomial by a constant scalar into a new polynomial.
    pub fn mul_scalar(&self, scalar: &F) -> Self {
        let mut new = self.clone();
        new.mul_scalar_assign(scalar);
        new
    }

    /// Add `scalar * other` to self.
    pub fn add_scaled_assign(&mut self, other: &Self, scalar: &F) {
        if self.coefs.len() < other.coefs.len() {
            self.coefs.resize(other.coefs.len(), F::zero());
        }
        for (self_coef, other_coef) in self.coefs.iter_mut().zip(other.coefs.iter()) {
            self_coef.add_assign(&other_coef.mul(scalar));
        }
        self.trim_coefs();
    }

    /// Multiply the polynomial variable by a scalar.
    /// mul_var(\sum a_i X^i, b) = \sum a_i b^i X^i
    /// # Example:
    /// ```
    /// use lumen_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use lumen_algebra::bn254::BN254Scalar;
    /// use lumen_algebra::{Zero, One, ops::*};
    /// let zero = BN254Scalar::zero();
    /// let one = BN254Scalar::one();
    /// let two = one.add(&one);
    /// let four = two.add(&two);
    /// let poly = FpPolynomial::from_coefs(vec![zero, one, one]);
    /// let result = poly.mul_var(&two);
    /// assert_eq!(result, FpPolynomial::from_coefs(vec![zero, two, four]));
    /// ```
    pub fn mul_var(&self, scalar: &F) -> Self {
        let mut new = self.clone();
        let mut r = F::one();
        for coef in new.coefs.iter_mut() {
            coef.mul_assign(&r);
            r.mul_assign(scalar);
        }
        new.trim_coefs();
        new
    }

    /// Divide polynomial to produce the quotient and remainder polynomials.
    pub fn div_rem(&self, divisor: &Self) -> Result<(Self, Self)> {
        if divisor.is_zero() {
            return Err(PlonkError::DivisionByZero);
        }
        let k = self.coefs.len();
        let l = divisor.coefs.len();
        if l > k {
            return Ok((Self::zero(), self.clone()));
        }
        let divisor_coefs = &divisor.coefs[..];
        let bl_inv = divisor_coefs[l - 1].inv()?;
        let mut rem = self.coefs.clone();
        let mut quo = vec![F::zero(); k - l + 1];
        for i in (0..(k - l + 1)).rev() {
            let qi = bl_inv.mul(&rem[i + l - 1]);
            for (j, d) in divisor_coefs.iter().enumerate() {
                rem[i + j].sub_assign(&qi.mul(d));
            }
            quo[i] = qi;
        }
        rem.truncate(l - 1);
        if rem.is_empty() {
            rem.push(F::zero());
        }
        Ok((FpPolynomial::from_coefs(quo), FpPolynomial::from_coefs(rem)))
    }

    /// Divide by `X - point` with synthetic division, returning the
    /// quotient and the remainder `self(point)`.
    pub fn divide_by_linear(&self, point: &F) -> (Self, F) {
        let mut quo = vec![F::zero(); self.coefs.len().saturating_sub(1)];
        let mut carry = F::zero();
        for (i, coef) in self.coefs.iter().enumerate().rev() {
            let cur = coef.add(&carry.mul(point));
            if i == 0 {
                return (FpPolynomial::from_coefs(quo), cur);
            }
            quo[i - 1] = cur;
            carry = cur;
        }
        (Self::zero(), F::zero())
    }
}

impl<F: Domain> FpPolynomial<F> {
    /// Return the smallest radix-2 domain with at least `num_coefs` elements.
    pub fn evaluation_domain(num_coefs: usize) -> Option<FftDomain<F>> {
        FftDomain::<F>::new(num_coefs)
    }

    /// Evaluate the polynomial over the elements of `domain`.
    /// The polynomial must have at most `domain.size()` coefficients.
    pub fn fft_with_domain(&self, domain: &FftDomain<F>) -> Vec<F> {
        let coefs: Vec<F::Field> = self.coefs.iter().map(|c| c.get_field()).collect();
        domain.fft(&coefs).into_iter().map(F::from_field).collect()
    }

    /// Interpolate the polynomial from its values over the elements of `domain`.
    pub fn ffti_with_domain(domain: &FftDomain<F>, values: &[F]) -> Self {
        let values: Vec<F::Field> = values.iter().map(|v| v.get_field()).collect();
        Self::from_coefs(
            domain
                .ifft(&values)
                .into_iter()
                .map(F::from_field)
                .collect(),
        )
    }

    /// Evaluate the polynomial over the coset `k * domain`.
    pub fn coset_fft_with_domain(&self, domain: &FftDomain<F>, k: &F) -> Vec<F> {
        self.mul_var(k).fft_with_domain(domain)
    }

    /// Interpolate the polynomial from its values over the coset `k * domain`,
    /// given `k_inv` the inverse of `k`.
    pub fn coset_ffti_with_domain(domain: &FftDomain<F>, values: &[F], k_inv: &F) -> Self {
        Self::ffti_with_domain(domain, values).mul_var(k_inv)
    }
}

#[cfg(test)]
mod test {
    use crate::poly_commit::field_polynomial::FpPolynomial;
    use lumen_algebra::{bn254::BN254Scalar, prelude::*};
    use rand_chacha::ChaChaRng;

    #[test]
    fn from_zeroes() {
        let mut prng = ChaChaRng::from_seed([0u8; 32]);
        let zeroes: Vec<BN254Scalar> = (0..10).map(|_| BN254Scalar::random(&mut prng)).collect();
        let poly = FpPolynomial::from_zeroes(&zeroes[..]);
        assert_eq!(poly.degree(), 10);
        for root in zeroes.iter() {
            assert_eq!(BN254Scalar::zero(), poly.eval(root));
        }
    }

    #[test]
    fn div_rem_and_linear_division() {
        let mut prng = ChaChaRng::from_seed([0u8; 32]);
        let poly = FpPolynomial::<BN254Scalar>::random(&mut prng, 12);
        let divisor = FpPolynomial::<BN254Scalar>::random(&mut prng, 3);
        let (q, r) = poly.div_rem(&divisor).unwrap();
        assert!(r.degree() < 3);
        let mut recombined = q.clone();
        recombined.coefs = {
            let mut out = vec![BN254Scalar::zero(); q.coefs.len() + divisor.coefs.len() - 1];
            for (i, a) in q.coefs.iter().enumerate() {
                for (j, b) in divisor.coefs.iter().enumerate() {
                    out[i + j].add_assign(&a.mul(b));
                }
            }
            out
        };
        recombined.add_assign(&r);
        assert_eq!(recombined, poly);

        let point = BN254Scalar::random(&mut prng);
        let (quo, rem) = poly.divide_by_linear(&point);
        assert_eq!(rem, poly.eval(&point));
        let linear = FpPolynomial::from_coefs(vec![point.neg(), BN254Scalar::one()]);
        let (expected, _) = poly.div_rem(&linear).unwrap();
        assert_eq!(quo, expected);

        assert!(poly.div_rem(&FpPolynomial::zero()).is_err());
    }

    #[test]
    fn fft_matches_evaluation() {
        let mut prng = ChaChaRng::from_seed([0u8; 32]);
        let domain = FpPolynomial::<BN254Scalar>::evaluation_domain(16).unwrap();
        let root = BN254Scalar::from_field(domain.group_gen);
        let poly = FpPolynomial::<BN254Scalar>::random(&mut prng, 15);

        let values = poly.fft_with_domain(&domain);
        let mut omega = BN254Scalar::one();
        for v in values.iter() {
            assert_eq!(*v, poly.eval(&omega));
            omega.mul_assign(&root);
        }
        assert_eq!(FpPolynomial::ffti_with_domain(&domain, &values), poly);

        let k = BN254Scalar::multiplicative_generator();
        let coset_values = poly.coset_fft_with_domain(&domain, &k);
        let mut point = k;
        for v in coset_values.iter() {
            assert_eq!(*v, poly.eval(&point));
            point.mul_assign(&root);
        }
        let k_inv = k.inv().unwrap();
        assert_eq!(
            FpPolynomial::coset_ffti_with_domain(&domain, &coset_values, &k_inv),
            poly
        );
    }
}
