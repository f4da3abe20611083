use lumen_algebra::prelude::*;

/// Fills the trailing rows of a column with randomness.
#[derive(Clone, Copy, Debug)]
pub struct Blinder {
    rows: usize,
}

impl Blinder {
    /// Blind the last `blinding_factors` rows, plus the last usable row
    /// when `include_last_row` is set.
    pub fn new(blinding_factors: usize, include_last_row: bool) -> Self {
        Self {
            rows: blinding_factors + usize::from(include_last_row),
        }
    }

    /// The number of blinded rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Overwrite the trailing rows of `values` with random elements and
    /// return them.
    pub fn blind<F: Scalar, R: CryptoRng + RngCore>(
        &self,
        values: &mut [F],
        prng: &mut R,
    ) -> Vec<F> {
        let start = values.len().saturating_sub(self.rows);
        values[start..]
            .iter_mut()
            .map(|v| {
                *v = F::random(prng);
                *v
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Blinder;
    use lumen_algebra::{bn254::BN254Scalar, prelude::*};

    #[test]
    fn blinds_trailing_rows() {
        let mut prng = test_rng();
        let mut values = vec![BN254Scalar::one(); 8];
        let blinds = Blinder::new(3, true).blind(&mut values, &mut prng);
        assert_eq!(blinds.len(), 4);
        assert_eq!(&values[4..], &blinds[..]);
        assert!(values[..4].iter().all(|v| *v == BN254Scalar::one()));
        assert_eq!(Blinder::new(3, false).rows(), 3);
    }
}
