use crate::errors::{PlonkError, Result};
use lumen_algebra::prelude::*;

/// A handle to a point stored in a [`PointSet`].
/// Two handles from the same set are equal iff they refer to the same point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointRef(usize);

impl PointRef {
    /// The insertion index of the point.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// An insertion-ordered set of evaluation points, deduplicated by equality.
#[derive(Clone, Debug, Default)]
pub struct PointSet<F> {
    points: Vec<F>,
}

impl<F: Scalar> PointSet<F> {
    /// Create an empty point set.
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Insert `point`, returning the handle of the stored copy.
    /// Linear scan: a proof opens at a few dozen points at most.
    pub fn insert(&mut self, point: F) -> PointRef {
        if let Some(i) = self.points.iter().position(|p| *p == point) {
            return PointRef(i);
        }
        self.points.push(point);
        PointRef(self.points.len() - 1)
    }

    /// Return the point referred to by `point_ref`.
    pub fn get(&self, point_ref: PointRef) -> Result<&F> {
        self.points
            .get(point_ref.0)
            .ok_or_else(|| PlonkError::Message(String::from("unknown point handle")))
    }

    /// Return the number of distinct points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Return whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate the points in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (PointRef, &F)> {
        self.points.iter().enumerate().map(|(i, p)| (PointRef(i), p))
    }
}

#[cfg(test)]
mod test {
    use super::PointSet;
    use lumen_algebra::{bn254::BN254Scalar, prelude::*};

    #[test]
    fn same_point_same_handle() {
        let mut set = PointSet::new();
        let x = BN254Scalar::from(7u32);
        let a = set.insert(x);
        let b = set.insert(BN254Scalar::from(9u32));
        let c = set.insert(x);
        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(set.len(), 2);
        assert_eq!(*set.get(b).unwrap(), BN254Scalar::from(9u32));
    }

    #[test]
    fn distinct_points_counted() {
        let mut prng = test_rng();
        let mut set = PointSet::new();
        let points: Vec<BN254Scalar> = (0..12).map(|_| BN254Scalar::random(&mut prng)).collect();
        let handles: Vec<_> = points.iter().map(|p| set.insert(*p)).collect();
        for p in points.iter() {
            set.insert(*p);
        }
        assert_eq!(set.len(), 12);
        for (h, p) in handles.iter().zip(points.iter()) {
            assert_eq!(set.get(*h).unwrap(), p);
        }
    }
}
