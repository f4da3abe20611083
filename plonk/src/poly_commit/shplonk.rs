//! SHPLONK multi-point opening (Boneh, Drake, Fisch, Gabizon, ePrint 2020/081).
//!
//! Openings are grouped by polynomial, and polynomials opened at the same
//! set of points share one group. The prover sends two commitments, `H` for
//! the combined quotients and `Q` for the final linear division.
use crate::errors::{PlonkError, Result};
use crate::poly_commit::{
    field_polynomial::FpPolynomial,
    pcs::{CommitmentOpening, HomomorphicPolyComElem, PolyComScheme, PolynomialOpening},
    point_set::{PointRef, PointSet},
    transcript::PolyComTranscript,
};
use lumen_algebra::prelude::*;
use merlin::Transcript;

/// The multi-point opening proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShplonkProof<C> {
    /// The commitment of `H = sum v^i H_i`.
    pub h_commitment: C,
    /// The commitment of `L / ((X - u) * Z_{T \ S_0}(u))`.
    pub q_commitment: C,
}

/// One opened polynomial (or commitment) with its sorted `(point, eval)` list.
struct OpenedPoly<K, F> {
    key: K,
    evals: Vec<(PointRef, F)>,
}

/// Polynomials sharing an identical point set.
struct OpeningGroup<K, F> {
    points: Vec<PointRef>,
    members: Vec<OpenedPoly<K, F>>,
}

/// Group the claims by key, then by point set, in first-appearance order.
/// A repeated `(key, point)` claim must agree on the evaluation.
fn group_claims<K: PartialEq, F: Scalar>(
    claims: impl Iterator<Item = (K, PointRef, F)>,
    conflict: PlonkError,
) -> Result<Vec<OpeningGroup<K, F>>> {
    let mut polys: Vec<OpenedPoly<K, F>> = Vec::new();
    for (key, point, eval) in claims {
        match polys.iter_mut().find(|p| p.key == key) {
            Some(entry) => match entry.evals.iter().find(|(p, _)| *p == point) {
                Some((_, existing)) if *existing != eval => return Err(conflict),
                Some(_) => {}
                None => entry.evals.push((point, eval)),
            },
            None => polys.push(OpenedPoly {
                key,
                evals: vec![(point, eval)],
            }),
        }
    }

    let mut groups: Vec<OpeningGroup<K, F>> = Vec::new();
    for mut poly in polys {
        poly.evals.sort_by_key(|(p, _)| *p);
        let points: Vec<PointRef> = poly.evals.iter().map(|(p, _)| *p).collect();
        match groups.iter_mut().find(|g| g.points == points) {
            Some(group) => group.members.push(poly),
            None => groups.push(OpeningGroup {
                points,
                members: vec![poly],
            }),
        }
    }
    Ok(groups)
}

fn resolve<F: Scalar>(points: &PointSet<F>, refs: &[PointRef]) -> Result<Vec<F>> {
    refs.iter().map(|r| points.get(*r).map(|p| *p)).collect()
}

/// All distinct points used by the groups, sorted by handle.
fn union_points<K, F>(groups: &[OpeningGroup<K, F>]) -> Vec<PointRef> {
    groups
        .iter()
        .flat_map(|g| g.points.iter().copied())
        .sorted()
        .dedup()
        .collect()
}

/// `prod_{t in all \ subset} (u - t)`.
fn vanishing_outside<F: Scalar>(
    points: &PointSet<F>,
    all: &[PointRef],
    subset: &[PointRef],
    u: &F,
) -> Result<F> {
    let mut acc = F::one();
    for r in all.iter().filter(|r| !subset.contains(r)) {
        acc.mul_assign(&u.sub(points.get(*r)?));
    }
    Ok(acc)
}

/// Evaluate at `u` the polynomial of degree `< xs.len()` through `(xs, ys)`.
fn interpolate_at<F: Scalar>(xs: &[F], ys: &[F], u: &F) -> Result<F> {
    let mut acc = F::zero();
    for (k, (xk, yk)) in xs.iter().zip(ys.iter()).enumerate() {
        let mut num = F::one();
        let mut den = F::one();
        for (m, xm) in xs.iter().enumerate() {
            if m != k {
                num.mul_assign(&u.sub(xm));
                den.mul_assign(&xk.sub(xm));
            }
        }
        acc.add_assign(&yk.mul(&num).mul(&den.inv()?));
    }
    Ok(acc)
}

/// Produce the SHPLONK proof for `openings`.
pub fn shplonk_open<PCS: PolyComScheme>(
    pcs: &PCS,
    transcript: &mut Transcript,
    points: &PointSet<PCS::Field>,
    openings: &[PolynomialOpening<'_, PCS::Field>],
) -> Result<ShplonkProof<PCS::Commitment>> {
    let groups = group_claims(
        openings.iter().map(|o| (o.poly, o.point, o.eval)),
        PlonkError::PCSProveEvalError,
    )?;
    if groups.is_empty() {
        return Err(PlonkError::ProofError);
    }

    let y: PCS::Field = transcript.get_challenge_field_elem(b"shplonk y");
    let v: PCS::Field = transcript.get_challenge_field_elem(b"shplonk v");

    // H = sum_i v^i sum_j y^j (P_j - R_j) / Z_{S_i}
    let mut h = FpPolynomial::zero();
    let mut remainders = Vec::with_capacity(groups.len());
    let mut v_pow = PCS::Field::one();
    for group in groups.iter() {
        let xs = resolve(points, &group.points)?;
        let z_s = FpPolynomial::from_zeroes(&xs);
        let mut h_i = FpPolynomial::zero();
        let mut y_pow = PCS::Field::one();
        let mut group_rems = Vec::with_capacity(group.members.len());
        for member in group.members.iter() {
            let (q, r) = member.key.div_rem(&z_s)?;
            for ((_, eval), x) in member.evals.iter().zip(xs.iter()) {
                if r.eval(x) != *eval {
                    return Err(PlonkError::PCSProveEvalError);
                }
            }
            h_i.add_scaled_assign(&q, &y_pow);
            group_rems.push(r);
            y_pow.mul_assign(&y);
        }
        h.add_scaled_assign(&h_i, &v_pow);
        remainders.push(group_rems);
        v_pow.mul_assign(&v);
    }

    let h_commitment = pcs.commit(&h)?;
    transcript.append_commitment(&h_commitment);
    let u: PCS::Field = transcript.get_challenge_field_elem(b"shplonk u");

    let all = union_points(&groups);
    let z_t_u = vanishing_outside(points, &all, &[], &u)?;

    // L = sum_i v^i Z_{T \ S_i}(u) sum_j y^j (P_j - R_j(u)) - Z_T(u) H
    let mut l = h.mul_scalar(&z_t_u.neg());
    let mut first_z_diff = None;
    let mut v_pow = PCS::Field::one();
    for (group, group_rems) in groups.iter().zip(remainders.iter()) {
        let z_diff = vanishing_outside(points, &all, &group.points, &u)?;
        let mut inner = FpPolynomial::zero();
        let mut y_pow = PCS::Field::one();
        for (member, r) in group.members.iter().zip(group_rems.iter()) {
            let shifted = member.key.sub(&FpPolynomial::from_coefs(vec![r.eval(&u)]));
            inner.add_scaled_assign(&shifted, &y_pow);
            y_pow.mul_assign(&y);
        }
        l.add_scaled_assign(&inner, &v_pow.mul(&z_diff));
        first_z_diff.get_or_insert(z_diff);
        v_pow.mul_assign(&v);
    }

    let (mut q, rem) = l.divide_by_linear(&u);
    if !rem.is_zero() {
        return Err(PlonkError::PCSProveEvalError);
    }
    let first_z_diff = first_z_diff.ok_or(PlonkError::ProofError)?;
    q.mul_scalar_assign(&first_z_diff.inv()?);
    let q_commitment = pcs.commit(&q)?;
    transcript.append_commitment(&q_commitment);

    Ok(ShplonkProof {
        h_commitment,
        q_commitment,
    })
}

/// Replay the transcript of `shplonk_open` and fold the claims into the
/// commitment `p` such that the proof is valid iff `p = [tau] * Q`.
pub fn shplonk_reduce<C, F>(
    transcript: &mut Transcript,
    points: &PointSet<F>,
    openings: &[CommitmentOpening<C, F>],
    proof: &ShplonkProof<C>,
) -> Result<C>
where
    C: HomomorphicPolyComElem<Scalar = F> + PartialEq + Clone,
    F: Scalar,
{
    let groups = group_claims(
        openings
            .iter()
            .map(|o| (o.commitment.clone(), o.point, o.eval)),
        PlonkError::VerificationError,
    )?;
    if groups.is_empty() {
        return Err(PlonkError::VerificationError);
    }

    let y: F = transcript.get_challenge_field_elem(b"shplonk y");
    let v: F = transcript.get_challenge_field_elem(b"shplonk v");
    transcript.append_commitment(&proof.h_commitment);
    let u: F = transcript.get_challenge_field_elem(b"shplonk u");
    transcript.append_commitment(&proof.q_commitment);

    let all = union_points(&groups);
    let first_z_diff = vanishing_outside(points, &all, &groups[0].points, &u)?;
    let first_z_diff_inv = first_z_diff.inv()?;
    let z_s0_u = vanishing_outside(points, &groups[0].points, &[], &u)?;

    let base = C::get_base();
    let mut p = C::get_identity();
    let mut v_pow = F::one();
    for group in groups.iter() {
        let xs = resolve(points, &group.points)?;
        let z_diff = vanishing_outside(points, &all, &group.points, &u)?;
        let scale = v_pow.mul(&z_diff).mul(&first_z_diff_inv);

        let mut inner = C::get_identity();
        let mut y_pow = F::one();
        for member in group.members.iter() {
            let ys: Vec<F> = member.evals.iter().map(|(_, e)| *e).collect();
            let r_u = interpolate_at(&xs, &ys, &u)?;
            let shifted = member.key.sub(&base.mul(&r_u));
            inner.add_assign(&shifted.mul(&y_pow));
            y_pow.mul_assign(&y);
        }
        p.add_assign(&inner.mul(&scale));
        v_pow.mul_assign(&v);
    }
    p.sub_assign(&proof.h_commitment.mul(&z_s0_u));
    p.add_assign(&proof.q_commitment.mul(&u));
    Ok(p)
}
