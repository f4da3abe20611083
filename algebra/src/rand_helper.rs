use rand_chacha::{
    rand_core::{CryptoRng, RngCore, SeedableRng},
    ChaChaRng,
};

/// The environment variable that pins `test_rng` to a fixed seed.
pub const DETERMINISTIC_RNG_VAR: &str = "LUMEN_DETERMINISTIC_RNG";

/// A ChaCha rng seeded with a fixed value, for reproducible tests and benchmarks.
pub fn fixed_seed_rng() -> ChaChaRng {
    let mut seed = [0u8; 32];
    seed[..8].copy_from_slice(b"lumen-rn");
    seed[31] = 0x42;
    ChaChaRng::from_seed(seed)
}

/// Should be used only for tests, not for any real world usage.
#[cfg(not(feature = "std"))]
pub fn test_rng() -> impl RngCore + CryptoRng {
    fixed_seed_rng()
}

/// Should be used only for tests, not for any real world usage.
#[cfg(feature = "std")]
pub fn test_rng() -> impl RngCore + CryptoRng {
    let is_deterministic = std::env::var(DETERMINISTIC_RNG_VAR)
        .map(|v| v == "1")
        .unwrap_or(false);
    if is_deterministic {
        fixed_seed_rng()
    } else {
        ChaChaRng::from_entropy()
    }
}
