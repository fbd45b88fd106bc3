use blake2::{Blake2b512, Digest};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Make a random number generator from a global seed
/// and a string id.
///
/// The global seed is a single piece of information intended
/// to control all randomness in the simulation. Each pipeline
/// stage (cohort sampling, baseline derivation, scheduling,
/// visit values, glycemia stream) passes its own id, so the
/// draws consumed by one stage never depend on how many draws
/// another stage made. Adding or removing a stage therefore
/// leaves the data generated by the remaining stages unchanged,
/// which the tests rely on.
///
/// The id is concatenated with the global seed and the result
/// is hashed. The resulting hash seeds the random number
/// generator.
///
pub fn make_rng(global_seed: u64, id: &str) -> ChaCha8Rng {
    let message = format!("{id}{global_seed}");
    let mut hasher = Blake2b512::new();
    hasher.update(message);
    let seed = hasher.finalize()[0..32]
        .try_into()
        .expect("Unexpectedly failed to obtain correct-length slice");
    ChaCha8Rng::from_seed(seed)
}
