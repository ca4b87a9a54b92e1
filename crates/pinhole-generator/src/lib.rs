pub mod random;
pub mod seq;

use pinhole_core::ShortCode;

pub use random::{GeneratorError, RandomGenerator};
pub use seq::SeqGenerator;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage;
/// uniqueness against stored codes is checked by the caller.
///
/// Implementations can vary from random generators to sequential or
/// distributed ID generators.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;
    /// Generates a type that can be converted into a short code candidate.
    fn generate(&self) -> Self::Output;
}

impl<G: Generator> Generator for std::sync::Arc<G> {
    type Output = G::Output;

    fn generate(&self) -> Self::Output {
        (**self).generate()
    }
}
