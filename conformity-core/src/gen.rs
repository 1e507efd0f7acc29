//! The generator contract and the min/max ordering helper.

use crate::data::{BiasFactor, Source};
use crate::tree::Shrinkable;

/// The contract every generator under test implements.
///
/// A generator is a pure mapping from a draw source (plus an optional
/// bias factor) to the root of a shrink tree. Implementations must read
/// randomness only from the supplied source, never from ambient state,
/// and a bias factor may change only the distribution of drawn values,
/// never which values are valid.
pub trait Generator {
    /// The type of value this generator produces.
    type Value;

    /// Draw one value together with its shrink tree.
    fn generate(&self, source: &mut Source, bias: Option<BiasFactor>)
        -> Shrinkable<Self::Value>;
}

/// An ordered pair of bounds, `min <= max`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

/// Order two independent draws from `inner` into a [`Bounds`] pair.
///
/// Range-style configurations need `min <= max`. Drawing both ends
/// independently and sorting afterwards keeps draw order out of the
/// contract: whichever of the two draws comes first, the pair ends up
/// ordered the same way.
pub fn min_max<G>(inner: G) -> MinMax<G> {
    MinMax { inner }
}

/// Generator adapter returned by [`min_max`].
pub struct MinMax<G> {
    inner: G,
}

impl<G> Generator for MinMax<G>
where
    G: Generator,
    G::Value: Ord + Clone + 'static,
{
    type Value = Bounds<G::Value>;

    fn generate(
        &self,
        source: &mut Source,
        bias: Option<BiasFactor>,
    ) -> Shrinkable<Self::Value> {
        let first = self.inner.generate(source, bias);
        let second = self.inner.generate(source, bias);
        first.zip(&second).map(|(a, b)| {
            if a <= b {
                Bounds {
                    min: a.clone(),
                    max: b.clone(),
                }
            } else {
                Bounds {
                    min: b.clone(),
                    max: a.clone(),
                }
            }
        })
    }
}
