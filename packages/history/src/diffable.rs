use crate::patch::{Patch, PatchError, PatchPair};

/// State that can describe its own structural delta as patches.
///
/// Implementations must satisfy, for any `a` and `b`:
/// - `a.apply_patches(&a.diff(&b).forward) == b`
/// - `b.apply_patches(&a.diff(&b).inverse) == a`
/// - `a.diff(&a)` is empty
pub trait Diffable: Clone {
    /// Payload carried by `Add`/`Replace` patches.
    type Value: Clone + std::fmt::Debug;

    /// Compute forward and inverse patches turning `self` into `next`.
    fn diff(&self, next: &Self) -> PatchPair<Self::Value>;

    /// Apply one patch in place.
    fn apply_patch(&mut self, patch: &Patch<Self::Value>) -> Result<(), PatchError>;

    /// Apply patches in order to a copy of `self`.
    ///
    /// On failure `self` is untouched and the error of the first failing
    /// patch is returned.
    fn apply_patches(&self, patches: &[Patch<Self::Value>]) -> Result<Self, PatchError> {
        let mut next = self.clone();
        for patch in patches {
            next.apply_patch(patch)?;
        }
        Ok(next)
    }
}
