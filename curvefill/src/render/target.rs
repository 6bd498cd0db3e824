use std::ops::{Deref, DerefMut};

use log::{trace, warn};

use crate::device::{Backend, TargetId};
use crate::error::Result;

/// An offscreen target bound for the lifetime of the guard.
///
/// Dropping the guard unbinds the target, also when a draw issued through it
/// failed or panicked.
pub struct BoundTarget<'a, B: Backend + ?Sized> {
    backend: &'a mut B,
    target: TargetId,
}

impl<'a, B: Backend + ?Sized> BoundTarget<'a, B> {
    pub fn bind(backend: &'a mut B, target: TargetId) -> Result<Self> {
        backend.bind_target(target)?;
        trace!("bound offscreen target {:?}", target);
        Ok(BoundTarget { backend, target })
    }

    pub fn target(&self) -> TargetId {
        self.target
    }
}

impl<B: Backend + ?Sized> Deref for BoundTarget<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.backend
    }
}

impl<B: Backend + ?Sized> DerefMut for BoundTarget<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.backend
    }
}

impl<B: Backend + ?Sized> Drop for BoundTarget<'_, B> {
    fn drop(&mut self) {
        if let Err(e) = self.backend.unbind_target() {
            warn!("failed to unbind offscreen target {:?}: {}", self.target, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::trace::{Call, TraceBackend};
    use crate::device::Primitive;
    use crate::error::RenderError;

    fn draw_bound(backend: &mut TraceBackend) -> Result<()> {
        let mut bound = BoundTarget::bind(backend, TargetId(3))?;
        assert_eq!(bound.target(), TargetId(3));
        bound.draw(Primitive::Triangles, 3)?;
        bound.draw(Primitive::Triangles, 3)?;
        Ok(())
    }

    #[test]
    fn test_unbinds_after_success() {
        let mut backend = TraceBackend::new();
        draw_bound(&mut backend).unwrap();
        assert_eq!(backend.calls().first(), Some(&Call::BindTarget(TargetId(3))));
        assert_eq!(backend.calls().last(), Some(&Call::UnbindTarget));
    }

    #[test]
    fn test_unbinds_after_failed_draw() {
        let mut backend = TraceBackend::failing_at_draw(0);
        let res = draw_bound(&mut backend);
        assert!(matches!(res, Err(RenderError::Backend(_))));
        assert_eq!(backend.draw_count(), 1);
        assert_eq!(backend.calls().last(), Some(&Call::UnbindTarget));
    }
}
