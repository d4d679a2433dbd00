// Ownership checks binding resources to the identity that created them

use std::future::Future;

use uuid::Uuid;

use crate::auth::models::User;

/// Resources that belong to exactly one user.
pub trait OwnedResource {
    fn owner_id(&self) -> Uuid;
}

/// Access denied to a resource the caller does not own.
///
/// Callers must render this exactly like a missing resource (404): an
/// authenticated user probing another user's ids learns nothing about
/// which ones exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotOwned;

/// Authorization checks for owner-scoped resources.
pub struct OwnershipGuard;

impl OwnershipGuard {
    /// Permit the identity iff it owns the resource.
    pub fn authorize<R: OwnedResource>(identity: &User, resource: &R) -> Result<(), NotOwned> {
        if resource.owner_id() == identity.id {
            Ok(())
        } else {
            Err(NotOwned)
        }
    }

    /// Look a resource up, then authorize the identity against it.
    ///
    /// A lookup miss and an ownership mismatch produce the same error value,
    /// so the two cases are externally indistinguishable.
    pub async fn authorize_and_scope<R, E, Fut>(identity: &User, lookup: Fut) -> Result<R, E>
    where
        R: OwnedResource,
        E: From<NotOwned>,
        Fut: Future<Output = Result<Option<R>, E>>,
    {
        let resource = lookup.await?.ok_or(NotOwned)?;
        Self::authorize(identity, &resource)?;
        Ok(resource)
    }
}
