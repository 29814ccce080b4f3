use clerk_mirror_core::types::metadata;
use clerk_mirror_core::{Membership, MembershipPatch, Merge, MirrorResult};

use super::placeholder::{OrganizationHint, UserHint};
use super::{MirrorSync, SkipReason, SyncOutcome};
use crate::payload::{MembershipDeletedPayload, MembershipPayload};

const ORGANIZATION_PREFIX: &str = "org_";
const USER_PREFIX: &str = "user_";

/// Splits a composite membership id `org_X:user_Y` into its provider ids.
///
/// Returns `None` unless both halves carry the expected prefixes.
pub fn split_composite_id(id: &str) -> Option<(&str, &str)> {
    let (organization, user) = id.split_once(':')?;
    let valid = organization.len() > ORGANIZATION_PREFIX.len()
        && organization.starts_with(ORGANIZATION_PREFIX)
        && user.len() > USER_PREFIX.len()
        && user.starts_with(USER_PREFIX);
    valid.then_some((organization, user))
}

impl MirrorSync {
    /// Creates or updates a membership.
    ///
    /// The existing record is looked up by provider id first, then by the
    /// (user, organization) pair, so at most one membership exists per pair.
    pub async fn upsert_membership(&self, payload: &MembershipPayload) -> MirrorResult<SyncOutcome> {
        let member = &payload.public_user_data;
        let email = member.identifier.as_deref().filter(|i| i.contains('@'));

        let user_hint = UserHint {
            first_name: member.first_name.as_deref(),
            last_name: member.last_name.as_deref(),
            email,
            image_url: member.image_url.as_deref(),
        };
        let Some(user) = self.resolve_user(&member.user_id, user_hint).await? else {
            tracing::warn!(
                user_id = %member.user_id,
                membership_id = %payload.id,
                "Cannot upsert membership: user not found"
            );
            return Ok(SyncOutcome::skipped(SkipReason::UserNotFound));
        };

        let org = &payload.organization;
        let organization_hint = OrganizationHint {
            name: org.name.as_deref(),
            slug: org.slug.as_deref(),
            image_url: org.image_url.as_deref(),
            created_by: org.created_by.as_deref(),
        };
        let Some(organization) = self.resolve_organization(&org.id, organization_hint).await? else {
            tracing::warn!(
                organization_id = %org.id,
                membership_id = %payload.id,
                "Cannot upsert membership: organization not found"
            );
            return Ok(SyncOutcome::skipped(SkipReason::OrganizationNotFound));
        };

        let existing = match self.store.find_membership_by_external_id(&payload.id).await? {
            Some(membership) => Some(membership),
            None => self.store.find_membership(&user.id, &organization.id).await?,
        };

        let patch = MembershipPatch {
            user_id: Some(user.id.clone()),
            organization_id: Some(organization.id.clone()),
            role: Some(payload.role.clone()),
            external_id: Some(payload.id.clone()),
            created_at: payload.created_at.clone(),
            updated_at: payload.updated_at.clone(),
            public_user_data: serde_json::to_value(member).ok(),
            public_metadata: metadata::non_empty(payload.public_metadata.clone()),
            private_metadata: metadata::non_empty(payload.private_metadata.clone()),
        };

        match existing {
            Some(mut membership) => {
                membership.merge(patch);
                let membership = self.store.update_membership(&membership).await?;
                Ok(SyncOutcome::updated(membership.id))
            }
            None => {
                let mut membership = Membership::new(&user.id, &organization.id, &payload.role);
                membership.merge(patch);
                let membership = self.store.insert_membership(&membership).await?;
                Ok(SyncOutcome::created(membership.id))
            }
        }
    }

    /// Deletes a membership.
    ///
    /// Resolution order: provider id, composite `org_X:user_Y` id, then the
    /// organization and member embedded in the payload.
    pub async fn delete_membership(
        &self,
        payload: &MembershipDeletedPayload,
    ) -> MirrorResult<SyncOutcome> {
        if let Some(membership) = self.store.find_membership_by_external_id(&payload.id).await? {
            self.store.delete_membership(&membership.id).await?;
            return Ok(SyncOutcome::deleted(membership.id));
        }

        let pair = split_composite_id(&payload.id)
            .or_else(|| Some((payload.organization_id()?, payload.user_id()?)));
        let Some((organization_id, user_id)) = pair else {
            let reason = if payload.id.contains(':') {
                SkipReason::InvalidCompositeId
            } else {
                SkipReason::MembershipNotFound
            };
            tracing::warn!(membership_id = %payload.id, %reason, "Cannot resolve membership to delete");
            return Ok(SyncOutcome::skipped(reason));
        };

        let Some(organization) = self
            .store
            .find_organization_by_external_id(organization_id)
            .await?
        else {
            tracing::warn!(membership_id = %payload.id, organization_id, "Membership organization not found");
            return Ok(SyncOutcome::skipped(SkipReason::OrganizationNotFound));
        };
        let Some(user) = self.store.find_user_by_external_id(user_id).await? else {
            tracing::warn!(membership_id = %payload.id, user_id, "Membership user not found");
            return Ok(SyncOutcome::skipped(SkipReason::UserNotFound));
        };

        match self.store.find_membership(&user.id, &organization.id).await? {
            Some(membership) => {
                self.store.delete_membership(&membership.id).await?;
                Ok(SyncOutcome::deleted(membership.id))
            }
            None => {
                tracing::warn!(membership_id = %payload.id, "Membership not found");
                Ok(SyncOutcome::skipped(SkipReason::MembershipNotFound))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_composite_id() {
        assert_eq!(split_composite_id("org_ABC:user_XYZ"), Some(("org_ABC", "user_XYZ")));
        assert_eq!(split_composite_id("user_XYZ:org_ABC"), None);
        assert_eq!(split_composite_id("org_:user_"), None);
        assert_eq!(split_composite_id("orgmem_123"), None);
    }
}
