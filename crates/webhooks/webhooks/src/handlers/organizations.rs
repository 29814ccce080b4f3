use clerk_mirror_core::types::metadata;
use clerk_mirror_core::{Merge, MirrorResult, Organization, OrganizationPatch};

use super::{MirrorSync, SkipReason, SyncOutcome};
use crate::payload::OrganizationPayload;

impl MirrorSync {
    /// Creates or updates an organization.
    pub async fn upsert_organization(
        &self,
        payload: &OrganizationPayload,
    ) -> MirrorResult<SyncOutcome> {
        let patch = OrganizationPatch {
            name: Some(payload.name.clone()),
            slug: payload.slug.clone().filter(|s| !s.is_empty()),
            image_url: payload.image_url.clone().filter(|s| !s.is_empty()),
            logo_url: payload.logo_url.clone().filter(|s| !s.is_empty()),
            created_by: payload.created_by.clone().filter(|s| !s.is_empty()),
            created_at: payload.created_at.clone(),
            updated_at: payload.updated_at.clone(),
            public_metadata: metadata::non_empty(payload.public_metadata.clone()),
            private_metadata: metadata::non_empty(payload.private_metadata.clone()),
        };

        match self
            .store
            .find_organization_by_external_id(&payload.id)
            .await?
        {
            Some(mut organization) => {
                organization.merge(patch);
                if metadata::clear_placeholder(&mut organization.public_metadata) {
                    tracing::info!(external_id = %payload.id, "Placeholder organization reconciled");
                }
                let organization = self.store.update_organization(&organization).await?;
                Ok(SyncOutcome::updated(organization.id))
            }
            None => {
                let mut organization = Organization::new(payload.id.clone(), payload.name.clone());
                organization.merge(patch);
                let organization = self.store.insert_organization(&organization).await?;
                Ok(SyncOutcome::created(organization.id))
            }
        }
    }

    /// Deletes an organization and, first, every membership in it.
    ///
    /// A crash halfway leaves some memberships removed; re-running the same
    /// deletion finishes the job.
    pub async fn delete_organization(&self, external_id: &str) -> MirrorResult<SyncOutcome> {
        let Some(organization) = self
            .store
            .find_organization_by_external_id(external_id)
            .await?
        else {
            tracing::warn!(external_id, "Can't delete organization, none mirrored for this id");
            return Ok(SyncOutcome::skipped(SkipReason::OrganizationNotFound));
        };

        let memberships = self
            .store
            .list_memberships_by_organization(&organization.id)
            .await?;
        for membership in &memberships {
            self.store.delete_membership(&membership.id).await?;
        }
        self.store.delete_organization(&organization.id).await?;

        tracing::info!(
            external_id,
            memberships = memberships.len(),
            "Organization deleted with its memberships"
        );
        Ok(SyncOutcome::deleted(organization.id))
    }
}
