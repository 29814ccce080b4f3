use clerk_mirror_core::types::metadata;
use clerk_mirror_core::{
    time, Invitation, InvitationPatch, InvitationStatus, Merge, MirrorResult, Organization,
};

use super::{EventContext, MirrorSync, SkipReason, SyncOutcome};
use crate::event::InvitationEventKind;
use crate::payload::InvitationPayload;

fn invitation_status(kind: InvitationEventKind, payload: &InvitationPayload) -> InvitationStatus {
    match kind {
        InvitationEventKind::Accepted => InvitationStatus::Accepted,
        InvitationEventKind::Revoked => InvitationStatus::Revoked,
        InvitationEventKind::Created => payload
            .status
            .clone()
            .map(InvitationStatus::from)
            .unwrap_or(InvitationStatus::Pending),
    }
}

impl MirrorSync {
    /// Creates or updates an invitation.
    ///
    /// Unlike memberships, an invitation for an unknown organization is
    /// skipped rather than backed by a placeholder.
    pub async fn upsert_invitation(
        &self,
        kind: InvitationEventKind,
        payload: &InvitationPayload,
        context: &EventContext,
    ) -> MirrorResult<SyncOutcome> {
        let Some(organization_id) = payload.organization_external_id() else {
            return Ok(SyncOutcome::skipped(SkipReason::OrganizationNotFound));
        };
        let Some(organization) = self
            .store
            .find_organization_by_external_id(organization_id)
            .await?
        else {
            tracing::warn!(
                invitation_id = %payload.id,
                organization_id,
                "Cannot upsert invitation: organization not found"
            );
            return Ok(SyncOutcome::skipped(SkipReason::OrganizationNotFound));
        };

        let now = time::now();
        let creator = self.resolve_inviter(payload, &organization, context).await?;
        let patch = InvitationPatch {
            organization_id: Some(organization.id.clone()),
            email: Some(payload.email_address.clone()),
            status: Some(invitation_status(kind, payload)),
            role: Some(payload.role.clone()),
            created_at: payload.created_at.clone(),
            updated_at: Some(payload.updated_at.clone().unwrap_or_else(|| now.clone())),
            created_by_user_id: creator,
            org_external_id: Some(organization.external_id.clone()),
            public_metadata: metadata::non_empty(payload.public_metadata.clone()),
            private_metadata: metadata::non_empty(payload.private_metadata.clone()),
            public_user_data: payload.public_user_data.clone(),
        };

        match self
            .store
            .find_invitation_by_external_id(&payload.id)
            .await?
        {
            Some(mut invitation) => {
                invitation.merge(patch);
                let invitation = self.store.update_invitation(&invitation).await?;
                Ok(SyncOutcome::updated(invitation.id))
            }
            None => {
                let created_at = payload.created_at.clone().unwrap_or(now);
                let mut invitation = Invitation::new(
                    payload.id.clone(),
                    organization.id.clone(),
                    payload.email_address.clone(),
                    payload.role.clone(),
                    created_at,
                );
                invitation.merge(patch);
                let invitation = self.store.insert_invitation(&invitation).await?;
                Ok(SyncOutcome::created(invitation.id))
            }
        }
    }

    /// Deletes an invitation by provider id.
    pub async fn delete_invitation(&self, external_id: &str) -> MirrorResult<SyncOutcome> {
        match self.store.find_invitation_by_external_id(external_id).await? {
            Some(invitation) => {
                self.store.delete_invitation(&invitation.id).await?;
                Ok(SyncOutcome::deleted(invitation.id))
            }
            None => {
                tracing::warn!(external_id, "Can't delete invitation, none mirrored for this id");
                Ok(SyncOutcome::skipped(SkipReason::InvitationNotFound))
            }
        }
    }

    /// Resolves the local id of the inviting user.
    ///
    /// Tries the embedded user data, then the organization's creator, then an
    /// active session seen from the request's client IP. Leaves it unset otherwise.
    async fn resolve_inviter(
        &self,
        payload: &InvitationPayload,
        organization: &Organization,
        context: &EventContext,
    ) -> MirrorResult<Option<String>> {
        if let Some(inviter) = payload.inviter_external_id() {
            if let Some(user) = self.store.find_user_by_external_id(inviter).await? {
                return Ok(Some(user.id));
            }
        }

        if let Some(creator) = organization.created_by.as_deref() {
            if let Some(user) = self.store.find_user_by_external_id(creator).await? {
                return Ok(Some(user.id));
            }
        }

        if let Some(ip) = context.client_ip.as_deref() {
            let sessions = self.store.list_sessions_by_ip(ip).await?;
            if let Some(session) = sessions.iter().rev().find(|s| s.is_active()) {
                tracing::debug!(invitation_id = %payload.id, ip, "Inviter matched by session IP");
                return Ok(Some(session.user_id.clone()));
            }
        }

        Ok(None)
    }
}
