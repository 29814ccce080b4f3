use clerk_mirror_core::types::metadata;
use clerk_mirror_core::{Merge, MirrorResult, User, UserPatch};

use super::{MirrorSync, SkipReason, SyncOutcome};
use crate::payload::UserPayload;

const SUPER_ADMIN_FLAG: &str = "isSuperAdmin";
const SUPER_USER_FLAG: &str = "isSuperUser";

fn user_patch(payload: &UserPayload) -> UserPatch {
    let email = payload.primary_email();
    UserPatch {
        name: Some(payload.display_name()),
        first_name: payload.first_name.clone(),
        last_name: payload.last_name.clone(),
        email: email.map(|e| e.email_address.clone()),
        username: payload.username.clone(),
        image_url: payload.image_url.clone(),
        profile_image_url: payload.profile_image_url.clone(),
        created_at: payload.created_at.clone(),
        updated_at: payload.updated_at.clone(),
        last_sign_in_at: payload.last_sign_in_at.clone(),
        email_verified: email.map(|e| e.is_verified()),
        has_password: payload.password_enabled,
        two_factor_enabled: payload.two_factor_enabled,
        is_super_admin: payload.metadata_flag(SUPER_ADMIN_FLAG),
        is_super_user: payload.metadata_flag(SUPER_USER_FLAG),
        public_metadata: metadata::non_empty(payload.public_metadata.clone()),
        private_metadata: metadata::non_empty(payload.private_metadata.clone()),
    }
}

impl MirrorSync {
    /// Creates or updates a user from a `user.created`/`user.updated` payload.
    pub async fn upsert_user(&self, payload: &UserPayload) -> MirrorResult<SyncOutcome> {
        let patch = user_patch(payload);

        match self.store.find_user_by_external_id(&payload.id).await? {
            Some(mut user) => {
                user.merge(patch);
                if metadata::clear_placeholder(&mut user.public_metadata) {
                    tracing::info!(external_id = %payload.id, "Placeholder user reconciled");
                }
                let user = self.store.update_user(&user).await?;
                tracing::debug!(external_id = %payload.id, "User updated");
                Ok(SyncOutcome::updated(user.id))
            }
            None => {
                let mut user = User::new(payload.id.clone(), payload.display_name());
                user.merge(patch);
                let user = self.store.insert_user(&user).await?;
                tracing::debug!(external_id = %payload.id, "User created");
                Ok(SyncOutcome::created(user.id))
            }
        }
    }

    /// Deletes a user by provider id.
    pub async fn delete_user(&self, external_id: &str) -> MirrorResult<SyncOutcome> {
        match self.store.find_user_by_external_id(external_id).await? {
            Some(user) => {
                self.store.delete_user(&user.id).await?;
                Ok(SyncOutcome::deleted(user.id))
            }
            None => {
                tracing::warn!(external_id, "Can't delete user, none mirrored for this id");
                Ok(SyncOutcome::skipped(SkipReason::UserNotFound))
            }
        }
    }
}
