use clerk_mirror_core::types::metadata;
use clerk_mirror_core::{
    time, Merge, MirrorResult, Permission, PermissionPatch, Role, RolePatch,
};

use super::{MirrorSync, SkipReason, SyncOutcome};
use crate::payload::{EmbeddedPermission, PermissionPayload, RolePayload};

/// Type given to permissions first seen embedded in a role.
const DEFAULT_PERMISSION_TYPE: &str = "system";

impl MirrorSync {
    /// Creates or updates a permission.
    pub async fn upsert_permission(&self, payload: &PermissionPayload) -> MirrorResult<SyncOutcome> {
        let now = time::now();
        let patch = PermissionPatch {
            key: Some(payload.key.clone()),
            name: Some(payload.name.clone()),
            permission_type: Some(payload.permission_type.clone()),
            created_at: payload.created_at.clone(),
            description: payload.description.clone(),
            updated_at: Some(payload.updated_at.clone().unwrap_or_else(|| now.clone())),
            public_metadata: metadata::non_empty(payload.public_metadata.clone()),
            private_metadata: metadata::non_empty(payload.private_metadata.clone()),
        };

        match self.store.find_permission_by_external_id(&payload.id).await? {
            Some(mut permission) => {
                permission.merge(patch);
                let permission = self.store.update_permission(&permission).await?;
                Ok(SyncOutcome::updated(permission.id))
            }
            None => {
                let mut permission = Permission::new(
                    payload.id.clone(),
                    payload.key.clone(),
                    payload.name.clone(),
                    payload.permission_type.clone(),
                    payload.created_at.clone().unwrap_or(now),
                );
                permission.merge(patch);
                let permission = self.store.insert_permission(&permission).await?;
                Ok(SyncOutcome::created(permission.id))
            }
        }
    }

    /// Deletes a permission by provider id.
    ///
    /// Roles keep the provider id in `permission_external_ids`.
    pub async fn delete_permission(&self, external_id: &str) -> MirrorResult<SyncOutcome> {
        match self.store.find_permission_by_external_id(external_id).await? {
            Some(permission) => {
                self.store.delete_permission(&permission.id).await?;
                Ok(SyncOutcome::deleted(permission.id))
            }
            None => {
                tracing::warn!(external_id, "Can't delete permission, none mirrored for this id");
                Ok(SyncOutcome::skipped(SkipReason::PermissionNotFound))
            }
        }
    }

    /// Creates or updates a role, upserting each embedded permission first.
    ///
    /// A present `permissions` array (even an empty one) replaces the stored
    /// references; an absent one keeps them.
    pub async fn upsert_role(&self, payload: &RolePayload) -> MirrorResult<SyncOutcome> {
        let (permission_ids, permission_external_ids) = match &payload.permissions {
            Some(embedded) => {
                let mut ids = Vec::with_capacity(embedded.len());
                let mut external_ids = Vec::with_capacity(embedded.len());
                for permission in embedded {
                    ids.push(self.ensure_permission(permission).await?);
                    external_ids.push(permission.id.clone());
                }
                (Some(ids), Some(external_ids))
            }
            None => (None, None),
        };

        let now = time::now();
        let patch = RolePatch {
            key: Some(payload.key.clone()),
            name: Some(payload.name.clone()),
            created_at: payload.created_at.clone(),
            description: payload.description.clone(),
            is_creator_eligible: payload.is_creator_eligible,
            updated_at: Some(payload.updated_at.clone().unwrap_or_else(|| now.clone())),
            permission_ids,
            permission_external_ids,
            public_metadata: metadata::non_empty(payload.public_metadata.clone()),
            private_metadata: metadata::non_empty(payload.private_metadata.clone()),
        };

        match self.store.find_role_by_external_id(&payload.id).await? {
            Some(mut role) => {
                role.merge(patch);
                let role = self.store.update_role(&role).await?;
                Ok(SyncOutcome::updated(role.id))
            }
            None => {
                let mut role = Role::new(
                    payload.id.clone(),
                    payload.key.clone(),
                    payload.name.clone(),
                    payload.created_at.clone().unwrap_or(now),
                );
                role.merge(patch);
                let role = self.store.insert_role(&role).await?;
                Ok(SyncOutcome::created(role.id))
            }
        }
    }

    /// Deletes a role by provider id.
    pub async fn delete_role(&self, external_id: &str) -> MirrorResult<SyncOutcome> {
        match self.store.find_role_by_external_id(external_id).await? {
            Some(role) => {
                self.store.delete_role(&role.id).await?;
                Ok(SyncOutcome::deleted(role.id))
            }
            None => {
                tracing::warn!(external_id, "Can't delete role, none mirrored for this id");
                Ok(SyncOutcome::skipped(SkipReason::RoleNotFound))
            }
        }
    }

    /// Upserts a permission embedded in a role and returns its local id.
    async fn ensure_permission(&self, embedded: &EmbeddedPermission) -> MirrorResult<String> {
        let patch = PermissionPatch {
            key: embedded.key.clone(),
            name: embedded.name.clone(),
            permission_type: embedded.permission_type.clone(),
            created_at: embedded.created_at.clone(),
            description: embedded.description.clone(),
            updated_at: embedded.updated_at.clone(),
            ..Default::default()
        };

        if let Some(mut permission) = self
            .store
            .find_permission_by_external_id(&embedded.id)
            .await?
        {
            permission.merge(patch);
            let permission = self.store.update_permission(&permission).await?;
            return Ok(permission.id);
        }

        let key = embedded.key.clone().unwrap_or_else(|| embedded.id.clone());
        let name = embedded.name.clone().unwrap_or_else(|| key.clone());
        let mut permission = Permission::new(
            embedded.id.clone(),
            key,
            name,
            DEFAULT_PERMISSION_TYPE,
            embedded.created_at.clone().unwrap_or_else(time::now),
        );
        permission.merge(patch);
        let permission = self.store.insert_permission(&permission).await?;
        tracing::debug!(external_id = %embedded.id, "Created permission embedded in role");
        Ok(permission.id)
    }
}
