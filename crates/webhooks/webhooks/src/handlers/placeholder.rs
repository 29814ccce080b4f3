//! Placeholder users and organizations for out-of-order deliveries.
//!
//! A membership or session can arrive before the `user.created` or
//! `organization.created` event it refers to. The handler then inserts a
//! minimal record flagged with `isPlaceholder` in its public metadata; the
//! first full upsert for the same provider id fills it in and clears the flag.

use clerk_mirror_core::types::metadata;
use clerk_mirror_core::{MirrorError, MirrorResult, Organization, User};

use super::MirrorSync;
use crate::payload::join_name;

/// Fragmentary user data carried by a dependent payload.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct UserHint<'a> {
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub image_url: Option<&'a str>,
}

/// Fragmentary organization data carried by a dependent payload.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct OrganizationHint<'a> {
    pub name: Option<&'a str>,
    pub slug: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub created_by: Option<&'a str>,
}

impl MirrorSync {
    /// Finds a user by provider id, synthesizing a placeholder when allowed.
    pub(crate) async fn resolve_user(
        &self,
        external_id: &str,
        hint: UserHint<'_>,
    ) -> MirrorResult<Option<User>> {
        if let Some(user) = self.store.find_user_by_external_id(external_id).await? {
            return Ok(Some(user));
        }
        if !self.options.synthesize_placeholders {
            return Ok(None);
        }

        let name = join_name(hint.first_name, hint.last_name)
            .or_else(|| hint.email.map(str::to_string))
            .unwrap_or_else(|| external_id.to_string());
        let mut user = User::new(external_id, name);
        user.first_name = hint.first_name.map(str::to_string);
        user.last_name = hint.last_name.map(str::to_string);
        user.email = hint.email.map(str::to_string);
        user.image_url = hint.image_url.map(str::to_string);
        user.public_metadata = Some(metadata::placeholder());

        match self.store.insert_user(&user).await {
            Ok(user) => {
                tracing::info!(external_id, "Created placeholder user");
                Ok(Some(user))
            }
            // Lost a race against another delivery creating the same user.
            Err(MirrorError::Duplicate { .. }) => {
                self.store.find_user_by_external_id(external_id).await
            }
            Err(e) => Err(e),
        }
    }

    /// Finds an organization by provider id, synthesizing a placeholder when allowed.
    pub(crate) async fn resolve_organization(
        &self,
        external_id: &str,
        hint: OrganizationHint<'_>,
    ) -> MirrorResult<Option<Organization>> {
        if let Some(organization) = self
            .store
            .find_organization_by_external_id(external_id)
            .await?
        {
            return Ok(Some(organization));
        }
        if !self.options.synthesize_placeholders {
            return Ok(None);
        }

        let name = hint
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or(external_id);
        let mut organization = Organization::new(external_id, name);
        organization.slug = hint.slug.map(str::to_string);
        organization.image_url = hint.image_url.map(str::to_string);
        organization.created_by = hint.created_by.map(str::to_string);
        organization.public_metadata = Some(metadata::placeholder());

        match self.store.insert_organization(&organization).await {
            Ok(organization) => {
                tracing::info!(external_id, "Created placeholder organization");
                Ok(Some(organization))
            }
            Err(MirrorError::Duplicate { .. }) => {
                self.store.find_organization_by_external_id(external_id).await
            }
            Err(e) => Err(e),
        }
    }
}
