//! Index keys for the mirrored record types.

use clerk_mirror_core::schema::indexes::*;
use clerk_mirror_core::types::{
    Invitation, Membership, Organization, Permission, Role, Session, User, WebhookEvent,
};

use crate::table::{compose, Indexed};

impl Indexed for User {
    const ENTITY: &'static str = "user";

    fn id(&self) -> &str {
        &self.id
    }

    fn index_key(&self, index: &str) -> Option<String> {
        match index {
            BY_EXTERNAL_ID => Some(self.external_id.clone()),
            BY_EMAIL => self.email.clone(),
            _ => None,
        }
    }
}

impl Indexed for Organization {
    const ENTITY: &'static str = "organization";

    fn id(&self) -> &str {
        &self.id
    }

    fn index_key(&self, index: &str) -> Option<String> {
        match index {
            BY_EXTERNAL_ID => Some(self.external_id.clone()),
            _ => None,
        }
    }
}

impl Indexed for Membership {
    const ENTITY: &'static str = "organizationMembership";

    fn id(&self) -> &str {
        &self.id
    }

    fn index_key(&self, index: &str) -> Option<String> {
        match index {
            BY_EXTERNAL_ID => self.external_id.clone(),
            BY_USER => Some(self.user_id.clone()),
            BY_ORGANIZATION => Some(self.organization_id.clone()),
            BY_USER_AND_ORGANIZATION => Some(compose(&[&self.user_id, &self.organization_id])),
            _ => None,
        }
    }
}

impl Indexed for Invitation {
    const ENTITY: &'static str = "organizationInvitation";

    fn id(&self) -> &str {
        &self.id
    }

    fn index_key(&self, index: &str) -> Option<String> {
        match index {
            BY_EXTERNAL_ID => Some(self.external_id.clone()),
            BY_ORGANIZATION => Some(self.organization_id.clone()),
            BY_EMAIL => Some(self.email.clone()),
            BY_ORGANIZATION_AND_STATUS => {
                Some(compose(&[&self.organization_id, self.status.as_str()]))
            }
            _ => None,
        }
    }
}

impl Indexed for Session {
    const ENTITY: &'static str = "session";

    fn id(&self) -> &str {
        &self.id
    }

    fn index_key(&self, index: &str) -> Option<String> {
        match index {
            BY_EXTERNAL_ID => Some(self.external_id.clone()),
            BY_USER => Some(self.user_id.clone()),
            BY_USER_AND_STATUS => Some(compose(&[&self.user_id, self.status.as_str()])),
            BY_IP_ADDRESS => self.ip_address.clone(),
            _ => None,
        }
    }
}

impl Indexed for Permission {
    const ENTITY: &'static str = "permission";

    fn id(&self) -> &str {
        &self.id
    }

    fn index_key(&self, index: &str) -> Option<String> {
        match index {
            BY_EXTERNAL_ID => Some(self.external_id.clone()),
            BY_KEY => Some(self.key.clone()),
            _ => None,
        }
    }
}

impl Indexed for Role {
    const ENTITY: &'static str = "role";

    fn id(&self) -> &str {
        &self.id
    }

    fn index_key(&self, index: &str) -> Option<String> {
        match index {
            BY_EXTERNAL_ID => Some(self.external_id.clone()),
            BY_KEY => Some(self.key.clone()),
            _ => None,
        }
    }
}

impl Indexed for WebhookEvent {
    const ENTITY: &'static str = "webhookEvent";

    fn id(&self) -> &str {
        &self.id
    }

    fn index_key(&self, index: &str) -> Option<String> {
        match index {
            BY_EVENT_ID => Some(self.event_id.clone()),
            BY_OBJECT_ID if !self.object_id.is_empty() => Some(self.object_id.clone()),
            BY_EVENT_TYPE => Some(self.event_type.clone()),
            BY_TIMESTAMP => Some(self.timestamp.clone()),
            _ => None,
        }
    }
}
