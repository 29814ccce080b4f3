//! Event classification.
//!
//! [`ClerkEvent::decode`] turns a verified `(type, data)` pair into one
//! fully-typed variant. Recognized types with malformed data fail with
//! [`WebhookError::Validation`]; unrecognized types become
//! [`ClerkEvent::Unknown`].

use serde::de::DeserializeOwned;
use serde_json::Value;

use clerk_mirror_core::SessionStatus;

use crate::error::{WebhookError, WebhookResult};
use crate::payload::{
    DeletedPayload, InvitationPayload, MembershipDeletedPayload, MembershipPayload,
    OrganizationPayload, PermissionPayload, RolePayload, SessionPayload, UserPayload,
};

const SESSION_PREFIX: &str = "session.";

/// Session event action, taken from the event type suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEventKind {
    Created,
    Ended,
    Revoked,
    Removed,
    Pending,
    /// Any other `session.*` type.
    Other(String),
}

impl SessionEventKind {
    fn from_suffix(suffix: &str) -> Self {
        match suffix {
            "created" => Self::Created,
            "ended" => Self::Ended,
            "revoked" => Self::Revoked,
            "removed" => Self::Removed,
            "pending" => Self::Pending,
            other => Self::Other(other.to_string()),
        }
    }

    /// Status forced by the event type, overriding the payload status.
    pub fn forced_status(&self) -> Option<SessionStatus> {
        match self {
            Self::Ended => Some(SessionStatus::Ended),
            Self::Revoked => Some(SessionStatus::Revoked),
            Self::Removed => Some(SessionStatus::Removed),
            Self::Pending => Some(SessionStatus::Pending),
            Self::Created | Self::Other(_) => None,
        }
    }

    /// Returns true for actions that terminate a session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ended | Self::Revoked | Self::Removed)
    }

    /// Returns true if the event stamps `endedAt`.
    pub fn sets_ended_at(&self) -> bool {
        matches!(self, Self::Ended | Self::Revoked)
    }

    /// Terminal status used when ending an existing session.
    pub fn end_status(&self) -> SessionStatus {
        match self {
            Self::Revoked => SessionStatus::Revoked,
            Self::Removed => SessionStatus::Removed,
            _ => SessionStatus::Ended,
        }
    }
}

/// Invitation event action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvitationEventKind {
    Created,
    Accepted,
    Revoked,
}

/// A decoded webhook event.
#[derive(Debug, Clone, PartialEq)]
pub enum ClerkEvent {
    UserUpserted(UserPayload),
    UserDeleted(DeletedPayload),
    Session {
        kind: SessionEventKind,
        payload: SessionPayload,
    },
    OrganizationUpserted(OrganizationPayload),
    OrganizationDeleted(DeletedPayload),
    Invitation {
        kind: InvitationEventKind,
        payload: InvitationPayload,
    },
    MembershipUpserted(MembershipPayload),
    MembershipDeleted(MembershipDeletedPayload),
    PermissionUpserted(PermissionPayload),
    PermissionDeleted(DeletedPayload),
    RoleUpserted(RolePayload),
    RoleDeleted(DeletedPayload),
    /// A type the mirror does not act on.
    Unknown(String),
}

impl ClerkEvent {
    /// Classifies and decodes an event.
    pub fn decode(event_type: &str, data: &Value) -> WebhookResult<Self> {
        if let Some(suffix) = event_type.strip_prefix(SESSION_PREFIX) {
            return Ok(Self::Session {
                kind: SessionEventKind::from_suffix(suffix),
                payload: decode(event_type, data)?,
            });
        }

        let event = match event_type {
            "user.created" | "user.updated" => Self::UserUpserted(decode(event_type, data)?),
            "user.deleted" => Self::UserDeleted(decode(event_type, data)?),

            "organization.created" | "organization.updated" => {
                if is_deleted(data) {
                    Self::OrganizationDeleted(decode(event_type, data)?)
                } else {
                    Self::OrganizationUpserted(decode(event_type, data)?)
                }
            }
            "organization.deleted" => Self::OrganizationDeleted(decode(event_type, data)?),

            "organizationInvitation.created" => invitation(InvitationEventKind::Created, event_type, data)?,
            "organizationInvitation.accepted" => invitation(InvitationEventKind::Accepted, event_type, data)?,
            "organizationInvitation.revoked" => invitation(InvitationEventKind::Revoked, event_type, data)?,

            "organizationMembership.created" | "organizationMembership.updated" => {
                Self::MembershipUpserted(decode(event_type, data)?)
            }
            "organizationMembership.deleted" => Self::MembershipDeleted(decode(event_type, data)?),

            "permission.created" | "permission.updated" => {
                if is_deleted(data) {
                    Self::PermissionDeleted(decode(event_type, data)?)
                } else {
                    Self::PermissionUpserted(decode(event_type, data)?)
                }
            }
            "permission.deleted" => Self::PermissionDeleted(decode(event_type, data)?),

            "role.created" | "role.updated" => {
                if is_deleted(data) {
                    Self::RoleDeleted(decode(event_type, data)?)
                } else {
                    Self::RoleUpserted(decode(event_type, data)?)
                }
            }
            "role.deleted" => Self::RoleDeleted(decode(event_type, data)?),

            other => Self::Unknown(other.to_string()),
        };
        Ok(event)
    }

    /// Returns true for types the mirror does not act on.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

fn invitation(kind: InvitationEventKind, event_type: &str, data: &Value) -> WebhookResult<ClerkEvent> {
    let payload: InvitationPayload = decode(event_type, data)?;
    if payload.organization_external_id().is_none() {
        return Err(WebhookError::validation(
            event_type,
            "missing organization_id or organization.id",
        ));
    }
    Ok(ClerkEvent::Invitation { kind, payload })
}

fn is_deleted(data: &Value) -> bool {
    data.get("deleted").and_then(Value::as_bool) == Some(true)
}

fn decode<T: DeserializeOwned>(event_type: &str, data: &Value) -> WebhookResult<T> {
    if !data.is_object() {
        return Err(WebhookError::validation(event_type, "data is not an object"));
    }
    T::deserialize(data).map_err(|e| WebhookError::validation(event_type, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_prefix_routing() {
        let event = ClerkEvent::decode("session.revoked", &json!({"id": "sess_1"})).unwrap();
        match event {
            ClerkEvent::Session { kind, payload } => {
                assert_eq!(kind, SessionEventKind::Revoked);
                assert_eq!(kind.forced_status(), Some(SessionStatus::Revoked));
                assert!(kind.sets_ended_at());
                assert_eq!(payload.id, "sess_1");
            }
            other => panic!("unexpected {other:?}"),
        }

        let event = ClerkEvent::decode("session.touched", &json!({"id": "sess_1"})).unwrap();
        assert!(matches!(
            event,
            ClerkEvent::Session { kind: SessionEventKind::Other(ref s), .. } if s == "touched"
        ));
    }

    #[test]
    fn test_unknown_type() {
        let event = ClerkEvent::decode("foo.bar", &json!({"anything": 1})).unwrap();
        assert_eq!(event, ClerkEvent::Unknown("foo.bar".to_string()));
        assert!(event.is_unknown());
    }

    #[test]
    fn test_organization_delete_needs_only_id() {
        let event = ClerkEvent::decode("organization.deleted", &json!({"id": "org_1", "deleted": true})).unwrap();
        assert!(matches!(event, ClerkEvent::OrganizationDeleted(ref p) if p.id == "org_1"));

        let err = ClerkEvent::decode("organization.created", &json!({"id": "org_1"})).unwrap_err();
        assert!(matches!(err, WebhookError::Validation { .. }));
    }

    #[test]
    fn test_deleted_flag_on_role_update() {
        let event = ClerkEvent::decode("role.updated", &json!({"id": "role_1", "deleted": true})).unwrap();
        assert!(matches!(event, ClerkEvent::RoleDeleted(_)));
    }

    #[test]
    fn test_invitation_needs_organization() {
        let err = ClerkEvent::decode(
            "organizationInvitation.created",
            &json!({"id": "orginv_1", "email_address": "a@b.c", "role": "org:member"}),
        )
        .unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_non_object_data() {
        let err = ClerkEvent::decode("user.created", &json!("user_1")).unwrap_err();
        assert!(matches!(err, WebhookError::Validation { ref event_type, .. } if event_type == "user.created"));
    }
}
