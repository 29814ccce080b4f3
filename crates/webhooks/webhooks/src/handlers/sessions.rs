use clerk_mirror_core::{time, Merge, MirrorResult, Session, SessionPatch, SessionStatus};

use super::placeholder::UserHint;
use super::{EventContext, MirrorSync, SkipReason, SyncOutcome};
use crate::event::SessionEventKind;
use crate::payload::SessionPayload;
use crate::user_agent;

impl MirrorSync {
    /// Creates or updates a session from any `session.*` event.
    ///
    /// Payloads without an owner (typically removals) can only patch a
    /// session that is already mirrored.
    pub async fn upsert_session(
        &self,
        kind: &SessionEventKind,
        payload: &SessionPayload,
        context: &EventContext,
    ) -> MirrorResult<SyncOutcome> {
        if let SessionEventKind::Other(action) = kind {
            tracing::info!(session_id = %payload.id, action = %action, "Processing non-standard session event");
        }

        let Some(owner) = payload.user_external_id() else {
            if kind.is_terminal() {
                return self.end_session(&payload.id, kind).await;
            }
            return self.touch_session(kind, payload).await;
        };

        let embedded = payload.user.as_ref();
        let hint = UserHint {
            first_name: embedded.and_then(|u| u.first_name.as_deref()),
            last_name: embedded.and_then(|u| u.last_name.as_deref()),
            email: None,
            image_url: embedded.and_then(|u| u.image_url.as_deref()),
        };
        let Some(user) = self.resolve_user(owner, hint).await? else {
            tracing::warn!(session_id = %payload.id, user_id = owner, "Cannot upsert session: user not found");
            return Ok(SyncOutcome::skipped(SkipReason::UserNotFound));
        };

        let now = time::now();
        let status = kind
            .forced_status()
            .or_else(|| payload.status.clone().map(SessionStatus::from))
            .unwrap_or(SessionStatus::Active);

        // Structured fields win over the user-agent guess.
        let inferred = context.user_agent.as_deref().map(user_agent::classify);
        let device_type = payload
            .device_type()
            .map(str::to_string)
            .or_else(|| inferred.as_ref().map(|i| i.device_type.to_string()));
        let browser_name = payload
            .browser_name()
            .map(str::to_string)
            .or_else(|| inferred.as_ref().and_then(|i| i.browser_name).map(str::to_string));

        let patch = SessionPatch {
            user_id: Some(user.id.clone()),
            status: Some(status),
            created_at: payload.created_at.clone(),
            last_active_at: Some(payload.last_active_at.clone().unwrap_or_else(|| now.clone())),
            ended_at: kind.sets_ended_at().then(|| now.clone()),
            client_id: payload.client_id.clone(),
            device_type,
            browser_name,
            ip_address: payload
                .ip()
                .map(str::to_string)
                .or_else(|| context.client_ip.clone()),
        };

        match self.store.find_session_by_external_id(&payload.id).await? {
            Some(mut session) => {
                session.merge(patch);
                let session = self.store.update_session(&session).await?;
                Ok(SyncOutcome::updated(session.id))
            }
            None => {
                let created_at = payload.created_at.clone().unwrap_or(now);
                let mut session = Session::new(payload.id.clone(), user.id.clone(), created_at);
                session.merge(patch);
                let session = self.store.insert_session(&session).await?;
                Ok(SyncOutcome::created(session.id))
            }
        }
    }

    /// Patches status and activity of a mirrored session when the owner is unknown.
    async fn touch_session(
        &self,
        kind: &SessionEventKind,
        payload: &SessionPayload,
    ) -> MirrorResult<SyncOutcome> {
        let Some(mut session) = self.store.find_session_by_external_id(&payload.id).await? else {
            tracing::warn!(session_id = %payload.id, "Session event without user for an unknown session");
            return Ok(SyncOutcome::skipped(SkipReason::SessionNotFound));
        };

        session.merge(SessionPatch {
            status: kind
                .forced_status()
                .or_else(|| payload.status.clone().map(SessionStatus::from)),
            last_active_at: payload.last_active_at.clone(),
            client_id: payload.client_id.clone(),
            ip_address: payload.ip().map(str::to_string),
            ..Default::default()
        });
        let session = self.store.update_session(&session).await?;
        Ok(SyncOutcome::updated(session.id))
    }

    /// Marks a mirrored session as ended, revoked or removed.
    pub async fn end_session(
        &self,
        external_id: &str,
        kind: &SessionEventKind,
    ) -> MirrorResult<SyncOutcome> {
        let Some(mut session) = self.store.find_session_by_external_id(external_id).await? else {
            tracing::warn!(session_id = external_id, "Cannot end session: session not found");
            return Ok(SyncOutcome::skipped(SkipReason::SessionNotFound));
        };

        session.merge(SessionPatch {
            status: Some(kind.end_status()),
            ended_at: Some(time::now()),
            ..Default::default()
        });
        let session = self.store.update_session(&session).await?;
        Ok(SyncOutcome::updated(session.id))
    }
}
