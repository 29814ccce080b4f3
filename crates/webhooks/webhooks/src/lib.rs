//! # Clerk Mirror Webhooks
//!
//! Inbound webhook pipeline for the mirror:
//! - Svix signature verification
//! - Typed payload decoding per event category
//! - Idempotent upsert/delete handlers with placeholder reconciliation
//! - Audit log of every verified delivery
//!
//! ## Example
//!
//! ```rust,ignore
//! use clerk_mirror_webhooks::{SyncOptions, WebhookConfig, WebhookHeaders, WebhookProcessor};
//!
//! let config = WebhookConfig::new().with_secret("whsec_...");
//! let processor = WebhookProcessor::from_config(&config, SyncOptions::default(), store)?;
//!
//! let headers = WebhookHeaders::new(svix_id, svix_timestamp, svix_signature);
//! let response = processor.handle(&headers, &body).await;
//! assert_eq!(response.status, 200);
//! ```

mod audit;
mod config;
mod error;
mod event;
mod handlers;
mod processor;
mod receiver;
mod signature;

pub mod payload;
pub mod user_agent;

pub use audit::{AuditLog, DEFAULT_OBJECT_LIMIT, DEFAULT_RECENT_LIMIT, DEFAULT_TYPE_LIMIT};
pub use config::{SyncOptions, WebhookConfig, DEFAULT_TOLERANCE_SECS};
pub use error::{WebhookError, WebhookResult};
pub use event::{ClerkEvent, InvitationEventKind, SessionEventKind};
pub use handlers::{split_composite_id, EventContext, MirrorSync, SkipReason, SyncOutcome};
pub use processor::{WebhookProcessor, WebhookResponse};
pub use receiver::{
    EventAttributes, HttpRequestAttributes, WebhookEnvelope, WebhookHeaders, WebhookReceiver,
    SVIX_ID, SVIX_SIGNATURE, SVIX_TIMESTAMP,
};
pub use signature::{SignatureError, WebhookSigner};
