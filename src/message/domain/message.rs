//! The canonical message value object.
//!
//! Messages are immutable after creation and carry everything a consumer
//! needs to render or route a single unit of agent output.

use super::{MessageId, MessageKind, MessageMetadata};
use crate::agent::domain::AgentName;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Recipient value denoting a broadcast to every participant.
pub const BROADCAST: &str = "all";

/// A single unit of communication between participants.
///
/// # Invariants
///
/// - `sender` is non-empty
/// - `recipients` contains at least one entry and no entry is empty
/// - Messages cannot be modified after creation
///
/// # Examples
///
/// ```
/// use maestro::message::domain::{Message, MessageKind};
/// use mockable::DefaultClock;
///
/// let message = Message::builder("human")
///     .to("reviewer")
///     .with_content("Summarise the diff")
///     .build(&DefaultClock)
///     .expect("valid message");
///
/// assert_eq!(message.kind(), MessageKind::Chat);
/// assert_eq!(message.recipients(), ["reviewer"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    sender: String,
    recipients: Vec<String>,
    content: String,
    kind: MessageKind,
    timestamp: DateTime<Utc>,
    metadata: MessageMetadata,
}

impl Message {
    /// Creates a broadcast message from an agent.
    ///
    /// This constructor cannot fail: the sender is an already validated
    /// [`AgentName`] and the recipient list is `["all"]`.
    #[must_use]
    pub fn broadcast(
        sender: &AgentName,
        kind: MessageKind,
        content: impl Into<String>,
        metadata: MessageMetadata,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: MessageId::new(),
            sender: sender.as_str().to_owned(),
            recipients: vec![BROADCAST.to_owned()],
            content: content.into(),
            kind,
            timestamp: clock.utc(),
            metadata,
        }
    }

    /// Returns a builder for a message from `sender`.
    #[must_use]
    pub fn builder(sender: impl Into<String>) -> MessageBuilder {
        MessageBuilder::new(sender)
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the originating participant.
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the ordered recipient list.
    #[must_use]
    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    /// Returns `true` when the message is addressed to everyone.
    #[must_use]
    pub fn is_broadcast(&self) -> bool {
        self.recipients.iter().any(|recipient| recipient == BROADCAST)
    }

    /// Returns the text payload.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the message classification.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Returns the creation instant.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns the provider annotations.
    #[must_use]
    pub const fn metadata(&self) -> &MessageMetadata {
        &self.metadata
    }
}

/// Builder for messages whose sender or recipients come from outside the
/// core, such as a human operator submitting a task.
#[derive(Debug)]
pub struct MessageBuilder {
    sender: String,
    recipients: Vec<String>,
    content: String,
    kind: MessageKind,
    metadata: MessageMetadata,
}

impl MessageBuilder {
    /// Creates a builder for a chat message from `sender`.
    #[must_use]
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            recipients: Vec::new(),
            content: String::new(),
            kind: MessageKind::Chat,
            metadata: MessageMetadata::new(),
        }
    }

    /// Appends a recipient.
    #[must_use]
    pub fn to(mut self, recipient: impl Into<String>) -> Self {
        self.recipients.push(recipient.into());
        self
    }

    /// Addresses the message to every participant.
    #[must_use]
    pub fn broadcast(self) -> Self {
        self.to(BROADCAST)
    }

    /// Sets the text payload.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Sets the message classification.
    #[must_use]
    pub const fn with_kind(mut self, kind: MessageKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: MessageMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Builds the message.
    ///
    /// # Errors
    ///
    /// Returns [`MessageBuilderError::EmptySender`] when the sender is blank,
    /// [`MessageBuilderError::NoRecipients`] when no recipient was added, or
    /// [`MessageBuilderError::EmptyRecipient`] when a recipient is blank.
    pub fn build(self, clock: &impl Clock) -> Result<Message, MessageBuilderError> {
        let sender = self.sender.trim().to_owned();
        if sender.is_empty() {
            return Err(MessageBuilderError::EmptySender);
        }
        if self.recipients.is_empty() {
            return Err(MessageBuilderError::NoRecipients);
        }
        if let Some(index) = self
            .recipients
            .iter()
            .position(|recipient| recipient.trim().is_empty())
        {
            return Err(MessageBuilderError::EmptyRecipient(index));
        }

        Ok(Message {
            id: MessageId::new(),
            sender,
            recipients: self.recipients,
            content: self.content,
            kind: self.kind,
            timestamp: clock.utc(),
            metadata: self.metadata,
        })
    }
}

/// Errors that can occur when building a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageBuilderError {
    /// The sender is empty after trimming.
    #[error("message sender must not be empty")]
    EmptySender,

    /// No recipient was supplied.
    #[error("message must have at least one recipient")]
    NoRecipients,

    /// A recipient entry is empty after trimming.
    #[error("recipient at index {0} must not be empty")]
    EmptyRecipient(usize),
}
