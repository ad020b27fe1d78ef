// Fan-out of live messages to every registered reaction.
//
// Reactions receive an immutable message and may only touch shared state
// through the corpus store and Markov service they were built with. Anything
// they want sent back to Discord is returned, not sent directly.

use crate::core::corpus::ChatMessage;
use async_trait::async_trait;
use std::sync::Arc;

/// A message a reaction wants posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub channel_id: u64,
    pub content: String,
}

#[async_trait]
pub trait MessageReaction: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    async fn on_message(&self, message: &ChatMessage) -> Option<OutgoingMessage>;
}

#[derive(Default)]
pub struct MessageDispatcher {
    reactions: Vec<Arc<dyn MessageReaction>>,
}

impl MessageDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, reaction: impl MessageReaction + 'static) {
        tracing::debug!("Registered message reaction: {}", reaction.name());
        self.reactions.push(Arc::new(reaction));
    }

    /// Deliver the message to every reaction in registration order and
    /// collect whatever they want sent.
    pub async fn dispatch(&self, message: &ChatMessage) -> Vec<OutgoingMessage> {
        let mut outgoing = Vec::new();
        for reaction in &self.reactions {
            if let Some(reply) = reaction.on_message(message).await {
                tracing::debug!(
                    reaction = reaction.name(),
                    channel_id = reply.channel_id,
                    "Reaction produced a message"
                );
                outgoing.push(reply);
            }
        }
        outgoing
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }
}
