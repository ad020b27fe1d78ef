use crate::core::backfill::{MessageSource, SourceError};
use crate::core::corpus::ChatMessage;
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Reads channel history through the bot's HTTP client.
pub struct SerenityMessageSource {
    http: Arc<serenity::Http>,
}

impl SerenityMessageSource {
    pub fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl MessageSource for SerenityMessageSource {
    async fn channel_name(&self, channel_id: u64) -> Result<Option<String>, SourceError> {
        // ChannelId::new panics on zero.
        if channel_id == 0 {
            return Ok(None);
        }

        let channel = serenity::ChannelId::new(channel_id)
            .to_channel(&self.http)
            .await
            .map_err(|e| SourceError::Request(e.to_string()))?;

        Ok(Some(
            channel
                .guild()
                .map(|c| c.name)
                .unwrap_or_else(|| channel_id.to_string()),
        ))
    }

    async fn fetch_page(
        &self,
        channel_id: u64,
        after: u64,
        limit: u8,
    ) -> Result<Vec<ChatMessage>, SourceError> {
        if channel_id == 0 {
            return Err(SourceError::Request("channel ID 0 is invalid".to_string()));
        }

        let builder = serenity::GetMessages::new()
            .after(serenity::MessageId::new(after.max(1)))
            .limit(limit);

        let messages = serenity::ChannelId::new(channel_id)
            .messages(&self.http, builder)
            .await
            .map_err(|e| SourceError::Request(e.to_string()))?;

        Ok(messages.iter().map(to_chat_message).collect())
    }
}

/// Translate a serenity message into the core's view of it.
pub fn to_chat_message(message: &serenity::Message) -> ChatMessage {
    ChatMessage {
        id: message.id.get(),
        channel_id: message.channel_id.get(),
        author_id: Some(message.author.id.get()),
        author_is_bot: message.author.bot,
        content: message.content.clone(),
        embed_count: message.embeds.len(),
        mentions: message.mentions.iter().map(|user| user.id.get()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_the_fields_the_core_needs() {
        let mut mentioned = serenity::User::default();
        mentioned.id = serenity::UserId::new(999);

        let mut message = serenity::Message::default();
        message.id = serenity::MessageId::new(1234);
        message.channel_id = serenity::ChannelId::new(55);
        message.author = serenity::User::default();
        message.author.id = serenity::UserId::new(7);
        message.author.bot = true;
        message.content = "<@999> hello".to_string();
        message.mentions = vec![mentioned];

        let chat = to_chat_message(&message);

        assert_eq!(chat.id, 1234);
        assert_eq!(chat.channel_id, 55);
        assert_eq!(chat.author_id, Some(7));
        assert!(chat.author_is_bot);
        assert_eq!(chat.content, "<@999> hello");
        assert_eq!(chat.embed_count, 0);
        assert!(chat.mentions_user(999));
    }
}
