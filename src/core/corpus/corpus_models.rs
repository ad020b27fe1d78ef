// Plain data types shared by backfill, live ingestion and storage.
// Discord snowflakes are kept as u64; they grow with time, so numeric
// order is message order.

/// One persisted message. `text` is always the raw Discord content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub channel_id: u64,
    pub message_id: u64,
    pub author_id: Option<u64>,
    pub text: String,
}

/// Platform-neutral snapshot of a Discord message.
///
/// Both the history fetcher and the gateway event handler translate
/// `serenity::Message` into this before handing it to the core.
#[derive(Debug, Clone, Default)]
pub struct ChatMessage {
    pub id: u64,
    pub channel_id: u64,
    pub author_id: Option<u64>,
    pub author_is_bot: bool,
    pub content: String,
    pub embed_count: usize,
    /// User IDs mentioned in the message.
    pub mentions: Vec<u64>,
}

impl ChatMessage {
    pub fn mentions_user(&self, user_id: u64) -> bool {
        self.mentions.contains(&user_id)
    }

    pub fn to_record(&self) -> MessageRecord {
        MessageRecord {
            channel_id: self.channel_id,
            message_id: self.id,
            author_id: self.author_id,
            text: self.content.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_raw_content() {
        let message = ChatMessage {
            id: 10,
            channel_id: 20,
            author_id: Some(30),
            content: "hi <@1>".to_string(),
            mentions: vec![1],
            ..Default::default()
        };

        let record = message.to_record();
        assert_eq!(record.channel_id, 20);
        assert_eq!(record.message_id, 10);
        assert_eq!(record.author_id, Some(30));
        assert_eq!(record.text, "hi <@1>");
        assert!(message.mentions_user(1));
        assert!(!message.mentions_user(2));
    }
}
