// Live message handling: hand every gateway message to the core dispatcher
// and post whatever the reactions produce.

use crate::discord::Data;
use crate::infra::history::to_chat_message;
use poise::serenity_prelude as serenity;

/// Discord rejects messages longer than this many characters.
const DISCORD_MESSAGE_LIMIT: usize = 2000;

pub async fn handle_message(ctx: &serenity::Context, message: &serenity::Message, data: &Data) {
    let chat = to_chat_message(message);

    for outgoing in data.dispatcher.dispatch(&chat).await {
        // Empty model -> empty sentence; Discord won't accept an empty message.
        if outgoing.content.trim().is_empty() {
            tracing::debug!(
                channel_id = outgoing.channel_id,
                "Skipping empty generated reply"
            );
            continue;
        }

        let content = clamp_to_limit(&outgoing.content);
        if let Err(e) = serenity::ChannelId::new(outgoing.channel_id)
            .say(&ctx.http, content)
            .await
        {
            tracing::error!("Failed to send generated reply: {}", e);
        }
    }
}

/// Cut text down to what fits in a single Discord message.
pub fn clamp_to_limit(content: &str) -> String {
    content.chars().take(DISCORD_MESSAGE_LIMIT).collect()
}
