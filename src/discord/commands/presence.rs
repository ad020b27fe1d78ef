// This module handles bot presence.
//
// Discord-layer glue only: it turns the pipeline's configuration into an
// activity line so people can see what the bot is learning from.

use poise::serenity_prelude as serenity;

/// Text shown under the bot's name.
pub fn status_text(listen_channels: usize) -> String {
    match listen_channels {
        0 => "nobody (no channels configured)".to_string(),
        1 => "1 channel".to_string(),
        n => format!("{} channels", n),
    }
}

/// Called once the bot is ready so the presence reflects the configured channels.
pub fn on_ready(ctx: &serenity::Context, listen_channels: usize) {
    let activity = serenity::ActivityData::listening(status_text(listen_channels));
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_text_pluralizes() {
        assert_eq!(status_text(0), "nobody (no channels configured)");
        assert_eq!(status_text(1), "1 channel");
        assert_eq!(status_text(3), "3 channels");
    }
}
