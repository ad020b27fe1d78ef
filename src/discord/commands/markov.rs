// Discord commands for the Markov generator.
//
// Same pattern as every other command file: pull primitives out of the
// interaction, call the core service, format the answer.

use crate::core::corpus::CorpusStore;
use crate::core::sanitizer::sanitize;
use crate::discord::events::clamp_to_limit;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

/// Discord rejects embed field values longer than this.
const EMBED_FIELD_LIMIT: usize = 1024;

/// Generate a sentence from the learned channel history.
#[poise::command(slash_command)]
pub async fn markov(
    ctx: Context<'_>,
    #[description = "Word to start the sentence with"] seed: Option<String>,
) -> Result<(), Error> {
    let seed = seed.as_deref().and_then(normalize_seed);
    let sentence = ctx.data().markov.generate(seed.as_deref()).await;

    ctx.say(reply_text(&sentence)).await?;
    Ok(())
}

/// Show how much history the generator has learned from.
#[poise::command(slash_command)]
pub async fn markovstats(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let stats = data.markov.stats().await;
    let stored = match data.corpus.count().await {
        Ok(count) => count.to_string(),
        Err(e) => {
            tracing::error!("Failed to count corpus records: {}", e);
            "unknown".to_string()
        }
    };

    let channels = channel_list(&data.settings.listen_channels);

    let embed = serenity::CreateEmbed::new()
        .title("🦜 Markov Stats")
        .field("Stored messages", stored, true)
        .field("Lines learned", stats.lines.to_string(), true)
        .field("Distinct words", stats.words.to_string(), true)
        .field("Transitions", stats.transitions.to_string(), true)
        .field("Max sentence length", data.markov.max_words().to_string(), true)
        .field("Listening to", channels, false)
        .color(0x5865F2) // Blurple
        .timestamp(serenity::Timestamp::now());

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

fn reply_text(sentence: &str) -> String {
    if sentence.is_empty() {
        "I haven't learned any words yet. 🤐".to_string()
    } else {
        clamp_to_limit(sentence)
    }
}

/// Channel mentions for the stats embed, cut short with "…and N more" so the
/// field stays under Discord's limit.
fn channel_list(ids: &[u64]) -> String {
    if ids.is_empty() {
        return "none".to_string();
    }

    let mut list = String::new();
    for (shown, id) in ids.iter().enumerate() {
        let mention = format!("<#{}>", id);
        let left = ids.len() - shown - 1;
        let reserve = if left > 0 { more_suffix(left).len() } else { 0 };
        let separator = if list.is_empty() { 0 } else { 2 };

        if list.len() + separator + mention.len() + reserve > EMBED_FIELD_LIMIT {
            let suffix = more_suffix(ids.len() - shown);
            list.push_str(suffix.trim_start_matches(", "));
            break;
        }
        if separator > 0 {
            list.push_str(", ");
        }
        list.push_str(&mention);
    }
    list
}

fn more_suffix(count: usize) -> String {
    format!(", …and {} more", count)
}

/// First word of the sanitized seed option, if any.
fn normalize_seed(raw: &str) -> Option<String> {
    sanitize(raw).split_whitespace().next().map(str::to_string)
}
