// This is the entry point of the Markov bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (SQLite, Discord history)
// - `discord/` = Discord-specific adapters (commands, events)
//
// This file's job is to:
// 1. Load configuration
// 2. Open the corpus and create the model (dependency injection)
// 3. Set up the Discord framework
// 4. Kick off the history backfill, then start reacting to live messages

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::backfill::BackfillService;
use crate::core::ingestion::{backfill_then_load, IngestionReaction, MessageDispatcher, ReplyReaction};
use crate::core::markov::MarkovService;
use crate::core::settings::MarkovSettings;
use crate::discord::commands::presence;
use crate::discord::{Data, Error};
use crate::infra::corpus::SqliteCorpusStore;
use crate::infra::history::SerenityMessageSource;
use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Event handler for non-command Discord events.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        discord::events::handle_message(ctx, new_message, data).await;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let token = std::env::var("DISCORD_TOKEN").context(
        "Missing DISCORD_TOKEN environment variable! Create a .env file with your bot token.",
    )?;
    let settings = Arc::new(MarkovSettings::from_env()?);
    if settings.listen_channels.is_empty() {
        tracing::warn!("MARKOV_LISTEN_CHANNELS is empty; the bot will not learn anything");
    }

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // The corpus is the source of truth; the model is rebuilt from it on
    // every start. Failing to open the corpus is fatal.

    let corpus = Arc::new(
        SqliteCorpusStore::new(&settings.database_path)
            .await
            .with_context(|| format!("Failed to open corpus at {}", settings.database_path))?,
    );
    let markov = Arc::new(MarkovService::new(settings.max_words));

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read message content
        | serenity::GatewayIntents::GUILDS;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                discord::commands::markov::markov(),
                discord::commands::markov::markovstats(),
            ],
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                tracing::info!("Bot is starting up as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                presence::on_ready(ctx, settings.listen_channels.len());

                let bot_id = ready.user.id.get();

                // Backfill runs in the background; the model is bulk loaded
                // only after every channel's walk has stopped.
                let backfill = BackfillService::new(
                    Arc::clone(&corpus),
                    Arc::new(SerenityMessageSource::new(ctx.http.clone())),
                    bot_id,
                );
                let backfill_store = Arc::clone(&corpus);
                let backfill_markov = Arc::clone(&markov);
                let channels = settings.listen_channels.clone();
                tokio::spawn(async move {
                    match backfill_then_load(&backfill, &*backfill_store, &backfill_markov, &channels)
                        .await
                    {
                        Ok((report, lines)) => tracing::info!(
                            saved = report.total_saved(),
                            failed_channels = report.failed.len(),
                            lines,
                            "Markov model ready"
                        ),
                        Err(e) => tracing::error!("Failed to load Markov model from corpus: {}", e),
                    }
                });

                // Live reactions are installed after backfill has been issued.
                let mut dispatcher = MessageDispatcher::new();
                dispatcher.register(IngestionReaction::new(
                    Arc::clone(&corpus),
                    Arc::clone(&markov),
                    Arc::clone(&settings),
                ));
                dispatcher.register(ReplyReaction::new(
                    Arc::clone(&markov),
                    Arc::clone(&settings),
                    bot_id,
                ));

                tracing::info!("🚀 Bot is ready!");
                Ok(Data {
                    corpus,
                    markov,
                    settings,
                    dispatcher,
                })
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .context("Error creating client")?;

    client.start().await.context("Error running bot")?;
    Ok(())
}
