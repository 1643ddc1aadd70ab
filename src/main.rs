// This is the entry point of the Discord bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (databases, files)
// - `discord/` = Discord-specific adapters (commands, events)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register commands and event handlers

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::counting::CountingService;
use crate::core::watch::WatchService;
use crate::discord::{Data, Error};
use crate::infra::counting::SqliteCounterStore;
use crate::infra::watch::JsonWatchStore;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

/// Event handler for non-command Discord events.
/// This is where incoming messages are tallied against the keyword.
async fn event_handler(
    _ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        // Ignore bot messages (including our own)
        if new_message.author.bot {
            return Ok(());
        }

        // Only messages in the configured watch channel count
        let watch_channel = match data.watch.watch_channel().await {
            Ok(Some(channel_id)) => channel_id,
            Ok(None) => {
                tracing::warn!("Watch channel has not been set yet!");
                return Ok(());
            }
            Err(e) => {
                tracing::error!("Failed to read watch channel: {}", e);
                return Ok(());
            }
        };
        if new_message.channel_id.get() != watch_channel {
            return Ok(());
        }

        let user_id = new_message.author.id.get();
        match data
            .counting
            .record_message(user_id, &new_message.content)
            .await
        {
            Ok(0) => {
                // No occurrence of the keyword - nothing to do
            }
            Ok(occurrences) => {
                tracing::info!(
                    "[{} in <#{}>]: \"{}\" ({} occurrence(s))",
                    new_message.author.name,
                    new_message.channel_id,
                    new_message.content,
                    occurrences
                );
            }
            Err(e) => {
                // Log it but don't crash - the next message gets a fresh try
                tracing::error!("Error recording message for {}: {}", user_id, e);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Get Discord bot token from environment
    let token = std::env::var("DISCORD_TOKEN").expect(
        "Missing DISCORD_TOKEN environment variable! Create a .env file with your bot token.",
    );

    // Keep runtime state in a dedicated folder so the repo root stays tidy.
    let data_dir = "data";
    std::fs::create_dir_all(data_dir).expect("Failed to create data directory");
    let counters_db_path = format!("{}/counters.db", data_dir);
    let watch_config_path = format!("{}/watch_channel.json", data_dir);

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Create our services with their dependencies.
    // This is the "composition root" where we wire everything together.

    // Create the SQLite-backed counter store
    let counter_store = SqliteCounterStore::new(&counters_db_path)
        .await
        .expect("Failed to initialize SQLite store");
    let counting_service = Arc::new(CountingService::new(counter_store));

    // Create the JSON-backed watch channel store
    let watch_store = JsonWatchStore::new(&watch_config_path);
    let watch_service = Arc::new(WatchService::new(watch_store));

    // Create the data structure that will be shared across all commands
    let data = Data {
        counting: Arc::clone(&counting_service),
        watch: Arc::clone(&watch_service),
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================
    // Configure the poise framework with our commands and settings.

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT; // Required to read message content

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            // Register all our commands here
            commands: vec![
                discord::commands::watch::set_movie_channel(),
                discord::commands::counting::my_count(),
                discord::commands::counting::leaderboard(),
            ],
            // Event handler for messages and other events
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                tracing::info!("Bot logged in as {}", ready.user.tag());

                // Register slash commands globally (can take up to an hour to propagate).
                // For faster development, use register_in_guild instead.
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tracing::info!("Commands registered!");

                // Announce where we're listening, or nag until someone configures it
                match data.watch.watch_channel().await {
                    Ok(Some(channel_id)) => tracing::info!(
                        "Listening for \"{}\" in <#{}>",
                        data.counting.keyword(),
                        channel_id
                    ),
                    Ok(None) => tracing::warn!("Watch channel has not yet been set!"),
                    Err(e) => tracing::error!("Failed to read watch channel: {}", e),
                }

                Ok(data)
            })
        })
        .build();

    // Create the client and start the bot
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .expect("Error creating client");

    client.start().await.expect("Error running bot");
}
