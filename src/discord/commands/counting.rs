// Discord commands for the keyword counter.
//
// **Notice the pattern:**
// 1. Extract primitive data from Discord types
// 2. Call core service
// 3. Format the response based on the result
//
// This layer is THIN - no business logic, just translation.

use crate::core::counting::{CountingService, LEADERBOARD_MAX};
use crate::core::watch::WatchService;
use crate::infra::counting::SqliteCounterStore;
use crate::infra::watch::JsonWatchStore;
use poise::serenity_prelude as serenity;

/// Get your movie counter.
#[poise::command(slash_command, rename = "my-count")]
pub async fn my_count(ctx: Context<'_>) -> Result<(), Error> {
    log_command_receipt(&ctx);

    let user_id = ctx.author().id.get();
    let keyword = ctx.data().counting.keyword().to_string();

    match ctx.data().counting.user_count(user_id).await? {
        Some(count) => {
            ctx.say(format!("You've said `{}` {} times!", keyword, count))
                .await?;
        }
        None => {
            ctx.say(format!("You haven't said `{}` in this channel yet!", keyword))
                .await?;
        }
    }

    Ok(())
}

/// All-time leaderboards for movie.
#[poise::command(slash_command)]
pub async fn leaderboard(ctx: Context<'_>) -> Result<(), Error> {
    log_command_receipt(&ctx);

    // Defer the response - resolving usernames may need HTTP round-trips
    ctx.defer().await?;

    let top = ctx.data().counting.leaderboard(LEADERBOARD_MAX).await?;
    tracing::info!("Found {} users for the leaderboard!", top.len());

    if top.is_empty() {
        let keyword = ctx.data().counting.keyword();
        ctx.say(format!("No one has said `{}` yet!", keyword)).await?;
        return Ok(());
    }

    let mut entries = Vec::with_capacity(top.len());
    for entry in &top {
        let username = resolve_username(&ctx, entry.user_id).await;
        entries.push((username, entry.count));
    }

    ctx.say(render_leaderboard(&entries)).await?;

    Ok(())
}

/// Render the leaderboard as the classic monospace block.
fn render_leaderboard(entries: &[(String, u64)]) -> String {
    let mut message = String::from(
        "```\nAll-Time MovieMadness Leaderboard:\n----------------------------------\n\n",
    );
    for (index, (username, count)) in entries.iter().enumerate() {
        message.push_str(&format!("{}. {} ({} times)\n", index + 1, username, count));
    }
    message.push_str("```\n");
    message
}

/// Resolve a user id to a readable tag, cache first to avoid HTTP calls.
async fn resolve_username(ctx: &Context<'_>, user_id: u64) -> String {
    let user_id_s = serenity::UserId::from(user_id);

    if let Some(user) = ctx.serenity_context().cache.user(user_id_s) {
        return user.tag();
    }

    if let Ok(user) = ctx.serenity_context().http.get_user(user_id_s).await {
        return user.tag();
    }

    // Final fallback: return a mention so it's still obvious who the entry is
    format!("<@{}>", user_id)
}

/// Log who invoked a command and where.
pub(crate) fn log_command_receipt(ctx: &Context<'_>) {
    let guild_name = ctx
        .guild()
        .map(|g| g.name.clone())
        .unwrap_or_else(|| "DM".to_string());

    tracing::info!(
        "Got /{} in {}@{} from {}",
        ctx.command().qualified_name,
        guild_name,
        ctx.channel_id(),
        ctx.author().name
    );
}

/// Type alias for our bot's context.
/// This is what every command receives as its first parameter.
pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Data that's shared across all commands.
/// This is where we store our services and configuration.
use std::sync::Arc;

pub struct Data {
    pub counting: Arc<CountingService<SqliteCounterStore>>,
    pub watch: Arc<WatchService<JsonWatchStore>>,
}
