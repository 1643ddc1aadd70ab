// The admin-facing command that picks where the counter listens.

use super::counting::{log_command_receipt, Context, Error};

/// Set channel for movie counter.
#[poise::command(
    slash_command,
    guild_only,
    rename = "set-movie-channel",
    default_member_permissions = "MANAGE_ROLES"
)]
pub async fn set_movie_channel(ctx: Context<'_>) -> Result<(), Error> {
    log_command_receipt(&ctx);

    // The channel the command was invoked in becomes the watch channel.
    let channel_id = ctx.channel_id().get();
    ctx.data().watch.set_watch_channel(channel_id).await?;

    // Read back so the confirmation reflects what was actually stored
    let stored = ctx
        .data()
        .watch
        .watch_channel()
        .await?
        .unwrap_or(channel_id);
    let keyword = ctx.data().counting.keyword();

    tracing::info!("Now listening for the term \"{}\" in <#{}>", keyword, stored);
    ctx.say(format!("Will now listen for `{}` in <#{}> !", keyword, stored))
        .await?;

    Ok(())
}
