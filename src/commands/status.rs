use std::time::UNIX_EPOCH;

use craftquiz::constants::{version::get_version, POISE_VERSION, STARTUP_TIME};
use poise::serenity_prelude as serenity;

use crate::{commands::get_bot_avatar, Context, Error};

/// affiche l'état du bot.
#[poise::command(slash_command)]
#[tracing::instrument(skip_all)]
pub async fn status(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();

    let active_games = data.games.count().await.inspect_err(
        |e| tracing::error!(err = ?e, "an error occurred when counting active games"),
    )?;

    let uptime = STARTUP_TIME
        .duration_since(UNIX_EPOCH)
        .map(|since| format!("<t:{}:R>", since.as_secs()))
        .unwrap_or_else(|_| "unknown".to_string());

    ctx.send(poise::CreateReply::default().embed(
        serenity::CreateEmbed::new()
        .field(
            "about the bot",
            "a minecraft crafting quiz: guess the crafted item from the grid, first correct answer wins. written using the [poise](https://github.com/serenity-rs/poise) framework.".to_string(),
            false
        )
        .field("version", get_version(), false)
        .field("rust", format!("[{0}](https://releases.rs/docs/{0})", rustc_version_runtime::version()), true)
        .field("poise", format!("[{0}](https://docs.rs/crate/poise/{0})", POISE_VERSION), true)
        .field("presets", data.presets.len().to_string(), true)
        .field("active games", active_games.to_string(), true)
        .field("auto challenges", if data.craft_generator.is_some() { "on" } else { "off" }, true)
        .field("render service", data.render_client.base_url(), true)
        .field("uptime", uptime, true)
        .thumbnail(get_bot_avatar(ctx))
    ))
    .await
    .inspect_err(|e| tracing::error!(err = ?e, "an error occurred when sending reply"))?;

    Ok(())
}
