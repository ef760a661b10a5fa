use std::sync::Arc;

use craftquiz::{
    constants::STARTUP_TIME, craft::CraftGenerator, games::GameStore, presets::PresetTable,
    render_client::RenderClient,
};
use poise::serenity_prelude as serenity;

#[derive(Clone)]
struct Data {
    presets: Arc<PresetTable>,
    games: Arc<dyn GameStore>,
    render_client: RenderClient,
    /// `None` when mention-triggered challenges are turned off.
    craft_generator: Option<CraftGenerator>,
}

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

mod challenge;
mod commands;
mod handlers;
mod init;

#[tracing::instrument(skip_all)]
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::Message { new_message } = event {
        if new_message.author.bot {
            return Ok(());
        }

        if let Some(generator) = &data.craft_generator {
            if new_message.mentions_user_id(framework.bot_id) {
                let _ = handlers::mention_handler(ctx, data, generator, new_message).await;
                return Ok(());
            }
        }

        let _ = handlers::answer_handler(ctx, data, new_message).await;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let _ = &*STARTUP_TIME;

    let mut client = init::init().await?;

    client.start().await.inspect_err(
        |e| tracing::error!(err = ?e, "an error occurred when running the discord client"),
    )?;

    Ok(())
}
