use std::{sync::Arc, time::Duration};

use craftquiz::{
    constants::{DEFAULT_GEMINI_MODEL, DEFAULT_PRESETS_PATH, DEFAULT_RENDER_API_URL},
    craft::CraftGenerator,
    env_flag,
    games::{GameStore, MemoryGameStore, SqliteGameStore},
    presets::PresetTable,
    render_client::RenderClient,
    telemetry,
};
use poise::serenity_prelude::{self as serenity, *};
use tracing::Instrument;

use crate::{commands, event_handler, Data};

async fn init_presets() -> anyhow::Result<PresetTable> {
    if !env_flag("CRAFT_PRESETS_ENABLED", true) {
        tracing::warn!("presets are disabled. slot values will be used as literal urls.");
        return Ok(PresetTable::default());
    }

    let path = std::env::var("PRESETS_PATH").unwrap_or_else(|_| DEFAULT_PRESETS_PATH.to_string());
    let presets = PresetTable::load_or_create(&path).await?;

    Ok(presets)
}

async fn init_game_store() -> anyhow::Result<Arc<dyn GameStore>> {
    match std::env::var("DATABASE_URL") {
        Ok(db_url) => {
            let store = SqliteGameStore::connect(&db_url).await?;
            Ok(Arc::new(store))
        }
        Err(_) => {
            tracing::warn!("no DATABASE_URL found. active games will be lost on restart.");
            Ok(Arc::new(MemoryGameStore::new()))
        }
    }
}

fn init_craft_generator(presets: &PresetTable) -> anyhow::Result<Option<CraftGenerator>> {
    if !env_flag("CRAFT_AUTO_TRIGGER", true) {
        tracing::warn!("automatic challenges are disabled.");
        return Ok(None);
    }

    let Ok(api_key) = std::env::var("GEMINI_API_KEY") else {
        tracing::warn!("no GEMINI_API_KEY found. automatic challenges will be disabled.");
        return Ok(None);
    };

    if presets.is_empty() {
        tracing::warn!("no presets available. automatic challenges will be disabled.");
        return Ok(None);
    }

    let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()?;

    tracing::info!(model = %model, "automatic challenges enabled");

    Ok(Some(CraftGenerator::new(client, api_key, model)))
}

async fn init_discord_client(token: &str, data: Data) -> anyhow::Result<Client> {
    let intents =
        serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::craft::daily_item(),
                commands::help::help(),
                commands::status::status(),
            ],
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                tracing::info!(user = %ready.user.name, "connected to discord");

                poise::builtins::register_globally(ctx, &framework.options().commands)
                    .await
                    .inspect_err(|e| tracing::error!(err = ?e, "an error occurred when registering commands"))?;

                Ok(data)
            }.in_current_span())
        })
        .build();

    let client = ClientBuilder::new(token, intents)
        .framework(framework)
        .activity(serenity::ActivityData {
            name: "deviner des crafts".into(),
            kind: serenity::ActivityType::Playing,
            state: None,
            url: None,
        })
        .await?;

    if let Some(application_id) = std::env::var("DISCORD_APPLICATION_ID")
        .ok()
        .and_then(|id| id.parse::<u64>().ok())
    {
        client.http.set_application_id(ApplicationId::new(application_id));
    }

    Ok(client)
}

pub async fn init() -> anyhow::Result<Client> {
    let token = std::env::var("DISCORD_TOKEN").expect("missing DISCORD_TOKEN");

    telemetry::init_telemetry("craftquiz")
        .map_err(|e| anyhow::anyhow!("failed to initialize telemetry: {e}"))?;

    tracing::info!("initializing... please wait warmly.");

    let presets = init_presets().await?;
    let games = init_game_store().await?;
    let craft_generator = init_craft_generator(&presets)?;

    let render_api_url =
        std::env::var("RENDER_API_URL").unwrap_or_else(|_| DEFAULT_RENDER_API_URL.to_string());
    tracing::info!("using render service at {}", render_api_url);
    let render_client = RenderClient::new(reqwest::Client::new(), render_api_url);

    let data = Data {
        presets: Arc::new(presets),
        games,
        render_client,
        craft_generator,
    };

    let client = init_discord_client(&token, data).await?;

    tracing::info!("finished initializing!");
    Ok(client)
}
