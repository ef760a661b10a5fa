use craftquiz::{
    constants::embeds::{WINNER_COLOR, WINNER_FOOTER, WINNER_TITLE},
    craft::CraftGenerator,
    games::check_answer,
};
use poise::serenity_prelude::{
    self as serenity, CreateAllowedMentions, CreateEmbed, CreateEmbedFooter, CreateMessage,
    Mentionable, Message, MessageReference, Timestamp,
};

use crate::{
    challenge::{start_challenge, ChallengeOutcome},
    Data,
};

pub const ALREADY_RUNNING: &str = "⚠️ Un défi est déjà en cours dans ce salon !";
pub const RENDER_FAILED: &str = "❌ Erreur lors de la génération de l'image.";

async fn reply(
    ctx: &serenity::Context,
    new_message: &Message,
    message: CreateMessage,
) -> anyhow::Result<Message> {
    let msg = new_message
        .channel_id
        .send_message(
            ctx,
            message
                .reference_message(MessageReference::from(new_message))
                .allowed_mentions(CreateAllowedMentions::new().replied_user(false)),
        )
        .await
        .inspect_err(|e| tracing::error!(err = ?e, "an error occurred when sending reply"))?;

    Ok(msg)
}

async fn reply_text(
    ctx: &serenity::Context,
    new_message: &Message,
    content: &str,
) -> anyhow::Result<Message> {
    reply(ctx, new_message, CreateMessage::default().content(content)).await
}

#[tracing::instrument(skip_all, fields(channel_id = %new_message.channel_id))]
pub async fn mention_handler(
    ctx: &serenity::Context,
    data: &Data,
    generator: &CraftGenerator,
    new_message: &Message,
) -> anyhow::Result<()> {
    let channel_id = new_message.channel_id;

    if data.games.get(channel_id.get()).await?.is_some() {
        reply_text(ctx, new_message, ALREADY_RUNNING).await?;
        return Ok(());
    }

    reply_text(
        ctx,
        new_message,
        "🤖 Génération d'un craft automatique avec Gemini...",
    )
    .await?;

    let craft = match generator.generate(&data.presets).await {
        Ok(craft) => craft,
        Err(e) => {
            tracing::warn!(err = ?e, "couldn't generate a craft");
            reply_text(ctx, new_message, "❌ Impossible de générer un craft. Réessayez !").await?;
            return Ok(());
        }
    };

    match start_challenge(ctx, data, channel_id, &craft.answer, &craft.slots, true).await {
        Ok(ChallengeOutcome::Started) => {}
        Ok(ChallengeOutcome::AlreadyRunning) => {
            reply_text(ctx, new_message, ALREADY_RUNNING).await?;
        }
        Err(e) => {
            tracing::error!(err = ?e, "an error occurred when starting automatic challenge");
            reply_text(ctx, new_message, RENDER_FAILED).await?;
        }
    }

    Ok(())
}

#[tracing::instrument(skip_all, fields(channel_id = %new_message.channel_id))]
pub async fn answer_handler(
    ctx: &serenity::Context,
    data: &Data,
    new_message: &Message,
) -> anyhow::Result<()> {
    let Some(game) = check_answer(
        data.games.as_ref(),
        new_message.channel_id.get(),
        &new_message.content,
    )
    .await
    .inspect_err(|e| tracing::error!(err = ?e, "an error occurred when checking answer"))?
    else {
        return Ok(());
    };

    tracing::info!(
        user_id = %new_message.author.id,
        answer = %game.display_answer,
        "challenge solved"
    );

    let embed = CreateEmbed::new()
        .title(WINNER_TITLE)
        .description(format!(
            "**{}** a trouvé la bonne réponse !\n\n✨ **Réponse :** {}",
            new_message.author.mention(),
            new_message.content.trim()
        ))
        .color(WINNER_COLOR)
        .thumbnail(new_message.author.face())
        .footer(CreateEmbedFooter::new(WINNER_FOOTER))
        .timestamp(Timestamp::now());

    reply(ctx, new_message, CreateMessage::new().embed(embed)).await?;

    Ok(())
}
