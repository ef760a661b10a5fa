use craftquiz::{
    constants::{
        embeds::{
            AUTO_CHALLENGE_COLOR, AUTO_CHALLENGE_FOOTER, AUTO_CHALLENGE_TITLE,
            CHALLENGE_DESCRIPTION, MANUAL_CHALLENGE_COLOR, MANUAL_CHALLENGE_FOOTER,
            MANUAL_CHALLENGE_TITLE,
        },
        grid::{ATTACHMENT_NAME, SLOT_COUNT},
    },
    models::game::ActiveGame,
};
use poise::serenity_prelude::{
    self as serenity, ChannelId, CreateAttachment, CreateEmbed, CreateEmbedFooter, CreateMessage,
    Timestamp,
};

use crate::Data;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChallengeOutcome {
    Started,
    /// someone else started a game in the channel while this one was rendering.
    AlreadyRunning,
}

fn challenge_embed(auto_generated: bool) -> CreateEmbed {
    let (title, color, footer) = if auto_generated {
        (AUTO_CHALLENGE_TITLE, AUTO_CHALLENGE_COLOR, AUTO_CHALLENGE_FOOTER)
    } else {
        (MANUAL_CHALLENGE_TITLE, MANUAL_CHALLENGE_COLOR, MANUAL_CHALLENGE_FOOTER)
    };

    CreateEmbed::new()
        .title(title)
        .description(CHALLENGE_DESCRIPTION)
        .image(format!("attachment://{ATTACHMENT_NAME}"))
        .color(color)
        .footer(CreateEmbedFooter::new(footer))
        .timestamp(Timestamp::now())
}

/// renders the grid, claims the channel, and posts the challenge.
#[tracing::instrument(skip(ctx, data, slots))]
pub async fn start_challenge(
    ctx: &serenity::Context,
    data: &Data,
    channel_id: ChannelId,
    answer: &str,
    slots: &[Option<String>; SLOT_COUNT],
    auto_generated: bool,
) -> anyhow::Result<ChallengeOutcome> {
    let resolved = slots
        .each_ref()
        .map(|slot| data.presets.resolve(slot.as_deref()));

    let image = data.render_client.render(&resolved).await?;

    let game = ActiveGame::new(answer, image.url.clone(), auto_generated);
    if !data.games.insert_if_absent(channel_id.get(), game).await? {
        tracing::info!("a game started in this channel while rendering, dropping this one");
        return Ok(ChallengeOutcome::AlreadyRunning);
    }

    let sent = channel_id
        .send_message(
            ctx,
            CreateMessage::new()
                .embed(challenge_embed(auto_generated))
                .add_file(CreateAttachment::bytes(image.bytes, ATTACHMENT_NAME)),
        )
        .await
        .inspect_err(|e| tracing::error!(err = ?e, "an error occurred when sending challenge"));

    if let Err(e) = sent {
        data.games.delete(channel_id.get()).await?;
        return Err(e.into());
    }

    tracing::info!(url = %image.url, auto_generated, "started a new challenge");

    Ok(ChallengeOutcome::Started)
}
