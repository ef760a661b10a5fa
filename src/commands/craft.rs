use craftquiz::normalize::normalize;

use crate::{
    challenge::{start_challenge, ChallengeOutcome},
    handlers::{ALREADY_RUNNING, RENDER_FAILED},
    Context, Error,
};

async fn reply_ephemeral(ctx: Context<'_>, content: &str) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .ephemeral(true)
            .content(content),
    )
    .await
    .inspect_err(|e| tracing::error!(err = ?e, "an error occurred when sending reply"))?;

    Ok(())
}

/// créer un défi de craft minecraft.
///
/// chaque slot accepte un nom de preset, une url d'image, ou `null` pour le laisser vide.
#[allow(clippy::too_many_arguments)]
#[poise::command(
    slash_command,
    rename = "daily-item",
    guild_only,
    default_member_permissions = "ADMINISTRATOR"
)]
#[tracing::instrument(skip_all, fields(channel_id = %ctx.channel_id()))]
pub async fn daily_item(
    ctx: Context<'_>,
    #[description = "Item à trouver (ex: Épée en diamant)"] tofind: String,
    #[description = "URL/preset slot 1 (ou null)"] slot1: Option<String>,
    #[description = "URL/preset slot 2 (ou null)"] slot2: Option<String>,
    #[description = "URL/preset slot 3 (ou null)"] slot3: Option<String>,
    #[description = "URL/preset slot 4 (ou null)"] slot4: Option<String>,
    #[description = "URL/preset slot 5 (ou null)"] slot5: Option<String>,
    #[description = "URL/preset slot 6 (ou null)"] slot6: Option<String>,
    #[description = "URL/preset slot 7 (ou null)"] slot7: Option<String>,
    #[description = "URL/preset slot 8 (ou null)"] slot8: Option<String>,
    #[description = "URL/preset slot 9 (ou null)"] slot9: Option<String>,
) -> Result<(), Error> {
    ctx.defer_ephemeral()
        .await
        .inspect_err(|e| tracing::error!(err = ?e, "an error occurred when deferring reply"))?;

    if normalize(&tofind).is_empty() {
        return reply_ephemeral(ctx, "❌ La réponse à trouver ne peut pas être vide.").await;
    }

    let channel_id = ctx.channel_id();

    if ctx.data().games.get(channel_id.get()).await?.is_some() {
        return reply_ephemeral(ctx, ALREADY_RUNNING).await;
    }

    let slots = [slot1, slot2, slot3, slot4, slot5, slot6, slot7, slot8, slot9];

    match start_challenge(
        ctx.serenity_context(),
        ctx.data(),
        channel_id,
        &tofind,
        &slots,
        false,
    )
    .await
    {
        Ok(ChallengeOutcome::Started) => {
            reply_ephemeral(ctx, "✅ Image générée ! Le défi a été envoyé dans le salon.").await
        }
        Ok(ChallengeOutcome::AlreadyRunning) => reply_ephemeral(ctx, ALREADY_RUNNING).await,
        Err(e) => {
            tracing::error!(err = ?e, "an error occurred when starting challenge");
            reply_ephemeral(ctx, RENDER_FAILED).await
        }
    }
}
