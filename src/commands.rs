use crate::Context;

pub mod craft;
pub mod help;
pub mod status;

pub(crate) fn get_bot_avatar(ctx: Context<'_>) -> String {
    ctx.cache().current_user().face()
}
