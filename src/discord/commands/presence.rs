// Bot presence - tells members what the bot is keeping an eye on.

use poise::serenity_prelude as serenity;

/// Called once the bot is ready so the presence is set in one place.
pub fn on_ready(ctx: &serenity::Context) {
    let activity = serenity::ActivityData::watching("for protected mentions");
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}
