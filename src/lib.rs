//! a minecraft crafting-grid guessing game for discord.
//!
//! the render service ([`server`]) composites item icons onto a crafting grid template;
//! the bot posts those grids and waits for someone to name the crafted item.

pub mod constants;
pub mod craft;
pub mod games;
pub mod models;
pub mod normalize;
pub mod presets;
pub mod render;
pub mod render_client;
pub mod server;
pub mod telemetry;

/// reads a boolean flag from the environment, falling back to `default` when unset or
/// unparseable.
pub fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                tracing::warn!(name, value = %value, "couldn't parse flag, using default");
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_with_fallback() {
        assert!(env_flag("CRAFTQUIZ_TEST_UNSET_FLAG", true));
        assert!(!env_flag("CRAFTQUIZ_TEST_UNSET_FLAG", false));

        std::env::set_var("CRAFTQUIZ_TEST_OFF_FLAG", " Off ");
        assert!(!env_flag("CRAFTQUIZ_TEST_OFF_FLAG", true));

        std::env::set_var("CRAFTQUIZ_TEST_ON_FLAG", "1");
        assert!(env_flag("CRAFTQUIZ_TEST_ON_FLAG", false));

        std::env::set_var("CRAFTQUIZ_TEST_BAD_FLAG", "perhaps");
        assert!(env_flag("CRAFTQUIZ_TEST_BAD_FLAG", true));
    }
}
