pub const MANUAL_CHALLENGE_COLOR: u32 = 0x2ecc71;
pub const AUTO_CHALLENGE_COLOR: u32 = 0xe74c3c;
pub const WINNER_COLOR: u32 = 0xf1c40f;

pub const MANUAL_CHALLENGE_TITLE: &str = "🎮 Défi Craft Minecraft";
pub const AUTO_CHALLENGE_TITLE: &str = "🎮 Défi Craft Automatique";
pub const CHALLENGE_DESCRIPTION: &str =
    "**Trouvez l'item crafté !**\n\nSoyez le premier à donner la bonne réponse dans le chat !";
pub const MANUAL_CHALLENGE_FOOTER: &str = "Bonne chance !";
pub const AUTO_CHALLENGE_FOOTER: &str = "Généré par Gemini AI";

pub const WINNER_TITLE: &str = "🎉 Félicitations !";
pub const WINNER_FOOTER: &str = "Bravo champion !";
