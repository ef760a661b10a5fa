use semver::Version;

const UPDATE_NAMES: [&str; 8] = [
    "Pretty Scary Update",
    "Redstone Update",
    "Horse Update",
    "Bountiful Update",
    "Combat Update",
    "Village & Pillage",
    "Caves & Cliffs",
    "Trails & Tales",
];

pub fn get_version() -> String {
    let semver = env!("CARGO_PKG_VERSION").parse::<Version>();

    if let Ok(semver) = semver {
        let name = UPDATE_NAMES[((semver.major + semver.minor) as usize) % UPDATE_NAMES.len()];

        if env!("VERGEN_GIT_SHA") == "VERGEN_IDEMPOTENT_OUTPUT" {
            format!("{} - {}", semver, name)
        } else {
            format!("{} - {} [`{}`]", semver, name, env!("VERGEN_GIT_SHA"))
        }
    } else {
        tracing::warn!("couldn't parse a semver out of Cargo.toml? defaulting to 0.0.0-unknown.");
        String::from("0.0.0-unknown - No Version Name")
    }
}
