use env_logger::{Builder, Env};

/// Loads `.env` and starts the logger. `RUST_LOG` overrides the default `info` filter.
pub fn setup_env() {
    dotenvy::dotenv().ok();
    Builder::from_env(Env::default().default_filter_or("info")).init();
}

/// Turns a display name into the marketplace key format (`Mag Prime Systems` -> `mag_prime_systems`).
pub fn url_name(name: &str) -> String {
    name.trim().replace(' ', "_").to_lowercase()
}
