use crate::config;

/// Runs before logging exists, so problems go to stderr while the terminal
/// is still ours.
pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("overture: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            eprintln!("overture: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
