pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory under the home directory holding `config.toml` and color map files.
pub const CONFIG_DIR: &str = ".config/recolor";

pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const DEFAULT_COLOR_MAP: &str = "railjet";

pub const DEFAULT_THRESHOLD: &str = "65";
