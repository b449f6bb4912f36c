pub mod constants;

pub use etcetera::AppStrategy;
use etcetera::{AppStrategyArgs, choose_app_strategy};

use std::env;
use std::path::PathBuf;

/// Overrides the directory holding the CLI configuration file
pub const CONFIG_DIR_ENV: &str = "CLOUDINDEX_CONFIG_DIR";

pub fn create_strategy() -> std::result::Result<impl AppStrategy, etcetera::HomeDirError> {
    choose_app_strategy(AppStrategyArgs {
        top_level_domain: constants::TOP_LEVEL_DOMAIN.to_string(),
        author: constants::AUTHOR.to_string(),
        app_name: constants::APP_NAME.to_string(),
    })
}

/// Environment variable first, then the platform strategy, then the temp dir.
pub fn resolve_dir<S, F>(env_key: &str, strategy: &S, strategy_fn: F) -> PathBuf
where
    S: AppStrategy,
    F: FnOnce(&S) -> Option<PathBuf>,
{
    env::var_os(env_key)
        .map(PathBuf::from)
        .or_else(|| strategy_fn(strategy))
        .unwrap_or_else(|| env::temp_dir().join(constants::APP_NAME))
}

pub fn cli_config_path() -> std::result::Result<PathBuf, etcetera::HomeDirError> {
    let strategy = create_strategy()?;
    let dir = resolve_dir(CONFIG_DIR_ENV, &strategy, |s| Some(s.config_dir()));
    Ok(dir.join(constants::CLI_CONFIG_FILE_NAME))
}
