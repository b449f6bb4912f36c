pub const TOP_LEVEL_DOMAIN: &str = "org";
pub const AUTHOR: &str = "cloudindex";
pub const APP_NAME: &str = "cloudindex";

pub const CLI_CONFIG_FILE_NAME: &str = "cloudindex.toml";
