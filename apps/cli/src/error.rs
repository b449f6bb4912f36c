pub type Result<T> = color_eyre::Result<T>;

pub use color_eyre::eyre::WrapErr;
pub use color_eyre::eyre::OptionExt;
pub use color_eyre::eyre::eyre as error;
