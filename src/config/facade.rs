//! Loads [`HostConfig`] from layered sources.

use super::{merge, sources, HostConfig};
use crate::error::ConfigError;
use std::path::Path;
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for `dir`.
    ///
    /// Precedence (lowest to highest): defaults, global config file,
    /// `<dir>/framehost.toml`, `FRAMEHOST__*` environment variables.
    pub fn load(dir: &Path) -> Result<HostConfig, ConfigError> {
        let mut builder = merge::merge_policy::builder_with_defaults()?;
        builder = sources::global_file::add_to_builder(builder)?;
        builder = sources::local_file::add_to_builder(builder, dir)?;
        builder = sources::environment::add_to_builder(builder);

        Self::finish(builder)
    }

    /// Load a single file over the defaults. The file must exist.
    pub fn load_from_file(path: &Path) -> Result<HostConfig, ConfigError> {
        let builder = merge::merge_policy::builder_with_defaults()?
            .add_source(config::File::from(path).required(true));

        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<HostConfig, ConfigError> {
        let config: HostConfig = builder.build()?.try_deserialize()?;

        config.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ConfigError::Invalid(error_msgs.join("\n"))
        })?;

        debug!(thread_name = %config.runner.thread_name, "Configuration loaded");
        Ok(config)
    }
}
