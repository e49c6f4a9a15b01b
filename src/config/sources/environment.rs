//! Environment source: FRAMEHOST__RUNNER__THREAD_NAME -> runner.thread_name

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(Environment::with_prefix("FRAMEHOST").separator("__"))
}
