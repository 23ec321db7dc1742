use config::Config;
use log::info;
use sse::Manager;
use std::sync::Arc;

pub mod config;
pub mod logging;

/// Builds the process-wide broadcast hub from the configured SSE settings.
pub fn init_sse_manager(config: &Config) -> Arc<Manager> {
    let hub_config = config.hub_config();
    info!(
        "SSE hub config: channel_capacity={}, slow_subscriber_policy={}, keep_alive={}s",
        hub_config.channel_capacity(),
        hub_config.policy(),
        config.sse_keep_alive_secs,
    );

    Arc::new(Manager::new(hub_config))
}

// Service-level state containing only infrastructure concerns
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub sse_manager: Arc<Manager>,
    pub config: Config,
}

impl AppState {
    pub fn new(app_config: Config, sse_manager: &Arc<Manager>) -> Self {
        Self {
            sse_manager: Arc::clone(sse_manager),
            config: app_config,
        }
    }
}
