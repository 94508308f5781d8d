use std::sync::Arc;

use sensorr_core::{Authenticator, Blackhole, Config, SanitizedConfig, SearchOrchestrator};

/// Shared application state
pub struct AppState {
    config: Config,
    authenticator: Arc<dyn Authenticator>,
    orchestrator: Arc<SearchOrchestrator>,
    blackhole: Arc<Blackhole>,
}

impl AppState {
    pub fn new(
        config: Config,
        authenticator: Arc<dyn Authenticator>,
        orchestrator: Arc<SearchOrchestrator>,
        blackhole: Arc<Blackhole>,
    ) -> Self {
        Self {
            config,
            authenticator,
            orchestrator,
            blackhole,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    pub fn orchestrator(&self) -> &SearchOrchestrator {
        self.orchestrator.as_ref()
    }

    pub fn blackhole(&self) -> &Blackhole {
        self.blackhole.as_ref()
    }
}
