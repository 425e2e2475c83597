use std::sync::{Arc, RwLock};

use axum::extract::FromRef;

use crate::config::Config;
use crate::models::sizing::SimulationRecord;

/// Caller-owned single-slot cache holding the most recent simulation so the
/// front-end can re-display it (and re-derive chart series) without
/// recomputing. The sizing core itself stays stateless.
#[derive(Clone, Debug)]
pub struct AppState {
    last_result: Arc<RwLock<Option<SimulationRecord>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            last_result: Arc::new(RwLock::new(None)),
        }
    }

    pub fn store(&self, record: SimulationRecord) {
        if let Ok(mut slot) = self.last_result.write() {
            *slot = Some(record);
        }
    }

    pub fn last(&self) -> Option<SimulationRecord> {
        self.last_result.read().ok().and_then(|slot| slot.clone())
    }
}

/// Combined router state. Handlers extract `State<AppState>` and/or
/// `State<Config>` via `FromRef<SharedState>` — a single `.with_state(shared)`
/// covers both.
#[derive(Clone)]
pub struct SharedState {
    pub config: Config,
    pub app_state: AppState,
}

impl FromRef<SharedState> for Config {
    fn from_ref(shared: &SharedState) -> Self {
        shared.config.clone()
    }
}

impl FromRef<SharedState> for AppState {
    fn from_ref(shared: &SharedState) -> Self {
        shared.app_state.clone()
    }
}
