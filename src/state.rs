use std::sync::Arc;

use crate::analysis::SimulationPipeline;
use crate::config::Config;
use crate::pvgis::RadiationSource;
use crate::reference::ReferenceService;

/// Shared handles for every request handler.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub radiation: Arc<dyn RadiationSource>,
    pub reference: Arc<ReferenceService>,
    pub pipeline: SimulationPipeline,
}

impl AppState {
    pub fn new(cfg: Config, radiation: Arc<dyn RadiationSource>) -> Self {
        let reference = Arc::new(ReferenceService::new(cfg.cache.ttl()));
        let pipeline = SimulationPipeline::new(radiation.clone(), reference.clone(), cfg.financial.clone());
        Self {
            cfg: Arc::new(cfg),
            radiation,
            reference,
            pipeline,
        }
    }
}
