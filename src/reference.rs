//! Cached reference lookups: grid carbon intensity per coordinate and retail
//! energy price per region.

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::cache::{Clock, ExpiryPolicy, FixedTtl, SystemClock, TtlCache};
use crate::domain::{resolve_region, Coordinate, Region};

#[derive(Debug)]
pub struct ReferenceService {
    carbon: TtlCache<String, f64>,
    prices: TtlCache<Region, f64>,
}

impl ReferenceService {
    pub fn new(ttl: Duration) -> Self {
        Self::with_parts(Arc::new(FixedTtl(ttl)), Arc::new(SystemClock))
    }

    pub fn with_parts(policy: Arc<dyn ExpiryPolicy>, clock: Arc<dyn Clock>) -> Self {
        Self {
            carbon: TtlCache::new(policy.clone(), clock.clone()),
            prices: TtlCache::new(policy, clock),
        }
    }

    pub fn region_for(&self, at: Coordinate) -> Region {
        resolve_region(at.latitude, at.longitude)
    }

    /// Grid carbon intensity (g CO2/kWh) at a coordinate, cached per `"lat,lon"`.
    pub fn carbon_intensity(&self, at: Coordinate) -> f64 {
        self.carbon.get_or_insert_with(at.cache_key(), || {
            let region = self.region_for(at);
            debug!(%at, %region, "carbon intensity cache miss");
            region.carbon_intensity()
        })
    }

    /// Retail energy price ($/kWh) for a region, cached per region code.
    pub fn energy_price(&self, region: Region) -> f64 {
        self.prices.get_or_insert_with(region, || {
            debug!(%region, "energy price cache miss");
            region.energy_price()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    fn service() -> (ReferenceService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let svc = ReferenceService::with_parts(Arc::new(FixedTtl::default()), clock.clone());
        (svc, clock)
    }

    #[test]
    fn carbon_intensity_follows_region() {
        let (svc, _) = service();
        assert_eq!(svc.carbon_intensity(Coordinate::new(51.5, -0.1).unwrap()), 225.0);
        assert_eq!(svc.carbon_intensity(Coordinate::new(48.8566, 2.3522).unwrap()), 50.0);
        assert_eq!(svc.carbon_intensity(Coordinate::new(0.0, -160.0).unwrap()), 380.0);
        assert_eq!(svc.carbon.len(), 3);
    }

    #[test]
    fn repeated_lookups_share_an_entry() {
        let (svc, clock) = service();
        let london = Coordinate::new(51.5, -0.1).unwrap();
        svc.carbon_intensity(london);
        clock.advance(Duration::from_secs(120));
        svc.carbon_intensity(london);
        assert_eq!(svc.carbon.len(), 1);
    }

    #[test]
    fn prices_are_keyed_by_region() {
        let (svc, _) = service();
        assert_eq!(svc.energy_price(Region::DE), 0.35);
        assert_eq!(svc.energy_price(Region::from_code("nowhere")), 0.14);
        assert_eq!(svc.energy_price(Region::DE), 0.35);
        assert_eq!(svc.prices.len(), 2);
    }
}
