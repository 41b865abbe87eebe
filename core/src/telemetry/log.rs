use crate::feed::{LayerKind, LayerSet};
use crate::prelude::TransportError;
use log::{error, info, warn};

/// Log lines emitted by the feed and submission pipeline.
pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    pub fn refresh_applied(&self, layers: &LayerSet) {
        info!(
            "feed refreshed: flood={} fire={} other={}",
            layers.get(LayerKind::Flood).len(),
            layers.get(LayerKind::Fire).len(),
            layers.get(LayerKind::Fallback).len()
        );
    }

    pub fn empty_feed(&self) {
        warn!("no disasters found in backend feed");
    }

    pub fn refresh_failed(&self, err: &TransportError) {
        error!("feed refresh failed, keeping previous markers: {}", err);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
