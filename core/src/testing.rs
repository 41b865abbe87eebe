//! In-memory backend used by unit tests.

use crate::api::{DetectResponse, DisasterRecord, GeoPoint, RawTimestamp};
use crate::prelude::{DisasterApi, TransportResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub struct StubApi {
    listing: Mutex<TransportResult<Vec<DisasterRecord>>>,
    detect: Mutex<TransportResult<DetectResponse>>,
    list_calls: AtomicUsize,
    classify_calls: AtomicUsize,
    last_image_url: Mutex<Option<String>>,
}

impl StubApi {
    pub fn new(listing: TransportResult<Vec<DisasterRecord>>) -> Self {
        Self {
            listing: Mutex::new(listing),
            detect: Mutex::new(Ok(DetectResponse::default())),
            list_calls: AtomicUsize::new(0),
            classify_calls: AtomicUsize::new(0),
            last_image_url: Mutex::new(None),
        }
    }

    pub fn with_detect(self, detect: TransportResult<DetectResponse>) -> Self {
        *self.detect.lock().unwrap() = detect;
        self
    }

    pub fn set_listing(&self, listing: TransportResult<Vec<DisasterRecord>>) {
        *self.listing.lock().unwrap() = listing;
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn classify_calls(&self) -> usize {
        self.classify_calls.load(Ordering::SeqCst)
    }

    pub fn last_image_url(&self) -> Option<String> {
        self.last_image_url.lock().unwrap().clone()
    }
}

#[async_trait]
impl DisasterApi for StubApi {
    async fn list_disasters(&self) -> TransportResult<Vec<DisasterRecord>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.listing.lock().unwrap().clone()
    }

    async fn classify(&self, image_url: &str) -> TransportResult<DetectResponse> {
        self.classify_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_image_url.lock().unwrap() = Some(image_url.to_string());
        self.detect.lock().unwrap().clone()
    }
}

pub fn record(category: &str, lon: f64, lat: f64, confidence: f64) -> DisasterRecord {
    DisasterRecord::new(
        category,
        GeoPoint::new(lon, lat),
        confidence,
        Some(RawTimestamp::Text("2024-01-01T00:00:00Z".into())),
        None,
    )
}
