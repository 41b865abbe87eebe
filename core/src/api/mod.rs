pub mod detect;
pub mod http;
pub mod record;

pub use detect::{DetectRequest, DetectResponse, Prediction};
pub use http::HttpBackend;
pub use record::{Category, DisasterRecord, GeoPoint, RawTimestamp};
