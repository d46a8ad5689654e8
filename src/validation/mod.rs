pub mod confidence;
pub mod scale;

pub use confidence::{calibrate, ConfidenceAdjustment};
pub use scale::{validate_scale, ScaleFinding, Severity};
