//! Infrastructure layer: production implementations of the engine seams.

pub mod chromium;
pub mod lighthouse;

pub use chromium::ChromiumDriver;
pub use lighthouse::LighthouseCliEngine;
