// Data models (structs)
pub mod artifact;
pub mod comparison;
pub mod metrics;
pub mod request;
pub mod response;
pub mod settings;

pub use artifact::*;
pub use comparison::*;
pub use metrics::*;
pub use request::*;
pub use response::*;
pub use settings::*;
