pub mod errors;
pub mod ids;
pub mod plan;
pub mod report;
pub mod safepath;
pub mod step;

pub use errors::*;
pub use ids::*;
pub use plan::*;
pub use report::*;
pub use safepath::*;
pub use step::*;
