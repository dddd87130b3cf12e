pub mod results;
pub mod resource_log;

pub use results::{parse_sim_time, read_sim_time};
pub use resource_log::{parse_resource_log, read_resource_log, ResourcePeak};
