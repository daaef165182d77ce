pub mod assessment;
pub mod candidate;
pub mod communication;
pub mod interview;
pub mod job;
pub mod pipeline;
pub mod user;
