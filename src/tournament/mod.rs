pub mod conflicts;
pub mod interval;
pub mod ranking;
pub mod scoring;
pub mod standings;
pub mod validation;
