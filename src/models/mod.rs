pub mod common;
pub mod matches;
pub mod pool;
pub mod team;
pub mod tournament;
