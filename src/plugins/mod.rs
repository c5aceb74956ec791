pub mod base;
pub mod follower;
pub mod placement;
