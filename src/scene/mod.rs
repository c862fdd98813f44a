pub mod model;
pub mod patch;
pub mod project;
pub mod state;
