pub mod frame;
pub mod layer;
pub mod scheduler;
pub mod surface;
pub mod text;
