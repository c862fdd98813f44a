pub mod driver;
pub mod ease;
pub mod tween;
