pub mod editor;
pub mod export;
