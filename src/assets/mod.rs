pub mod color;
pub mod decode;
pub mod fonts;
pub mod matte;
pub mod sticker;
