pub mod generate;
pub mod normalize;
pub mod render;
pub mod resolve;
pub mod translate;
pub mod wishlist;
