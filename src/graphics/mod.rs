pub mod primitives;
pub mod renderer;
pub mod sprite;
