pub mod anim;
pub mod color;
pub mod components;
