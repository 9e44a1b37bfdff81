pub mod error;
pub mod geometry;
pub mod machine;
pub mod model;
pub mod notice;
pub mod pool;
pub mod quota;
pub mod roster;
pub mod scene;
