pub mod approx;
pub mod bezier;
pub mod path;
pub mod point;
pub mod rect;
pub mod stroke;
