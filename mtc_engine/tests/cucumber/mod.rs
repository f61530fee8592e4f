mod steps;
pub mod world;

pub use world::CheckerWorld;
