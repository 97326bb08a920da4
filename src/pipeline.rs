mod camera;
mod controller;
mod worker;

pub use camera::*;
pub use controller::*;
