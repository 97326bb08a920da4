mod style;
mod transform;
mod view;

pub use style::*;
pub use transform::*;
pub use view::*;
