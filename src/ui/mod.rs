mod progress;
mod style;

pub use progress::BatchProgress;
pub use style::Style;
