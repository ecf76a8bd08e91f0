pub mod catalog;
pub mod class;
pub mod error;
pub mod pattern;
pub mod time;

pub use catalog::*;
pub use class::*;
pub use error::*;
pub use pattern::*;
pub use time::*;
