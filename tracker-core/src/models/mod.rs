mod catalog;
mod page;
mod progress;
mod task;

pub use catalog::*;
pub use page::*;
pub use progress::*;
pub use task::*;
