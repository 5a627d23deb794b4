mod comments;
mod news;

pub use comments::*;
pub use news::*;
