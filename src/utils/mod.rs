mod export;
mod plotting;

pub use export::*;
pub use plotting::*;
