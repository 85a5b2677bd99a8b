pub mod arff;
pub mod generators;
mod stream;

pub use stream::Stream;
