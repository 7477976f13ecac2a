pub mod error;
pub mod source;
pub mod stats;
pub mod traits;
pub mod types;

pub use error::*;
pub use source::InMemoryDataSource;
pub use traits::*;
pub use types::*;
