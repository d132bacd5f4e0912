pub use common;
pub use storage;
