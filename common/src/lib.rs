mod codec;
mod rid;

pub use codec::{read_u32_le, read_u64_le, FixedWidth};
pub use rid::RID;

/// Identity of a page inside the page store. `PageId::MAX` is reserved: page
/// links encode a missing page with it.
pub type PageId = usize;
