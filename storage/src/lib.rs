use std::io;

use common::PageId;

pub(crate) mod disk;
pub mod error;
pub mod index;
pub(crate) mod page;

pub use disk::memory_manager::MemoryManager;
pub use error::{LeafPageError, Result};
pub use index::{GenericComparator, GenericKey, KeyComparator};
pub use page::*;

pub const PAGE_SIZE: usize = 4 * 1024;

/// Backing store for raw pages. The leaf page itself never does I/O; callers
/// move its encoded bytes through an implementation of this trait.
pub trait PageOperator: Send {
    fn write_page(&mut self, page_id: PageId, data: &[u8; PAGE_SIZE]) -> io::Result<()>;
    fn read_page(&mut self, page_id: PageId, data: &mut [u8; PAGE_SIZE]) -> io::Result<()>;
}
