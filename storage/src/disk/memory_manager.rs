use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use common::PageId;
use tracing::trace;

use crate::{PageOperator, PAGE_SIZE};

/// Page store backed by a single in-memory buffer of `page_capacity` pages.
pub struct MemoryManager {
    page_capacity: usize,
    memory: Cursor<Vec<u8>>,
}

impl MemoryManager {
    pub fn new(page_capacity: usize) -> Self {
        let memory = vec![0u8; page_capacity * PAGE_SIZE];
        Self {
            page_capacity,
            memory: Cursor::new(memory),
        }
    }

    pub fn page_capacity(&self) -> usize {
        self.page_capacity
    }

    fn seek_to_page(&mut self, page_id: PageId) -> io::Result<()> {
        if page_id >= self.page_capacity {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "memory page manager holds page ids below {} but {} was requested",
                    self.page_capacity, page_id
                ),
            ));
        }
        self.memory
            .seek(SeekFrom::Start((page_id * PAGE_SIZE) as u64))?;
        Ok(())
    }
}

impl PageOperator for MemoryManager {
    fn write_page(&mut self, page_id: PageId, data: &[u8; PAGE_SIZE]) -> io::Result<()> {
        self.seek_to_page(page_id)?;
        self.memory.write_all(data)?;
        trace!(page_id, "wrote page");
        Ok(())
    }

    fn read_page(&mut self, page_id: PageId, data: &mut [u8; PAGE_SIZE]) -> io::Result<()> {
        self.seek_to_page(page_id)?;
        self.memory.read_exact(data)?;
        Ok(())
    }
}
