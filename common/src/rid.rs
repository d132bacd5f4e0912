use serde::Serialize;

use crate::codec::{read_u32_le, read_u64_le};
use crate::{FixedWidth, PageId};

/// Record id: the page holding a tuple plus its slot within that page.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct RID {
    pub page_id: PageId,
    pub slot_num: u32,
}

impl RID {
    pub fn new(page_id: PageId, slot_num: u32) -> Self {
        Self { page_id, slot_num }
    }
}

// page_id (8) | slot_num (4)
impl FixedWidth for RID {
    const WIDTH: usize = 12;

    fn encode(&self, buf: &mut [u8]) {
        buf[..8].copy_from_slice(&(self.page_id as u64).to_le_bytes());
        buf[8..12].copy_from_slice(&self.slot_num.to_le_bytes());
    }

    fn decode(buf: &[u8]) -> Self {
        Self {
            page_id: read_u64_le(buf) as PageId,
            slot_num: read_u32_le(&buf[8..]),
        }
    }
}
