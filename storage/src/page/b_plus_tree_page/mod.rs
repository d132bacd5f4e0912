use common::{read_u32_le, read_u64_le, FixedWidth, PageId};
use serde::Serialize;

use crate::error::{LeafPageError, Result};
use crate::PAGE_SIZE;

pub mod b_plus_tree_leaf_page;

use b_plus_tree_leaf_page::LEAF_PAGE_HEADER_SIZE;

/// On-page tag stored in the first 4 bytes of every B+ tree page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum IndexPageType {
    InvalidIndexPage = 1,
    LeafPage = 2,
    InternalPage = 3,
}

impl IndexPageType {
    pub fn tag(self) -> u32 {
        self as u32
    }

    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            1 => Some(IndexPageType::InvalidIndexPage),
            2 => Some(IndexPageType::LeafPage),
            3 => Some(IndexPageType::InternalPage),
            _ => None,
        }
    }

    /// Reads the page type of an encoded page without decoding the rest.
    pub fn peek(data: &[u8; PAGE_SIZE]) -> Option<Self> {
        Self::from_tag(read_u32_le(&data[PAGE_TYPE_OFFSET..]))
    }
}

impl Serialize for IndexPageType {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u32(self.tag())
    }
}

pub struct SizeHelper;

impl SizeHelper {
    /// Number of `(KeyType, ValueType)` slots that fit in one page after the
    /// leaf header.
    pub fn leaf_page_slot_cnt<KeyType: FixedWidth, ValueType: FixedWidth>() -> usize {
        (PAGE_SIZE - LEAF_PAGE_HEADER_SIZE) / (KeyType::WIDTH + ValueType::WIDTH)
    }
}

const PAGE_TYPE_OFFSET: usize = 0;
const SIZE_OFFSET: usize = 4;
const MAX_SIZE_OFFSET: usize = 8;
const RESERVED_OFFSET: usize = 12;
const PAGE_ID_OFFSET: usize = 16;
const PARENT_PAGE_ID_OFFSET: usize = 24;

pub const BPLUS_TREE_PAGE_HEADER_SIZE: usize = 32;

/// Encoded form of a missing page link.
const NO_PAGE: u64 = u64::MAX;

///
/// Header shared by leaf and internal pages.
///
/// Header format (size in byte, 32 bytes in total):
/// ------------------------------------------------------------------------
/// | PageType (4) | CurrentSize (4) | MaxSize (4) | Reserved (4) |
/// ------------------------------------------------------------------------
/// | PageId (8) | ParentPageId (8) |
/// ------------------------------------------------------------------------
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BPlusTreePageHeader {
    page_type: IndexPageType,
    size: usize,
    max_size: usize,
    page_id: PageId,
    parent_page_id: Option<PageId>,
}

impl BPlusTreePageHeader {
    pub fn new(
        page_type: IndexPageType,
        page_id: PageId,
        parent_page_id: Option<PageId>,
        max_size: usize,
    ) -> Self {
        Self {
            page_type,
            size: 0,
            max_size,
            page_id,
            parent_page_id,
        }
    }

    pub fn page_type(&self) -> IndexPageType {
        self.page_type
    }

    pub fn is_leaf_page(&self) -> bool {
        self.page_type == IndexPageType::LeafPage
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn set_size(&mut self, size: usize) {
        debug_assert!(size <= self.max_size);
        self.size = size;
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    pub fn parent_page_id(&self) -> Option<PageId> {
        self.parent_page_id
    }

    pub fn set_parent_page_id(&mut self, parent_page_id: Option<PageId>) {
        debug_assert!(check_page_link(parent_page_id).is_ok(), "reserved parent page id");
        self.parent_page_id = parent_page_id;
    }

    pub(crate) fn encode(&self, buf: &mut [u8]) {
        buf[PAGE_TYPE_OFFSET..SIZE_OFFSET].copy_from_slice(&self.page_type.tag().to_le_bytes());
        buf[SIZE_OFFSET..MAX_SIZE_OFFSET].copy_from_slice(&(self.size as u32).to_le_bytes());
        buf[MAX_SIZE_OFFSET..RESERVED_OFFSET]
            .copy_from_slice(&(self.max_size as u32).to_le_bytes());
        buf[RESERVED_OFFSET..PAGE_ID_OFFSET].fill(0);
        buf[PAGE_ID_OFFSET..PARENT_PAGE_ID_OFFSET]
            .copy_from_slice(&(self.page_id as u64).to_le_bytes());
        buf[PARENT_PAGE_ID_OFFSET..BPLUS_TREE_PAGE_HEADER_SIZE]
            .copy_from_slice(&encode_page_link(self.parent_page_id).to_le_bytes());
    }

    pub(crate) fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < BPLUS_TREE_PAGE_HEADER_SIZE {
            return Err(LeafPageError::Corruption("page shorter than header"));
        }
        let page_type = IndexPageType::from_tag(read_u32_le(&buf[PAGE_TYPE_OFFSET..]))
            .ok_or(LeafPageError::Corruption("unknown index page type"))?;
        Ok(Self {
            page_type,
            size: read_u32_le(&buf[SIZE_OFFSET..]) as usize,
            max_size: read_u32_le(&buf[MAX_SIZE_OFFSET..]) as usize,
            page_id: read_u64_le(&buf[PAGE_ID_OFFSET..]) as PageId,
            parent_page_id: decode_page_link(read_u64_le(&buf[PARENT_PAGE_ID_OFFSET..])),
        })
    }
}

/// Fails for an id that would encode as the missing-link marker.
pub(crate) fn check_page_link(page_id: Option<PageId>) -> Result<()> {
    match page_id {
        Some(id) if id as u64 == NO_PAGE => Err(LeafPageError::ReservedPageId(id)),
        _ => Ok(()),
    }
}

pub(crate) fn encode_page_link(page_id: Option<PageId>) -> u64 {
    page_id.map(|id| id as u64).unwrap_or(NO_PAGE)
}

pub(crate) fn decode_page_link(raw: u64) -> Option<PageId> {
    (raw != NO_PAGE).then_some(raw as PageId)
}
