use std::{cmp::Ordering, fmt::Display};

use common::{read_u64_le, FixedWidth, PageId};
use serde::{ser::SerializeStruct, Serialize};
use tracing::{debug, trace};

use super::{
    check_page_link, decode_page_link, encode_page_link, BPlusTreePageHeader, IndexPageType,
    SizeHelper, BPLUS_TREE_PAGE_HEADER_SIZE,
};
use crate::error::{LeafPageError, Result};
use crate::{KeyComparator, PAGE_SIZE};

pub const LEAF_PAGE_HEADER_SIZE: usize = BPLUS_TREE_PAGE_HEADER_SIZE + 8;

///
/// Store indexed key and record id (record id = page id combined with slot id,
/// see `common::RID`) together within leaf page. Only support unique key.
///
/// Leaf page format (keys are stored in increasing order):
///  ---------
/// | HEADER |
///  ---------
///  ---------------------------------------------------------
/// | KEY(1) RID(1) | KEY(2) RID(2) | ... | KEY(max) RID(max) |
///  ---------------------------------------------------------
///
///  Header format (size in byte, 40 bytes in total):
///  ---------------------------------------------------------------
/// | PageType (4) | CurrentSize (4) | MaxSize (4) | Reserved (4) |
///  ---------------------------------------------------------------
///  ----------------------------------------------------
/// | PageId (8) | ParentPageId (8) | NextPageId (8) |
///  ----------------------------------------------------
///
/// All `MaxSize` slots are allocated up front. Only the first `CurrentSize`
/// are live; anything past them is stale and never read by lookups.
///
pub struct BPlusTreeLeafPage<KeyType, ValueType> {
    header: BPlusTreePageHeader,
    next_page_id: Option<PageId>,
    slots: Box<[(KeyType, ValueType)]>,
}

impl<KeyType, ValueType> BPlusTreeLeafPage<KeyType, ValueType> {
    pub fn page_id(&self) -> PageId {
        self.header.page_id()
    }

    pub fn parent_page_id(&self) -> Option<PageId> {
        self.header.parent_page_id()
    }

    pub fn set_parent_page_id(&mut self, parent_page_id: Option<PageId>) {
        self.header.set_parent_page_id(parent_page_id);
    }

    pub fn page_type(&self) -> IndexPageType {
        self.header.page_type()
    }

    pub fn is_leaf_page(&self) -> bool {
        self.header.is_leaf_page()
    }

    pub fn next_page_id(&self) -> Option<PageId> {
        self.next_page_id
    }

    pub fn set_next_page_id(&mut self, next_page_id: Option<PageId>) {
        debug_assert!(check_page_link(next_page_id).is_ok(), "reserved next page id");
        self.next_page_id = next_page_id;
    }

    pub fn size(&self) -> usize {
        self.header.size()
    }

    pub fn max_size(&self) -> usize {
        self.header.max_size()
    }

    /// Occupancy below which the tree manager should merge or redistribute.
    pub fn min_size(&self) -> usize {
        self.max_size() / 2
    }

    pub fn is_full(&self) -> bool {
        self.size() == self.max_size()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Live entries in key order.
    pub fn entries(&self) -> &[(KeyType, ValueType)] {
        &self.slots[..self.size()]
    }

    pub fn key_at(&self, index: usize) -> Result<&KeyType> {
        self.check_index(index)?;
        Ok(&self.slots[index].0)
    }

    pub fn value_at(&self, index: usize) -> Result<&ValueType> {
        self.check_index(index)?;
        Ok(&self.slots[index].1)
    }

    pub fn set_value_at(&mut self, index: usize, value: ValueType) -> Result<()> {
        self.check_index(index)?;
        self.slots[index].1 = value;
        Ok(())
    }

    /// Drops every entry. Stale slots are left in place.
    pub fn clear(&mut self) {
        self.header.set_size(0);
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let size = self.size();
        if index >= size {
            return Err(LeafPageError::OutOfRange { index, size });
        }
        Ok(())
    }
}

impl<KeyType, ValueType> BPlusTreeLeafPage<KeyType, ValueType>
where
    KeyType: FixedWidth + Copy + Default,
    ValueType: FixedWidth + Copy + Default,
{
    /// Creates an initialized leaf page. `max_size` of `None` uses every slot
    /// a page can hold.
    pub fn new(
        page_id: PageId,
        parent_page_id: Option<PageId>,
        max_size: Option<usize>,
    ) -> Result<Self> {
        let mut page = Self {
            header: BPlusTreePageHeader::new(IndexPageType::LeafPage, page_id, parent_page_id, 0),
            next_page_id: None,
            slots: Box::default(),
        };
        page.init(page_id, parent_page_id, max_size)?;
        Ok(page)
    }

    /// Resets the page to an empty leaf with the given identity and capacity.
    pub fn init(
        &mut self,
        page_id: PageId,
        parent_page_id: Option<PageId>,
        max_size: Option<usize>,
    ) -> Result<()> {
        check_page_link(parent_page_id)?;
        let max = SizeHelper::leaf_page_slot_cnt::<KeyType, ValueType>();
        let max_size = max_size.unwrap_or(max);
        if max_size == 0 || max_size > max {
            return Err(LeafPageError::InvalidCapacity {
                requested: max_size,
                max,
            });
        }

        self.header =
            BPlusTreePageHeader::new(IndexPageType::LeafPage, page_id, parent_page_id, max_size);
        self.next_page_id = None;
        if self.slots.len() != max_size {
            self.slots =
                vec![(KeyType::default(), ValueType::default()); max_size].into_boxed_slice();
        }
        Ok(())
    }

    /// Index of the first live key that is not less than `key`, in `[0, size]`.
    pub fn key_index<C: KeyComparator<KeyType>>(&self, key: &KeyType, cmp: &C) -> usize {
        let (mut low, mut high) = (0, self.size());
        while low < high {
            let mid = low + (high - low) / 2;
            if cmp.compare(&self.slots[mid].0, key) == Ordering::Less {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        low
    }

    pub fn find<C: KeyComparator<KeyType>>(&self, key: &KeyType, cmp: &C) -> Option<ValueType> {
        let (mut low, mut high) = (0, self.size());
        while low < high {
            let mid = low + (high - low) / 2;
            match cmp.compare(&self.slots[mid].0, key) {
                Ordering::Less => low = mid + 1,
                Ordering::Greater => high = mid,
                Ordering::Equal => return Some(self.slots[mid].1),
            }
        }
        None
    }

    pub fn insert_sorted<C: KeyComparator<KeyType>>(
        &mut self,
        key: KeyType,
        value: ValueType,
        cmp: &C,
    ) -> Result<()> {
        let size = self.size();
        let pos = self.key_index(&key, cmp);
        if pos < size && cmp.compare(&self.slots[pos].0, &key) == Ordering::Equal {
            debug!(page_id = self.page_id(), pos, "rejected duplicate key");
            return Err(LeafPageError::DuplicateKey);
        }
        if self.is_full() {
            debug!(page_id = self.page_id(), size, "rejected insert into full leaf");
            return Err(LeafPageError::PageFull {
                max_size: self.max_size(),
            });
        }

        self.slots.copy_within(pos..size, pos + 1);
        self.slots[pos] = (key, value);
        self.header.set_size(size + 1);
        trace!(page_id = self.page_id(), pos, size = size + 1, "inserted entry");
        Ok(())
    }

    /// Appends at the end without searching. The key has to sort strictly
    /// after the current last key.
    pub fn append_unsorted<C: KeyComparator<KeyType>>(
        &mut self,
        key: KeyType,
        value: ValueType,
        cmp: &C,
    ) -> Result<()> {
        let size = self.size();
        if self.is_full() {
            return Err(LeafPageError::PageFull {
                max_size: self.max_size(),
            });
        }
        if size > 0 && cmp.compare(&self.slots[size - 1].0, &key) != Ordering::Less {
            return Err(LeafPageError::OrderingViolation { index: size });
        }

        self.slots[size] = (key, value);
        self.header.set_size(size + 1);
        Ok(())
    }

    /// Removes the entry for `key` and returns its value.
    pub fn remove<C: KeyComparator<KeyType>>(
        &mut self,
        key: &KeyType,
        cmp: &C,
    ) -> Option<ValueType> {
        let size = self.size();
        let pos = self.key_index(key, cmp);
        if pos == size || cmp.compare(&self.slots[pos].0, key) != Ordering::Equal {
            return None;
        }

        let value = self.slots[pos].1;
        self.slots.copy_within(pos + 1..size, pos);
        self.header.set_size(size - 1);
        trace!(page_id = self.page_id(), pos, size = size - 1, "removed entry");
        Some(value)
    }

    /// Split helper: moves the upper half of the entries into an empty
    /// recipient. Sibling links are left to the caller.
    pub fn move_half_to(&mut self, recipient: &mut Self) -> Result<()> {
        if !recipient.is_empty() {
            return Err(LeafPageError::InvalidRecipient("split recipient must be empty"));
        }
        let size = self.size();
        let moved = size / 2;
        if moved > recipient.max_size() {
            return Err(LeafPageError::PageFull {
                max_size: recipient.max_size(),
            });
        }

        let start = size - moved;
        recipient.slots[..moved].copy_from_slice(&self.slots[start..size]);
        recipient.header.set_size(moved);
        self.header.set_size(start);
        debug!(
            from = self.page_id(),
            to = recipient.page_id(),
            moved,
            "moved upper half of leaf"
        );
        Ok(())
    }

    /// Merge helper: appends every entry to `recipient`, whose keys must all
    /// sort before ours, then clears this page.
    pub fn move_all_to<C: KeyComparator<KeyType>>(
        &mut self,
        recipient: &mut Self,
        cmp: &C,
    ) -> Result<()> {
        let size = self.size();
        let recipient_size = recipient.size();
        if recipient_size + size > recipient.max_size() {
            return Err(LeafPageError::PageFull {
                max_size: recipient.max_size(),
            });
        }
        if size > 0
            && recipient_size > 0
            && cmp.compare(&recipient.slots[recipient_size - 1].0, &self.slots[0].0)
                != Ordering::Less
        {
            return Err(LeafPageError::OrderingViolation {
                index: recipient_size,
            });
        }

        recipient.slots[recipient_size..recipient_size + size]
            .copy_from_slice(&self.slots[..size]);
        recipient.header.set_size(recipient_size + size);
        self.clear();
        debug!(
            from = self.page_id(),
            to = recipient.page_id(),
            moved = size,
            "merged leaf into left sibling"
        );
        Ok(())
    }

    /// Redistribution helper: moves our smallest entry to the end of the left
    /// sibling `recipient`.
    pub fn move_first_to_end_of<C: KeyComparator<KeyType>>(
        &mut self,
        recipient: &mut Self,
        cmp: &C,
    ) -> Result<()> {
        let size = self.size();
        if size == 0 {
            return Err(LeafPageError::OutOfRange { index: 0, size });
        }

        let (key, value) = self.slots[0];
        recipient.append_unsorted(key, value, cmp)?;
        self.slots.copy_within(1..size, 0);
        self.header.set_size(size - 1);
        Ok(())
    }

    /// Redistribution helper: moves our largest entry to the front of the
    /// right sibling `recipient`.
    pub fn move_last_to_front_of<C: KeyComparator<KeyType>>(
        &mut self,
        recipient: &mut Self,
        cmp: &C,
    ) -> Result<()> {
        let size = self.size();
        if size == 0 {
            return Err(LeafPageError::OutOfRange { index: 0, size });
        }

        recipient.prepend(self.slots[size - 1], cmp)?;
        self.header.set_size(size - 1);
        Ok(())
    }

    fn prepend<C: KeyComparator<KeyType>>(
        &mut self,
        entry: (KeyType, ValueType),
        cmp: &C,
    ) -> Result<()> {
        let size = self.size();
        if self.is_full() {
            return Err(LeafPageError::PageFull {
                max_size: self.max_size(),
            });
        }
        if size > 0 && cmp.compare(&entry.0, &self.slots[0].0) != Ordering::Less {
            return Err(LeafPageError::OrderingViolation { index: 0 });
        }

        self.slots.copy_within(0..size, 1);
        self.slots[0] = entry;
        self.header.set_size(size + 1);
        Ok(())
    }

    /// Checks that live keys are strictly ascending.
    pub fn verify_order<C: KeyComparator<KeyType>>(&self, cmp: &C) -> Result<()> {
        match self
            .entries()
            .windows(2)
            .position(|pair| cmp.compare(&pair[0].0, &pair[1].0) != Ordering::Less)
        {
            Some(i) => Err(LeafPageError::OrderingViolation { index: i + 1 }),
            None => Ok(()),
        }
    }

    /// Encodes the header and all `max_size` slots into `data`.
    pub fn write_to(&self, data: &mut [u8; PAGE_SIZE]) {
        self.header.encode(&mut data[..BPLUS_TREE_PAGE_HEADER_SIZE]);
        data[BPLUS_TREE_PAGE_HEADER_SIZE..LEAF_PAGE_HEADER_SIZE]
            .copy_from_slice(&encode_page_link(self.next_page_id).to_le_bytes());

        let cells =
            data[LEAF_PAGE_HEADER_SIZE..].chunks_exact_mut(KeyType::WIDTH + ValueType::WIDTH);
        for ((key, value), cell) in self.slots.iter().zip(cells) {
            key.encode(&mut cell[..KeyType::WIDTH]);
            value.encode(&mut cell[KeyType::WIDTH..]);
        }
    }

    pub fn from_bytes(data: &[u8; PAGE_SIZE]) -> Result<Self> {
        let header = BPlusTreePageHeader::decode(&data[..BPLUS_TREE_PAGE_HEADER_SIZE])?;
        if !header.is_leaf_page() {
            return Err(LeafPageError::Corruption("not a leaf page"));
        }
        let max_size = header.max_size();
        if max_size == 0 || max_size > SizeHelper::leaf_page_slot_cnt::<KeyType, ValueType>() {
            return Err(LeafPageError::Corruption("leaf max size does not fit a page"));
        }
        if header.size() > max_size {
            return Err(LeafPageError::Corruption("leaf size exceeds max size"));
        }

        let next_page_id = decode_page_link(read_u64_le(&data[BPLUS_TREE_PAGE_HEADER_SIZE..]));
        let slots = data[LEAF_PAGE_HEADER_SIZE..]
            .chunks_exact(KeyType::WIDTH + ValueType::WIDTH)
            .take(max_size)
            .map(|cell| {
                (
                    KeyType::decode(&cell[..KeyType::WIDTH]),
                    ValueType::decode(&cell[KeyType::WIDTH..]),
                )
            })
            .collect();

        Ok(Self {
            header,
            next_page_id,
            slots,
        })
    }
}

impl<KeyType: Display, ValueType> Display for BPlusTreeLeafPage<KeyType, ValueType> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, (key, _)) in self.entries().iter().enumerate() {
            if i != 0 {
                write!(f, ",")?;
            }
            write!(f, "{key}")?;
        }
        write!(f, ")")
    }
}

impl<KeyType: Serialize, ValueType: Serialize> Serialize for BPlusTreeLeafPage<KeyType, ValueType> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("BPlusTreeLeafPage", 7)?;
        state.serialize_field("page_type", &self.page_type())?;
        state.serialize_field("page_id", &self.page_id())?;
        state.serialize_field("parent_page_id", &self.parent_page_id())?;
        state.serialize_field("next_page_id", &self.next_page_id)?;
        state.serialize_field("size", &self.size())?;
        state.serialize_field("max_size", &self.max_size())?;
        state.serialize_field("entries", self.entries())?;
        state.end()
    }
}
