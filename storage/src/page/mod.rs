pub(crate) mod b_plus_tree_page;

pub use b_plus_tree_page::b_plus_tree_leaf_page::{BPlusTreeLeafPage, LEAF_PAGE_HEADER_SIZE};
pub use b_plus_tree_page::{
    BPlusTreePageHeader, IndexPageType, SizeHelper, BPLUS_TREE_PAGE_HEADER_SIZE,
};
