use common::{PageId, RID};
use storage::{
    GenericKey, IndexPageType, LeafPageError, MemoryManager, PageOperator, SizeHelper, PAGE_SIZE,
};
use tests::{comparator, init_tracing_for_tests, key, live_keys, rid_for, LeafPage};

fn store_leaf<const N: usize>(store: &mut MemoryManager, page: &LeafPage<N>) {
    let mut data = [0u8; PAGE_SIZE];
    page.write_to(&mut data);
    store.write_page(page.page_id(), &data).unwrap();
}

fn load_leaf<const N: usize>(store: &mut MemoryManager, page_id: PageId) -> LeafPage<N> {
    let mut data = [0u8; PAGE_SIZE];
    store.read_page(page_id, &mut data).unwrap();
    assert_eq!(Some(IndexPageType::LeafPage), IndexPageType::peek(&data));
    LeafPage::from_bytes(&data).unwrap()
}

/// Inserts into the first leaf of the chain whose range covers `value`,
/// splitting and relinking on `PageFull` the way a tree manager would.
fn chain_insert(chain: &mut Vec<LeafPage<8>>, value: i64, next_page_id: &mut PageId) {
    let cmp = comparator::<8>();
    let idx = chain
        .iter()
        .position(|leaf| {
            leaf.next_page_id().is_none()
                || leaf
                    .entries()
                    .last()
                    .map(|(k, _)| k.to_integer() >= value)
                    .unwrap_or(true)
        })
        .unwrap();

    match chain[idx].insert_sorted(key(value), rid_for(value), &cmp) {
        Ok(()) => {}
        Err(LeafPageError::PageFull { .. }) => {
            let max_size = chain[idx].max_size();
            let mut sibling = LeafPage::<8>::new(*next_page_id, None, Some(max_size)).unwrap();
            *next_page_id += 1;
            chain[idx].move_half_to(&mut sibling).unwrap();
            sibling.set_next_page_id(chain[idx].next_page_id());
            chain[idx].set_next_page_id(Some(sibling.page_id()));

            let first_of_sibling = sibling.key_at(0).unwrap().to_integer();
            if value < first_of_sibling {
                chain[idx].insert_sorted(key(value), rid_for(value), &cmp).unwrap();
            } else {
                sibling.insert_sorted(key(value), rid_for(value), &cmp).unwrap();
            }
            chain.insert(idx + 1, sibling);
        }
        Err(err) => panic!("unexpected insert failure: {err}"),
    }
}

#[test]
fn scenario_walkthrough() {
    init_tracing_for_tests();
    let cmp = comparator::<8>();
    let key = key::<8>;
    let (a, b, c, d, e, f) = (
        RID::new(0, 0xA),
        RID::new(0, 0xB),
        RID::new(0, 0xC),
        RID::new(0, 0xD),
        RID::new(0, 0xE),
        RID::new(0, 0xF),
    );

    let mut page = LeafPage::<8>::new(1, None, Some(4)).unwrap();
    page.insert_sorted(key(5), a, &cmp).unwrap();
    page.insert_sorted(key(2), b, &cmp).unwrap();
    page.insert_sorted(key(8), c, &cmp).unwrap();
    assert_eq!(vec![(key(2), b), (key(5), a), (key(8), c)], page.entries());
    assert_eq!(3, page.size());

    assert_eq!(
        Err(LeafPageError::DuplicateKey),
        page.insert_sorted(key(5), d, &cmp)
    );
    assert_eq!(vec![(key(2), b), (key(5), a), (key(8), c)], page.entries());

    assert_eq!(Some(c), page.find(&key(8), &cmp));
    assert_eq!(None, page.find(&key(7), &cmp));

    page.insert_sorted(key(9), e, &cmp).unwrap();
    assert_eq!(
        vec![(key(2), b), (key(5), a), (key(8), c), (key(9), e)],
        page.entries()
    );
    assert_eq!(
        Err(LeafPageError::PageFull { max_size: 4 }),
        page.insert_sorted(key(1), f, &cmp)
    );

    page.set_next_page_id(Some(42));
    page.clear();
    assert_eq!(Some(42), page.next_page_id());
    assert_eq!(0, page.size());
}

#[test]
fn every_reference_key_width_orders_keys() {
    init_tracing_for_tests();

    fn check<const N: usize>() {
        let cmp = comparator::<N>();
        let mut page = LeafPage::<N>::new(0, None, None).unwrap();
        let slot_cnt = SizeHelper::leaf_page_slot_cnt::<GenericKey<N>, RID>();
        assert_eq!(slot_cnt, page.max_size());

        for value in [40, -3, 17, 0, 1000, -250] {
            page.insert_sorted(key(value), rid_for(value.abs()), &cmp).unwrap();
        }
        assert_eq!(vec![-250, -3, 0, 17, 40, 1000], live_keys(&page));
        page.verify_order(&cmp).unwrap();

        let mut data = [0u8; PAGE_SIZE];
        page.write_to(&mut data);
        let decoded = LeafPage::<N>::from_bytes(&data).unwrap();
        assert_eq!(page.entries(), decoded.entries());
    }

    check::<4>();
    check::<8>();
    check::<16>();
    check::<32>();
    check::<64>();
}

#[test]
fn bulk_append_builds_full_leaf() {
    init_tracing_for_tests();
    let cmp = comparator::<16>();
    let mut page = LeafPage::<16>::new(0, None, Some(64)).unwrap();
    for value in 0..64 {
        page.append_unsorted(key(value * 3), rid_for(value), &cmp).unwrap();
    }
    assert!(page.is_full());
    assert_eq!(
        Err(LeafPageError::PageFull { max_size: 64 }),
        page.append_unsorted(key(1000), rid_for(1000), &cmp)
    );
    for value in 0..64 {
        assert_eq!(Some(rid_for(value)), page.find(&key(value * 3), &cmp));
        assert_eq!(None, page.find(&key(value * 3 + 1), &cmp));
    }
}

#[test]
fn linked_leaves_scan_in_order_after_reload() {
    init_tracing_for_tests();
    let mut chain = vec![LeafPage::<8>::new(0, None, Some(4)).unwrap()];
    let mut next_page_id = 1;

    let values = [50, 10, 90, 30, 70, 20, 80, 40, 60, 0, 100, 55, 5, 95];
    for value in values {
        chain_insert(&mut chain, value, &mut next_page_id);
    }
    assert!(chain.len() > 1);

    let mut store = MemoryManager::new(next_page_id);
    for leaf in &chain {
        store_leaf(&mut store, leaf);
    }

    let mut scanned = Vec::new();
    let mut cursor = Some(0);
    while let Some(page_id) = cursor {
        let leaf = load_leaf::<8>(&mut store, page_id);
        scanned.extend(live_keys(&leaf));
        cursor = leaf.next_page_id();
    }

    let mut expected = values.to_vec();
    expected.sort();
    assert_eq!(expected, scanned);
}

#[test]
fn merge_and_redistribute_keep_global_order() {
    init_tracing_for_tests();
    let cmp = comparator::<8>();
    let mut left = LeafPage::<8>::new(0, Some(9), Some(6)).unwrap();
    let mut right = LeafPage::<8>::new(1, Some(9), Some(6)).unwrap();
    for value in [1, 2, 3, 4, 5, 6] {
        left.insert_sorted(key(value), rid_for(value), &cmp).unwrap();
    }
    left.move_half_to(&mut right).unwrap();
    right.set_next_page_id(left.next_page_id());
    left.set_next_page_id(Some(right.page_id()));
    assert_eq!(vec![1, 2, 3], live_keys(&left));
    assert_eq!(vec![4, 5, 6], live_keys(&right));

    left.remove(&key(1), &cmp).unwrap();
    left.remove(&key(2), &cmp).unwrap();
    assert!(left.size() < left.min_size());

    right.move_first_to_end_of(&mut left, &cmp).unwrap();
    assert_eq!(vec![3, 4], live_keys(&left));
    assert_eq!(vec![5, 6], live_keys(&right));

    right.move_all_to(&mut left, &cmp).unwrap();
    left.set_next_page_id(right.next_page_id());
    assert_eq!(vec![3, 4, 5, 6], live_keys(&left));
    assert!(right.is_empty());
    assert_eq!(None, left.next_page_id());
    left.verify_order(&cmp).unwrap();
}

#[test]
fn parent_link_round_trips_through_store() {
    init_tracing_for_tests();
    let mut store = MemoryManager::new(4);
    let mut leaf = LeafPage::<32>::new(3, Some(1), Some(10)).unwrap();
    leaf.insert_sorted(key(7), rid_for(7), &comparator::<32>()).unwrap();
    store_leaf(&mut store, &leaf);

    leaf.set_parent_page_id(None);
    store_leaf(&mut store, &leaf);
    let reloaded = load_leaf::<32>(&mut store, 3);
    assert_eq!(None, reloaded.parent_page_id());
    assert_eq!(vec![7], live_keys(&reloaded));
    assert_eq!("(7)", reloaded.to_string());
}
