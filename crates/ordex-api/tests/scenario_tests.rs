use ordex::{
    BPlusTree, BTree, Error, FixedLevels, Index, IndexConfig, IndexType, SkipList,
    SkipListConfig, StepAction, TraceStep, TreeConfig,
};

#[test]
fn test_btree_order_four_scenario() {
    let mut index = Index::new(IndexConfig::BTree(TreeConfig::new(4))).unwrap();
    let mut grew = false;
    for k in [50, 25, 75, 10, 30, 60, 90, 5, 15] {
        index.insert(k).unwrap();
        grew |= index.height() > 1;
    }
    assert!(grew, "root never split");

    assert!(index.search(&30).found);
    assert!(!index.search(&99).found);
    index.delete(&25).unwrap();
    assert!(!index.search(&25).found);
    assert_eq!(index.keys(), vec![5, 10, 15, 30, 50, 60, 75, 90]);
}

#[test]
fn test_btree_search_path_starts_at_root() {
    let mut tree = BTree::new(4).unwrap();
    for k in [50, 25, 75, 10, 30, 60, 90, 5, 15] {
        tree.insert(k).unwrap();
    }
    let result = tree.search(&15);
    assert!(result.found);
    assert_eq!(result.path.first(), Some(&tree.root()));
    let holder = tree.node(*result.path.last().unwrap()).unwrap();
    assert!(holder.keys().contains(&15));
}

#[test]
fn test_skiplist_fixed_level_scenario() {
    let config = SkipListConfig::new(6, 0.5);
    let levels = FixedLevels::new(vec![2, 0, 1, 0, 3, 0, 1]);
    let mut list = SkipList::with_generator(config, levels).unwrap();
    for k in [50, 25, 75, 10, 30, 60, 90] {
        list.insert(k).unwrap();
    }

    let result = list.search(&60);
    assert!(result.found);
    let last = result.path.last().unwrap();
    assert_eq!((last.key, last.level, last.action), (Some(60), 0, StepAction::Found));

    list.delete(&25).unwrap();
    assert!(!list.search(&25).found);
}

#[test]
fn test_skiplist_through_facade() {
    let config = SkipListConfig::default().with_seed(42);
    let mut index = Index::new(IndexConfig::SkipList(config)).unwrap();
    for k in [50, 25, 75, 10, 30, 60, 90] {
        index.insert(k).unwrap();
    }
    let result = index.search(&60);
    assert!(result.found);
    match result.path.last() {
        Some(TraceStep::Skip(step)) => assert_eq!(step.key, Some(60)),
        other => panic!("unexpected last step {:?}", other),
    }
    assert!(matches!(
        index.range_query(&10, &60),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn test_bplus_range_scenario() {
    let mut tree = BPlusTree::new(4).unwrap();
    for k in (10..=90).step_by(10) {
        tree.insert(k).unwrap();
    }
    assert_eq!(tree.range_query(&25, &65), vec![30, 40, 50, 60]);

    let mut index = Index::new(IndexConfig::for_type(IndexType::BPlusTree)).unwrap();
    for k in (10..=90).step_by(10) {
        index.insert(k).unwrap();
    }
    assert_eq!(index.range_query(&25, &65), Ok(vec![30, 40, 50, 60]));
    assert_eq!(index.range_query(&65, &25), Ok(vec![]));
}

#[test]
fn test_every_order_in_ui_range() {
    for order in ordex::ORDER_RANGE {
        for config in [
            IndexConfig::BTree(TreeConfig::new(order)),
            IndexConfig::BPlusTree(TreeConfig::new(order)),
        ] {
            let mut index = Index::new(config).unwrap();
            for k in (1..=60).map(|k| (k * 37) % 61) {
                index.insert(k).unwrap();
            }
            for k in (1..=60).filter(|k| k % 2 == 0) {
                index.delete(&k).unwrap();
            }
            let expected: Vec<u32> = (1..=60).filter(|k| k % 2 == 1).collect();
            assert_eq!(index.keys(), expected, "order {}", order);
        }
    }
}

#[test]
fn test_reset_restores_fresh_state() {
    for kind in [IndexType::BTree, IndexType::BPlusTree, IndexType::SkipList] {
        let mut index = Index::new(IndexConfig::for_type(kind)).unwrap();
        for k in 1..=30 {
            index.insert(k).unwrap();
        }
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.height(), 1);
        index.insert(5).unwrap();
        assert_eq!(index.keys(), vec![5]);
    }
}
