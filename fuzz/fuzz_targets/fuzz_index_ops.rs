#![no_main]

use std::collections::BTreeSet;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ordex::{Error, Index, IndexConfig, SkipListConfig, TreeConfig};

#[derive(Arbitrary, Debug)]
enum Kind {
    BTree { order: u8 },
    BPlusTree { order: u8 },
    SkipList { max_level: u8, seed: u64 },
}

#[derive(Arbitrary, Debug)]
enum IndexOp {
    Insert(u16),
    Search(u16),
    Delete(u16),
    Range(u16, u16),
}

#[derive(Arbitrary, Debug)]
struct Input {
    kind: Kind,
    ops: Vec<IndexOp>,
}

fuzz_target!(|input: Input| {
    // Keep orders and heights small so splits and merges happen often
    let config = match input.kind {
        Kind::BTree { order } => IndexConfig::BTree(TreeConfig::new(3 + order as usize % 6)),
        Kind::BPlusTree { order } => {
            IndexConfig::BPlusTree(TreeConfig::new(3 + order as usize % 6))
        }
        Kind::SkipList { max_level, seed } => IndexConfig::SkipList(
            SkipListConfig::new(1 + max_level as usize % 8, 0.5).with_seed(seed),
        ),
    };
    let Ok(mut index) = Index::new(config) else {
        return;
    };
    let mut model = BTreeSet::new();

    for op in input.ops.iter().take(500) {
        match *op {
            IndexOp::Insert(k) => {
                let expected = if model.insert(k) { Ok(()) } else { Err(Error::DuplicateKey) };
                assert_eq!(index.insert(k), expected);
            }
            IndexOp::Delete(k) => {
                let expected = if model.remove(&k) { Ok(()) } else { Err(Error::KeyNotFound) };
                assert_eq!(index.delete(&k), expected);
            }
            IndexOp::Search(k) => {
                assert_eq!(index.search(&k).found, model.contains(&k));
            }
            IndexOp::Range(a, b) => {
                if let Ok(hits) = index.range_query(&a, &b) {
                    let expected: Vec<u16> = if a <= b {
                        model.range(a..=b).copied().collect()
                    } else {
                        Vec::new()
                    };
                    assert_eq!(hits, expected);
                }
            }
        }
    }
    assert_eq!(index.keys(), model.into_iter().collect::<Vec<_>>());
});
