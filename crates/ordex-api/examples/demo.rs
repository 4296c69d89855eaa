use ordex::script::{demo, run_script};
use ordex::{Index, IndexConfig, IndexType, StepAction, TraceStep};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Ordex Demo ===\n");

    for kind in [IndexType::BTree, IndexType::BPlusTree, IndexType::SkipList] {
        let mut index = Index::new(IndexConfig::for_type(kind))?;
        println!("--- {} ---", kind);

        let ops = demo(kind);
        for (op, result) in ops.iter().zip(run_script(&mut index, ops)?) {
            println!("{:?} => {:?}", op, result);
        }
        println!("keys:   {:?}", index.keys());
        println!("height: {}", index.height());

        if let Some(tree) = index.as_bplus_tree() {
            for leaf in tree.leaves() {
                if let Some(node) = tree.node(leaf) {
                    print!("{:?} -> ", node.keys());
                }
            }
            println!("end");
        }
        if let Some(list) = index.as_skip_list() {
            for (key, level) in list.entries() {
                println!("  {:>3} {}", key, "#".repeat(level + 1));
            }
        }

        let target = index.keys().first().copied().unwrap_or(1);
        let trace = index.search(&target);
        let moves = trace
            .path
            .iter()
            .filter(|step| {
                matches!(step, TraceStep::Skip(s) if s.action == StepAction::Right)
                    || matches!(step, TraceStep::Node(_))
            })
            .count();
        println!("search({}) found={} in {} moves\n", target, trace.found, moves);
    }

    println!("=== Demo Complete ===");
    Ok(())
}
