use ordex::logging::{LogConfig, LogFormat};
use ordex::script::random_fill;
use ordex::{Index, IndexConfig, SkipListConfig, TreeConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // debug level shows every split, merge, borrow and level change
    let _guard = LogConfig::debug().with_format(LogFormat::Compact).init()?;

    println!("=== Ordex Logging Demo ===\n");
    let mut rng = StdRng::seed_from_u64(2024);

    println!("1. B-Tree of order 3...");
    let mut btree = Index::new(IndexConfig::BTree(TreeConfig::new(3)))?;
    let keys = random_fill(&mut rng, &mut btree);
    for key in &keys {
        btree.delete(key)?;
    }

    println!("\n2. B+-Tree of order 4...");
    let mut bplus = Index::new(IndexConfig::BPlusTree(TreeConfig::new(4)))?;
    random_fill(&mut rng, &mut bplus);
    println!("range 20-60: {:?}", bplus.range_query(&20, &60)?);

    println!("\n3. Skip list...");
    let config = SkipListConfig::new(8, 0.25).with_seed(7);
    let mut list = Index::new(IndexConfig::SkipList(config))?;
    random_fill(&mut rng, &mut list);
    list.clear();

    println!("\n=== Demo Complete ===");
    Ok(())
}
