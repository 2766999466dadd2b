use clap::Parser;
use strtab::HashTable;
use strtab::hash_table::Entry;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "initial_capacity", default_value_t = 16)]
    initial_capacity: usize,

    #[arg(short = 'n', long = "num_keys", default_value_t = 1000)]
    num_keys: usize,

    /// Remove every nth key after filling, 0 to keep all of them.
    #[arg(short = 'r', long = "remove_every", default_value_t = 0)]
    remove_every: usize,
}

fn main() {
    let args = Args::parse();

    println!(
        "Creating HashTable with initial capacity: {}",
        args.initial_capacity
    );

    let mut table: HashTable<usize> = HashTable::with_capacity(args.initial_capacity);

    println!("Actual capacity: {}", table.capacity());
    println!("Filling table with {} keys...", args.num_keys);

    let mut resizes = 0;
    for i in 0..args.num_keys {
        let capacity = table.capacity();
        match table.entry(format!("key_{i}")) {
            Entry::Vacant(entry) => {
                entry.insert(i);
            }
            Entry::Occupied(entry) => {
                panic!("Key already exists in table: {}", entry.key());
            }
        }
        if table.capacity() != capacity {
            resizes += 1;
        }
    }

    if args.remove_every > 0 {
        let mut removed = 0;
        for i in (0..args.num_keys).step_by(args.remove_every) {
            if table.remove(&format!("key_{i}")) {
                removed += 1;
            }
        }
        println!("Removed {removed} keys");
    }

    println!(
        "Table holds {} keys in {} slots after {resizes} resizes",
        table.len(),
        table.capacity()
    );
    println!(
        "Final load factor: {:.2}%",
        (table.len() as f64 / table.capacity() as f64) * 100.0
    );

    table.probe_histogram().print();
    table.debug_stats().print();
}
