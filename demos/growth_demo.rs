use chain_hash::Config;
use chain_hash::HashMap;
use chain_hash::HashSet;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "initial_capacity", default_value_t = 4)]
    initial_capacity: usize,

    #[arg(short = 'l', long = "load_factor", default_value_t = 0.75)]
    load_factor: f32,

    #[arg(short = 'm', long = "max_capacity", default_value_t = 1 << 30)]
    max_capacity: usize,

    #[arg(short = 'n', long = "count", default_value_t = 1000)]
    count: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = Config::new()
        .initial_capacity(args.initial_capacity)
        .load_factor(args.load_factor)
        .max_capacity(args.max_capacity);

    println!(
        "Creating HashMap with initial capacity {}, load factor {}, max capacity {}",
        config.get_initial_capacity(),
        config.get_load_factor(),
        config.get_max_capacity()
    );

    let mut map: HashMap<u64, u64> = HashMap::with_config(config);
    let mut capacity = map.capacity();
    for i in 0..args.count {
        if let Err(err) = map.put(i, i * i) {
            println!("Stopped after {} entries: {err}", map.len());
            break;
        }
        if map.capacity() != capacity {
            println!(
                "  {:>8} entries: capacity {capacity} -> {}",
                map.len(),
                map.capacity()
            );
            capacity = map.capacity();
        }
    }

    println!("Inserted {} entries", map.len());
    map.debug_stats().print();

    println!("Chain length histogram:");
    for (length, buckets) in map.chain_histogram().iter().enumerate() {
        println!("  {length:>3}: {buckets}");
    }

    let mut keys: HashSet<u64> = map.key_set();
    let mut it = keys.iterator();
    while let Some(key) = it.next() {
        if key % 2 == 0 {
            it.remove(&mut keys);
        }
    }
    println!(
        "Key set kept {} odd keys; map still holds {} entries",
        keys.len(),
        map.len()
    );
}
