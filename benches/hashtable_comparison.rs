use core::hash::Hash;
use core::hash::Hasher;
use core::hint::black_box;

use chain_hash::HashMap as ChainHashMap;
use chain_hash::HashTable as ChainHashTable;
use chain_hash::hash_table::Entry as ChainEntry;
use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::hash_table::Entry as HashbrownEntry;
use hashbrown::hash_table::HashTable as HashbrownHashTable;
use rand::Rng;
use rand::SeedableRng;
use rand::TryRngCore;
use rand::rngs::OsRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;
use siphasher::sip::SipHasher;

trait KeyValuePair: Clone {
    fn new(key: u64) -> Self;

    fn hash_key(&self) -> u64;
    fn eq_key(&self, other: &Self) -> bool;

    fn chain_hash(&self) -> u32 {
        let hash = self.hash_key();
        (hash ^ (hash >> 32)) as u32
    }
}

#[derive(Clone)]
struct TestItem {
    key: String,
    _value: u64,
}

impl KeyValuePair for TestItem {
    fn new(key: u64) -> Self {
        black_box(Self {
            key: format!("key_{:016X}", key),
            _value: key,
        })
    }

    fn hash_key(&self) -> u64 {
        let mut hasher = SipHasher::new();
        self.key.hash(&mut hasher);
        hasher.finish()
    }

    fn eq_key(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

#[derive(Clone)]
struct SmallTestItem {
    key: u64,
}

impl KeyValuePair for SmallTestItem {
    fn new(key: u64) -> Self {
        black_box(Self { key })
    }

    fn hash_key(&self) -> u64 {
        let mut hasher = SipHasher::new();
        self.key.hash(&mut hasher);
        hasher.finish()
    }

    fn eq_key(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

const SIZES: &[usize] = &[
    (1 << 10),
    (1 << 12),
    (1 << 14),
    (1 << 16),
    (1 << 18),
];

fn random_items<TestItem: KeyValuePair>(count: usize) -> Vec<TestItem> {
    let mut rng = OsRng;
    (0..count)
        .map(|_| TestItem::new(rng.try_next_u64().unwrap()))
        .collect()
}

fn bench_insert_random<TestItem: KeyValuePair, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "insert_random_{}",
        core::any::type_name::<TestItem>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES[..=MAX_SIZE].iter() {
        let items = random_items::<TestItem>(*size);
        group.throughput(Throughput::Elements(*size as u64));

        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut items = items.clone();
                    items.shuffle(&mut SmallRng::from_os_rng());
                    items
                },
                |items| {
                    let mut table = ChainHashTable::<TestItem>::new();
                    for item in items {
                        let hash = item.chain_hash();
                        match table.entry(hash, |v| v.eq_key(&item)) {
                            ChainEntry::Vacant(entry) => {
                                black_box(entry.insert(item).is_ok());
                            }
                            ChainEntry::Occupied(_) => unreachable!(),
                        }
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || {
                    let mut items = items.clone();
                    items.shuffle(&mut SmallRng::from_os_rng());
                    items
                },
                |items| {
                    let mut table = HashbrownHashTable::with_capacity(0);
                    for item in items {
                        let hash = item.hash_key();
                        match table.entry(hash, |v: &TestItem| v.eq_key(&item), |v| v.hash_key()) {
                            HashbrownEntry::Vacant(entry) => {
                                black_box(entry.insert(item));
                            }
                            HashbrownEntry::Occupied(_) => unreachable!(),
                        }
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_find_hit_miss<TestItem: KeyValuePair, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!(
        "find_hit_miss_{}",
        core::any::type_name::<TestItem>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES[..=MAX_SIZE].iter() {
        let items = random_items::<TestItem>(*size);
        let mut probes = random_items::<TestItem>(*size);
        probes.extend(items.iter().cloned());
        probes.shuffle(&mut SmallRng::from_os_rng());

        let mut chain_table = ChainHashTable::<TestItem>::new();
        let mut hashbrown_table = HashbrownHashTable::<TestItem>::with_capacity(0);
        for item in &items {
            let _ = chain_table
                .entry(item.chain_hash(), |v| v.eq_key(item))
                .or_insert_with(|| item.clone());
            hashbrown_table.insert_unique(item.hash_key(), item.clone(), |v| v.hash_key());
        }

        group.throughput(Throughput::Elements(probes.len() as u64));

        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter(|| {
                for probe in &probes {
                    black_box(chain_table.find(probe.chain_hash(), |v| v.eq_key(probe)));
                }
            })
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                for probe in &probes {
                    black_box(hashbrown_table.find(probe.hash_key(), |v| v.eq_key(probe)));
                }
            })
        });
    }

    group.finish();
}

fn bench_remove<TestItem: KeyValuePair, const MAX_SIZE: usize>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("remove_{}", core::any::type_name::<TestItem>()));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES[..=MAX_SIZE].iter() {
        let items = random_items::<TestItem>(*size);

        let mut chain_table = ChainHashTable::<TestItem>::new();
        let mut hashbrown_table = HashbrownHashTable::<TestItem>::with_capacity(0);
        for item in &items {
            let _ = chain_table
                .entry(item.chain_hash(), |v| v.eq_key(item))
                .or_insert_with(|| item.clone());
            hashbrown_table.insert_unique(item.hash_key(), item.clone(), |v| v.hash_key());
        }

        group.throughput(Throughput::Elements(*size as u64));

        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter_batched(
                || chain_table.clone(),
                |mut table| {
                    for item in &items {
                        black_box(table.remove(item.chain_hash(), |v| v.eq_key(item)));
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter_batched(
                || hashbrown_table.clone(),
                |mut table| {
                    for item in &items {
                        if let Ok(entry) = table.find_entry(item.hash_key(), |v| v.eq_key(item)) {
                            black_box(entry.remove());
                        }
                    }
                    black_box(table)
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

#[derive(Clone, Copy)]
enum Operation {
    Insert,
    Find,
    Remove,
}

fn bench_mixed_probabilistic_zipf<TestItem: KeyValuePair, const MAX_SIZE: usize>(
    c: &mut Criterion,
) {
    const KEY_SPACE_MULTIPLIER: u64 = 2;

    let mut group = c.benchmark_group(format!(
        "mixed_probabilistic_zipf_{}",
        core::any::type_name::<TestItem>()
    ));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES[..=MAX_SIZE].iter() {
        let mut rng = SmallRng::from_os_rng();
        let op_distr = Zipf::new(3.0, 1.0).unwrap();
        let operations = (0..*size * 3)
            .map(|_| {
                let op_choice: f64 = rng.sample(op_distr);
                if op_choice <= 1.0 {
                    Operation::Find
                } else if op_choice <= 2.0 {
                    Operation::Insert
                } else {
                    Operation::Remove
                }
            })
            .collect::<Vec<Operation>>();

        let insert_distr = Zipf::new(*size as f32 - 1.0, 1.0).unwrap();
        let find_remove_distr =
            Zipf::new(*size as f32 * KEY_SPACE_MULTIPLIER as f32 - 1.0, 1.0).unwrap();
        let keys = operations
            .iter()
            .map(|operation| match operation {
                Operation::Insert => rng.sample(insert_distr) as u64,
                Operation::Find | Operation::Remove => rng.sample(find_remove_distr) as u64,
            })
            .collect::<Vec<u64>>();

        group.throughput(Throughput::Elements(operations.len() as u64));

        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter(|| {
                let mut table = ChainHashTable::<TestItem>::new();
                for (operation, key) in operations.iter().zip(&keys) {
                    let item = TestItem::new(*key);
                    let hash = item.chain_hash();
                    match operation {
                        Operation::Insert => match table.entry(hash, |v| v.eq_key(&item)) {
                            ChainEntry::Vacant(entry) => {
                                black_box(entry.insert(item).is_ok());
                            }
                            ChainEntry::Occupied(mut occupied) => {
                                *occupied.get_mut() = item;
                            }
                        },
                        Operation::Remove => {
                            black_box(table.remove(hash, |v| v.eq_key(&item)));
                        }
                        Operation::Find => {
                            black_box(table.find(hash, |v| v.eq_key(&item)));
                        }
                    }
                }
                black_box(table)
            })
        });

        group.bench_function(format!("hashbrown/{size}"), |b| {
            b.iter(|| {
                let mut table = HashbrownHashTable::<TestItem>::with_capacity(0);
                for (operation, key) in operations.iter().zip(&keys) {
                    let item = TestItem::new(*key);
                    let hash = item.hash_key();
                    match operation {
                        Operation::Insert => {
                            match table.entry(hash, |v| v.eq_key(&item), |v| v.hash_key()) {
                                HashbrownEntry::Vacant(entry) => {
                                    black_box(entry.insert(item));
                                }
                                HashbrownEntry::Occupied(mut occupied) => {
                                    *occupied.get_mut() = item;
                                }
                            }
                        }
                        Operation::Remove => {
                            if let Ok(entry) = table.find_entry(hash, |v| v.eq_key(&item)) {
                                black_box(entry.remove());
                            }
                        }
                        Operation::Find => {
                            black_box(table.find(hash, |v| v.eq_key(&item)));
                        }
                    }
                }
                black_box(table)
            })
        });
    }

    group.finish();
}

fn bench_map_put_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_put_get");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES.iter() {
        let mut rng = OsRng;
        let keys = (0..*size)
            .map(|_| rng.try_next_u64().unwrap())
            .collect::<Vec<u64>>();

        group.throughput(Throughput::Elements(*size as u64 * 2));

        group.bench_function(format!("chain_hash/{size}"), |b| {
            b.iter(|| {
                let mut map = ChainHashMap::<u64, u64>::new();
                for &key in &keys {
                    black_box(map.put(key, key).is_ok());
                }
                for key in &keys {
                    black_box(map.get(key));
                }
                black_box(map)
            })
        });

        group.bench_function(format!("std/{size}"), |b| {
            b.iter(|| {
                let mut map = std::collections::HashMap::<u64, u64>::new();
                for &key in &keys {
                    black_box(map.insert(key, key));
                }
                for key in &keys {
                    black_box(map.get(key));
                }
                black_box(map)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_random::<SmallTestItem, 4>,
    bench_insert_random::<TestItem, 4>,
    bench_find_hit_miss::<SmallTestItem, 4>,
    bench_find_hit_miss::<TestItem, 4>,
    bench_remove::<SmallTestItem, 4>,
    bench_remove::<TestItem, 3>,
    bench_mixed_probabilistic_zipf::<SmallTestItem, 4>,
    bench_mixed_probabilistic_zipf::<TestItem, 3>,
    bench_map_put_get,
);

criterion_main!(benches);
