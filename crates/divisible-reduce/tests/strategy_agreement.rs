use divisible_reduce::{
    DataConfig, LockBasedReducer, LockFreeReducer, MinMergeGranularity, Reducer, ReduceConfig,
    Reduction, SequentialReducer, Strategy, data::generate, partition,
};

const WORKER_COUNTS: [usize; 4] = [1, 2, 16, 64];
const GRANULARITIES: [MinMergeGranularity; 2] =
    [MinMergeGranularity::PerChunk, MinMergeGranularity::PerElement];

fn parallel_reducers(divisor: i32, workers: usize) -> Vec<Box<dyn Reducer>> {
    let mut reducers: Vec<Box<dyn Reducer>> =
        vec![Box::new(LockBasedReducer::new(divisor, workers).expect("mutex reducer"))];
    for min_merge in GRANULARITIES {
        reducers.push(Box::new(
            LockFreeReducer::new(divisor, workers, min_merge).expect("atomic reducer"),
        ));
    }
    reducers
}

#[test]
fn all_strategies_agree_on_generated_data() {
    let data = generate(&DataConfig { len: 200_003, value_bound: 100_000, seed: 42 });
    let expected = SequentialReducer::new(19).unwrap().reduce(&data).unwrap();
    assert!(expected.count > 0);

    for workers in WORKER_COUNTS {
        for reducer in parallel_reducers(19, workers) {
            assert_eq!(
                reducer.reduce(&data).unwrap(),
                expected,
                "{} with {workers} workers",
                reducer.name()
            );
        }
    }
}

#[test]
fn concrete_scenarios() {
    for workers in WORKER_COUNTS {
        let config = ReduceConfig { divisor: 19, workers, ..Default::default() };
        for strategy in Strategy::ALL {
            let reducer = strategy.build(&config).unwrap();
            assert_eq!(
                reducer.reduce(&[19, 38, 5, 57, 100]).unwrap(),
                Reduction { count: 3, min: Some(19) }
            );
            assert_eq!(reducer.reduce(&[1, 2, 3]).unwrap(), Reduction { count: 0, min: None });
        }
    }
}

#[test]
fn no_divisible_elements_yields_sentinel() {
    let data: Vec<i32> = (0..10_000).map(|i| i * 19 + 1).collect();
    let expected = Reduction { count: 0, min: None };

    assert_eq!(SequentialReducer::new(19).unwrap().reduce(&data).unwrap(), expected);
    for workers in WORKER_COUNTS {
        for reducer in parallel_reducers(19, workers) {
            assert_eq!(reducer.reduce(&data).unwrap(), expected);
        }
    }
}

#[test]
fn repeated_calls_are_idempotent() {
    let data = generate(&DataConfig { len: 50_000, value_bound: 100_000, seed: 9 });
    for reducer in parallel_reducers(19, 16) {
        let first = reducer.reduce(&data).unwrap();
        let second = reducer.reduce(&data).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn partition_covers_every_index_once() {
    for len in [0, 1, 5, 63, 64, 65, 10_000] {
        for workers in WORKER_COUNTS {
            let mut hits = vec![0u8; len];
            let mut last_end = 0;
            for chunk in partition(len, workers).unwrap() {
                assert!(chunk.start >= last_end);
                last_end = chunk.end;
                for i in chunk.range() {
                    hits[i] += 1;
                }
            }
            assert!(hits.iter().all(|&h| h == 1), "len = {len}, workers = {workers}");
        }
    }
}

#[test]
fn ten_million_elements_with_64_workers() {
    let data = generate(&DataConfig { len: 10_000_000, value_bound: 100_000, seed: 42 });
    let expected = SequentialReducer::new(19).unwrap().reduce(&data).unwrap();

    for reducer in parallel_reducers(19, 64) {
        assert_eq!(reducer.reduce(&data).unwrap(), expected, "{}", reducer.name());
    }
}

#[test]
fn huge_worker_count_agrees_with_sequential() {
    let data = [5, 19, -38, 7, 57];
    let expected = SequentialReducer::new(19).unwrap().reduce(&data).unwrap();
    assert_eq!(expected, Reduction { count: 3, min: Some(-38) });

    for reducer in parallel_reducers(19, usize::MAX) {
        assert_eq!(reducer.reduce(&data).unwrap(), expected, "{}", reducer.name());
    }
}
