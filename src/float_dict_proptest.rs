#![cfg(test)]

// Property tests for FloatDict kept inside the crate so they can check the
// RawTable invariants (tombstones, span) without a feature gate.

use crate::float_dict::FloatDict;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

type Model = BTreeMap<u64, i32>;

fn bits(k: f64) -> u64 {
    k.to_bits()
}

// -0.0 and 0.0 are one key in the dictionary; keep the model's bit keys
// consistent by folding them.
fn normalize(k: f64) -> f64 {
    if k == 0.0 {
        0.0
    } else {
        k
    }
}

fn arb_key() -> impl Strategy<Value = f64> {
    prop_oneof![
        // whole numbers: hash to themselves
        (-40i32..40).prop_map(f64::from),
        // multiples of 8: all start at the same slot of a small table
        (0u32..12).prop_map(|m| f64::from(m * 8)),
        // fractional keys through the mantissa path
        (-1000.0f64..1000.0),
    ]
    .prop_map(normalize)
}

// Pool-indexed operations: indices shrink toward earlier keys.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(f64),
    Merge(Vec<(usize, i32)>),
    Copy,
    MinMax,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<f64>, Vec<Op>)> {
    proptest::collection::vec(arb_key(), 1..=16).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
            2 => idx.clone().prop_map(Op::Remove),
            1 => idx.clone().prop_map(Op::Get),
            1 => arb_key().prop_map(Op::Contains),
            1 => proptest::collection::vec((idx.clone(), any::<i32>()), 0..8).prop_map(Op::Merge),
            1 => Just(Op::Copy),
            1 => Just(Op::MinMax),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn check_structure(sut: &FloatDict, model: &Model) -> Result<(), TestCaseError> {
    let raw = sut.raw();
    let cap = raw.capacity();
    prop_assert!(cap.is_power_of_two() && cap >= 8);
    prop_assert_eq!(sut.len(), model.len());
    prop_assert!(raw.len() * 3 <= cap * 2, "load factor exceeded");
    prop_assert!(
        (raw.len() + raw.tombstones()) * 3 <= cap * 2,
        "tombstone fill exceeded"
    );
    match raw.span() {
        None => prop_assert!(model.is_empty()),
        Some(span) => {
            prop_assert!(span.first <= span.last && span.last < cap);
            prop_assert!(raw.entry_at(span.first).is_some());
            prop_assert!(raw.entry_at(span.last).is_some());
        }
    }
    Ok(())
}

// Property: state-machine equivalence against a BTreeMap keyed by f64 bits.
// Invariants exercised after every op:
// - round trip: every model entry is found with its latest value;
// - len parity, load factor (live and live+tombstones), span bounds;
// - iteration yields exactly the live entries, once each;
// - merge: union with the merged-in values winning;
// - copy: the copy answers like its source.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: FloatDict = FloatDict::new();
        let mut model: Model = Model::new();

        for op in ops {
            match op {
                Op::Insert(i, v) => {
                    let k = pool[i];
                    let prev = sut.insert(k, v);
                    prop_assert_eq!(prev, model.insert(bits(k), v));
                }
                Op::Remove(i) => {
                    let k = pool[i];
                    let before = sut.len();
                    let got = sut.remove(k);
                    prop_assert_eq!(got, model.remove(&bits(k)));
                    prop_assert!(!sut.contains_key(k));
                    prop_assert_eq!(sut.len(), before - usize::from(got.is_some()));
                }
                Op::Get(i) => {
                    let k = pool[i];
                    prop_assert_eq!(sut.get(k), model.get(&bits(k)));
                    prop_assert_eq!(sut.contains_key(k), model.contains_key(&bits(k)));
                }
                Op::Contains(k) => {
                    prop_assert_eq!(sut.contains_key(k), model.contains_key(&bits(k)));
                }
                Op::Merge(entries) => {
                    let mut other: FloatDict = FloatDict::new();
                    for (i, v) in entries {
                        other.insert(pool[i], v);
                    }
                    for (k, v) in other.iter() {
                        model.insert(bits(k), *v);
                    }
                    sut.merge(&other);
                }
                Op::Copy => {
                    let mut copy: FloatDict = FloatDict::with_capacity(8 << (sut.len() % 4));
                    copy.insert(12345.5, 1);
                    copy.copy_from(&sut);
                    check_structure(&copy, &model)?;
                    for &k in &pool {
                        prop_assert_eq!(copy.get(k), sut.get(k));
                    }
                    sut = copy;
                }
                Op::MinMax => {
                    let keys: Vec<f64> = model.keys().map(|&b| f64::from_bits(b)).collect();
                    let min = keys.iter().copied().min_by(|a, b| a.total_cmp(b));
                    let max = keys.iter().copied().max_by(|a, b| a.total_cmp(b));
                    prop_assert_eq!(sut.min_key(), min);
                    prop_assert_eq!(sut.max_key(), max);
                }
                Op::Iterate => {
                    let seen: Vec<(u64, i32)> = sut.iter().map(|(k, v)| (bits(k), *v)).collect();
                    let unique: BTreeSet<u64> = seen.iter().map(|&(k, _)| k).collect();
                    prop_assert_eq!(unique.len(), seen.len(), "duplicate key in iteration");
                    let as_map: Model = seen.into_iter().collect();
                    prop_assert_eq!(&as_map, &model);
                }
            }

            check_structure(&sut, &model)?;
            for (&b, v) in &model {
                prop_assert_eq!(sut.get(f64::from_bits(b)), Some(v));
            }
        }
    }
}
