// Test intent: verifies plans and scales built on independent threads match a sequential build.
#![cfg(feature = "std")]

use std::thread;

use vkplan::{forward_scale, inverse_scale, ElementType, PlanConfig, PlanParams, Scale};

fn build(n: usize) -> (PlanConfig, Scale, Scale) {
    let cfg = PlanParams::new()
        .ndim(2)
        .build(&[3, n, n + 1], ElementType::C128)
        .unwrap();
    let f = forward_scale(&cfg);
    let i = inverse_scale(&cfg);
    (cfg, f, i)
}

#[test]
fn threads_agree_with_sequential() {
    let sizes: Vec<usize> = (2..66).collect();
    let expected: Vec<_> = sizes.iter().map(|&n| build(n)).collect();

    let handles: Vec<_> = sizes
        .chunks(8)
        .map(|chunk| {
            let chunk = chunk.to_vec();
            thread::spawn(move || chunk.into_iter().map(build).collect::<Vec<_>>())
        })
        .collect();
    let got: Vec<_> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    assert_eq!(got, expected);
}

#[test]
fn configs_are_shareable() {
    let (cfg, f, _) = build(16);
    let cfg = std::sync::Arc::new(cfg);
    let scales: Vec<Scale> = (0..4)
        .map(|_| {
            let cfg = cfg.clone();
            thread::spawn(move || forward_scale(&cfg))
        })
        .map(|h| h.join().unwrap())
        .collect();
    assert!(scales.iter().all(|&s| s == f));
}
