// Test intent: verifies the approximate-normalization warning for DCT types 1 to 3.
#![cfg(feature = "std")]

use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

use log::LevelFilter;
use vkplan::{
    forward_scale, inverse_scale, is_dct_norm_approximate, DctType, ElementType, NormMode,
    PlanParams,
};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn take(&self) -> String {
        let mut buf = self.0.lock().unwrap();
        let out = String::from_utf8_lossy(&buf).into_owned();
        buf.clear();
        out
    }
}

impl Write for Captured {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn captured() -> &'static Captured {
    static LOGS: OnceLock<Captured> = OnceLock::new();
    LOGS.get_or_init(|| {
        let logs = Captured::default();
        env_logger::Builder::new()
            .filter_level(LevelFilter::Warn)
            .target(env_logger::Target::Pipe(Box::new(logs.clone())))
            .init();
        logs
    })
}

// Single test so the shared log buffer is never read concurrently.
#[test]
fn warns_only_for_approximate_dct_scales() {
    let logs = captured();
    logs.take();

    for t in [DctType::Dct1, DctType::Dct2, DctType::Dct3] {
        let cfg = PlanParams::new()
            .dct(t)
            .build(&[8, 8], ElementType::F32)
            .unwrap();
        assert!(is_dct_norm_approximate(&cfg));
        forward_scale(&cfg);
        let out = logs.take();
        let tag = format!("DCT{}", t.number());
        assert!(out.contains(&tag), "no warning for {tag}: {out:?}");
        assert!(out.contains("approximate"));

        inverse_scale(&cfg);
        assert!(logs.take().contains(&tag));
    }

    // Orthonormal scales still come from an approximate DCT normalisation.
    let cfg = PlanParams::new()
        .dct(2u32)
        .norm(NormMode::Orthonormal)
        .build(&[16], ElementType::F64)
        .unwrap();
    forward_scale(&cfg);
    assert!(logs.take().contains("DCT2"));

    let dct4 = PlanParams::new()
        .dct(4u32)
        .build(&[8, 8], ElementType::F32)
        .unwrap();
    assert!(!is_dct_norm_approximate(&dct4));
    forward_scale(&dct4);
    inverse_scale(&dct4);
    let c2c = PlanParams::new().build(&[8, 8], ElementType::C64).unwrap();
    forward_scale(&c2c);
    inverse_scale(&c2c);
    assert_eq!(logs.take(), "");
}
