#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;
use std::ops::ControlFlow;
use tail_sampler::replay::{parse_line, replay};
use tail_sampler::TailDecider;

fuzz_target!(|data: &[u8]| {
    // Single-line parsing must never panic
    if let Ok(input) = std::str::from_utf8(data) {
        let _ = parse_line(1, input);
    }

    // Neither may a full replay over raw bytes; only I/O can fail on an
    // in-memory reader
    let decider = TailDecider::new();
    let report = replay(&decider, Cursor::new(data), |_| ControlFlow::Continue(())).unwrap();
    assert_eq!(report.total, report.retained + report.dropped);
});
