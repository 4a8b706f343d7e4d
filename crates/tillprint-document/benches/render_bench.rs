// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for receipt rendering in the tillprint-document crate.
// Renders each sample receipt type with the default 80 mm layout; this is
// the work done on every print request before the spooler is called.

use chrono::{TimeZone, Utc};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use tillprint_core::ReceiptKind;
use tillprint_core::samples::sample;
use tillprint_document::{EscPosRenderer, ReceiptRenderer};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_render(c: &mut Criterion) {
    let renderer = EscPosRenderer::default();
    let now = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();

    for kind in ReceiptKind::ALL {
        let document = sample(kind, now);
        let receipt_type = kind.into();
        c.bench_function(&format!("render {kind}"), |b| {
            b.iter(|| black_box(renderer.render(black_box(&document), &receipt_type)));
        });
    }
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
