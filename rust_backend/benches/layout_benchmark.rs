use atlas_rust::algorithms::layout;
use atlas_rust::config::{ViewConfig, DEFAULT_DOMAIN};
use atlas_rust::core::domain::{RawRecord, ViewportState};
use atlas_rust::parsing::parse_date_range;
use atlas_rust::render::color::ContinentPalette;
use atlas_rust::render::{render, RecordingSurface, TimeScale};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const CONTINENTS: [&str; 5] = ["África", "Asia", "Europa", "América del Sur", "Oceanía"];
const CHRONOLOGIES: [&str; 6] = [
    "3500-2000 a.C.",
    "c. 1200 a.C.",
    "s. V a.C.",
    "200 a.C. - 400 d.C.",
    "ca. 500-300 a.C.",
    "desconocida",
];

fn synthetic_records(n: usize) -> Vec<RawRecord> {
    (0..n)
        .map(|i| {
            RawRecord::new(
                CONTINENTS[i % CONTINENTS.len()],
                format!("Cultura {}", i),
                CHRONOLOGIES[i % CHRONOLOGIES.len()],
            )
            .with_region(format!("Región {}", i % 7))
            .with_technology(if i % 3 == 0 { "Bronce y hierro" } else { "Piedra" })
            .with_architecture(if i % 4 == 0 { "Templos y murallas" } else { "" })
            .with_writing(if i % 5 == 0 { "Cuneiforme" } else { "No" })
        })
        .collect()
}

fn bench_chronology_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("chronology_parsing");

    for text in CHRONOLOGIES {
        group.bench_with_input(BenchmarkId::new("parse_date_range", text), &text, |b, input| {
            b.iter(|| parse_date_range(black_box(input)));
        });
    }

    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let palette = ContinentPalette::default();

    for size in [50, 300, 1000] {
        let records = synthetic_records(size);
        for (name, config) in [("strata", ViewConfig::strata()), ("rivers", ViewConfig::rivers())] {
            group.bench_with_input(BenchmarkId::new(name, size), &records, |b, records| {
                b.iter(|| layout(black_box(records), &config.layout, &palette));
            });
        }
    }

    group.finish();
}

/// Full frame: layout already computed, draw every element once.
fn bench_render_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_frame");
    let palette = ContinentPalette::default();
    let viewport = ViewportState::new(DEFAULT_DOMAIN);

    for size in [300, 1000] {
        let records = synthetic_records(size);
        let config = ViewConfig::strata();
        let result = layout(&records, &config.layout, &palette);
        let plot = config.render.plot_area(1200.0, result.content_height);
        let scale = TimeScale::for_plot(viewport.domain, &plot);

        group.bench_with_input(BenchmarkId::new("strata", size), &result, |b, result| {
            b.iter(|| {
                let mut surface = RecordingSurface::new(1200.0, result.content_height);
                black_box(render(&mut surface, &scale, &viewport, result, &config.render))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_chronology_parsing,
    bench_layout,
    bench_render_frame
);
criterion_main!(benches);
