use criterion::{black_box, criterion_group, criterion_main, Criterion};

use asciitree_png::{layout, parse, FontSource, LayoutMode, Renderer, Theme};

/// A three-level tree with `n` branches of five leaves each.
fn big_tree(n: usize) -> String {
    let mut text = String::from("workspace/\n");
    for i in 0..n {
        let last = i + 1 == n;
        text.push_str(if last { "└── " } else { "├── " });
        text.push_str(&format!("crate_{i}/\n"));
        for j in 0..5 {
            text.push_str(if last { "    " } else { "│   " });
            text.push_str(if j == 4 { "└── " } else { "├── " });
            text.push_str(&format!("module_{j}.rs\n"));
        }
    }
    text
}

fn bench_parse_layout(c: &mut Criterion) {
    let text = big_tree(40);
    let theme = Theme::default();
    c.bench_function("parse_layout_240_nodes", |b| {
        b.iter(|| {
            let root = parse(black_box(&text)).unwrap();
            layout(&root, 1080, 24, &theme)
        })
    });
}

fn bench_rasterize(c: &mut Criterion) {
    let root = parse(&big_tree(10)).unwrap();
    let mut group = c.benchmark_group("rasterize");
    group.sample_size(10);
    for (name, mode) in [("list", LayoutMode::Horizontal), ("columns", LayoutMode::Vertical)] {
        let theme = Theme {
            layout_mode: mode,
            ..Theme::preset("business", 24)
        };
        let scene = layout(&root, 1080, 24, &theme);
        let mut renderer = Renderer::new(FontSource::Builtin);
        group.bench_function(name, |b| b.iter(|| renderer.rasterize(black_box(&scene), 1080)));
    }
    group.finish();
}

criterion_group!(benches, bench_parse_layout, bench_rasterize);
criterion_main!(benches);
