use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use doc_structure::{Block, CaptionFootnoteEngine, LayoutLevelEngine};

// Helper to generate a realistic extracted-block sequence: numbered
// headings, paragraphs, and captioned tables/figures with footnotes.
fn generate_blocks(section_count: usize) -> Vec<Block> {
    let mut blocks = Vec::new();
    for section in 0..section_count {
        blocks.push(
            Block::text(format!("{}.{} Section heading", section / 4 + 1, section % 4 + 1))
                .with_heading_level(1),
        );
        blocks.push(Block::text(
            "A body paragraph describing the experiment in enough words to be realistic.",
        ));
        if section % 3 == 0 {
            blocks.push(Block::text(format!("Table {} Measured values", section + 1)));
            blocks.push(Block::table("| run | value |\n| 1 | 0.42 |"));
            blocks.push(Block::text("注：数据为平均值"));
        }
        if section % 4 == 0 {
            blocks.push(Block::image(format!("figures/fig{section}.png")));
            blocks.push(Block::text(format!("Figure {} Apparatus", section + 1)));
        }
    }
    for (i, block) in blocks.iter_mut().enumerate() {
        block.position = i;
        block.document_id = "bench.docx".to_string();
    }
    blocks
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("caption_merge");
    for sections in [10, 100, 500] {
        let blocks = generate_blocks(sections);
        let engine = CaptionFootnoteEngine::new();
        group.bench_with_input(
            BenchmarkId::from_parameter(sections),
            &blocks,
            |b, blocks| b.iter(|| engine.merge(black_box(blocks.clone()))),
        );
    }
    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_classify");
    for sections in [10, 100, 500] {
        let blocks = generate_blocks(sections);
        let engine = LayoutLevelEngine::new();
        group.bench_with_input(
            BenchmarkId::from_parameter(sections),
            &blocks,
            |b, blocks| b.iter(|| engine.classify(black_box(blocks.clone()))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_merge, bench_classify);
criterion_main!(benches);
