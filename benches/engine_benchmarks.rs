//! Benchmarks for the decision core: table construction, move generation,
//! evaluation, and search.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use minimax_chess::board::{
    evaluate_fresh, find_best_move, find_best_move_parallel, Board, EvalMode, Evaluator,
    SearchLimits, Square, Tables,
};

/// 1. e4 e5 2. Nf3 Nc6: a light middlegame with captures on the horizon.
fn open_game(tables: &Tables) -> Board {
    let mut board = Board::initial(tables);
    for (from, to) in [
        (Square::new(1, 4), Square::new(3, 4)),
        (Square::new(6, 4), Square::new(4, 4)),
        (Square::new(0, 6), Square::new(2, 5)),
        (Square::new(7, 1), Square::new(5, 2)),
    ] {
        let mv = board
            .legal_moves(tables)
            .unwrap()
            .into_iter()
            .find(|m| m.from == from && m.to == to)
            .unwrap();
        board.apply(tables, mv).unwrap();
    }
    board
}

fn bench_tables(c: &mut Criterion) {
    c.bench_function("tables/build", |b| b.iter(|| black_box(Tables::new())));
}

fn bench_movegen(c: &mut Criterion) {
    let tables = Tables::global();
    let mut group = c.benchmark_group("movegen");

    let mut startpos = Board::initial(tables);
    group.bench_function("startpos", |b| {
        b.iter(|| black_box(startpos.legal_moves(tables).unwrap()))
    });

    let mut middlegame = open_game(tables);
    group.bench_function("open_game", |b| {
        b.iter(|| black_box(middlegame.legal_moves(tables).unwrap()))
    });

    group.finish();
}

fn bench_eval(c: &mut Criterion) {
    let tables = Tables::global();
    let board = open_game(tables);
    let mut group = c.benchmark_group("eval");

    for mode in [EvalMode::Lazy, EvalMode::Normal, EvalMode::Eager] {
        group.bench_with_input(
            BenchmarkId::new("fresh", format!("{mode:?}")),
            &mode,
            |b, &mode| b.iter(|| black_box(evaluate_fresh(&board, tables, mode))),
        );
    }

    let mut evaluator = Evaluator::new();
    evaluator.evaluate(&board, tables, EvalMode::Eager);
    group.bench_function("memoized", |b| {
        b.iter(|| black_box(evaluator.evaluate(&board, tables, EvalMode::Eager)))
    });

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let tables = Tables::global();
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    for depth in 1..=3u32 {
        group.bench_with_input(BenchmarkId::new("serial", depth), &depth, |b, &depth| {
            let limits = SearchLimits {
                max_depth: depth,
                ..SearchLimits::default()
            };
            b.iter(|| {
                let mut board = open_game(tables);
                let mut evaluator = Evaluator::new();
                black_box(find_best_move(&mut board, tables, &mut evaluator, &limits).unwrap())
            })
        });
    }

    group.bench_function("parallel_depth_3", |b| {
        let limits = SearchLimits {
            max_depth: 3,
            ..SearchLimits::default()
        };
        let board = open_game(tables);
        b.iter(|| black_box(find_best_move_parallel(&board, tables, &limits).unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_tables, bench_movegen, bench_eval, bench_search);
criterion_main!(benches);
