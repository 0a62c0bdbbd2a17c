use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlweave::{Db, Formatter, Fragment, IntoArg, Postgres, QueryAppender, SqlBuf, bufpool, ident};

/// Column template with `n` CHECK clauses, each binding one value:
/// ? INT CHECK (? <> ?) CHECK (? <> ?) ...
fn column_template(n: usize) -> String {
    let mut template = String::from("? INT");
    for _ in 0..n {
        template.push_str(" CHECK (? <> ?)");
    }
    template
}

fn column_fragment(n: usize) -> Fragment {
    let mut args = vec![ident("c").into_arg()];
    for i in 0..n {
        args.push(ident("c").into_arg());
        args.push((i as i64).into_arg());
    }
    Fragment::expr(column_template(n), args).unwrap()
}

fn bench_render_fragment(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_column/render_fragment");
    let fmter = Formatter::new(Postgres);

    for n in [0, 1, 10, 50] {
        let fragment = column_fragment(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &fragment, |b, fragment| {
            b.iter(|| {
                let mut buf = bufpool::acquire();
                fragment.append_query(&fmter, &mut buf).unwrap();
                black_box(buf.sql().len());
            });
        });
    }

    group.finish();
}

fn bench_pooled_vs_fresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_column/buffer");
    let fmter = Formatter::new(Postgres);
    let fragment = column_fragment(10);

    group.bench_function("pooled", |b| {
        b.iter(|| {
            let mut buf = bufpool::acquire();
            fragment.append_query(&fmter, &mut buf).unwrap();
            black_box(buf.sql().len());
        });
    });

    group.bench_function("fresh", |b| {
        b.iter(|| {
            let mut buf = SqlBuf::new();
            fragment.append_query(&fmter, &mut buf).unwrap();
            black_box(buf.sql().len());
        });
    });

    group.finish();
}

fn bench_build_statement(c: &mut Criterion) {
    let db = Db::new((), Postgres);

    c.bench_function("add_column/build", |b| {
        b.iter(|| {
            let built = db
                .new_add_column()
                .table("public.users")
                .column_expr("? INT NOT NULL DEFAULT ?", (ident("age"), 18))
                .build()
                .unwrap();
            black_box(built);
        });
    });
}

criterion_group!(
    benches,
    bench_render_fragment,
    bench_pooled_vs_fresh,
    bench_build_statement
);
criterion_main!(benches);
