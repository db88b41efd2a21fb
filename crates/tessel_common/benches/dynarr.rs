use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tessel_common::{collections::DynArr, dynarr};

fn dynarr_new(c: &mut Criterion) {
    c.bench_function("DynArr::new", |b| b.iter(|| {
        DynArr::<u32>::new()
    }));
    c.bench_function("Vec::new", |b| b.iter(|| {
        Vec::<u32>::new()
    }));
    c.bench_function("DynArr::with_capacity(64)", |b| b.iter(|| {
        DynArr::<u32>::with_capacity(64)
    }));
    c.bench_function("Vec::with_capacity(64)", |b| b.iter(|| {
        Vec::<u32>::with_capacity(64)
    }));
}

fn dynarr_reserve(c: &mut Criterion) {
    c.bench_function("DynArr::reserve(32)", |b| b.iter(|| {
        let mut arr = DynArr::<u32>::new();
        arr.reserve(32);
        arr
    }));
    c.bench_function("Vec::reserve(32)", |b| b.iter(|| {
        let mut arr = Vec::<u32>::new();
        arr.reserve(32);
        arr
    }));
}

fn dynarr_push(c: &mut Criterion) {
    c.bench_function("DynArr::push(100) no reserve", |b| b.iter(|| {
        let mut arr = DynArr::<u32>::new();
        for i in 0..100 {
            arr.push(i);
        }
        arr
    }));
    c.bench_function("DynArr::push(100) reserve", |b| b.iter(|| {
        let mut arr = DynArr::<u32>::new();
        arr.reserve(100);
        for i in 0..100 {
            arr.push(i);
        }
        arr
    }));
    c.bench_function("Vec::push(100) no reserve", |b| b.iter(|| {
        let mut arr = Vec::<u32>::new();
        for i in 0..100 {
            arr.push(i);
        }
        arr
    }));
    c.bench_function("Vec::push(100) reserve", |b| b.iter(|| {
        let mut arr = Vec::<u32>::new();
        arr.reserve(100);
        for i in 0..100 {
            arr.push(i);
        }
        arr
    }));
}

fn dynarr_insert(c: &mut Criterion) {
    c.bench_function("DynArr::insert(0) x100", |b| b.iter(|| {
        let mut arr = DynArr::<u32>::with_capacity(100);
        for i in 0..100 {
            arr.insert(0, i);
        }
        arr
    }));
    c.bench_function("Vec::insert(0) x100", |b| b.iter(|| {
        let mut arr = Vec::<u32>::with_capacity(100);
        for i in 0..100 {
            arr.insert(0, i);
        }
        arr
    }));
}

fn dynarr_clone(c: &mut Criterion) {
    let arr = dynarr![5u32; 1000];
    c.bench_function("DynArr::clone(1000)", |b| b.iter(|| {
        black_box(&arr).clone()
    }));

    let vbuf = vec![5u32; 1000];
    c.bench_function("Vec::clone(1000)", |b| b.iter(|| {
        black_box(&vbuf).clone()
    }));
}

fn dynarr_index(c: &mut Criterion) {
    let arr = dynarr![5; 100];
    c.bench_function("DynArr::index(100)", |b| b.iter(|| {
        for i in 0..100 {
            black_box(arr[i]);
        }
    }));

    let vbuf = vec![5; 100];
    c.bench_function("Vec::index(100)", |b| b.iter(|| {
        for i in 0..100 {
            black_box(vbuf[i]);
        }
    }));
}

criterion_group!(dynarr,
    dynarr_new,
    dynarr_reserve,
    dynarr_push,
    dynarr_insert,
    dynarr_clone,
    dynarr_index
);
criterion_main!(dynarr);
