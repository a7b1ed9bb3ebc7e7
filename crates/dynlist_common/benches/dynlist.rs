use criterion::{black_box, criterion_group, criterion_main, Criterion};

use dynlist_common::{collections::*, dynlist};

fn dynlist_new(c: &mut Criterion) {
    c.bench_function("DynList::new", |b| b.iter(|| {
        DynList::<u32>::new()
    }));
    c.bench_function("Vec::new", |b| b.iter(|| {
        Vec::<u32>::new()
    }));
    c.bench_function("DynList::with_capacity(64)", |b| b.iter(|| {
        DynList::<u32>::with_capacity(64)
    }));
    c.bench_function("Vec::with_capacity(64)", |b| b.iter(|| {
        Vec::<u32>::with_capacity(64)
    }));
}

fn dynlist_append(c: &mut Criterion) {
    c.bench_function("DynList::append(100) no reserve", |b| b.iter(|| {
        let mut list = DynList::<u32>::new();
        for i in 0..100 {
            list.append(i);
        }
        list
    }));
    c.bench_function("DynList::append(100) reserve", |b| b.iter(|| {
        let mut list = DynList::<u32>::new();
        list.reserve(100);
        for i in 0..100 {
            list.append(i);
        }
        list
    }));

    c.bench_function("Vec::push(100) no reserve", |b| b.iter(|| {
        let mut vec = Vec::<u32>::new();
        for i in 0..100 {
            vec.push(i);
        }
        vec
    }));
    c.bench_function("Vec::push(100) reserve", |b| b.iter(|| {
        let mut vec = Vec::<u32>::new();
        vec.reserve(100);
        for i in 0..100 {
            vec.push(i);
        }
        vec
    }));
}

fn dynlist_append_range(c: &mut Criterion) {
    let values: Vec<u32> = (0..dynlist_base::KiB(1) as u32).collect();

    c.bench_function("DynList::append_range(1KiB)", |b| b.iter(|| {
        let mut list = DynList::<u32>::new();
        list.append_range(black_box(&values));
        list
    }));
    c.bench_function("Vec::extend_from_slice(1KiB)", |b| b.iter(|| {
        let mut vec = Vec::<u32>::new();
        vec.extend_from_slice(black_box(&values));
        vec
    }));
}

fn dynlist_insert_remove(c: &mut Criterion) {
    c.bench_function("DynList::insert_at(0) + remove_at(0)", |b| {
        let mut list = dynlist![0u32; 256];
        b.iter(|| {
            list.insert_at(0, black_box(1));
            black_box(list.remove_at(0))
        })
    });
    c.bench_function("Vec::insert(0) + remove(0)", |b| {
        let mut vec = vec![0u32; 256];
        b.iter(|| {
            vec.insert(0, black_box(1));
            black_box(vec.remove(0))
        })
    });
}

fn dynlist_index(c: &mut Criterion) {
    let list = dynlist![5; 100];
    c.bench_function("DynList::index(100)", |b| b.iter(|| {
        for i in 0..100 {
            black_box(list[i]);
        }
    }));

    let vbuf = vec![5; 100];
    c.bench_function("Vec::index(100)", |b| b.iter(|| {
        for i in 0..100 {
            black_box(vbuf[i]);
        }
    }));
}

fn dynlist_search(c: &mut Criterion) {
    let list: DynList<u32> = (0..1000).collect();
    c.bench_function("DynList::index_of(999)", |b| b.iter(|| {
        list.index_of(black_box(&999))
    }));
    c.bench_function("DynList::binary_search(999)", |b| b.iter(|| {
        list.binary_search(black_box(&999))
    }));
}

criterion_group!(benches,
    dynlist_new,
    dynlist_append,
    dynlist_append_range,
    dynlist_insert_remove,
    dynlist_index,
    dynlist_search
);
criterion_main!(benches);
