use dynlist_common::prelude::*;

#[test]
fn five_appends_grow_to_eight() {
    let mut list = DynList::<i32>::new();
    for i in 1..=5 {
        list.append(i);
    }
    assert_eq!(list.len(), 5);
    assert_eq!(list.capacity(), 8);
    assert_eq!(list, [1, 2, 3, 4, 5]);
}

#[test]
fn ten_element_sequence_rounds_to_sixteen() {
    let values: Vec<u32> = (0..10).collect();
    let list = DynList::<u32>::from_slice(&values);
    assert_eq!(list.len(), 10);
    assert_eq!(list.capacity(), 16);
}

#[test]
fn empty_sequence_gets_minimum_capacity() {
    let list = DynList::<u32>::from_slice(&[]);
    assert_eq!(list.len(), 0);
    assert_eq!(list.capacity(), 4);
}

#[test]
fn insert_far_past_end_appends() {
    let mut list = dynlist![1, 2, 3];
    list.insert_at(100, 99);
    assert_eq!(list, [1, 2, 3, 99]);
}

#[test]
fn equal_elements_different_capacity() {
    let a = dynlist![1, 2, 3];
    let mut b = DynList::<i32>::with_capacity(3);
    for value in [1, 2, 3] {
        b.append(value);
    }

    assert_eq!(a.capacity(), 4);
    assert_eq!(b.capacity(), 3);
    assert!(a.not_equals(&b));
    assert_ne!(a, b);
}

#[test]
fn appends_keep_order_and_count() {
    let mut list = DynList::<usize>::new();
    for i in 0..100 {
        list.append(i);
        assert_eq!(list.len(), i + 1);
        assert!(list.capacity() >= list.len());
    }
    assert!(list.iter().copied().eq(0..100));
}

#[test]
fn capacity_only_shrinks_on_trim() {
    let mut list = DynList::<u64>::new();
    let mut last_cap = 0;
    for i in 0..40 {
        list.append(i);
        if i % 3 == 0 {
            assert!(list.remove_at(0).is_ok());
        }
        list.insert_at(1, i);
        assert!(list.capacity() >= last_cap);
        last_cap = list.capacity();
    }

    list.clear();
    assert_eq!(list.capacity(), last_cap);

    list.trim_to_length();
    assert_eq!(list.capacity(), 0);
}

#[test]
fn append_range_grows_to_bulk_target() {
    let mut list = DynList::<i32>::with_capacity(6);
    list.append_range(&[1, 2, 3, 4, 5]);
    assert_eq!(list.capacity(), 8);

    let mut list = DynList::<i32>::with_capacity(100);
    list.append_range(&[1, 2, 3, 4, 5]);
    assert_eq!(list.capacity(), 100);
}

#[test]
fn snapshot_roundtrip() {
    let list = dynlist!["x".to_string(), "y".to_string(), "z".to_string()];
    let snapshot = list.to_snapshot();
    let rebuilt = DynList::<String>::from_slice(&snapshot);
    assert_eq!(rebuilt, ["x", "y", "z"].map(String::from));
    assert!(rebuilt.equals(&list));
}

#[test]
fn trim_twice_is_stable() {
    let mut list = dynlist![3, 1, 2, 9, 8];
    list.trim_to_length();
    let (len, cap) = (list.len(), list.capacity());
    list.trim_to_length();
    assert_eq!((list.len(), list.capacity()), (len, cap));
}

#[test]
fn remove_found_index() {
    let mut list = dynlist![4, 8, 15, 16, 23, 42];
    let index = list.index_of(&16).unwrap();
    assert_eq!(list.remove_at(index), Ok(16));
    assert!(!list.contains(&16));
    assert_eq!(list.len(), 5);

    assert_eq!(list.remove_value(&7), None);
    assert_eq!(list, [4, 8, 15, 23, 42]);
}

#[test]
fn binary_search_insertion_keeps_sorted() {
    let mut list = dynlist![50, 10, 40, 20];
    list.sort_in_place();

    for value in [0, 30, 45, 60, 10] {
        match list.binary_search(&value) {
            Ok(index) => assert_eq!(list[index], value),
            Err(index) => list.insert_at(index, value),
        }
        assert!(list.windows(2).all(|pair| pair[0] <= pair[1]));
    }
    assert_eq!(list, [0, 10, 20, 30, 40, 45, 50, 60]);
}

#[test]
fn errors_are_reported() {
    let mut list = dynlist!['a', 'b'];
    let err = list.get(2).unwrap_err();
    assert_eq!(err, ListError::IndexOutOfRange { index: 2, len: 2 });
    assert_eq!(err.to_string(), "index (is 2) should be < len (is 2)");

    assert!(list.remove_at(5).is_err());
    assert!(list.set(3, 'c').is_err());
    assert_eq!(list, ['a', 'b']);

    let mut list = DynList::<u64>::new();
    assert_eq!(list.try_append_range(&[]), Ok(()));
    assert_eq!(list.try_reserve(usize::MAX), Err(TryReserveError::CapacityOverflow));
}

#[test]
fn concat_fits_exactly() {
    let a = dynlist![1, 2];
    let b: DynList<i32> = (3..=7).collect();
    let c = DynList::concat(&a, &b);
    assert_eq!(c, [1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(c.capacity(), 7);
}

#[test]
fn send_across_threads() {
    let list = dynlist![1u32, 2, 3];
    let handle = std::thread::spawn(move || list.iter().sum::<u32>());
    assert_eq!(handle.join().unwrap(), 6);
}
