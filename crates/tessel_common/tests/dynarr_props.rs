use proptest::prelude::*;

use tessel_common::collections::DynArr;

fn arb_values() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(any::<i32>(), 0..64)
}

proptest! {
    #[test]
    fn push_increments_len(values in arb_values()) {
        let mut arr = DynArr::new();
        for (i, value) in values.iter().enumerate() {
            arr.push(*value);
            prop_assert_eq!(arr.len(), i + 1);
            prop_assert!(arr.capacity() >= arr.len());
        }
        prop_assert_eq!(arr.as_slice(), values.as_slice());
    }

    #[test]
    fn growth_doubles_or_takes_one(count in 0usize..300) {
        let mut arr = DynArr::<u8>::new();
        let mut expected = 0usize;
        for i in 0..count {
            if arr.len() == expected {
                expected = usize::max(1, expected * 2);
            }
            arr.push(i as u8);
            prop_assert_eq!(arr.capacity(), expected);
        }
    }

    #[test]
    fn insert_then_erase_is_identity(values in arb_values(), pos in any::<prop::sample::Index>(), value in any::<i32>()) {
        let mut arr = DynArr::<i32>::from(values.as_slice());
        let index = pos.index(values.len() + 1);

        prop_assert_eq!(arr.insert(index, value), index);
        prop_assert_eq!(arr.len(), values.len() + 1);
        prop_assert_eq!(arr[index], value);

        prop_assert_eq!(arr.erase(index), index);
        prop_assert_eq!(arr.as_slice(), values.as_slice());
    }

    #[test]
    fn erase_range_then_reinsert_is_identity(values in arb_values(), a in any::<prop::sample::Index>(), b in any::<prop::sample::Index>()) {
        let mut arr = DynArr::<i32>::from(values.as_slice());
        let (mut first, mut last) = (a.index(values.len() + 1), b.index(values.len() + 1));
        if first > last {
            core::mem::swap(&mut first, &mut last);
        }

        let removed: DynArr<i32> = DynArr::from(&arr[first..last]);
        prop_assert_eq!(arr.erase_range(first..last), first);
        prop_assert_eq!(arr.len(), values.len() - (last - first));

        arr.insert_from_slice(first, &removed);
        prop_assert_eq!(arr.as_slice(), values.as_slice());
    }

    #[test]
    fn copies_are_independent(values in arb_values(), extra in any::<i32>()) {
        let original = DynArr::<i32>::from(values.as_slice());
        let mut copy = original.clone();
        prop_assert_eq!(&copy, &original);

        copy.push(extra);
        copy.reverse();
        prop_assert_eq!(original.as_slice(), values.as_slice());

        let mut original = original;
        let copy = original.clone();
        original.push(extra);
        for value in original.iter_mut() {
            *value = value.wrapping_add(1);
        }
        original.erase(0);
        prop_assert_eq!(copy.as_slice(), values.as_slice());
    }

    #[test]
    fn move_leaves_source_empty(values in arb_values(), other in arb_values()) {
        let mut source = DynArr::<i32>::from(values.as_slice());
        let mut target = DynArr::<i32>::from(other.as_slice());

        target.move_assign(&mut source);
        prop_assert_eq!(target.as_slice(), values.as_slice());
        prop_assert!(source.is_empty());
        prop_assert_eq!(source.capacity(), 0);

        let taken = target.take();
        prop_assert_eq!(taken.as_slice(), values.as_slice());
        prop_assert!(target.is_empty());
    }

    #[test]
    fn resize_keeps_prefix(values in arb_values(), new_len in 0usize..96, fill in any::<i32>()) {
        let mut arr = DynArr::<i32>::from(values.as_slice());
        let capacity = arr.capacity();
        arr.resize(new_len, fill);

        prop_assert_eq!(arr.len(), new_len);
        let kept = usize::min(new_len, values.len());
        prop_assert_eq!(&arr[..kept], &values[..kept]);
        prop_assert!(arr[kept..].iter().all(|v| *v == fill));
        if new_len <= values.len() {
            prop_assert_eq!(arr.capacity(), capacity);
        }
    }
}
