use std::collections::HashSet;

use super::Handle;

#[test]
fn null_is_no_handle() {
    assert!(Handle::<u8>::from_raw(std::ptr::null_mut()).is_none());
}

#[test]
fn equality_is_identity() {
    let mut a = 1u32;
    let mut b = 1u32;
    let ha = Handle::from_raw(&mut a as *mut u32);
    let hb = Handle::from_raw(&mut b as *mut u32);
    assert_eq!(ha, Handle::from_raw(&mut a as *mut u32));
    assert_ne!(ha, hb);

    let set: HashSet<_> = [ha, hb, ha].into_iter().flatten().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn nullable_round_trips() {
    let mut value = 7i64;
    let ptr = &mut value as *mut i64;
    assert_eq!(Handle::nullable(Handle::from_raw(ptr)), ptr);
    assert!(Handle::<i64>::nullable(None).is_null());
}
