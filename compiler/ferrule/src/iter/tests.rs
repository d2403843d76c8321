use std::ptr;

use pretty_assertions::assert_eq;

use super::PointerIter;
use crate::handle::Handle;

/// Node of a synthetic singly linked chain. A null `next` is the sentinel
/// terminal.
struct Node {
    label: &'static str,
    next: *mut Node,
}

fn advance(node: Handle<Node>) -> Option<Handle<Node>> {
    Handle::from_raw(unsafe { (*node.as_ptr()).next })
}

fn label(node: Handle<Node>) -> &'static str {
    unsafe { (*node.as_ptr()).label }
}

#[test]
fn three_node_chain_yields_three_then_stops() {
    let mut c = Node {
        label: "c",
        next: ptr::null_mut(),
    };
    let mut b = Node { label: "b", next: &mut c };
    let mut a = Node { label: "a", next: &mut b };

    let mut iter = PointerIter::new(Handle::from_raw(&mut a as *mut Node), advance, label);
    assert_eq!(iter.next(), Some("a"));
    assert_eq!(iter.next(), Some("b"));
    assert_eq!(iter.next(), Some("c"));
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next(), None);
}

#[test]
fn empty_start_yields_nothing() {
    let mut iter = PointerIter::new(None, advance, label);
    assert_eq!(iter.next(), None);
    assert_eq!(iter.size_hint(), (0, Some(0)));
}

#[test]
fn chain_of_n_nodes_yields_n_in_order() {
    for len in 0..8usize {
        let mut nodes: Vec<Box<Node>> = (0..len)
            .map(|_| {
                Box::new(Node {
                    label: "n",
                    next: ptr::null_mut(),
                })
            })
            .collect();
        for i in (0..len.saturating_sub(1)).rev() {
            let next: *mut Node = &mut *nodes[i + 1];
            nodes[i].next = next;
        }
        let start = nodes.first_mut().and_then(|n| Handle::from_raw(&mut **n as *mut Node));
        let addresses: Vec<*mut Node> = PointerIter::new(start, advance, Handle::as_ptr).collect();
        let expected: Vec<*mut Node> = nodes.iter_mut().map(|n| &mut **n as *mut Node).collect();
        assert_eq!(addresses, expected);
    }
}

#[test]
fn wrap_runs_lazily() {
    let mut b = Node {
        label: "b",
        next: ptr::null_mut(),
    };
    let mut a = Node { label: "a", next: &mut b };
    let mut wrapped = 0;

    let mut iter = PointerIter::new(Handle::from_raw(&mut a as *mut Node), advance, |node| {
        wrapped += 1;
        label(node)
    });
    assert_eq!(iter.next(), Some("a"));
    drop(iter);
    assert_eq!(wrapped, 1);
}

#[test]
fn yielded_node_can_be_unlinked() {
    let mut c = Node {
        label: "c",
        next: ptr::null_mut(),
    };
    let mut b = Node { label: "b", next: &mut c };
    let mut a = Node { label: "a", next: &mut b };

    let mut seen = Vec::new();
    for node in PointerIter::new(Handle::from_raw(&mut a as *mut Node), advance, |h| h) {
        seen.push(label(node));
        // Detach the node just yielded; the walk already holds its successor.
        unsafe { (*node.as_ptr()).next = ptr::null_mut() };
    }
    assert_eq!(seen, ["a", "b", "c"]);
}
