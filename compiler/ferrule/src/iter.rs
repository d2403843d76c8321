//! Lazy iteration over native linked lists.

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::handle::Handle;

/// Walks a native list by repeatedly calling `advance` and wraps each node
/// with `wrap` only when it is yielded.
///
/// The successor of a node is fetched at the moment that node is yielded,
/// so removing the node just returned does not break the walk. Any other
/// mutation of the native list while iterating is the caller's
/// responsibility.
///
/// The adapter is not restartable: once it returns `None` it keeps
/// returning `None`. Build a fresh one from the start node to walk again.
pub struct PointerIter<R, T, A = fn(Handle<R>) -> Option<Handle<R>>, W = fn(Handle<R>) -> T> {
    next: Option<Handle<R>>,
    advance: A,
    wrap: W,
    _item: PhantomData<fn() -> T>,
}

impl<R, T, A, W> PointerIter<R, T, A, W>
where
    A: FnMut(Handle<R>) -> Option<Handle<R>>,
    W: FnMut(Handle<R>) -> T,
{
    /// `start` of `None` yields an empty sequence.
    pub fn new(start: Option<Handle<R>>, advance: A, wrap: W) -> Self {
        PointerIter {
            next: start,
            advance,
            wrap,
            _item: PhantomData,
        }
    }
}

impl<R, T> PointerIter<R, T> {
    /// Adapter over plain function pointers, the shape every list walk in
    /// the object model uses.
    pub fn linked(
        start: Option<Handle<R>>,
        advance: fn(Handle<R>) -> Option<Handle<R>>,
        wrap: fn(Handle<R>) -> T,
    ) -> Self {
        PointerIter::new(start, advance, wrap)
    }
}

impl<R, T, A, W> Iterator for PointerIter<R, T, A, W>
where
    A: FnMut(Handle<R>) -> Option<Handle<R>>,
    W: FnMut(Handle<R>) -> T,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let current = self.next.take()?;
        self.next = (self.advance)(current);
        Some((self.wrap)(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.next.is_some() {
            (1, None)
        } else {
            (0, Some(0))
        }
    }
}

impl<R, T, A, W> FusedIterator for PointerIter<R, T, A, W>
where
    A: FnMut(Handle<R>) -> Option<Handle<R>>,
    W: FnMut(Handle<R>) -> T,
{
}

impl<R, T, A, W> fmt::Debug for PointerIter<R, T, A, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerIter").field("next", &self.next).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
