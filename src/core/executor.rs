//! Fork-join executors
//!
//! The dispatcher only needs "run these two things, wait for both". [`Rayon`] hands them to
//! the current rayon pool (work stealing); [`Sequential`] runs them one after the other on the
//! calling thread, which gives the same result because sibling tasks never depend on each
//! other.

/// Spawn-two-and-sync primitive
pub trait ForkJoin: Sync {
    fn join<A, B>(&self, a: A, b: B)
    where
        A: FnOnce() + Send,
        B: FnOnce() + Send;

    fn name(&self) -> &'static str;
}

/// Work-stealing execution on the current rayon pool
#[derive(Debug, Clone, Copy, Default)]
pub struct Rayon;

impl ForkJoin for Rayon {
    #[inline]
    fn join<A, B>(&self, a: A, b: B)
    where
        A: FnOnce() + Send,
        B: FnOnce() + Send,
    {
        rayon::join(a, b);
    }

    fn name(&self) -> &'static str {
        "rayon"
    }
}

/// Calling-thread execution, left task first
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl ForkJoin for Sequential {
    #[inline]
    fn join<A, B>(&self, a: A, b: B)
    where
        A: FnOnce() + Send,
        B: FnOnce() + Send,
    {
        a();
        b();
    }

    fn name(&self) -> &'static str {
        "sequential"
    }
}
