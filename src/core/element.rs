//! Matrix element types and sentinel-aware arithmetic
//!
//! Every element type reserves one value, [`Element::UNDEFINED`], meaning "no value yet"
//! (an unreachable pair, a missing edge). Legitimate entries never equal it; that is a
//! contract of the caller, not something the engine checks.
//!
//! [`guard`] and [`coalesce`] are the only two primitives recurrences use to handle the
//! sentinel, so no recurrence ever does arithmetic on it.

use std::fmt::Debug;

/// Numeric cell type of a distance matrix
pub trait Element: Copy + PartialEq + PartialOrd + Debug + Send + Sync + 'static {
    /// Reserved "no value" sentinel
    const UNDEFINED: Self;

    #[inline]
    fn is_defined(self) -> bool {
        self != Self::UNDEFINED
    }
}

/// Conventional integer sentinel (`1e9`)
pub const INTEGER_UNDEFINED: i64 = 1_000_000_000;

macro_rules! integer_element {
    ($($t:ty),*) => {
        $(
            impl Element for $t {
                const UNDEFINED: Self = INTEGER_UNDEFINED as $t;
            }
        )*
    };
}

integer_element!(i32, i64, u32, u64);

impl Element for f32 {
    const UNDEFINED: Self = f32::INFINITY;
}

impl Element for f64 {
    const UNDEFINED: Self = f64::INFINITY;
}

/// `value` when `cond` holds, otherwise the sentinel
#[inline]
pub fn guard<T: Element>(cond: bool, value: T) -> T {
    if cond {
        value
    } else {
        T::UNDEFINED
    }
}

/// Like [`guard`], but only computes the value when `cond` holds.
///
/// Recurrences use this when producing the value from undefined inputs could overflow.
#[inline]
pub fn guard_with<T: Element>(cond: bool, value: impl FnOnce() -> T) -> T {
    if cond {
        value()
    } else {
        T::UNDEFINED
    }
}

/// Left-biased choice: `x` unless it is the sentinel, then `y`
#[inline]
pub fn coalesce<T: Element>(x: T, y: T) -> T {
    if x.is_defined() {
        x
    } else {
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels() {
        assert_eq!(i32::UNDEFINED, 1_000_000_000);
        assert_eq!(u64::UNDEFINED, 1_000_000_000);
        assert_eq!(f64::UNDEFINED, f64::INFINITY);
        assert!(!i64::UNDEFINED.is_defined());
        assert!(0i64.is_defined());
    }

    #[test]
    fn test_coalesce() {
        for y in [-5, 0, 7, i32::UNDEFINED, i32::MAX, i32::MIN] {
            assert_eq!(coalesce(i32::UNDEFINED, y), y);
            for x in [-5, 0, 7, i32::MAX, i32::MIN] {
                assert_eq!(coalesce(x, y), x);
            }
        }
        assert_eq!(coalesce(f64::UNDEFINED, 2.5), 2.5);
        assert_eq!(coalesce(1.5, f64::UNDEFINED), 1.5);
    }

    #[test]
    fn test_guard() {
        for v in [-3, 0, 42, i32::UNDEFINED] {
            assert_eq!(guard(false, v), i32::UNDEFINED);
            assert_eq!(guard(true, v), v);
        }
    }

    #[test]
    fn test_guard_with_is_lazy() {
        let mut evaluated = false;
        let v: u32 = guard_with(false, || {
            evaluated = true;
            u32::MAX
        });
        assert_eq!(v, u32::UNDEFINED);
        assert!(!evaluated);

        assert_eq!(guard_with(true, || 9u32), 9);
    }
}
