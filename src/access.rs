//! Access-gate contract
//!
//! A crawling loop built on top of the sitemap iterators asks an `AccessRule`
//! before each network fetch and notifies it afterwards. Nothing in this crate
//! calls these methods; the parsing layer never touches the network.

/// Decides when a crawler may touch the network
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
/// use sumi_sitemap::AccessRule;
///
/// /// Allows one access per interval
/// struct Interval {
///     every: Duration,
///     last: Option<Instant>,
/// }
///
/// impl AccessRule for Interval {
///     fn can_access(&self) -> bool {
///         self.last.map_or(true, |last| last.elapsed() >= self.every)
///     }
///
///     fn accessed(&mut self) {
///         self.last = Some(Instant::now());
///     }
/// }
///
/// let mut rule = Interval { every: Duration::from_secs(60), last: None };
/// assert!(rule.can_access());
/// rule.accessed();
/// assert!(!rule.can_access());
/// ```
pub trait AccessRule {
    /// Whether an access may happen now
    fn can_access(&self) -> bool;

    /// Records that an access just happened
    fn accessed(&mut self);
}

/// Rule that never holds anything back
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllowAll;

impl AccessRule for AllowAll {
    fn can_access(&self) -> bool {
        true
    }

    fn accessed(&mut self) {}
}

impl<T: AccessRule + ?Sized> AccessRule for Box<T> {
    fn can_access(&self) -> bool {
        (**self).can_access()
    }

    fn accessed(&mut self) {
        (**self).accessed()
    }
}
