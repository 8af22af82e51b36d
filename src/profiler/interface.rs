/// One operation of a capability, with its profiling marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub name: &'static str,
    pub profiled: bool,
}

impl Operation {
    /// An operation whose invocations are timed
    pub const fn profiled(name: &'static str) -> Self {
        Self {
            name,
            profiled: true,
        }
    }

    /// An operation forwarded without timing
    pub const fn unprofiled(name: &'static str) -> Self {
        Self {
            name,
            profiled: false,
        }
    }
}

/// Static description of a capability that can be wrapped by the profiler
///
/// Implemented on the trait-object type of the capability
/// (e.g. `dyn PageParser`) next to the trait definition, so the list of
/// profiled operations is fixed at compile time.
pub trait Interface {
    const NAME: &'static str;
    const OPERATIONS: &'static [Operation];
}

/// Ties a delegate type to a capability it implements
///
/// [`Profiler::wrap`](crate::profiler::Profiler::wrap) only accepts a
/// delegate for `I` when this holds, so wrapping a type as a capability it
/// does not provide fails to compile. Each capability carries one blanket
/// impl next to its `Interface` impl.
pub trait Implements<I: Interface + ?Sized> {}
