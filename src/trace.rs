//! Instrumentation hooks for the filter stages.
//!
//! `stage_span!` opens a span around one frame or one batch, `stage_event!`
//! records the kept/suppressed counts a stage produced. Both emit through
//! `tracing` at info level when the `tracing` feature is on. Without the
//! feature they expand to [`DisabledSpan`] and an unused tuple, so call sites
//! stay free of `#[cfg]`.

#[cfg(feature = "tracing")]
macro_rules! stage_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! stage_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::DisabledSpan
    };
}

#[cfg(feature = "tracing")]
macro_rules! stage_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! stage_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
}

pub(crate) use stage_event;
pub(crate) use stage_span;

/// Span guard returned by `stage_span!` when instrumentation is compiled out.
#[cfg(not(feature = "tracing"))]
pub struct DisabledSpan;

#[cfg(not(feature = "tracing"))]
impl DisabledSpan {
    /// Same shape as `tracing::Span::entered`; does nothing.
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
