#[cfg(feature = "trace")]
macro_rules! ring_trace {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "trace"))]
macro_rules! ring_trace {
    ($($arg:tt)*) => {};
}

pub(crate) use ring_trace;
