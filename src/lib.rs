use std::num::NonZeroUsize;

#[cfg_attr(unix, path = "unix.rs")]
#[cfg_attr(windows, path = "windows.rs")]
mod imp;

mod error;
pub use error::Error;

mod location;
pub use location::Here;

mod narrow;
pub use narrow::{narrow, widen};

pub mod retrieve;

pub mod env;
pub mod module;

pub mod convert;

mod cmdline;
pub use cmdline::CommandLine;

mod debug;
pub use debug::{DebugOutput, DebugSink, SystemDebugger};

mod dump;
pub use dump::{DumpCharset, HexDump};

pub type Result<T> = std::result::Result<T, Error>;

/// Buffer sizes used where a caller does not choose one.
///
/// `Default` gives per-platform values; every field can be overridden.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BufferSizes {
    /// Initial guess, in units, for speculative environment lookups.
    pub environment: usize,
    /// Starting capacity of the module path buffer, and the amount it grows by
    /// each time the path does not fit.
    pub module_path: NonZeroUsize,
    /// The number of bytes a debug sink stages before handing them on.
    pub debug_sink: NonZeroUsize,
}
