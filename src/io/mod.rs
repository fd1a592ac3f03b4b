// Purpose - external interfaces: calibration files in, samples out

pub mod loader;
pub mod sink;

pub use loader::{load_series, read_series, LoadError};
#[cfg(feature = "rtrb")]
pub use sink::RingSink;
pub use sink::{LimitSink, Sink, SinkClosed, WriteSink};
