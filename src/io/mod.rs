//! Sample I/O primitives
//!
//! FIFO sample streams at the engine boundary and the fixed-length rolling
//! buffers used for analysis and overlap-add.

pub mod sample_stream;
pub mod time_buffer;

pub use sample_stream::SampleStream;
pub use time_buffer::TimeBuffer;
