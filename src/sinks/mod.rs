//! Writers logs can be routed to

pub mod fan_out;
pub mod memory;
pub mod rotating_file;

pub use fan_out::FanOutWriter;
pub use memory::SharedBuffer;
pub use rotating_file::{Clock, RotatingFileWriter, RotationMode, TIME_TOKEN};
