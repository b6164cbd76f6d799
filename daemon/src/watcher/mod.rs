//! Log tailing and chat line classification.

pub mod alert;
pub mod channel;
pub mod event;
pub mod filter;
pub mod line;
pub mod path;
pub mod tailer;
pub mod timestamp;

pub use alert::{AlertConfig, AlertSet};
pub use channel::Channel;
pub use event::{parse_line, LogEvent, Parsed};
pub use filter::EventFilter;
pub use path::log_path;
pub use tailer::{TailOptions, Tailer};
