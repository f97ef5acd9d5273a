/// Analysis modules — classification and ranking used while a scan streams.

pub mod classify;
pub mod top_n;

pub use classify::is_important_system_file;
pub use top_n::TopNSet;
