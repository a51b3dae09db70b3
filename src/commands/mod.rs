pub mod common;
pub mod launch;
pub mod list;
pub mod lookup;
pub mod names;
pub mod parse;
pub mod resolve;
pub mod scan;
pub mod watch;
