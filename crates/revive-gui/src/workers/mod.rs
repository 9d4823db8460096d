mod dispatch;
mod edit;
mod io;

pub use dispatch::spawn_worker;
use dispatch::{send, send_error, send_log};
