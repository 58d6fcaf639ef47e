//! Controller-side pieces: input classifiers that turn pointer and microphone streams into
//! commands, the loops that feed them, and the connection to the relay.

mod capture;
mod driver;
mod error;
mod gesture;
mod knock;
mod relay_client;
mod timer;

pub use capture::*;
pub use driver::*;
pub use error::*;
pub use gesture::*;
pub use knock::*;
pub use relay_client::*;
pub use timer::*;
