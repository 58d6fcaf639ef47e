pub use clicker_core::model::{Command, Role, Token};

pub mod model {
    pub use clicker_core::model::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use clicker_server::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use clicker_input::*;
}
