pub mod cli;
pub mod configuration;
pub mod parameter;
pub mod port;
pub mod value;

pub use cli::*;
pub use configuration::*;
pub use parameter::*;
pub use port::*;
pub use value::*;
