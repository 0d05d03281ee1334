// src/core/commands/generic/mod.rs

pub mod command_stub;
pub mod echo;
pub mod info;
pub mod multi;
pub mod ping;
pub mod psync;
pub mod replconf;
pub mod type_cmd;

pub use command_stub::CommandStub;
pub use echo::Echo;
pub use info::Info;
pub use multi::{Discard, Exec, Multi};
pub use ping::Ping;
pub use psync::Psync;
pub use replconf::Replconf;
pub use type_cmd::TypeCmd;
