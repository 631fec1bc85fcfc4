pub mod apply;
pub mod init;
pub mod inspect;
pub mod path;
pub mod validate;

pub use apply::{apply, ApplyArgs};
pub use init::{init, InitArgs};
pub use inspect::{inspect, InspectArgs};
pub use path::{path, PathArgs};
pub use validate::{validate, ValidateArgs};
