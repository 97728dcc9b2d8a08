/* 📖 # What is the Platform Abstraction Layer?

The PAL covers everything the server needs from the operating system: reading the
configuration and documentation files, and running the HTTP transport. MockPal keeps both
in memory so loaders and services are tested without sockets or a filesystem.
*/

mod file_path;
pub mod http;
pub mod mock;
pub mod real_pal;
mod traits;

pub use file_path::FilePath;
pub use mock::MockPal;
pub use real_pal::RealPal;
pub use traits::{Pal, PalHandle, ReadSeek};
