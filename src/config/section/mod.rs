//! Configuration section definitions.
//!
//! Each module corresponds to a table in `taro-next.toml`:
//!
//! | Module       | TOML Section   | Purpose                              |
//! |--------------|----------------|--------------------------------------|
//! | `router`     | `[router]`     | Router mode and custom routes        |
//! | `dev_server` | `[devServer]`  | `next dev` port                      |
//! | `sass`       | `[sass]`       | Global Sass prelude                  |

mod dev_server;
mod router;
mod sass;

pub use dev_server::{DEFAULT_PORT, DevServerConfig};
pub use router::RouterConfig;
pub use sass::SassConfig;
