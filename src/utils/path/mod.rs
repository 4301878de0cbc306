//! Path and route utilities.
//!
//! Pure functions for path manipulation. No side effects except the
//! existence checks in [`script`].
//!
//! - [`fs`]: Filesystem path math (`normalize_path`, `relative_path`, `to_module_request`)
//! - [`route`]: Route strings (`ensure_leading_slash`, `join_route`)
//! - [`script`]: Script resolution with `.h5` overrides (`resolve_script_path`)

pub mod fs;
pub mod route;
pub mod script;

pub use fs::{
    is_relative_request, normalize_path, relative_path, resolve_lexically, to_module_request,
};
pub use route::{ensure_leading_slash, join_route, strip_leading_slash};
pub use script::{PLATFORM_SUFFIX, SCRIPT_EXT, is_script, resolve_script_path, split_script_name};
