//! Built-in match strategies.

pub mod handle;
pub mod numeric_id;

pub use handle::HandleMatch;
pub use numeric_id::NumericIdMatch;
