//! Items used by the expansion of [`impl_reflect!`](crate::impl_reflect).

pub use alloc::string::String;
pub use alloc::vec;
pub use alloc::vec::Vec;
