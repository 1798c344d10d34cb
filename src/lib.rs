#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use og_reflect as reflect;
pub use og_serde as serde;
pub use og_transform as transform;
pub use og_utils as utils;
