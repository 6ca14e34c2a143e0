#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `lodatlas` converts the sprite archives of Heroes of Might and Magic III into
//! texture atlases a libGDX renderer can load directly.
//!
pub use lodatlas_internal::*;
