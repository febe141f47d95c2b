pub(crate) mod export;
pub(crate) mod search;
mod shared;
pub(crate) mod tree;

pub(crate) use shared::*;
