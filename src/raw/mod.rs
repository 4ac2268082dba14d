mod arena;
mod handle;
mod node;
mod raw_somap;

pub(crate) use raw_somap::{InOrder, RawSoMap};
