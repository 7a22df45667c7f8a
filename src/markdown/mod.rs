pub(crate) mod elements;
pub(crate) mod parse;
pub(crate) mod prose;
pub(crate) mod serialize;
