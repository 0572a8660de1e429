pub(crate) mod snap;
pub(crate) mod tracker;
