pub(crate) mod holds;
pub(crate) mod mapper;
pub(crate) mod phase;
