pub(crate) mod canvas;
pub(crate) mod fit;
pub(crate) mod pipeline;
pub(crate) mod sink;
