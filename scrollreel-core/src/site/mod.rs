pub(crate) mod content;
pub(crate) mod routes;
pub(crate) mod search;
pub(crate) mod view;
