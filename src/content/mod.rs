pub(crate) mod essay;
pub(crate) mod model;
pub(crate) mod palette;
