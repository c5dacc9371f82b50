pub(crate) mod offset;
pub(crate) mod transformer;
pub(crate) mod value;
pub(crate) mod window;
