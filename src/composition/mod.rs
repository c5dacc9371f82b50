pub(crate) mod dsl;
