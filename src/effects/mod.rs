pub(crate) mod opacity;
