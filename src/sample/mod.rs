pub(crate) mod box_track;
pub(crate) mod curve;
pub(crate) mod timeline;
