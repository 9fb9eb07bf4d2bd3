/// Bitmap decoding into premultiplied RGBA8.
pub(crate) mod decode;
/// Mouth placement table.
pub(crate) mod geometry;
/// Front-loaded character bitmap store.
pub(crate) mod store;
