pub(crate) mod crop;
pub(crate) mod resize;
pub(crate) mod rotate;
pub(crate) mod sample;
