pub(crate) mod blur;
pub(crate) mod composite;
pub(crate) mod edge_mask;
pub(crate) mod text;
pub(crate) mod watermark;
