pub mod billboard_pipeline;
pub mod camera;
pub mod gpu_context;
pub mod horizon_pipeline;
pub mod texture;
pub mod vertex;

pub use billboard_pipeline::BillboardPipeline;
pub use camera::{CameraUniform, PerspectiveCamera};
pub use gpu_context::GpuContext;
pub use horizon_pipeline::HorizonPipeline;
pub use texture::Texture;
pub use vertex::{BillboardVertex, HorizonVertex};
