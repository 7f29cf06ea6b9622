use crate::surface::SurfaceError;

#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("failed to allocate {resource}: {source}")]
    ResourceAllocation {
        resource: &'static str,
        #[source]
        source: SurfaceError,
    },
    #[error("upload failed: {0}")]
    Upload(#[from] SurfaceError),
    #[error("palette needs one color per face ({expected}), got {actual}")]
    InvalidPalette { expected: usize, actual: usize },
}

impl MeshError {
    pub(crate) fn allocation(resource: &'static str) -> impl FnOnce(SurfaceError) -> Self {
        move |source| MeshError::ResourceAllocation { resource, source }
    }
}
