use glam::Vec3;

use octa::{
    Attribute, AttributeBinding, BufferHandle, BufferKind, Command, Corner, DEFAULT_PALETTE,
    GpuSurface, IndexFormat, LayoutHandle, MeshError, NormalAveraging, OctahedronOptions,
    Primitive, ProgramHandle, RecordingSurface, RegularOctahedron, Shading, SurfaceError,
    VERTEX_COUNT,
};

const EPSILON: f32 = 1e-6;

fn build(options: OctahedronOptions) -> (RegularOctahedron, RecordingSurface) {
    let mut surface = RecordingSurface::new();
    let mesh = RegularOctahedron::new(&mut surface, options).unwrap();
    (mesh, surface)
}

fn uploaded_attribute(
    mesh: &RegularOctahedron,
    surface: &RecordingSurface,
    attribute: Attribute,
) -> Vec<f32> {
    surface
        .read_f32s(
            mesh.vertex_buffer(),
            mesh.layout().offset_of(attribute),
            VERTEX_COUNT * attribute.components() as usize,
        )
        .unwrap()
}

fn flatten<const N: usize>(values: &[[f32; N]]) -> Vec<f32> {
    values.iter().flatten().copied().collect()
}

fn subrange_offsets(surface: &RecordingSurface) -> Vec<u64> {
    surface
        .commands()
        .iter()
        .filter_map(|c| match c {
            Command::UploadSubrange { offset, .. } => Some(*offset),
            _ => None,
        })
        .collect()
}

/// Forwards to a [`RecordingSurface`] until `fail_uploads` is set, then
/// rejects every subrange write.
struct FlakySurface {
    inner: RecordingSurface,
    fail_uploads: bool,
}

impl GpuSurface for FlakySurface {
    fn allocate_buffer(&mut self, kind: BufferKind) -> Result<BufferHandle, SurfaceError> {
        self.inner.allocate_buffer(kind)
    }

    fn upload_buffer(&mut self, buffer: BufferHandle, size: u64) -> Result<(), SurfaceError> {
        self.inner.upload_buffer(buffer, size)
    }

    fn upload_subrange(
        &mut self,
        buffer: BufferHandle,
        offset: u64,
        data: &[u8],
    ) -> Result<(), SurfaceError> {
        if self.fail_uploads {
            return Err(SurfaceError::OutOfMemory {
                requested: data.len() as u64,
                available: 0,
            });
        }
        self.inner.upload_subrange(buffer, offset, data)
    }

    fn create_layout(&mut self) -> Result<LayoutHandle, SurfaceError> {
        self.inner.create_layout()
    }

    fn bind_attribute(
        &mut self,
        layout: LayoutHandle,
        buffer: BufferHandle,
        binding: AttributeBinding,
    ) -> Result<(), SurfaceError> {
        self.inner.bind_attribute(layout, buffer, binding)
    }

    fn bind_index_buffer(
        &mut self,
        layout: LayoutHandle,
        buffer: BufferHandle,
        format: IndexFormat,
    ) -> Result<(), SurfaceError> {
        self.inner.bind_index_buffer(layout, buffer, format)
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.inner.use_program(program);
    }

    fn draw_indexed(
        &mut self,
        layout: LayoutHandle,
        primitive: Primitive,
        index_count: u32,
        format: IndexFormat,
    ) {
        self.inner.draw_indexed(layout, primitive, index_count, format);
    }

    fn release_buffer(&mut self, buffer: BufferHandle) {
        self.inner.release_buffer(buffer);
    }

    fn release_layout(&mut self, layout: LayoutHandle) {
        self.inner.release_layout(layout);
    }
}

#[test]
fn test_index_list_is_identity() {
    let (mesh, surface) = build(OctahedronOptions::default());

    let expected: Vec<u16> = (0..24).collect();
    assert_eq!(mesh.indices().to_vec(), expected);
    assert_eq!(
        surface.read_u16s(mesh.index_buffer(), 0, 24).unwrap(),
        expected
    );
    assert_eq!(surface.buffer_kind(mesh.index_buffer()), Some(BufferKind::Index));
}

#[test]
fn test_apex_vertex_normal_is_mean_of_four_faces() {
    let (mesh, _) = build(OctahedronOptions::default());
    let face = |i: usize| Vec3::from(mesh.face_normals()[i]);

    let expected = (face(0) + face(3) + face(6) + face(9)) / 4.0;
    for index in [0, 3, 6, 9] {
        assert!(Vec3::from(mesh.vertex_normals()[index]).abs_diff_eq(expected, EPSILON));
    }
}

#[test]
fn test_every_corner_is_mean_of_its_faces() {
    let (mesh, _) = build(OctahedronOptions::default());
    let map = mesh.corner_map();

    for corner in Corner::ALL {
        let entries = map.entries(corner);
        let mean = entries
            .iter()
            .map(|&i| Vec3::from(mesh.face_normals()[i]))
            .sum::<Vec3>()
            / 4.0;

        for index in entries {
            assert!(Vec3::from(mesh.vertex_normals()[index]).abs_diff_eq(mean, EPSILON));
        }
    }
}

#[test]
fn test_mode_switch_round_trip() {
    let (mut mesh, mut surface) = build(OctahedronOptions::default());
    let face_normals = flatten(mesh.face_normals());
    let vertex_normals = flatten(mesh.vertex_normals());

    assert_eq!(uploaded_attribute(&mesh, &surface, Attribute::Normal), face_normals);

    for _ in 0..3 {
        mesh.use_vertex_normals(&mut surface).unwrap();
        assert_eq!(mesh.shading(), Shading::Smooth);
        assert_eq!(
            uploaded_attribute(&mesh, &surface, Attribute::Normal),
            vertex_normals
        );

        mesh.use_face_normals(&mut surface).unwrap();
        assert_eq!(mesh.shading(), Shading::Flat);
        assert_eq!(
            uploaded_attribute(&mesh, &surface, Attribute::Normal),
            face_normals
        );
    }
}

#[test]
fn test_mode_switch_uploads_only_normals() {
    let (mut mesh, mut surface) = build(OctahedronOptions::default());
    let normal_offset = mesh.layout().offset_of(Attribute::Normal);
    let positions = uploaded_attribute(&mesh, &surface, Attribute::Position);
    let colors = uploaded_attribute(&mesh, &surface, Attribute::Color);
    let tex_coords = uploaded_attribute(&mesh, &surface, Attribute::TexCoord);
    surface.clear_commands();

    mesh.use_vertex_normals(&mut surface).unwrap();
    mesh.use_vertex_normals(&mut surface).unwrap();
    mesh.use_face_normals(&mut surface).unwrap();

    assert_eq!(surface.commands().len(), 3);
    assert_eq!(subrange_offsets(&surface), vec![normal_offset; 3]);
    assert!(surface.commands().iter().all(|c| matches!(
        c,
        Command::UploadSubrange { len: 288, .. }
    )));

    assert_eq!(uploaded_attribute(&mesh, &surface, Attribute::Position), positions);
    assert_eq!(uploaded_attribute(&mesh, &surface, Attribute::Color), colors);
    assert_eq!(uploaded_attribute(&mesh, &surface, Attribute::TexCoord), tex_coords);
}

#[test]
fn test_buffer_layout_offsets_independent_of_shading() {
    let v = 24 * 3 * 4;
    let n = 24 * 3 * 4;
    let c = 24 * 4 * 4;
    let t = 24 * 2 * 4;

    for shading in [Shading::Flat, Shading::Smooth] {
        let (mesh, surface) = build(OctahedronOptions {
            shading,
            ..Default::default()
        });

        assert_eq!(
            surface.commands()[1],
            Command::UploadBuffer {
                buffer: mesh.vertex_buffer(),
                size: v + n + c + t,
            }
        );
        // Four vertex blocks, then the index buffer at 0.
        assert_eq!(subrange_offsets(&surface), vec![0, v, v + n, v + n + c, 0]);
        assert!(surface.commands().contains(&Command::UploadBuffer {
            buffer: mesh.index_buffer(),
            size: 24 * 2,
        }));

        let layout = surface.layout(mesh.vertex_layout()).unwrap();
        let offsets: Vec<_> = layout
            .attributes
            .iter()
            .map(|(_, b)| (b.slot, b.components, b.stride, b.offset))
            .collect();
        assert_eq!(
            offsets,
            vec![
                (0, 3, 0, 0),
                (1, 3, 0, v),
                (2, 4, 0, v + n),
                (3, 2, 0, v + n + c)
            ]
        );
        assert_eq!(
            layout.index_buffer,
            Some((mesh.index_buffer(), IndexFormat::Uint16))
        );
    }
}

#[test]
fn test_default_palette_draw() {
    let (mesh, mut surface) = build(OctahedronOptions::default());
    let program = surface.register_program();
    surface.use_program(program);
    surface.clear_commands();

    mesh.draw(&mut surface);

    assert_eq!(
        surface.commands(),
        &[Command::DrawIndexed {
            layout: mesh.vertex_layout(),
            program: Some(program),
            primitive: Primitive::Triangles,
            index_count: 24,
            format: IndexFormat::Uint16,
        }]
    );

    let expected: Vec<f32> = DEFAULT_PALETTE
        .iter()
        .flat_map(|color| [*color; 3])
        .flatten()
        .collect();
    assert_eq!(uploaded_attribute(&mesh, &surface, Attribute::Color), expected);
}

#[test]
fn test_uniform_color_override() {
    let green = [0.0, 1.0, 0.0, 1.0];
    let (mesh, surface) = build(OctahedronOptions::with_uniform_color(green));

    assert!(mesh.colors().iter().all(|c| *c == green));
    assert_eq!(
        uploaded_attribute(&mesh, &surface, Attribute::Color),
        green.repeat(24)
    );
}

#[test]
fn test_destroy_releases_everything() {
    let (mesh, mut surface) = build(OctahedronOptions::default());
    assert_eq!(surface.live_buffers(), 2);
    assert_eq!(surface.live_layouts(), 1);

    mesh.destroy(&mut surface);

    assert_eq!(surface.live_buffers(), 0);
    assert_eq!(surface.live_layouts(), 0);
}

#[test]
fn test_allocation_failure_is_reported_and_cleaned_up() {
    let mut surface = RecordingSurface::new().with_buffer_limit(1);
    let err = RegularOctahedron::new(&mut surface, OctahedronOptions::default()).unwrap_err();

    assert!(matches!(
        err,
        MeshError::ResourceAllocation {
            resource: "index buffer",
            ..
        }
    ));
    assert_eq!(surface.live_buffers(), 0);
    assert_eq!(surface.live_layouts(), 0);
}

#[test]
fn test_out_of_memory_is_reported() {
    let mut surface = RecordingSurface::new().with_memory_limit(512);
    let err = RegularOctahedron::new(&mut surface, OctahedronOptions::default()).unwrap_err();

    assert!(matches!(
        err,
        MeshError::ResourceAllocation {
            resource: "vertex buffer storage",
            ..
        }
    ));
    assert_eq!(surface.live_buffers(), 0);
}

#[test]
fn test_layout_failure_releases_both_buffers() {
    let mut surface = RecordingSurface::new().with_layout_limit(0);
    let err = RegularOctahedron::new(&mut surface, OctahedronOptions::default()).unwrap_err();

    assert!(matches!(
        err,
        MeshError::ResourceAllocation {
            resource: "vertex layout",
            source: SurfaceError::LayoutLimit { limit: 0 },
        }
    ));
    assert_eq!(surface.live_buffers(), 0);
    assert_eq!(surface.live_layouts(), 0);
}

#[test]
fn test_failed_normal_upload_keeps_previous_mode() {
    let mut surface = FlakySurface {
        inner: RecordingSurface::new(),
        fail_uploads: false,
    };
    let mut mesh = RegularOctahedron::new(&mut surface, OctahedronOptions::default()).unwrap();
    let flat = *mesh.face_normals();
    let mean = *mesh.vertex_normals();

    surface.fail_uploads = true;
    let err = mesh.use_vertex_normals(&mut surface).unwrap_err();
    assert!(matches!(err, MeshError::Upload(SurfaceError::OutOfMemory { .. })));
    assert_eq!(mesh.shading(), Shading::Flat);
    assert_eq!(*mesh.normals(), flat);
    assert_eq!(uploaded_attribute(&mesh, &surface.inner, Attribute::Normal), flatten(&flat));

    surface.fail_uploads = false;
    mesh.use_vertex_normals(&mut surface).unwrap();

    surface.fail_uploads = true;
    assert!(mesh.use_face_normals(&mut surface).is_err());
    assert!(
        mesh.set_normal_averaging(NormalAveraging::Renormalized, &mut surface)
            .is_err()
    );
    assert_eq!(mesh.shading(), Shading::Smooth);
    assert_eq!(mesh.averaging(), NormalAveraging::Mean);
    assert_eq!(*mesh.vertex_normals(), mean);
    assert_eq!(*mesh.normals(), mean);
    assert_eq!(uploaded_attribute(&mesh, &surface.inner, Attribute::Normal), flatten(&mean));
}
