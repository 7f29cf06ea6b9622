//! Windowless modes: the mesh against the in-memory surface, plus dumps of the
//! orbit rig and circle/segment intersection.

use anyhow::Result;
use glam::{Mat4, Vec2};
use octa::{
    Attribute, Circle, Command, GpuSurface, Intersections, OctahedronOptions, OrbitRig,
    RecordingSurface, RegularOctahedron, Shading, VERTEX_COUNT, circle_segment,
};

/// Build the mesh, draw it in both shading modes and destroy it.
///
/// Returns the command log for inspection.
pub fn run(options: OctahedronOptions) -> Result<Vec<Command>> {
    let mut surface = RecordingSurface::new();
    let program = surface.register_program();

    let mut mesh = RegularOctahedron::new(&mut surface, options)?;
    surface.use_program(program);
    mesh.draw(&mut surface);

    let other = match mesh.shading() {
        Shading::Flat => Shading::Smooth,
        Shading::Smooth => Shading::Flat,
    };
    mesh.set_shading(other, &mut surface)?;
    mesh.draw(&mut surface);

    let normals = surface
        .read_f32s(
            mesh.vertex_buffer(),
            mesh.layout().offset_of(Attribute::Normal),
            VERTEX_COUNT * 3,
        )
        .unwrap_or_default();
    log::info!(
        "{:?} normals at top apex: {:?}",
        mesh.shading(),
        normals.get(0..3)
    );

    mesh.destroy(&mut surface);
    Ok(surface.commands().to_vec())
}

pub fn print(commands: &[Command]) {
    for (i, command) in commands.iter().enumerate() {
        println!("{:>3}  {:?}", i, command);
    }
}

/// Model matrices of the rig after `seconds` of motion.
pub fn orbit(seconds: f32) -> [(&'static str, Mat4); 3] {
    let mut rig = OrbitRig::new();
    rig.advance(seconds);
    [("sun", rig.sun()), ("earth", rig.earth()), ("moon", rig.moon())]
}

pub fn print_orbit(seconds: f32) {
    for (body, model) in orbit(seconds) {
        let (scale, _, translation) = model.to_scale_rotation_translation();
        println!(
            "{:<6} at ({:>7.4}, {:>7.4})  scale {:.3}",
            body, translation.x, translation.y, scale.x
        );
    }
}

/// `values` is `cx, cy, rx, ry, ax, ay, bx, by`: circle center, a rim point,
/// then the segment endpoints.
pub fn intersections(values: [f32; 8]) -> (Circle, Intersections) {
    let [cx, cy, rx, ry, ax, ay, bx, by] = values;
    let circle = Circle::through(Vec2::new(cx, cy), Vec2::new(rx, ry));
    let hits = circle_segment(&circle, Vec2::new(ax, ay), Vec2::new(bx, by));
    (circle, hits)
}

pub fn print_intersections(values: [f32; 8]) {
    let (circle, hits) = intersections(values);
    println!(
        "circle at ({}, {}) radius {:.4}: {} intersection(s)",
        circle.center.x,
        circle.center.y,
        circle.radius,
        hits.count()
    );
    for point in hits.points() {
        println!("  ({:.4}, {:.4})", point.x, point.y);
    }
}
