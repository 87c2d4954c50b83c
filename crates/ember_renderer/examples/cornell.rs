//! Cornell box example.
//!
//! Renders the canonical Cornell box with two rotated boxes and a ceiling
//! light, and saves the result to PPM format.

use ember_renderer::{
    render_parallel, save_ppm, AaRect, Axis, BvhNode, Camera, Color, Cuboid, DiffuseLight,
    FlipFace, HittableList, Hittable, Lambertian, Material, Plane, RenderConfig, Rotate,
    SceneError, Translate, Vec3,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn main() {
    env_logger::init();

    let start = std::time::Instant::now();
    let (world, lights) = build_scene().expect("cornell box geometry is valid");
    log::info!("scene built in {:?}", start.elapsed());

    let mut camera = Camera::new()
        .with_position(
            Vec3::new(278.0, 278.0, -800.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0)
        .with_aspect(1.0);
    camera.initialize();

    let config = RenderConfig {
        width: 500,
        height: 500,
        samples_per_pixel: 200,
        max_depth: 25,
        background: Color::ZERO,
        seed: 0,
    };

    log::info!(
        "rendering {}x{} @ {} spp",
        config.width,
        config.height,
        config.samples_per_pixel
    );

    let start = std::time::Instant::now();
    let image = render_parallel(&camera, &world, &lights, &config);
    log::info!("rendered in {:?}", start.elapsed());

    let filename = "cornell.ppm";
    save_ppm(&image, filename).expect("failed to save image");
    log::info!("saved to {}", filename);
}

fn build_scene() -> Result<(BvhNode, HittableList), SceneError> {
    let red: Arc<dyn Material> = Arc::new(Lambertian::from_color(Color::new(0.65, 0.05, 0.05)));
    let green: Arc<dyn Material> = Arc::new(Lambertian::from_color(Color::new(0.12, 0.45, 0.15)));
    let white: Arc<dyn Material> = Arc::new(Lambertian::from_color(Color::splat(0.73)));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::from_color(Color::splat(15.0)));

    let mut objects: Vec<Arc<dyn Hittable>> = Vec::new();

    // Walls: green right (x=0), red left (x=555), white floor/ceiling/back
    objects.push(Arc::new(AaRect::new(
        Plane::Yz,
        0.0,
        555.0,
        0.0,
        555.0,
        555.0,
        red,
    )?));
    objects.push(Arc::new(AaRect::new(
        Plane::Yz,
        0.0,
        555.0,
        0.0,
        555.0,
        0.0,
        green,
    )?));
    objects.push(Arc::new(AaRect::new(
        Plane::Xz,
        0.0,
        555.0,
        0.0,
        555.0,
        0.0,
        white.clone(),
    )?));
    objects.push(Arc::new(AaRect::new(
        Plane::Xz,
        0.0,
        555.0,
        0.0,
        555.0,
        555.0,
        white.clone(),
    )?));
    objects.push(Arc::new(AaRect::new(
        Plane::Xy,
        0.0,
        555.0,
        0.0,
        555.0,
        555.0,
        white.clone(),
    )?));

    // Ceiling light, emitting downward
    let lamp: Arc<dyn Hittable> = Arc::new(AaRect::new(
        Plane::Xz,
        213.0,
        343.0,
        227.0,
        332.0,
        554.0,
        light,
    )?);
    objects.push(Arc::new(FlipFace::new(lamp.clone())));

    // Two white boxes, rotated about Y and moved into place
    let tall = Arc::new(Cuboid::new(
        Vec3::ZERO,
        Vec3::new(165.0, 330.0, 165.0),
        white.clone(),
    )?);
    objects.push(Arc::new(Translate::new(
        Arc::new(Rotate::new(tall, Axis::Y, 15.0)),
        Vec3::new(265.0, 0.0, 295.0),
    )));

    let short = Arc::new(Cuboid::new(
        Vec3::ZERO,
        Vec3::new(165.0, 165.0, 165.0),
        white,
    )?);
    objects.push(Arc::new(Translate::new(
        Arc::new(Rotate::new(short, Axis::Y, -18.0)),
        Vec3::new(130.0, 0.0, 65.0),
    )));

    let mut bvh_rng = StdRng::seed_from_u64(0);
    let world = BvhNode::new(objects, &mut bvh_rng)?;

    let mut lights = HittableList::new();
    lights.add(lamp);

    Ok((world, lights))
}
