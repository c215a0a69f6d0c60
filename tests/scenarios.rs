use approx::assert_abs_diff_eq;
use lumos::{
    analyzers::{RayTraceConfig, RaySegment},
    degree, micrometer,
    nodes::{DielectricBlock, DielectricMaterial, Mirror, MultiSlit, Photodiode, Polarizer, Screen, ThinLens},
    optic_component::{OpticalComponent, Termination},
    polarization::Polarization,
    ray::{Ray, Wavelength},
    source::{BeamShape, LaserSource},
    utils::geom_transformation::Placement,
    Scene,
};
use nalgebra::point;

fn laser_at_origin() -> LaserSource {
    LaserSource::new("laser", Placement::default(), Wavelength::default(), 1.0).unwrap()
}
fn placement(x: f64, angle: f64) -> Placement {
    Placement::new(point![x, 0.0], degree!(angle)).unwrap()
}
fn escaped(segments: &[RaySegment]) -> Vec<&RaySegment> {
    segments
        .iter()
        .filter(|s| s.termination == Termination::Escaped)
        .collect()
}

#[test]
fn mirror_reverses_ray() {
    let mut scene = Scene::default();
    scene.add_source(laser_at_origin()).unwrap();
    scene.add(Mirror::new("mirror", placement(100.0, 180.0)).unwrap()).unwrap();
    let result = scene.trace_all();
    assert_eq!(result.statistics.interacted, 1);
    let escaped = escaped(&result.segments);
    assert_eq!(escaped.len(), 1);
    let reflected = escaped[0];
    assert_eq!(reflected.bounces, 1);
    assert_abs_diff_eq!(reflected.intensity, 0.99, epsilon = 1e-12);
    let start = reflected.waypoints[0];
    let end = *reflected.waypoints.last().unwrap();
    assert_abs_diff_eq!(start.x, 100.0, epsilon = 1e-9);
    assert!(end.x < start.x);
    assert_abs_diff_eq!(end.y, 0.0, epsilon = 1e-9);
}

#[test]
fn on_axis_ray_passes_thin_lens_undeviated() {
    let mut scene = Scene::default();
    scene.add_source(laser_at_origin()).unwrap();
    scene
        .add(ThinLens::new("lens", placement(100.0, 0.0), 100.0, 80.0).unwrap())
        .unwrap();
    let result = scene.trace_all();
    let escaped = escaped(&result.segments);
    assert_eq!(escaped.len(), 1);
    let transmitted = escaped[0];
    assert_eq!(transmitted.bounces, 1);
    let end = *transmitted.waypoints.last().unwrap();
    assert!(end.x > 100.0);
    assert_abs_diff_eq!(end.y, 0.0, epsilon = 1e-9);
}

#[test]
fn crossed_polarizer_blocks_light() {
    let mut scene = Scene::default();
    let mut laser = laser_at_origin();
    laser.set_polarization(Polarization::linear(degree!(0.0)));
    scene.add_source(laser).unwrap();
    scene
        .add(Polarizer::new("polarizer", placement(50.0, 0.0), degree!(90.0)).unwrap())
        .unwrap();
    let diode = scene
        .add(Photodiode::new("diode", placement(100.0, 180.0), 20.0).unwrap())
        .unwrap();
    scene.trace_all();
    let power = scene.component_as::<Photodiode>(diode).unwrap().power();
    assert_abs_diff_eq!(power, 0.0, epsilon = 1e-12);
}

#[test]
fn double_slit_maximum_on_axis() {
    // rays leaving the two slits at ±3° meet on the axis after this distance
    let screen_distance = 10.0 / 3.0_f64.to_radians().tan();
    let mut scene = Scene::default();
    let mut laser = LaserSource::new("laser", placement(-50.0, 0.0), Wavelength::default(), 3.0).unwrap();
    laser.set_ray_count(3).unwrap();
    laser.set_shape(BeamShape::Collimated { width: 20.0 }).unwrap();
    scene.add_source(laser).unwrap();
    let mut slits = MultiSlit::new("double slit", placement(0.0, 0.0), 2, 2.0, 20.0).unwrap();
    let _ = slits.set_diffraction(61, degree!(30.0)).unwrap();
    scene.add(slits).unwrap();
    let screen = scene
        .add(Screen::new("screen", placement(screen_distance, 180.0), 100.0, 101).unwrap())
        .unwrap();
    let result = scene.trace_all();
    // the center ray hits the blocker between the slits
    assert_eq!(result.statistics.absorbed, 1);
    let screen = scene.component_as::<Screen>(screen).unwrap();
    let coherent = screen.coherent_intensities();
    assert_eq!(screen.hits()[50], 2);
    assert_abs_diff_eq!(coherent[50], screen.max_intensity(), epsilon = 1e-12);
    // two equal in-phase amplitudes
    let single = 1.0 / 61.0;
    assert_abs_diff_eq!(coherent[50], 4.0 * single, epsilon = 1e-9);
}

#[test]
fn dielectric_block_normal_incidence_reflectance() {
    let mut block = DielectricBlock::new("block", placement(100.0, 0.0), 50.0, 100.0).unwrap();
    let _ = block
        .set_material(DielectricMaterial::with_index_at_550nm(1.5).unwrap())
        .unwrap();
    let config = RayTraceConfig::default();
    let mut ray = Ray::origin_along_x(Wavelength::new(lumos::nanometer!(550.0)).unwrap(), 1.0).unwrap();
    let hit = block.intersect(&ray, config.min_hit_distance()).unwrap();
    ray.propagate(hit.distance, micrometer!(1.0)).unwrap();
    let interaction = block.interact(&ray, &hit, &config).unwrap();
    assert_eq!(interaction.children.len(), 2);
    let reflected = interaction
        .children
        .iter()
        .find(|c| c.direction().x < 0.0)
        .unwrap();
    let transmitted = interaction
        .children
        .iter()
        .find(|c| c.direction().x > 0.0)
        .unwrap();
    assert_abs_diff_eq!(reflected.intensity(), 0.04, epsilon = 1e-9);
    assert_abs_diff_eq!(transmitted.intensity(), 0.96, epsilon = 1e-9);
}

#[test]
fn resonator_respects_bounce_ceiling() {
    let mut config = RayTraceConfig::default();
    config.set_max_number_of_bounces(10);
    let mut scene = Scene::new(config);
    scene.add_source(laser_at_origin()).unwrap();
    for (name, x, angle) in [("left", -50.0, 0.0), ("right", 50.0, 180.0)] {
        let mut mirror = Mirror::new(name, placement(x, angle)).unwrap();
        let _ = mirror.set_reflectivity(1.0).unwrap();
        scene.add(mirror).unwrap();
    }
    let result = scene.trace_all();
    assert!(result.segments.iter().all(|s| s.bounces <= 10));
    assert_eq!(result.statistics.max_bounces, 1);
    assert_eq!(result.statistics.escaped, 0);
    assert_eq!(result.segments.len(), 10);
}
