use passivhaus::base::HasIdentifier;
use passivhaus::certification::BuildingSegment;
use passivhaus::geom::point::Point;
use passivhaus::geom::polygon::Polygon;
use passivhaus::geom::segment::LineSegment;
use passivhaus::geom::solid::Solid;
use passivhaus::hvac::{
    HotWaterSystem, PipeBranch, PipeElement, PipeSegment, PipeTrunk, Ventilator,
    VentilationSystem,
};
use passivhaus::model::hbjson::{read_ph_model, write_ph_model};
use passivhaus::model::{Aperture, Model, Room, ServiceHotWater, Shade, WindowConstruction};
use passivhaus::properties::PhModel;
use passivhaus::shading::add_shading_dimensions;
use passivhaus::space::{host_spaces_in_rooms, Floor, FloorSegment, Space, Volume};

fn floor_plate(x0: f64, y0: f64, dx: f64, dy: f64) -> Polygon {
    Polygon::new(vec![
        Point::new(x0, y0, 0.0),
        Point::new(x0 + dx, y0, 0.0),
        Point::new(x0 + dx, y0 + dy, 0.0),
        Point::new(x0, y0 + dy, 0.0),
    ])
    .unwrap()
}

fn space_on(name: &str, number: &str, plate: Polygon, height: f64) -> Space {
    let mut space = Space::new(name, number);
    let segment = FloorSegment::from_polygon(name, plate);
    space.add_new_volumes(vec![Volume::new(name, Floor::from_segment(segment), height)]);
    space
}

fn run_along_x(name: &str, len: f64) -> PipeElement {
    PipeElement::from_segments(
        name,
        vec![PipeSegment::new(
            name,
            LineSegment::new(Point::new(0.0, 0.0, 0.0), Point::new(len, 0.0, 0.0)),
        )],
    )
}

/// Two 10 x 10 x 3 rooms side by side. The great room has a south
/// window, a hot-water load and a building-segment reference; the
/// bedroom has the segment reference only.
fn dwelling() -> PhModel {
    let mut model = Model::new("ph_residence");

    let window_construction = WindowConstruction::new("triple_low_e");
    let wc_id = window_construction.identifier().to_string();
    model.window_constructions.push(window_construction);

    let mut great_room = Room::from_solid(
        "great_room",
        Solid::from_box(10.0, 10.0, 3.0, None).unwrap(),
    )
    .unwrap();
    let window = Polygon::new(vec![
        Point::new(4.0, 0.0, 1.0),
        Point::new(6.0, 0.0, 1.0),
        Point::new(6.0, 0.0, 2.0),
        Point::new(4.0, 0.0, 2.0),
    ])
    .unwrap();
    let mut aperture = Aperture::new("south_window", window);
    aperture.construction = Some(wc_id);
    great_room.faces[1].add_aperture(aperture);
    great_room.service_hot_water = Some(ServiceHotWater {
        flow_l_per_day: 190.0,
    });
    model.rooms.push(great_room);

    model.rooms.push(
        Room::from_solid(
            "bedroom",
            Solid::from_box(10.0, 10.0, 3.0, Some((10.0, 0.0, 0.0))).unwrap(),
        )
        .unwrap(),
    );

    let mut ph_model = PhModel::new(model);
    let segment = BuildingSegment::new("unit_a");
    let segment_id = segment.identifier().to_string();
    ph_model.ph.model.building_segments.push(segment);
    for i in 0..2 {
        let room_id = ph_model.model.rooms[i].identifier().to_string();
        ph_model.ph.room_ph(&room_id).building_segment = Some(segment_id.clone());
    }
    ph_model
}

#[test]
fn test_spaces_host_into_their_rooms() {
    let mut ph_model = dwelling();
    let kitchen = space_on("Kitchen", "101", floor_plate(1.0, 1.0, 4.0, 5.0), 2.5);
    let living = space_on("Living", "102", floor_plate(5.0, 6.0, 4.0, 3.0), 2.7);
    let sleeping = space_on("Sleeping", "201", floor_plate(12.0, 2.0, 5.0, 4.0), 2.5);

    let outcome =
        host_spaces_in_rooms(&ph_model.model.rooms, vec![kitchen, living, sleeping], 0.1).unwrap();
    assert_eq!(outcome.hosted.len(), 3);
    assert!(outcome.unhosted.is_empty());
    for space in outcome.hosted {
        let host = space.host.clone().unwrap();
        ph_model.ph.room_ph(&host).add_spaces([space]);
    }

    let great = ph_model
        .ph
        .get_room_ph(ph_model.model.rooms[0].identifier())
        .unwrap();
    assert_eq!(great.spaces.len(), 2);
    assert!((great.total_space_floor_area() - 32.0).abs() < 1e-9);
    assert!((great.total_space_weighted_floor_area() - 32.0).abs() < 1e-9);
    assert!((great.total_space_net_volume() - 82.4).abs() < 1e-9);

    let bed = ph_model
        .ph
        .get_room_ph(ph_model.model.rooms[1].identifier())
        .unwrap();
    assert_eq!(bed.spaces.len(), 1);
    assert!((bed.total_space_weighted_floor_area() - 20.0).abs() < 1e-9);
}

#[test]
fn test_hot_water_assignment_and_totals() {
    let mut ph_model = dwelling();
    let great_id = ph_model.model.rooms[0].identifier().to_string();
    let bedroom_id = ph_model.model.rooms[1].identifier().to_string();

    let mut branch = PipeBranch::new("kitchen_branch", run_along_x("branch_run", 7.0));
    branch.add_fixture(run_along_x("sink", 2.0));
    branch.add_fixture(run_along_x("dishwasher", 3.0));
    let mut trunk = PipeTrunk::new("main_trunk", run_along_x("trunk_run", 5.0));
    trunk.add_branch(branch);

    let mut system = HotWaterSystem::new("dhw");
    system.add_distribution_piping(trunk);
    let mut loop_a = run_along_x("recirc_a", 30.0);
    loop_a.segments[0].water_temp_c = 50.0;
    let mut loop_b = run_along_x("recirc_b", 50.0);
    loop_b.segments[0].water_temp_c = 100.0;
    loop_b.segments[0].daily_period = 12.0;
    system.add_recirc_piping(loop_a);
    system.add_recirc_piping(loop_b);

    // The bedroom carries no hot-water load, so assignment refuses it.
    let err = ph_model
        .assign_hot_water_system(&bedroom_id, system.clone())
        .unwrap_err()
        .to_string();
    assert!(err.contains("bedroom"));

    ph_model.assign_hot_water_system(&great_id, system).unwrap();
    let system = ph_model
        .hvac
        .get_room_hvac(&great_id)
        .unwrap()
        .hot_water_system
        .as_ref()
        .unwrap();
    assert!((system.total_distribution_length() - 17.0).abs() < 1e-9);
    // Per branch: trunk run once, then branch + fixture per tap.
    assert!((system.total_home_run_fixture_length() - 24.0).abs() < 1e-9);
    assert_eq!(system.number_tap_points(), 2);
    assert!((system.total_recirc_length() - 80.0).abs() < 1e-9);
    assert!((system.recirc_temp() - 81.25).abs() < 1e-9);
    assert!((system.recirc_hours() - 16.5).abs() < 1e-9);
}

#[test]
fn test_shading_dimensions_reach_aperture_bag() {
    let mut ph_model = dwelling();
    // A 1 m deep canopy 0.5 m above the window head.
    let canopy = Polygon::new(vec![
        Point::new(3.0, -1.0, 2.5),
        Point::new(7.0, -1.0, 2.5),
        Point::new(7.0, 0.0, 2.5),
        Point::new(3.0, 0.0, 2.5),
    ])
    .unwrap();
    ph_model
        .model
        .orphaned_shades
        .push(Shade::new("entry_canopy", canopy));

    add_shading_dimensions(&mut ph_model, 0.1, None).unwrap();

    let aperture_id = ph_model.model.rooms[0]
        .apertures()
        .next()
        .unwrap()
        .identifier()
        .to_string();
    let dims = ph_model
        .ph
        .get_aperture_ph(&aperture_id)
        .unwrap()
        .shading_dimensions
        .unwrap();
    assert!((dims.d_over.unwrap() - 1.1).abs() < 1e-9);
    assert!((dims.o_over.unwrap() - 0.6).abs() < 1e-9);
    assert!(dims.d_hori.is_none());
    assert!(dims.d_reveal.is_none());
}

#[test]
fn test_file_round_trip_preserves_everything() {
    let mut ph_model = dwelling();
    let great_id = ph_model.model.rooms[0].identifier().to_string();

    let outcome = host_spaces_in_rooms(
        &ph_model.model.rooms,
        vec![space_on("Kitchen", "101", floor_plate(1.0, 1.0, 4.0, 5.0), 2.5)],
        0.1,
    )
    .unwrap();
    for space in outcome.hosted {
        let host = space.host.clone().unwrap();
        ph_model.ph.room_ph(&host).add_spaces([space]);
    }

    let mut system = HotWaterSystem::new("dhw");
    system.add_distribution_piping(run_along_x("sink", 12.0));
    ph_model.assign_hot_water_system(&great_id, system).unwrap();

    let mut vent = VentilationSystem::new("erv");
    let mut unit = Ventilator::new("hrv_unit");
    unit.sensible_heat_recovery = 0.83;
    vent.ventilator = Some(unit);
    ph_model.hvac.room_hvac(&great_id).ventilation_system = Some(vent);

    ph_model
        .ph
        .aperture_ph(
            ph_model.model.rooms[0]
                .apertures()
                .next()
                .unwrap()
                .identifier(),
        )
        .percent_transparency = Some(0.78);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("residence.hbjson");
    write_ph_model(&path, &ph_model).unwrap();
    let back = read_ph_model(&path).unwrap();
    assert_eq!(back, ph_model);

    // Weak references are rebound, not persisted.
    let bag = back.ph.get_room_ph(&great_id).unwrap();
    assert_eq!(bag.spaces[0].host.as_deref(), Some(great_id.as_str()));
    let hvac = back.hvac.get_room_hvac(&great_id).unwrap();
    assert!(
        (hvac.ventilation_system.as_ref().unwrap().sensible_heat_recovery() - 0.83).abs() < 1e-9
    );
    assert!((hvac.hot_water_system.as_ref().unwrap().total_distribution_length() - 12.0).abs()
        < 1e-9);
}
