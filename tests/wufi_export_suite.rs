use passivhaus::base::HasIdentifier;
use passivhaus::certification::BuildingSegment;
use passivhaus::geom::point::Point;
use passivhaus::geom::polygon::Polygon;
use passivhaus::geom::solid::Solid;
use passivhaus::model::{
    Aperture, ConstructionLayer, Model, OpaqueConstruction, Room, WindowConstruction,
};
use passivhaus::properties::PhModel;
use passivhaus::space::{Floor, FloorSegment, Space, Volume};
use passivhaus::wufi::component::{TYPE_OPAQUE, TYPE_TRANSPARENT};
use passivhaus::wufi::{write_wufi_xml, WufiProject};

/// Two 10 x 10 x 3 rooms side by side, every face carrying the same
/// wall construction. The great room gets a south window and a
/// Kitchen space with airflows; both rooms point at the "unit_a"
/// segment, whose climate and certification values are customized so
/// they are recognizable in the document.
fn dwelling() -> PhModel {
    let mut model = Model::new("ph_residence");

    let wall = OpaqueConstruction::new(
        "ext_wall",
        vec![
            ConstructionLayer {
                thickness_m: 0.05,
                conductivity: 0.12,
                density: 450.0,
                specific_heat: 1200.0,
            },
            ConstructionLayer {
                thickness_m: 0.3,
                conductivity: 0.035,
                density: 55.0,
                specific_heat: 900.0,
            },
        ],
    );
    let wall_id = wall.identifier().to_string();
    model.opaque_constructions.push(wall);

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

    let mut bedroom = Room::from_solid(
        "bedroom",
        Solid::from_box(10.0, 10.0, 3.0, Some((10.0, 0.0, 0.0))).unwrap(),
    )
    .unwrap();

    for room in [&mut great_room, &mut bedroom] {
        for face in &mut room.faces {
            face.construction = Some(wall_id.clone());
        }
    }
    model.rooms.push(great_room);
    model.rooms.push(bedroom);

    let mut ph_model = PhModel::new(model);

    let mut segment = BuildingSegment::new("unit_a");
    segment.num_floor_levels = 2;
    segment.site.location.latitude = 51.3;
    segment.site.location.longitude = 12.4;
    segment.site.climate.air_temps[0] = -3.2;
    segment.site.peak_loads.heating_1.temp = -11.6;
    segment.phius_certification.annual_heating_demand = 12.5;
    let segment_id = segment.identifier().to_string();
    ph_model.ph.model.building_segments.push(segment);

    let mut kitchen = Space::new("Kitchen", "101");
    kitchen.vent_flow_supply = 45.0;
    kitchen.vent_flow_extract = 30.0;
    let plate = Polygon::new(vec![
        Point::new(1.0, 1.0, 0.0),
        Point::new(5.0, 1.0, 0.0),
        Point::new(5.0, 6.0, 0.0),
        Point::new(1.0, 6.0, 0.0),
    ])
    .unwrap();
    kitchen.add_new_volumes(vec![Volume::new(
        "Kitchen",
        Floor::from_segment(FloorSegment::from_polygon("Kitchen", plate)),
        2.5,
    )]);

    let room_ids: Vec<String> = ph_model
        .model
        .rooms
        .iter()
        .map(|r| r.identifier().to_string())
        .collect();
    for id in &room_ids {
        ph_model.ph.room_ph(id).building_segment = Some(segment_id.clone());
    }
    ph_model.ph.room_ph(&room_ids[0]).add_spaces([kitchen]);

    ph_model
}

#[test]
fn test_geometry_is_shared_and_nested() {
    let project = WufiProject::from_ph_model(&dwelling()).unwrap();
    assert_eq!(project.variants.len(), 1);
    let variant = &project.variants[0];

    // The rooms share the four corners on the x = 10 plane, and the
    // window adds four of its own: 8 + 8 - 4 + 4.
    assert_eq!(variant.vertices.len(), 16);
    assert_eq!(variant.polygons.len(), 13);
    assert_eq!(variant.components.len(), 13);

    // The window polygon is allocated before its wall and nested
    // under it.
    let parent = variant
        .polygons
        .iter()
        .find(|p| !p.child_polygon_ids.is_empty())
        .unwrap();
    assert_eq!(parent.child_polygon_ids.len(), 1);
    let child_id = parent.child_polygon_ids[0];
    assert!(child_id < parent.id_num);

    let window = variant
        .components
        .iter()
        .find(|c| c.component_type == TYPE_TRANSPARENT)
        .unwrap();
    assert_eq!(window.polygon_ids, vec![child_id]);
}

#[test]
fn test_construction_references_deduplicate() {
    let project = WufiProject::from_ph_model(&dwelling()).unwrap();

    // Twelve faces, one assembly; one aperture, one window type.
    assert_eq!(project.assemblies.len(), 1);
    assert_eq!(project.assemblies[0].id_num, 1);
    assert_eq!(project.window_types.len(), 1);
    assert_eq!(project.window_types[0].id_num, 1);

    let variant = &project.variants[0];
    let opaque: Vec<_> = variant
        .components
        .iter()
        .filter(|c| c.component_type == TYPE_OPAQUE)
        .collect();
    assert_eq!(opaque.len(), 12);
    assert!(opaque.iter().all(|c| c.assembly_id == Some(1)));
    assert!(opaque.iter().all(|c| c.window_type_id.is_none()));

    let window = variant
        .components
        .iter()
        .find(|c| c.component_type == TYPE_TRANSPARENT)
        .unwrap();
    assert_eq!(window.window_type_id, Some(1));
    assert_eq!(window.assembly_id, None);
}

#[test]
fn test_components_follow_face_type_and_zone() {
    let project = WufiProject::from_ph_model(&dwelling()).unwrap();
    let variant = &project.variants[0];

    // Box face order is floor, south wall, the other walls, ceiling;
    // the window component precedes the wall that hosts it.
    let floor = &variant.components[0];
    assert_eq!(floor.outer_attachment, -2);
    assert_eq!((floor.color_interior, floor.color_exterior), (5, 12));

    let window = &variant.components[1];
    assert_eq!(window.component_type, TYPE_TRANSPARENT);
    assert_eq!(window.name, "south_window");
    assert_eq!((window.color_interior, window.color_exterior), (4, 4));
    assert_eq!(window.outer_attachment, -1);

    let south_wall = &variant.components[2];
    assert_eq!((south_wall.color_interior, south_wall.color_exterior), (1, 2));
    assert_eq!(south_wall.outer_attachment, -1);

    let ceiling = &variant.components[6];
    assert_eq!((ceiling.color_interior, ceiling.color_exterior), (10, 11));

    // Seven components belong to the great room's zone, six to the
    // bedroom's.
    let great_zone = variant.zones[0].id_num;
    let bed_zone = variant.zones[1].id_num;
    assert!(variant.components[..7]
        .iter()
        .all(|c| c.inner_attachment == great_zone));
    assert!(variant.components[7..]
        .iter()
        .all(|c| c.inner_attachment == bed_zone));
}

#[test]
fn test_zones_follow_rooms_and_spaces() {
    let project = WufiProject::from_ph_model(&dwelling()).unwrap();
    let variant = &project.variants[0];
    assert_eq!(variant.zones.len(), 2);

    // The Kitchen space drives the great room's net volume, weighted
    // area and ventilation rooms.
    let great = &variant.zones[0];
    assert_eq!(great.name, "great_room");
    assert!((great.gross_volume - 300.0).abs() < 1e-9);
    assert!((great.net_volume - 50.0).abs() < 1e-9);
    assert!((great.weighted_floor_area - 20.0).abs() < 1e-9);
    assert!((great.clear_height - 2.5).abs() < 1e-9);
    assert_eq!(great.rooms_ventilation.len(), 1);
    let vent = &great.rooms_ventilation[0];
    assert_eq!(vent.name, "101: Kitchen");
    assert!((vent.flow_supply - 45.0).abs() < 1e-9);
    assert!((vent.flow_extract - 30.0).abs() < 1e-9);

    // No spaces in the bedroom: net falls back to gross and the
    // weighted area to the floor-face area.
    let bed = &variant.zones[1];
    assert!((bed.gross_volume - 300.0).abs() < 1e-9);
    assert!((bed.net_volume - 300.0).abs() < 1e-9);
    assert!((bed.weighted_floor_area - 100.0).abs() < 1e-9);
    assert!(bed.rooms_ventilation.is_empty());
}

#[test]
fn test_document_layout_and_values() {
    let doc = WufiProject::from_ph_model(&dwelling())
        .unwrap()
        .to_xml_string();

    for needle in [
        "<DataVersion>48</DataVersion>",
        "<UnitSystem>1</UnitSystem>",
        "<ProgramVersion>3.2.0.1</ProgramVersion>",
        "<Scope>3</Scope>",
        "<DimensionsVisualizedGeometry>2</DimensionsVisualizedGeometry>",
        "<Building_Name>ph_residence</Building_Name>",
        "<UtilisationPatternsVentilation count=\"1\">",
        "<UtilizationPatternsPH count=\"1\">",
        "<Variants count=\"1\">",
        "<Assemblies count=\"1\">",
        "<WindowTypes count=\"1\">",
        "<Name>unit_a</Name>",
        "<Vertices count=\"16\">",
        "<Vertix index=\"0\">",
        "<Polygons count=\"13\">",
        "<Components count=\"13\">",
        "<Zones count=\"2\">",
        "<GrossVolume>300</GrossVolume>",
        "<Latitude>51.3</Latitude>",
        "<Longitude>12.4</Longitude>",
        "<TemperatureMonthly count=\"12\">",
        "<Item index=\"0\">-3.2</Item>",
        "<TemperatureHeating1>-11.6</TemperatureHeating1>",
        "<AnnualHeatingDemand>12.5</AnnualHeatingDemand>",
        "<CountStories>2</CountStories>",
    ] {
        assert!(doc.contains(needle), "missing {}", needle);
    }
}

#[test]
fn test_dangling_references_write_minus_one() {
    let mut ph_model = dwelling();
    // Point the window at a construction the catalog does not hold.
    ph_model.model.rooms[0].faces[1].apertures[0].construction = Some("missing".to_string());

    let project = WufiProject::from_ph_model(&ph_model).unwrap();
    assert!(project.window_types.is_empty());

    let window = project.variants[0]
        .components
        .iter()
        .find(|c| c.component_type == TYPE_TRANSPARENT)
        .unwrap();
    assert_eq!(window.window_type_id, None);

    let doc = project.to_xml_string();
    assert!(doc.contains("<WindowTypes count=\"0\">"));
    assert!(doc.contains("<IdentNrWindowType>-1</IdentNrWindowType>"));
}

#[test]
fn test_written_file_is_complete() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("residence.xml");
    write_wufi_xml(&dwelling(), &path).unwrap();

    let doc = std::fs::read_to_string(&path).unwrap();
    assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(doc.trim_end().ends_with("</WUFIplusProject>"));
    assert!(doc.contains("<Vertix index=\"15\">"));
}
