//! One WUFI variant per building segment: the segment's rooms become
//! zones with their geometry and components, and the segment's site
//! and certification blocks are copied alongside.

use anyhow::Result;

use crate::base::HasIdentifier;
use crate::certification::BuildingSegment;
use crate::climate::{Ground, MonthlyClimate, PeakLoadDay, PeakLoads, Site};
use crate::model::Room;
use crate::properties::PhModel;
use crate::wufi::assembly::AssemblyRegistry;
use crate::wufi::component::WufiComponent;
use crate::wufi::counter::IdCounters;
use crate::wufi::geometry::{VertexCache, WufiPolygon, WufiVertex};
use crate::wufi::xml::{ToXml, XmlNode};
use crate::wufi::zone::WufiZone;

#[derive(Debug, Clone, PartialEq)]
pub struct WufiVariant {
    pub id_num: u32,
    pub name: String,
    pub remarks: String,
    pub vertices: Vec<WufiVertex>,
    pub polygons: Vec<WufiPolygon>,
    pub components: Vec<WufiComponent>,
    pub zones: Vec<WufiZone>,
    pub climate: WufiClimate,
    pub ph_data: WufiPhData,
}

impl WufiVariant {
    /// Builds the variant for one segment. Within each face the
    /// aperture polygons are allocated first so the face polygon can
    /// list their ids as children.
    pub fn build(
        segment: &BuildingSegment,
        rooms: &[&Room],
        ph_model: &PhModel,
        registry: &AssemblyRegistry,
        counters: &mut IdCounters,
    ) -> Result<Self> {
        let id_num = counters.next_variant();
        let mut cache = VertexCache::new();
        let mut polygons = Vec::new();
        let mut components = Vec::new();
        let mut zones = Vec::new();

        for room in rooms {
            let zone_id = counters.next_zone();
            for face in &room.faces {
                let mut child_ids = Vec::new();
                for aperture in &face.apertures {
                    let polygon =
                        WufiPolygon::from_polygon(&aperture.geometry, &mut cache, counters);
                    child_ids.push(polygon.id_num);
                    components.push(WufiComponent::from_aperture(
                        aperture,
                        polygon.id_num,
                        zone_id,
                        registry,
                        counters,
                    ));
                    polygons.push(polygon);
                }
                let mut face_polygon =
                    WufiPolygon::from_polygon(&face.geometry, &mut cache, counters);
                face_polygon.child_polygon_ids = child_ids;
                components.push(WufiComponent::from_face(
                    face,
                    face_polygon.id_num,
                    zone_id,
                    registry,
                    counters,
                ));
                polygons.push(face_polygon);
            }
            let bag = ph_model.ph.get_room_ph(room.identifier());
            zones.push(WufiZone::build(room, bag, zone_id)?);
        }

        Ok(Self {
            id_num,
            name: segment.base.display_name.clone(),
            remarks: String::new(),
            vertices: cache.vertices().to_vec(),
            polygons,
            components,
            zones,
            climate: WufiClimate::from_site(&segment.site),
            ph_data: WufiPhData::build(segment, counters),
        })
    }
}

impl ToXml for WufiVariant {
    fn to_xml(&self) -> Vec<XmlNode> {
        vec![
            XmlNode::leaf("IdentNr", self.id_num),
            XmlNode::leaf("Name", &self.name),
            XmlNode::leaf("Remarks", &self.remarks),
            XmlNode::object(
                "Graphics_3D",
                vec![
                    XmlNode::list(
                        "Vertices",
                        self.vertices
                            .iter()
                            // WUFI spells the element "Vertix".
                            .map(|v| XmlNode::object("Vertix", v.to_xml()))
                            .collect(),
                    ),
                    XmlNode::list(
                        "Polygons",
                        self.polygons
                            .iter()
                            .map(|p| XmlNode::object("Polygon", p.to_xml()))
                            .collect(),
                    ),
                ],
            ),
            XmlNode::object(
                "Building",
                vec![
                    XmlNode::list(
                        "Components",
                        self.components
                            .iter()
                            .map(|c| XmlNode::object("Component", c.to_xml()))
                            .collect(),
                    ),
                    XmlNode::list(
                        "Zones",
                        self.zones
                            .iter()
                            .map(|z| XmlNode::object("Zone", z.to_xml()))
                            .collect(),
                    ),
                ],
            ),
            XmlNode::object("ClimateLocation", self.climate.to_xml()),
            XmlNode::object("PassivehouseData", self.ph_data.to_xml()),
        ]
    }
}

/// Site data flattened into the variant's ClimateLocation block.
#[derive(Debug, Clone, PartialEq)]
pub struct WufiClimate {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    pub hours_from_utc: i32,
    pub daylight_saving: i32,
    pub ground: Ground,
    pub climate: MonthlyClimate,
    pub peak_loads: PeakLoads,
}

impl WufiClimate {
    fn from_site(site: &Site) -> Self {
        Self {
            latitude: site.location.latitude,
            longitude: site.location.longitude,
            elevation: site.location.site_elevation_m,
            hours_from_utc: site.location.hours_from_utc,
            daylight_saving: site.location.daylight_saving_period,
            ground: site.ground.clone(),
            climate: site.climate.clone(),
            peak_loads: site.peak_loads.clone(),
        }
    }
}

fn monthly(name: &str, values: &[f64; 12]) -> XmlNode {
    XmlNode::list(
        name,
        values.iter().map(|v| XmlNode::leaf("Item", v)).collect(),
    )
}

fn peak_day(suffix: &str, day: &PeakLoadDay) -> Vec<XmlNode> {
    vec![
        XmlNode::leaf(&format!("Temperature{}", suffix), day.temp),
        XmlNode::leaf(&format!("NorthSolarRadiation{}", suffix), day.radiation_north),
        XmlNode::leaf(&format!("EastSolarRadiation{}", suffix), day.radiation_east),
        XmlNode::leaf(&format!("SouthSolarRadiation{}", suffix), day.radiation_south),
        XmlNode::leaf(&format!("WestSolarRadiation{}", suffix), day.radiation_west),
        XmlNode::leaf(&format!("GlobalSolarRadiation{}", suffix), day.radiation_global),
    ]
}

impl ToXml for WufiClimate {
    fn to_xml(&self) -> Vec<XmlNode> {
        let mut nodes = vec![
            // 6 = user-determined climate data.
            XmlNode::leaf("Selection", 6),
            XmlNode::leaf("Latitude", self.latitude),
            XmlNode::leaf("Longitude", self.longitude),
            XmlNode::leaf_opt("HeightNN", self.elevation),
            XmlNode::leaf("dUTC", self.hours_from_utc),
            XmlNode::leaf("DaylightSaving", self.daylight_saving),
            XmlNode::leaf("ClimateZone", 1),
            XmlNode::leaf("GroundThermalConductivity", self.ground.thermal_conductivity),
            XmlNode::leaf("GroundHeatCapacity", self.ground.heat_capacity),
            XmlNode::leaf("GroundDensity", self.ground.density),
            XmlNode::leaf("DepthGroundwater", self.ground.depth_groundwater),
            XmlNode::leaf("FlowRateGroundwater", self.ground.flow_rate_groundwater),
            monthly("TemperatureMonthly", &self.climate.air_temps),
            monthly("DewPointTemperatureMonthly", &self.climate.dew_points),
            monthly("SkyTemperatureMonthly", &self.climate.sky_temps),
            monthly("NorthSolarRadiationMonthly", &self.climate.radiation_north),
            monthly("EastSolarRadiationMonthly", &self.climate.radiation_east),
            monthly("SouthSolarRadiationMonthly", &self.climate.radiation_south),
            monthly("WestSolarRadiationMonthly", &self.climate.radiation_west),
            monthly("GlobalSolarRadiationMonthly", &self.climate.radiation_global),
        ];
        nodes.extend(peak_day("Heating1", &self.peak_loads.heating_1));
        nodes.extend(peak_day("Heating2", &self.peak_loads.heating_2));
        nodes.extend(peak_day("Cooling1", &self.peak_loads.cooling_1));
        nodes.extend(peak_day("Cooling2", &self.peak_loads.cooling_2));
        nodes
    }
}

/// Certification targets and building codes copied from the segment.
#[derive(Debug, Clone, PartialEq)]
pub struct WufiPhData {
    pub certification_program: i32,
    pub annual_heating_demand: f64,
    pub annual_cooling_demand: f64,
    pub peak_heating_load: f64,
    pub peak_cooling_load: f64,
    pub building: WufiPhBuilding,
}

impl WufiPhData {
    fn build(segment: &BuildingSegment, counters: &mut IdCounters) -> Self {
        let cert = &segment.phius_certification;
        Self {
            certification_program: cert.certification_program,
            annual_heating_demand: cert.annual_heating_demand,
            annual_cooling_demand: cert.annual_cooling_demand,
            peak_heating_load: cert.peak_heating_load,
            peak_cooling_load: cert.peak_cooling_load,
            building: WufiPhBuilding {
                id_num: counters.next_ph_building(),
                building_category: segment.usage_type,
                building_status: cert.building_status,
                building_type: cert.building_type,
                num_dwelling_units: segment.num_dwelling_units,
                num_floor_levels: segment.num_floor_levels,
                setpoint_winter_c: segment.setpoint_winter_c,
                setpoint_summer_c: segment.setpoint_summer_c,
                non_combustible_materials: segment.non_combustible_materials,
            },
        }
    }
}

impl ToXml for WufiPhData {
    fn to_xml(&self) -> Vec<XmlNode> {
        vec![
            XmlNode::leaf("PH_CertificateCriteria", self.certification_program),
            XmlNode::leaf("AnnualHeatingDemand", self.annual_heating_demand),
            XmlNode::leaf("AnnualCoolingDemand", self.annual_cooling_demand),
            XmlNode::leaf("PeakHeatingLoad", self.peak_heating_load),
            XmlNode::leaf("PeakCoolingLoad", self.peak_cooling_load),
            XmlNode::list(
                "PH_Buildings",
                vec![XmlNode::object("PH_Building", self.building.to_xml())],
            ),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WufiPhBuilding {
    pub id_num: u32,
    pub building_category: i32,
    pub building_status: i32,
    pub building_type: i32,
    pub num_dwelling_units: i32,
    pub num_floor_levels: i32,
    pub setpoint_winter_c: f64,
    pub setpoint_summer_c: f64,
    pub non_combustible_materials: bool,
}

impl ToXml for WufiPhBuilding {
    fn to_xml(&self) -> Vec<XmlNode> {
        vec![
            XmlNode::leaf("IdentNr", self.id_num),
            XmlNode::leaf("BuildingCategory", self.building_category),
            XmlNode::leaf("BuildingStatus", self.building_status),
            XmlNode::leaf("BuildingType", self.building_type),
            XmlNode::leaf("NumberUnits", self.num_dwelling_units),
            XmlNode::leaf("CountStories", self.num_floor_levels),
            XmlNode::leaf("SetpointTemperatureWinter", self.setpoint_winter_c),
            XmlNode::leaf("SetpointTemperatureSummer", self.setpoint_summer_c),
            XmlNode::leaf("NonCombustibleMaterials", self.non_combustible_materials),
        ]
    }
}
