//! WUFI zones: one per room, with a ventilation record per space.

use anyhow::Result;

use crate::model::{FaceType, Room};
use crate::properties::RoomPh;
use crate::space::Space;
use crate::wufi::xml::{ToXml, XmlNode};

/// `_Selection` code for values entered by the user rather than
/// derived by WUFI.
const USER_DETERMINED: i32 = 6;

/// Wh/(m2 K), WUFI's "mixed construction" heat capacity.
const SPECIFIC_HEAT_CAPACITY: f64 = 132.0;

const DEFAULT_CLEAR_HEIGHT: f64 = 2.5;

#[derive(Debug, Clone, PartialEq)]
pub struct WufiZone {
    pub id_num: u32,
    pub name: String,
    pub gross_volume: f64,
    pub net_volume: f64,
    pub weighted_floor_area: f64,
    pub clear_height: f64,
    pub rooms_ventilation: Vec<WufiRoomVent>,
}

impl WufiZone {
    /// Builds the zone record for one room. The gross volume always
    /// comes from the room shell; net volume, floor area and clear
    /// height come from the room's spaces when it has any, else from
    /// the shell and its floor faces.
    pub fn build(room: &Room, bag: Option<&RoomPh>, id_num: u32) -> Result<Self> {
        let gross_volume = room.volume()?;
        let spaces: &[Space] = bag.map(|b| b.spaces.as_slice()).unwrap_or(&[]);
        let (net_volume, weighted_floor_area, clear_height) = if spaces.is_empty() {
            (gross_volume, floor_face_area(room), DEFAULT_CLEAR_HEIGHT)
        } else {
            let net = spaces.iter().map(Space::net_volume).sum();
            let weighted = spaces.iter().map(Space::weighted_floor_area).sum();
            let gross_area: f64 = spaces.iter().map(Space::floor_area).sum();
            let height = if gross_area > 0.0 {
                spaces
                    .iter()
                    .map(|s| s.floor_area() * s.avg_clear_height())
                    .sum::<f64>()
                    / gross_area
            } else {
                DEFAULT_CLEAR_HEIGHT
            };
            (net, weighted, height)
        };
        Ok(Self {
            id_num,
            name: room.base.display_name.clone(),
            gross_volume,
            net_volume,
            weighted_floor_area,
            clear_height,
            rooms_ventilation: spaces.iter().map(WufiRoomVent::from_space).collect(),
        })
    }
}

fn floor_face_area(room: &Room) -> f64 {
    room.faces
        .iter()
        .filter(|f| f.face_type == FaceType::Floor)
        .map(|f| f.geometry.area())
        .sum()
}

impl ToXml for WufiZone {
    fn to_xml(&self) -> Vec<XmlNode> {
        vec![
            XmlNode::leaf("Name", &self.name),
            // 1 = simulated zone.
            XmlNode::leaf("KindZone", 1),
            XmlNode::leaf("IdentNr", self.id_num),
            XmlNode::list(
                "RoomsVentilation",
                self.rooms_ventilation
                    .iter()
                    .map(|r| XmlNode::object("Room", r.to_xml()))
                    .collect(),
            ),
            XmlNode::leaf("GrossVolume_Selection", USER_DETERMINED),
            XmlNode::leaf("GrossVolume", self.gross_volume),
            XmlNode::leaf("NetVolume_Selection", USER_DETERMINED),
            XmlNode::leaf("NetVolume", self.net_volume),
            XmlNode::leaf("FloorArea_Selection", USER_DETERMINED),
            XmlNode::leaf("FloorArea", self.weighted_floor_area),
            XmlNode::leaf("ClearanceHeight_Selection", USER_DETERMINED),
            XmlNode::leaf("ClearanceHeight", self.clear_height),
            // 2 = mixed construction.
            XmlNode::leaf("SpecificHeatCapacity_Selection", 2),
            XmlNode::leaf("SpecificHeatCapacity", SPECIFIC_HEAT_CAPACITY),
        ]
    }
}

/// One space's row in the zone's room-ventilation table.
#[derive(Debug, Clone, PartialEq)]
pub struct WufiRoomVent {
    pub name: String,
    pub wufi_type: i32,
    pub quantity: i32,
    pub weighted_floor_area: f64,
    pub clear_height: f64,
    pub flow_supply: f64,
    pub flow_extract: f64,
}

impl WufiRoomVent {
    fn from_space(space: &Space) -> Self {
        Self {
            name: space.full_name(),
            wufi_type: space.wufi_type,
            quantity: space.quantity,
            weighted_floor_area: space.weighted_floor_area(),
            clear_height: space.avg_clear_height(),
            flow_supply: space.vent_flow_supply,
            flow_extract: space.vent_flow_extract,
        }
    }
}

impl ToXml for WufiRoomVent {
    fn to_xml(&self) -> Vec<XmlNode> {
        vec![
            XmlNode::leaf("Name", &self.name),
            XmlNode::leaf("Type", self.wufi_type),
            XmlNode::leaf("IdentNrUtilizationPatternVent", 1),
            XmlNode::leaf("IdentNrVentilationUnit", 1),
            XmlNode::leaf("Quantity", self.quantity),
            XmlNode::leaf("AreaRoom_Selection", USER_DETERMINED),
            XmlNode::leaf("AreaRoom", self.weighted_floor_area),
            XmlNode::leaf("ClearRoomHeight_Selection", USER_DETERMINED),
            XmlNode::leaf("ClearRoomHeight", self.clear_height),
            XmlNode::leaf("DesignVolumeFlowRateSupply", self.flow_supply),
            XmlNode::leaf("DesignVolumeFlowRateExhaust", self.flow_extract),
        ]
    }
}
