//! Passive House property bags and the side-table stores that attach
//! them to base-model entities.
//!
//! The base model stays untouched: every PH-specific attribute lives in
//! a bag keyed by the host entity's identifier. Bags are created lazily
//! on first access, duplicate with their host and serialize alongside
//! the model under a `properties` map. Room-level mechanical devices
//! persist abridged (identifier references into a model-level catalog);
//! everything else persists in full.

use std::collections::BTreeMap;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::base::{from_tagged_value, tagged_value, HasIdentifier};
use crate::certification::BuildingSegment;
use crate::envelope::ThermalBridge;
use crate::hvac::{
    ExhaustVentDevice, HeatPumpSystem, HeatingSystem, HotWaterSystem, RenewableDevice,
    SupportiveDevice, VentilationSystem,
};
use crate::model::{Model, Room};
use crate::random_id;
use crate::shading::ShadingDimensions;
use crate::space::Space;

/// Model-level PH data: the building segments rooms point into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPh {
    pub identifier: String,
    #[serde(default)]
    pub building_segments: Vec<BuildingSegment>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub user_data: Map<String, Value>,
}

impl ModelPh {
    pub fn new() -> Self {
        Self {
            identifier: random_id(),
            building_segments: Vec::new(),
            user_data: Map::new(),
        }
    }

    pub fn building_segment(&self, identifier: &str) -> Option<&BuildingSegment> {
        self.building_segments
            .iter()
            .find(|s| s.identifier() == identifier)
    }
}

impl Default for ModelPh {
    fn default() -> Self {
        Self::new()
    }
}

/// Room-level PH data: the spaces hosted by the room, its thermal
/// bridges and the building segment it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomPh {
    pub identifier: String,
    /// Host room identifier. Weak reference, rebound on load.
    #[serde(skip)]
    pub host: Option<String>,
    #[serde(default)]
    pub spaces: Vec<Space>,
    #[serde(default)]
    pub thermal_bridges: Vec<ThermalBridge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_segment: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub user_data: Map<String, Value>,
}

impl RoomPh {
    pub fn new(host: &str) -> Self {
        Self {
            identifier: random_id(),
            host: Some(host.to_string()),
            spaces: Vec::new(),
            thermal_bridges: Vec::new(),
            building_segment: None,
            user_data: Map::new(),
        }
    }

    pub fn add_spaces(&mut self, spaces: impl IntoIterator<Item = Space>) {
        let host = self.host.clone();
        for mut space in spaces {
            if space.host.is_none() {
                space.host = host.clone();
            }
            self.spaces.push(space);
        }
    }

    /// Gross floor area of all hosted spaces.
    pub fn total_space_floor_area(&self) -> f64 {
        self.spaces.iter().map(Space::floor_area).sum()
    }

    /// Program-weighted floor area of all hosted spaces.
    pub fn total_space_weighted_floor_area(&self) -> f64 {
        self.spaces.iter().map(Space::weighted_floor_area).sum()
    }

    /// Net interior volume of all hosted spaces.
    pub fn total_space_net_volume(&self) -> f64 {
        self.spaces.iter().map(Space::net_volume).sum()
    }

    pub fn to_dict(&self) -> Result<Value> {
        tagged_value(self, "RoomPhProperties")
    }

    pub fn from_dict(value: &Value, host: &str) -> Result<Self> {
        let mut bag: Self = from_tagged_value(value, "RoomPhProperties")?;
        bag.rebind(host);
        Ok(bag)
    }

    fn rebind(&mut self, host: &str) {
        self.host = Some(host.to_string());
        for space in &mut self.spaces {
            space.host = Some(host.to_string());
        }
    }
}

/// Aperture-level PH data: solved shading dimensions and the PHPP
/// bookkeeping fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AperturePh {
    pub identifier: String,
    #[serde(skip)]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shading_dimensions: Option<ShadingDimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_transparency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub user_data: Map<String, Value>,
}

impl AperturePh {
    pub fn new(host: &str) -> Self {
        Self {
            identifier: random_id(),
            host: Some(host.to_string()),
            shading_dimensions: None,
            percent_transparency: None,
            variant_type_name: None,
            user_data: Map::new(),
        }
    }

    pub fn to_dict(&self) -> Result<Value> {
        tagged_value(self, "AperturePhProperties")
    }

    pub fn from_dict(value: &Value, host: &str) -> Result<Self> {
        let mut bag: Self = from_tagged_value(value, "AperturePhProperties")?;
        bag.host = Some(host.to_string());
        Ok(bag)
    }
}

/// Room-level mechanical equipment. Devices are owned by the bag;
/// the model-level catalog is derived at save time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoomHvac {
    pub identifier: String,
    #[serde(skip)]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ventilation_system: Option<VentilationSystem>,
    #[serde(default)]
    pub heating_systems: Vec<HeatingSystem>,
    #[serde(default)]
    pub heat_pump_systems: Vec<HeatPumpSystem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hot_water_system: Option<HotWaterSystem>,
    #[serde(default)]
    pub exhaust_vent_devices: Vec<ExhaustVentDevice>,
    #[serde(default)]
    pub supportive_devices: Vec<SupportiveDevice>,
    #[serde(default)]
    pub renewable_devices: Vec<RenewableDevice>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub user_data: Map<String, Value>,
}

fn identifiers_of<T: HasIdentifier>(items: &[T]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|d| Value::String(d.identifier().to_string()))
            .collect(),
    )
}

impl RoomHvac {
    pub fn new(host: &str) -> Self {
        Self {
            identifier: random_id(),
            host: Some(host.to_string()),
            ..Self::default()
        }
    }

    pub fn to_dict(&self) -> Result<Value> {
        tagged_value(self, "RoomPhHvacProperties")
    }

    /// The persisted room form: device identifier references only.
    /// The hot-water system is the exception and stays in full; its
    /// piping belongs to this room, not to a shared catalog.
    pub fn to_dict_abridged(&self) -> Result<Value> {
        let mut map = Map::new();
        map.insert(
            "type".to_string(),
            Value::String("RoomPhHvacPropertiesAbridged".to_string()),
        );
        map.insert(
            "identifier".to_string(),
            Value::String(self.identifier.clone()),
        );
        if let Some(vent) = &self.ventilation_system {
            map.insert(
                "ventilation_system".to_string(),
                Value::String(vent.identifier().to_string()),
            );
        }
        map.insert(
            "heating_systems".to_string(),
            identifiers_of(&self.heating_systems),
        );
        map.insert(
            "heat_pump_systems".to_string(),
            identifiers_of(&self.heat_pump_systems),
        );
        if let Some(shw) = &self.hot_water_system {
            map.insert("hot_water_system".to_string(), shw.to_dict()?);
        }
        map.insert(
            "exhaust_vent_devices".to_string(),
            identifiers_of(&self.exhaust_vent_devices),
        );
        map.insert(
            "supportive_devices".to_string(),
            identifiers_of(&self.supportive_devices),
        );
        map.insert(
            "renewable_devices".to_string(),
            identifiers_of(&self.renewable_devices),
        );
        if !self.user_data.is_empty() {
            map.insert("user_data".to_string(), Value::Object(self.user_data.clone()));
        }
        Ok(Value::Object(map))
    }

    fn from_abridged(value: &Value, host: &str, catalog: &DeviceCatalog) -> Result<Self> {
        let received = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if received != "RoomPhHvacPropertiesAbridged" {
            return Err(anyhow!(
                "Type mismatch: received '{}', expected '{}'",
                received,
                "RoomPhHvacPropertiesAbridged"
            ));
        }
        let identifier = value
            .get("identifier")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("room hvac entry for {} has no identifier", host))?;
        let mut bag = Self {
            identifier: identifier.to_string(),
            host: Some(host.to_string()),
            ..Self::default()
        };
        if let Some(id) = value.get("ventilation_system").and_then(Value::as_str) {
            bag.ventilation_system = Some(resolve(
                &catalog.ventilation_systems,
                id,
                "ventilation system",
                host,
            )?);
        }
        for id in identifier_list(value, "heating_systems") {
            bag.heating_systems
                .push(resolve(&catalog.heating_systems, &id, "heating system", host)?);
        }
        for id in identifier_list(value, "heat_pump_systems") {
            bag.heat_pump_systems.push(resolve(
                &catalog.heat_pump_systems,
                &id,
                "heat pump system",
                host,
            )?);
        }
        if let Some(shw) = value.get("hot_water_system") {
            bag.hot_water_system = Some(HotWaterSystem::from_dict(shw)?);
        }
        for id in identifier_list(value, "exhaust_vent_devices") {
            bag.exhaust_vent_devices.push(resolve(
                &catalog.exhaust_vent_devices,
                &id,
                "exhaust ventilator",
                host,
            )?);
        }
        for id in identifier_list(value, "supportive_devices") {
            bag.supportive_devices.push(resolve(
                &catalog.supportive_devices,
                &id,
                "supportive device",
                host,
            )?);
        }
        for id in identifier_list(value, "renewable_devices") {
            bag.renewable_devices.push(resolve(
                &catalog.renewable_devices,
                &id,
                "renewable device",
                host,
            )?);
        }
        if let Some(user_data) = value.get("user_data").and_then(Value::as_object) {
            bag.user_data = user_data.clone();
        }
        Ok(bag)
    }
}

fn resolve<T: Clone>(
    catalog: &BTreeMap<String, T>,
    identifier: &str,
    family: &str,
    room: &str,
) -> Result<T> {
    catalog.get(identifier).cloned().ok_or_else(|| {
        anyhow!(
            "room {} references unknown {} {}",
            room,
            family,
            identifier
        )
    })
}

fn identifier_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// The model-level device catalog derived from the room bags at save
/// time and consumed again on load.
#[derive(Debug, Default, Serialize, Deserialize)]
struct DeviceCatalog {
    #[serde(default)]
    ventilation_systems: BTreeMap<String, VentilationSystem>,
    #[serde(default)]
    heating_systems: BTreeMap<String, HeatingSystem>,
    #[serde(default)]
    heat_pump_systems: BTreeMap<String, HeatPumpSystem>,
    #[serde(default)]
    exhaust_vent_devices: BTreeMap<String, ExhaustVentDevice>,
    #[serde(default)]
    supportive_devices: BTreeMap<String, SupportiveDevice>,
    #[serde(default)]
    renewable_devices: BTreeMap<String, RenewableDevice>,
}

fn collect_into<T: HasIdentifier + Clone>(catalog: &mut BTreeMap<String, T>, items: &[T]) {
    for item in items {
        catalog.insert(item.identifier().to_string(), item.clone());
    }
}

impl DeviceCatalog {
    fn from_rooms<'a>(rooms: impl Iterator<Item = &'a RoomHvac>) -> Self {
        let mut catalog = Self::default();
        for bag in rooms {
            if let Some(vent) = &bag.ventilation_system {
                catalog
                    .ventilation_systems
                    .insert(vent.identifier().to_string(), vent.clone());
            }
            collect_into(&mut catalog.heating_systems, &bag.heating_systems);
            collect_into(&mut catalog.heat_pump_systems, &bag.heat_pump_systems);
            collect_into(&mut catalog.exhaust_vent_devices, &bag.exhaust_vent_devices);
            collect_into(&mut catalog.supportive_devices, &bag.supportive_devices);
            collect_into(&mut catalog.renewable_devices, &bag.renewable_devices);
        }
        catalog
    }
}

/// Side table of PH bags keyed by host identifier.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhPropertyStore {
    pub model: ModelPh,
    rooms: BTreeMap<String, RoomPh>,
    apertures: BTreeMap<String, AperturePh>,
}

impl PhPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The room bag, created on first access.
    pub fn room_ph(&mut self, room_id: &str) -> &mut RoomPh {
        self.rooms
            .entry(room_id.to_string())
            .or_insert_with(|| RoomPh::new(room_id))
    }

    pub fn get_room_ph(&self, room_id: &str) -> Option<&RoomPh> {
        self.rooms.get(room_id)
    }

    pub fn set_room_ph(&mut self, room_id: &str, mut bag: RoomPh) {
        bag.rebind(room_id);
        self.rooms.insert(room_id.to_string(), bag);
    }

    /// The aperture bag, created on first access.
    pub fn aperture_ph(&mut self, aperture_id: &str) -> &mut AperturePh {
        self.apertures
            .entry(aperture_id.to_string())
            .or_insert_with(|| AperturePh::new(aperture_id))
    }

    pub fn get_aperture_ph(&self, aperture_id: &str) -> Option<&AperturePh> {
        self.apertures.get(aperture_id)
    }

    pub fn room_bags(&self) -> impl Iterator<Item = (&str, &RoomPh)> {
        self.rooms.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copies the bag of `old_id` under `new_id`, keeping the bag
    /// identifier and re-homing the hosted spaces.
    pub fn duplicate_room(&mut self, old_id: &str, new_id: &str) {
        if let Some(bag) = self.rooms.get(old_id) {
            let mut copy = bag.clone();
            copy.rebind(new_id);
            self.rooms.insert(new_id.to_string(), copy);
        }
    }

    pub fn to_dict(&self) -> Result<Value> {
        let mut value = tagged_value(&self.model, "ModelPhProperties")?;
        let map = value
            .as_object_mut()
            .ok_or_else(|| anyhow!("Expected a JSON map for: ModelPhProperties"))?;
        let mut rooms = Map::new();
        for (host, bag) in &self.rooms {
            rooms.insert(host.clone(), bag.to_dict()?);
        }
        map.insert("rooms".to_string(), Value::Object(rooms));
        let mut apertures = Map::new();
        for (host, bag) in &self.apertures {
            apertures.insert(host.clone(), bag.to_dict()?);
        }
        map.insert("apertures".to_string(), Value::Object(apertures));
        Ok(value)
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        let model: ModelPh = from_tagged_value(value, "ModelPhProperties")?;
        let mut store = Self {
            model,
            ..Self::default()
        };
        if let Some(rooms) = value.get("rooms").and_then(Value::as_object) {
            for (host, bag) in rooms {
                store
                    .rooms
                    .insert(host.clone(), RoomPh::from_dict(bag, host)?);
            }
        }
        if let Some(apertures) = value.get("apertures").and_then(Value::as_object) {
            for (host, bag) in apertures {
                store
                    .apertures
                    .insert(host.clone(), AperturePh::from_dict(bag, host)?);
            }
        }
        Ok(store)
    }
}

/// Side table of mechanical-equipment bags keyed by host room
/// identifier.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhHvacStore {
    rooms: BTreeMap<String, RoomHvac>,
}

impl PhHvacStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The room equipment bag, created on first access.
    pub fn room_hvac(&mut self, room_id: &str) -> &mut RoomHvac {
        self.rooms
            .entry(room_id.to_string())
            .or_insert_with(|| RoomHvac::new(room_id))
    }

    pub fn get_room_hvac(&self, room_id: &str) -> Option<&RoomHvac> {
        self.rooms.get(room_id)
    }

    pub fn set_room_hvac(&mut self, room_id: &str, mut bag: RoomHvac) {
        bag.host = Some(room_id.to_string());
        self.rooms.insert(room_id.to_string(), bag);
    }

    pub fn room_bags(&self) -> impl Iterator<Item = (&str, &RoomHvac)> {
        self.rooms.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Attaches a hot-water system to the room. The room must carry a
    /// service hot-water load first.
    pub fn assign_hot_water_system(&mut self, room: &Room, system: HotWaterSystem) -> Result<()> {
        if room.service_hot_water.is_none() {
            return Err(anyhow!(
                "room {} has no service hot-water load; set one on the room \
                 before assigning a hot-water system",
                room.base.display_name
            ));
        }
        self.room_hvac(room.identifier()).hot_water_system = Some(system);
        Ok(())
    }

    pub fn duplicate_room(&mut self, old_id: &str, new_id: &str) {
        if let Some(bag) = self.rooms.get(old_id) {
            let mut copy = bag.clone();
            copy.host = Some(new_id.to_string());
            self.rooms.insert(new_id.to_string(), copy);
        }
    }

    pub fn to_dict(&self) -> Result<Value> {
        let catalog = DeviceCatalog::from_rooms(self.rooms.values());
        let mut value = serde_json::to_value(&catalog)
            .context("Failed to serialize: ModelPhHvacProperties")?;
        let map = value
            .as_object_mut()
            .ok_or_else(|| anyhow!("Expected a JSON map for: ModelPhHvacProperties"))?;
        map.insert(
            "type".to_string(),
            Value::String("ModelPhHvacProperties".to_string()),
        );
        let mut rooms = Map::new();
        for (host, bag) in &self.rooms {
            rooms.insert(host.clone(), bag.to_dict_abridged()?);
        }
        map.insert("rooms".to_string(), Value::Object(rooms));
        Ok(value)
    }

    /// Rebuilds the device catalog, then resolves each room's
    /// references against it.
    pub fn from_dict(value: &Value) -> Result<Self> {
        let received = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if received != "ModelPhHvacProperties" {
            return Err(anyhow!(
                "Type mismatch: received '{}', expected '{}'",
                received,
                "ModelPhHvacProperties"
            ));
        }
        let catalog: DeviceCatalog = serde_json::from_value(value.clone())
            .context("Failed to deserialize: ModelPhHvacProperties")?;
        let mut store = Self::new();
        if let Some(rooms) = value.get("rooms").and_then(Value::as_object) {
            for (host, bag) in rooms {
                store
                    .rooms
                    .insert(host.clone(), RoomHvac::from_abridged(bag, host, &catalog)?);
            }
        }
        Ok(store)
    }
}

/// A base model paired with its PH property stores. This is the unit
/// the file I/O and the WUFI translator work on.
#[derive(Debug, Clone, PartialEq)]
pub struct PhModel {
    pub model: Model,
    pub ph: PhPropertyStore,
    pub hvac: PhHvacStore,
}

impl PhModel {
    pub fn new(model: Model) -> Self {
        Self {
            model,
            ph: PhPropertyStore::new(),
            hvac: PhHvacStore::new(),
        }
    }

    /// Attaches a hot-water system to the named room, checking that
    /// the room carries a service hot-water load.
    pub fn assign_hot_water_system(&mut self, room_id: &str, system: HotWaterSystem) -> Result<()> {
        let room = self.model.room(room_id)?;
        self.hvac.assign_hot_water_system(room, system)
    }

    /// Copies a room and both of its property bags under a new
    /// identifier. Bag identifiers are preserved; hosted spaces are
    /// re-homed to the copy.
    pub fn duplicate_room(&mut self, old_id: &str, new_id: &str) -> Result<()> {
        if self.model.rooms.iter().any(|r| r.identifier() == new_id) {
            return Err(anyhow!("model already has a room with identifier {}", new_id));
        }
        let mut copy = self.model.room(old_id)?.clone();
        copy.base.identifier = new_id.to_string();
        self.model.rooms.push(copy);
        self.ph.duplicate_room(old_id, new_id);
        self.hvac.duplicate_room(old_id, new_id);
        Ok(())
    }

    pub fn to_dict(&self) -> Result<Value> {
        let mut properties = Map::new();
        properties.insert("ph".to_string(), self.ph.to_dict()?);
        properties.insert("hvac".to_string(), self.hvac.to_dict()?);
        let mut map = Map::new();
        map.insert("type".to_string(), Value::String("PhModel".to_string()));
        map.insert("model".to_string(), self.model.to_dict()?);
        map.insert("properties".to_string(), Value::Object(properties));
        Ok(Value::Object(map))
    }

    pub fn from_dict(value: &Value) -> Result<Self> {
        let received = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if received != "PhModel" {
            return Err(anyhow!(
                "Type mismatch: received '{}', expected '{}'",
                received,
                "PhModel"
            ));
        }
        let model = Model::from_dict(
            value
                .get("model")
                .ok_or_else(|| anyhow!("PhModel dict has no 'model' entry"))?,
        )?;
        let mut ph_model = Self::new(model);
        if let Some(properties) = value.get("properties") {
            ph_model.apply_properties_from_dict(properties)?;
        }
        Ok(ph_model)
    }

    /// Restores both property stores from a `properties` map, replacing
    /// whatever the stores currently hold.
    pub fn apply_properties_from_dict(&mut self, properties: &Value) -> Result<()> {
        if let Some(ph) = properties.get("ph") {
            self.ph = PhPropertyStore::from_dict(ph)?;
        }
        if let Some(hvac) = properties.get("hvac") {
            self.hvac = PhHvacStore::from_dict(hvac)?;
        }
        Ok(())
    }
}
