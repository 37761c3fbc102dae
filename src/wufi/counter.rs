//! Per-run `id_num` allocation.
//!
//! WUFI cross-references entities with small 1-based integers, one
//! sequence per entity class. The counters belong to a single
//! translation run; two runs never share state, so translating the
//! same model twice yields identical documents.

#[derive(Debug, Default)]
pub struct IdCounters {
    vertex: u32,
    polygon: u32,
    component: u32,
    assembly: u32,
    window_type: u32,
    zone: u32,
    variant: u32,
    ph_building: u32,
}

impl IdCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_vertex(&mut self) -> u32 {
        self.vertex += 1;
        self.vertex
    }

    pub fn next_polygon(&mut self) -> u32 {
        self.polygon += 1;
        self.polygon
    }

    pub fn next_component(&mut self) -> u32 {
        self.component += 1;
        self.component
    }

    pub fn next_assembly(&mut self) -> u32 {
        self.assembly += 1;
        self.assembly
    }

    pub fn next_window_type(&mut self) -> u32 {
        self.window_type += 1;
        self.window_type
    }

    pub fn next_zone(&mut self) -> u32 {
        self.zone += 1;
        self.zone
    }

    pub fn next_variant(&mut self) -> u32 {
        self.variant += 1;
        self.variant
    }

    pub fn next_ph_building(&mut self) -> u32 {
        self.ph_building += 1;
        self.ph_building
    }
}
