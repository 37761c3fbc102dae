//! Default utilization patterns referenced by the room-ventilation
//! records: one four-speed ventilation schedule and one occupancy
//! schedule, seeded with always-on values when the model carries no
//! schedules of its own.

use crate::wufi::xml::{ToXml, XmlNode};

/// One ventilation speed: daily operating hours plus the fraction of
/// design flow delivered at that speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedUtilization {
    pub daily_operating_hours: f64,
    pub flow_fraction: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VentilationPattern {
    pub id_num: u32,
    pub name: String,
    pub operating_days_per_week: f64,
    pub operating_weeks_per_year: f64,
    pub maximum: SpeedUtilization,
    pub standard: SpeedUtilization,
    pub basic: SpeedUtilization,
    pub minimum: SpeedUtilization,
}

impl VentilationPattern {
    /// Constant standard-speed operation, around the clock.
    pub fn default_pattern(id_num: u32) -> Self {
        Self {
            id_num,
            name: "default_ventilation_schedule".to_string(),
            operating_days_per_week: 7.0,
            operating_weeks_per_year: 52.0,
            maximum: SpeedUtilization {
                daily_operating_hours: 0.0,
                flow_fraction: 1.0,
            },
            standard: SpeedUtilization {
                daily_operating_hours: 24.0,
                flow_fraction: 1.0,
            },
            basic: SpeedUtilization {
                daily_operating_hours: 0.0,
                flow_fraction: 1.0,
            },
            minimum: SpeedUtilization {
                daily_operating_hours: 0.0,
                flow_fraction: 1.0,
            },
        }
    }
}

impl ToXml for VentilationPattern {
    fn to_xml(&self) -> Vec<XmlNode> {
        vec![
            XmlNode::leaf("Name", &self.name),
            XmlNode::leaf("IdentNr", self.id_num),
            XmlNode::leaf("OperatingDays", self.operating_days_per_week),
            XmlNode::leaf("OperatingWeeks", self.operating_weeks_per_year),
            XmlNode::leaf("Maximum_DOS", self.maximum.daily_operating_hours),
            XmlNode::leaf("Maximum_PDF", self.maximum.flow_fraction),
            XmlNode::leaf("Standard_DOS", self.standard.daily_operating_hours),
            XmlNode::leaf("Standard_PDF", self.standard.flow_fraction),
            XmlNode::leaf("Basic_DOS", self.basic.daily_operating_hours),
            XmlNode::leaf("Basic_PDF", self.basic.flow_fraction),
            XmlNode::leaf("Minimum_DOS", self.minimum.daily_operating_hours),
            XmlNode::leaf("Minimum_PDF", self.minimum.flow_fraction),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyPattern {
    pub id_num: u32,
    pub name: String,
    pub begin_utilization: f64,
    pub end_utilization: f64,
    pub annual_utilization_days: f64,
    pub illumination_level: f64,
    pub relative_absenteeism: f64,
}

impl OccupancyPattern {
    pub fn default_pattern(id_num: u32) -> Self {
        Self {
            id_num,
            name: "default_occupancy_schedule".to_string(),
            begin_utilization: 0.0,
            end_utilization: 24.0,
            annual_utilization_days: 365.0,
            illumination_level: 300.0,
            relative_absenteeism: 0.0,
        }
    }
}

impl ToXml for OccupancyPattern {
    fn to_xml(&self) -> Vec<XmlNode> {
        vec![
            XmlNode::leaf("IdentNr", self.id_num),
            XmlNode::leaf("Name", &self.name),
            XmlNode::leaf("BeginUtilization", self.begin_utilization),
            XmlNode::leaf("EndUtilization", self.end_utilization),
            XmlNode::leaf("AnnualUtilizationDays", self.annual_utilization_days),
            XmlNode::leaf("IlluminationLevel", self.illumination_level),
            XmlNode::leaf("RelativeAbsenteeism", self.relative_absenteeism),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wufi::xml::render;

    #[test]
    fn test_default_ventilation_pattern_runs_continuously() {
        let pattern = VentilationPattern::default_pattern(1);
        assert!((pattern.standard.daily_operating_hours - 24.0).abs() < 1e-9);
        assert!((pattern.operating_days_per_week - 7.0).abs() < 1e-9);
        let doc = render(
            "Root",
            &[XmlNode::object("UtilizationPatternVent", pattern.to_xml())],
        );
        assert!(doc.contains("<Standard_DOS>24</Standard_DOS>"));
        assert!(doc.contains("<OperatingWeeks>52</OperatingWeeks>"));
    }

    #[test]
    fn test_default_occupancy_pattern_covers_full_year() {
        let pattern = OccupancyPattern::default_pattern(1);
        assert!((pattern.annual_utilization_days - 365.0).abs() < 1e-9);
        assert!((pattern.end_utilization - 24.0).abs() < 1e-9);
    }
}
