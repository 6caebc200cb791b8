//! Which UDDF fields are physical measurements, and how each converts.

use std::collections::HashMap;
use std::sync::OnceLock;

use uddf_xml::Scalar;

use crate::convert::{round_half_up, round_to};
use crate::UnitSystem;

/// Physical quantity measured by a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// Kelvin.
    Temperature,
    /// Cubic meters.
    Volume,
    /// Meters: depths, altitudes, visibility, dimensions.
    Length,
    /// Pascal, including partial pressures of oxygen.
    Pressure,
    /// Seconds.
    Time,
    /// Kilograms.
    Mass,
    /// Kilograms per cubic meter.
    Density,
    /// Lux.
    Illuminance,
    /// Meters per second.
    AscentRate,
}

/// Measurement category: the fields it covers and its conversion per unit
/// system. Source values are always in the UDDF base unit.
#[derive(Debug)]
pub struct Category {
    pub quantity: Quantity,
    /// Lower-case field names belonging to this category.
    pub fields: &'static [&'static str],
    pub si_unit: &'static str,
    pub metric_unit: &'static str,
    pub imperial_unit: &'static str,
    metric: fn(f64) -> Scalar,
    imperial: fn(f64) -> Scalar,
}

impl Category {
    /// Convert a base-unit value into `unit`. `Si` is the identity.
    pub fn convert(&self, value: f64, unit: UnitSystem) -> Scalar {
        match unit {
            UnitSystem::Si => Scalar::Number(value),
            UnitSystem::Metric => (self.metric)(value),
            UnitSystem::Imperial => (self.imperial)(value),
        }
    }

    /// Unit symbol of converted values.
    pub fn unit_label(&self, unit: UnitSystem) -> &'static str {
        match unit {
            UnitSystem::Si => self.si_unit,
            UnitSystem::Metric => self.metric_unit,
            UnitSystem::Imperial => self.imperial_unit,
        }
    }
}

fn unchanged(value: f64) -> Scalar {
    Scalar::Number(value)
}

fn kelvin_to_celsius(value: f64) -> Scalar {
    Scalar::Number(value - 273.15)
}

fn kelvin_to_fahrenheit(value: f64) -> Scalar {
    Scalar::Number(round_half_up((value - 273.15) * 9.0 / 5.0 + 32.0))
}

fn cubic_meters_to_liters(value: f64) -> Scalar {
    Scalar::Number(round_half_up(value * 1000.0))
}

fn cubic_meters_to_cubic_feet(value: f64) -> Scalar {
    Scalar::Number(round_to(value * 35.3147, 3))
}

fn meters_to_feet(value: f64) -> Scalar {
    Scalar::Number(round_half_up(value * 3.28084))
}

fn pascal_to_bar(value: f64) -> Scalar {
    Scalar::Number(round_half_up(value / 100_000.0))
}

fn pascal_to_psi(value: f64) -> Scalar {
    Scalar::Number(round_half_up(value * 0.000_145_037_7))
}

/// Whole minutes, or `0:SS` below one minute. Consumers must accept text.
fn seconds_to_minutes(value: f64) -> Scalar {
    if value == 0.0 {
        Scalar::Number(0.0)
    } else if value < 60.0 {
        Scalar::Text(format!("0:{:02}", round_half_up(value) as i64))
    } else {
        Scalar::Number(round_half_up(value / 60.0))
    }
}

fn kilograms_to_pounds(value: f64) -> Scalar {
    Scalar::Number(round_half_up(value * 2.20462))
}

fn density_to_imperial(value: f64) -> Scalar {
    Scalar::Number(round_half_up(value * 0.062428))
}

fn lux_to_foot_candles(value: f64) -> Scalar {
    Scalar::Number(round_half_up(value * 0.092903))
}

fn meters_per_second_to_feet(value: f64) -> Scalar {
    Scalar::Number(round_to(value * 3.28084, 2))
}

/// Every measurement category known to the converter.
pub const CATEGORIES: &[Category] = &[
    Category {
        quantity: Quantity::Temperature,
        fields: &["airtemperature", "lowesttemperature", "temperature"],
        si_unit: "K",
        metric_unit: "°C",
        imperial_unit: "°F",
        metric: kelvin_to_celsius,
        imperial: kelvin_to_fahrenheit,
    },
    Category {
        quantity: Quantity::Volume,
        fields: &[
            "breathingconsumptionvolume",
            "breathingconsumptionvolumebegin",
            "breathingconsumptionvolumeend",
            "breathingconsumptionvolumestep",
            "tankvolume",
            "tankvolumebegin",
            "tankvolumeend",
            "tankvolumestep",
            "totallungcapacity",
            "vitalcapacity",
        ],
        si_unit: "m³",
        metric_unit: "L",
        imperial_unit: "ft³",
        metric: cubic_meters_to_liters,
        imperial: cubic_meters_to_cubic_feet,
    },
    Category {
        quantity: Quantity::Length,
        fields: &[
            "altitude",
            "altitudeofexposure",
            "arealength",
            "averagedepth",
            "averagevisibility",
            "beam",
            "dcalarmdepth",
            "depth",
            "divedepthbegin",
            "divedepthend",
            "divedepthstep",
            "draught",
            "equivalentairdepth",
            "focallength",
            "focusingdistance",
            "greatestdepth",
            "height",
            "length",
            "maximumdepth",
            "maximumoperatingdepth",
            "maximumvisibility",
            "minimumdepth",
            "minimumvisibility",
            "r0",
            "setdcaltitude",
            "setdcdivedepthalarm",
            "size",
            "visibility",
            "wayaltitude",
        ],
        si_unit: "m",
        metric_unit: "m",
        imperial_unit: "ft",
        metric: unchanged,
        imperial: meters_to_feet,
    },
    Category {
        quantity: Quantity::Pressure,
        fields: &[
            "calculatedpo2",
            "highestpo2",
            "measuredpo2",
            "pressuredrop",
            "surfacepressure",
            "tankpressureend",
            "tankpressurereserve",
            "tankpressure",
            "tankpressurebegin",
        ],
        si_unit: "Pa",
        metric_unit: "bar",
        imperial_unit: "psi",
        metric: pascal_to_bar,
        imperial: pascal_to_psi,
    },
    // `period` stays in seconds: it belongs to dive-computer alarm settings.
    Category {
        quantity: Quantity::Time,
        fields: &[
            "bottomtimemaximum",
            "bottomtimeminimum",
            "bottomtimestepbegin",
            "bottomtimestepend",
            "desaturationtime",
            "diveduration",
            "divetime",
            "nodecotime",
            "noflighttime",
            "passedtime",
            "remainingbottomtime",
            "remainingo2time",
            "surfaceintervalbeforealtitudeexposure",
            "timespan",
            "timespanbeforedive",
            "totallengthofexposure",
        ],
        si_unit: "s",
        metric_unit: "s",
        imperial_unit: "min",
        metric: unchanged,
        imperial: seconds_to_minutes,
    },
    Category {
        quantity: Quantity::Mass,
        fields: &["displacement", "leadquantity", "tonnage", "weight"],
        si_unit: "kg",
        metric_unit: "kg",
        imperial_unit: "lb",
        metric: unchanged,
        imperial: kilograms_to_pounds,
    },
    Category {
        quantity: Quantity::Density,
        fields: &["density"],
        si_unit: "kg/m³",
        metric_unit: "kg/m³",
        imperial_unit: "lb/ft³",
        metric: unchanged,
        imperial: density_to_imperial,
    },
    Category {
        quantity: Quantity::Illuminance,
        fields: &["lightintensity"],
        si_unit: "lx",
        metric_unit: "lx",
        imperial_unit: "fc",
        metric: unchanged,
        imperial: lux_to_foot_candles,
    },
    Category {
        quantity: Quantity::AscentRate,
        fields: &["maximumascendingrate"],
        si_unit: "m/s",
        metric_unit: "m/s",
        imperial_unit: "ft/s",
        metric: unchanged,
        imperial: meters_per_second_to_feet,
    },
];

fn index() -> &'static HashMap<&'static str, &'static Category> {
    static INDEX: OnceLock<HashMap<&'static str, &'static Category>> = OnceLock::new();
    INDEX.get_or_init(|| {
        CATEGORIES
            .iter()
            .flat_map(|category| category.fields.iter().map(move |field| (*field, category)))
            .collect()
    })
}

/// Find the measurement category of a field name, ignoring case.
pub fn category_for(field: &str) -> Option<&'static Category> {
    index().get(field.to_lowercase().as_str()).copied()
}

/// Render a converted value with the unit symbol of `field`, e.g. `60 ft`.
///
/// Text values (such as `0:32` durations) and fields outside the
/// measurement taxonomy are printed bare; a missing value prints as `-`.
pub fn format_measurement(field: &str, value: Option<&Scalar>, unit: UnitSystem) -> String {
    match (value, category_for(field)) {
        (None, _) => "-".to_string(),
        (Some(Scalar::Number(number)), Some(category)) => {
            format!("{number} {}", category.unit_label(unit))
        }
        (Some(other), _) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn field_names_belong_to_one_category() {
        let mut seen = HashSet::new();
        for category in CATEGORIES {
            for field in category.fields {
                assert!(seen.insert(*field), "{field} listed twice");
                assert_eq!(*field, field.to_lowercase(), "{field} must be lower-case");
            }
        }
        assert_eq!(index().len(), seen.len());
    }

    #[test]
    fn lookup_ignores_case() {
        for name in ["Depth", "DEPTH", "depth", "dEpTh"] {
            let category = category_for(name).expect("depth is a measurement");
            assert_eq!(category.quantity, Quantity::Length);
        }
        assert_eq!(
            category_for("tankVolume").map(|c| c.quantity),
            Some(Quantity::Volume)
        );
    }

    #[test]
    fn alarm_period_and_vendor_tags_are_not_measurements() {
        assert!(category_for("period").is_none());
        assert!(category_for("x-vendor-battery").is_none());
        assert!(category_for("").is_none());
    }

    #[test]
    fn unit_labels_follow_system() {
        let pressure = category_for("tankpressure").expect("pressure");
        assert_eq!(pressure.unit_label(UnitSystem::Si), "Pa");
        assert_eq!(pressure.unit_label(UnitSystem::Metric), "bar");
        assert_eq!(pressure.unit_label(UnitSystem::Imperial), "psi");
    }

    #[test]
    fn si_is_identity_for_every_category() {
        for category in CATEGORIES {
            for _ in 0..64 {
                let value = fastrand::f64() * 1.0e7 - 5.0e6;
                assert_eq!(
                    category.convert(value, UnitSystem::Si),
                    Scalar::Number(value),
                    "{:?}",
                    category.quantity
                );
            }
        }
    }

    #[test]
    fn metric_formulas() {
        let convert = |field: &str, value: f64| {
            category_for(field)
                .expect("known field")
                .convert(value, UnitSystem::Metric)
        };
        let celsius = convert("temperature", 293.15).as_f64().expect("number");
        assert!((celsius - 20.0).abs() < 1e-9);
        assert_eq!(convert("tankvolume", 0.012), Scalar::Number(12.0));
        assert_eq!(convert("tankpressure", 20_000_000.0), Scalar::Number(200.0));
        assert_eq!(convert("depth", 10.5), Scalar::Number(10.5));
        assert_eq!(convert("diveduration", 32.0), Scalar::Number(32.0));
        assert_eq!(convert("weight", 6.5), Scalar::Number(6.5));
    }

    #[test]
    fn imperial_formulas() {
        let convert = |field: &str, value: f64| {
            category_for(field)
                .expect("known field")
                .convert(value, UnitSystem::Imperial)
        };
        assert_eq!(convert("temperature", 293.15), Scalar::Number(68.0));
        let cubic_feet = convert("tankvolume", 0.012).as_f64().expect("number");
        assert!((cubic_feet - 0.4238).abs() < 0.0005);
        assert_eq!(convert("depth", 10.0), Scalar::Number(33.0));
        assert_eq!(convert("tankpressure", 20_000_000.0), Scalar::Number(2901.0));
        assert_eq!(convert("weight", 10.0), Scalar::Number(22.0));
        assert_eq!(convert("density", 1025.0), Scalar::Number(64.0));
        assert_eq!(convert("lightintensity", 1000.0), Scalar::Number(93.0));
        assert_eq!(
            convert("maximumascendingrate", 0.166_666),
            Scalar::Number(0.55)
        );
    }

    #[test]
    fn imperial_durations() {
        let time = category_for("diveduration").expect("time");
        assert_eq!(time.convert(0.0, UnitSystem::Imperial), Scalar::Number(0.0));
        assert_eq!(
            time.convert(32.0, UnitSystem::Imperial),
            Scalar::Text("0:32".into())
        );
        assert_eq!(
            time.convert(5.4, UnitSystem::Imperial),
            Scalar::Text("0:05".into())
        );
        assert_eq!(time.convert(125.0, UnitSystem::Imperial), Scalar::Number(2.0));
        assert_eq!(time.convert(3600.0, UnitSystem::Imperial), Scalar::Number(60.0));
    }

    #[test]
    fn measurements_carry_unit_symbols() {
        assert_eq!(
            format_measurement("greatestdepth", Some(&Scalar::Number(60.0)), UnitSystem::Imperial),
            "60 ft"
        );
        assert_eq!(
            format_measurement("diveduration", Some(&Scalar::Number(1800.0)), UnitSystem::Si),
            "1800 s"
        );
        assert_eq!(
            format_measurement("diveduration", Some(&Scalar::from("0:32")), UnitSystem::Imperial),
            "0:32"
        );
        assert_eq!(format_measurement("greatestdepth", None, UnitSystem::Metric), "-");
        assert_eq!(
            format_measurement("divenumber", Some(&Scalar::Number(7.0)), UnitSystem::Metric),
            "7"
        );
    }
}
