/// Standard gravitational acceleration used by the force model, m/s².
pub const GRAVITY: f64 = 9.81;

/// External squat loads tested in the historical protocol, kg.
pub const DEFAULT_LOADS_KG: [u32; 6] = [40, 50, 60, 70, 80, 90];

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub gravity: f64,
    pub loads_kg: Vec<u32>,
    pub min_points: usize,
    pub interpretation: InterpretationThresholds,
    pub schema: ColumnSchema,
}

/// Domain cut-offs for the qualitative profile label. Strict comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpretationThresholds {
    pub velocity_oriented_v0_above: f64,
    pub velocity_oriented_f0_below: f64,
    pub force_oriented_f0_above: f64,
    pub force_oriented_v0_below: f64,
}

#[derive(Debug, Clone)]
pub struct ColumnSchema {
    pub jump_name: &'static [&'static str],
    pub jump_date: &'static [&'static str],
    pub jump_body_weight: &'static [&'static str],
    pub jump_height_cm: &'static [&'static str],
    pub loaded_name: &'static [&'static str],
    pub loaded_body_weight: &'static [&'static str],
}

impl EngineConfig {
    pub fn default_v1() -> Self {
        Self {
            gravity: GRAVITY,
            loads_kg: DEFAULT_LOADS_KG.to_vec(),
            min_points: 2,
            interpretation: InterpretationThresholds::default_v1(),
            schema: ColumnSchema::default_v1(),
        }
    }

    pub fn with_loads(mut self, loads_kg: &[u32]) -> Self {
        let mut loads = loads_kg.to_vec();
        loads.sort_unstable();
        loads.dedup();
        self.loads_kg = loads;
        self
    }
}

impl InterpretationThresholds {
    pub fn default_v1() -> Self {
        Self {
            velocity_oriented_v0_above: 4.5,
            velocity_oriented_f0_below: 1800.0,
            force_oriented_f0_above: 2300.0,
            force_oriented_v0_below: 3.5,
        }
    }
}

impl ColumnSchema {
    pub fn default_v1() -> Self {
        Self {
            jump_name: &["Name", "Athlete"],
            jump_date: &["Date", "Test Date"],
            jump_body_weight: &["BW [KG]", "Body Weight"],
            // Force plate exports carry a trailing space; headers are trimmed on read.
            jump_height_cm: &["Jump Height (Imp-Mom) [cm]", "Jump Height [cm]"],
            loaded_name: &["Jugador", "Athlete", "Name"],
            loaded_body_weight: &["Peso Corporal", "Body Weight", "BW [KG]"],
        }
    }
}

pub fn velocity_column(load_kg: u32) -> String {
    format!("{load_kg}kg Vmed (m/s)")
}
