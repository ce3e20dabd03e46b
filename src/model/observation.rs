use serde::Serialize;

use crate::model::athlete::AthleteKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Source {
    Jump,
    Loaded,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Jump => "JUMP",
            Source::Loaded => "LOADED",
        }
    }
}

/// One force/velocity sample. `total_mass_kg` is body mass plus external load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub athlete: AthleteKey,
    pub load_kg: f64,
    pub body_mass_kg: f64,
    pub total_mass_kg: f64,
    pub force_n: f64,
    pub velocity_m_s: f64,
    pub source: Source,
}
