use crate::domain::model::InitValue;
use serde::{Deserialize, Serialize};

/// A record that mirrors a C `typedef struct` and can render itself as a
/// positional brace initializer in declared field order.
pub trait CRecord {
    const C_NAME: &'static str;
    const C_TYPEDEF: &'static str;

    fn to_init_value(&self) -> InitValue;
}

/// C `paramFull`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterGroup {
    pub mass: i32,
    pub volume: i32,
    pub density: f32,
    pub capacity: [f32; 2],
}

impl ParameterGroup {
    pub fn new(mass: i32, volume: i32, density: f32, capacity: [f32; 2]) -> Self {
        Self {
            mass,
            volume,
            density,
            capacity,
        }
    }

    pub fn mass(&self) -> i32 {
        self.mass
    }

    pub fn volume(&self) -> i32 {
        self.volume
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn capacity(&self) -> &[f32; 2] {
        &self.capacity
    }
}

impl CRecord for ParameterGroup {
    const C_NAME: &'static str = "paramFull";
    const C_TYPEDEF: &'static str = "typedef struct {
    int mass;
    int volume;
    float density;
    float capacity[2];
} paramFull;
";

    fn to_init_value(&self) -> InitValue {
        InitValue::List(vec![
            InitValue::scalar(self.mass.to_string()),
            InitValue::scalar(self.volume.to_string()),
            float_literal(self.density),
            InitValue::List(self.capacity.iter().copied().map(float_literal).collect()),
        ])
    }
}

/// C `unit`. Serialized with the C member names.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Unit {
    pub id: i32,
    pub totalmass: f32,
    #[serde(rename = "mainFull")]
    pub main_full: ParameterGroup,
    #[serde(rename = "subFull")]
    pub sub_full: ParameterGroup,
    #[serde(rename = "otherFull")]
    pub other_full: [ParameterGroup; 2],
}

impl Unit {
    pub fn new(
        id: i32,
        totalmass: f32,
        main_full: ParameterGroup,
        sub_full: ParameterGroup,
        other_full: [ParameterGroup; 2],
    ) -> Self {
        Self {
            id,
            totalmass,
            main_full,
            sub_full,
            other_full,
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn totalmass(&self) -> f32 {
        self.totalmass
    }

    pub fn main_full(&self) -> &ParameterGroup {
        &self.main_full
    }

    pub fn sub_full(&self) -> &ParameterGroup {
        &self.sub_full
    }

    pub fn other_full(&self) -> &[ParameterGroup; 2] {
        &self.other_full
    }
}

impl CRecord for Unit {
    const C_NAME: &'static str = "unit";
    const C_TYPEDEF: &'static str = "typedef struct {
    int id;
    float totalmass;
    paramFull mainFull;
    paramFull subFull;
    paramFull otherFull[2];
} unit;
";

    fn to_init_value(&self) -> InitValue {
        InitValue::List(vec![
            InitValue::scalar(self.id.to_string()),
            float_literal(self.totalmass),
            self.main_full.to_init_value(),
            self.sub_full.to_init_value(),
            InitValue::List(self.other_full.iter().map(ParameterGroup::to_init_value).collect()),
        ])
    }
}

/// Header text declaring both records, in dependency order.
pub fn complex_full_header() -> String {
    format!("{}\n{}", ParameterGroup::C_TYPEDEF, Unit::C_TYPEDEF)
}

// `{:?}` 是最短可還原表示；指數形式的尾數補上小數點（1e20 → 1.0e20），
// 非有限值用 <math.h> 的巨集
fn float_literal(value: f32) -> InitValue {
    if value.is_nan() {
        return InitValue::scalar("NAN");
    }
    if value.is_infinite() {
        return InitValue::scalar(if value > 0.0 { "INFINITY" } else { "-INFINITY" });
    }

    let text = format!("{:?}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => {
            InitValue::scalar(format!("{}.0e{}", mantissa, exponent))
        }
        _ => InitValue::scalar(text),
    }
}
