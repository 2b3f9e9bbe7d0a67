//! Feature schema and encoder for the bike demand model
//!
//! The scaler and the boosted-tree model were fit against one fixed column
//! order. [`FeatureVector`] can only be produced by [`encode`], so the column
//! order and the one-hot groups are always consistent with that fit.

use serde::{Deserialize, Serialize};

/// Number of columns the scaler/model pair expects
pub const FEATURE_COUNT: usize = 19;

/// Season of the year
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Season {
    #[default]
    #[serde(alias = "spring")]
    Spring,
    #[serde(alias = "summer")]
    Summer,
    #[serde(alias = "autumn")]
    Autumn,
    #[serde(alias = "winter")]
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    /// One-hot block in column order (Autumn, Spring, Summer, Winter)
    pub fn one_hot(self) -> [f64; 4] {
        match self {
            Season::Autumn => [1.0, 0.0, 0.0, 0.0],
            Season::Spring => [0.0, 1.0, 0.0, 0.0],
            Season::Summer => [0.0, 0.0, 1.0, 0.0],
            Season::Winter => [0.0, 0.0, 0.0, 1.0],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }
}

/// Whether the day is a public holiday
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum HolidayStatus {
    #[serde(alias = "holiday")]
    Holiday,
    #[default]
    #[serde(rename = "No Holiday", alias = "NoHoliday", alias = "no_holiday")]
    NoHoliday,
}

impl HolidayStatus {
    pub const ALL: [HolidayStatus; 2] = [HolidayStatus::NoHoliday, HolidayStatus::Holiday];

    /// One-hot block in column order (Holiday, NoHoliday)
    pub fn one_hot(self) -> [f64; 2] {
        match self {
            HolidayStatus::Holiday => [1.0, 0.0],
            HolidayStatus::NoHoliday => [0.0, 1.0],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HolidayStatus::Holiday => "Holiday",
            HolidayStatus::NoHoliday => "No Holiday",
        }
    }
}

/// Whether the rental system operates that day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum FunctioningDay {
    #[default]
    #[serde(alias = "yes")]
    Yes,
    #[serde(alias = "no")]
    No,
}

impl FunctioningDay {
    pub const ALL: [FunctioningDay; 2] = [FunctioningDay::Yes, FunctioningDay::No];

    /// One-hot block in column order (No, Yes)
    pub fn one_hot(self) -> [f64; 2] {
        match self {
            FunctioningDay::No => [1.0, 0.0],
            FunctioningDay::Yes => [0.0, 1.0],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FunctioningDay::Yes => "Yes",
            FunctioningDay::No => "No",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::fmt::Display for HolidayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::fmt::Display for FunctioningDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Unvalidated values entered on the prediction form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    /// °C
    pub temperature: f64,
    /// %
    pub humidity: f64,
    /// m/s
    pub wind_speed: f64,
    /// 10 m units
    pub visibility: f64,
    /// °C
    pub dew_point_temperature: f64,
    /// MJ/m2
    pub solar_radiation: f64,
    /// mm
    pub rainfall: f64,
    /// cm
    pub snowfall: f64,
    pub season: Season,
    pub holiday: HolidayStatus,
    pub functioning_day: FunctioningDay,
}

impl Default for RawInput {
    /// Initial state of the form: lowest bound for bounded inputs, zero for
    /// measurements and the first option of each selector.
    fn default() -> Self {
        Self {
            month: 1,
            day: 1,
            hour: 0,
            temperature: 0.0,
            humidity: 0.0,
            wind_speed: 0.0,
            visibility: 0.0,
            dew_point_temperature: 0.0,
            solar_radiation: 0.0,
            rainfall: 0.0,
            snowfall: 0.0,
            season: Season::Spring,
            holiday: HolidayStatus::NoHoliday,
            functioning_day: FunctioningDay::Yes,
        }
    }
}

/// Columns of the model input, in fit order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Feature {
    Hour,
    Temperature,
    Humidity,
    WindSpeed,
    Visibility,
    DewPointTemperature,
    SolarRadiation,
    Rainfall,
    Snowfall,
    Month,
    Day,
    SeasonsAutumn,
    SeasonsSpring,
    SeasonsSummer,
    SeasonsWinter,
    HolidayHoliday,
    HolidayNoHoliday,
    FunctioningDayNo,
    FunctioningDayYes,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Hour,
        Feature::Temperature,
        Feature::Humidity,
        Feature::WindSpeed,
        Feature::Visibility,
        Feature::DewPointTemperature,
        Feature::SolarRadiation,
        Feature::Rainfall,
        Feature::Snowfall,
        Feature::Month,
        Feature::Day,
        Feature::SeasonsAutumn,
        Feature::SeasonsSpring,
        Feature::SeasonsSummer,
        Feature::SeasonsWinter,
        Feature::HolidayHoliday,
        Feature::HolidayNoHoliday,
        Feature::FunctioningDayNo,
        Feature::FunctioningDayYes,
    ];

    /// Position of this column in the model input
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Feature::Hour => "Hour",
            Feature::Temperature => "Temperature",
            Feature::Humidity => "Humidity",
            Feature::WindSpeed => "WindSpeed",
            Feature::Visibility => "Visibility",
            Feature::DewPointTemperature => "DewPointTemperature",
            Feature::SolarRadiation => "SolarRadiation",
            Feature::Rainfall => "Rainfall",
            Feature::Snowfall => "Snowfall",
            Feature::Month => "Month",
            Feature::Day => "Day",
            Feature::SeasonsAutumn => "Seasons_Autumn",
            Feature::SeasonsSpring => "Seasons_Spring",
            Feature::SeasonsSummer => "Seasons_Summer",
            Feature::SeasonsWinter => "Seasons_Winter",
            Feature::HolidayHoliday => "Holiday_Holiday",
            Feature::HolidayNoHoliday => "Holiday_NoHoliday",
            Feature::FunctioningDayNo => "FunctioningDay_No",
            Feature::FunctioningDayYes => "FunctioningDay_Yes",
        }
    }

    /// Column label in the training dataset, as recorded by the scaler
    pub fn column(self) -> &'static str {
        match self {
            Feature::Hour => "Hour",
            Feature::Temperature => "Temperature(°C)",
            Feature::Humidity => "Humidity(%)",
            Feature::WindSpeed => "Wind speed (m/s)",
            Feature::Visibility => "Visibility (10m)",
            Feature::DewPointTemperature => "Dew point temperature(°C)",
            Feature::SolarRadiation => "Solar Radiation (MJ/m2)",
            Feature::Rainfall => "Rainfall(mm)",
            Feature::Snowfall => "Snowfall (cm)",
            Feature::Month => "Month",
            Feature::Day => "Day",
            Feature::SeasonsAutumn => "Seasons_Autumn",
            Feature::SeasonsSpring => "Seasons_Spring",
            Feature::SeasonsSummer => "Seasons_Summer",
            Feature::SeasonsWinter => "Seasons_Winter",
            Feature::HolidayHoliday => "Holiday_Holiday",
            Feature::HolidayNoHoliday => "Holiday_No Holiday",
            Feature::FunctioningDayNo => "Functioning Day_No",
            Feature::FunctioningDayYes => "Functioning Day_Yes",
        }
    }
}

/// Dataset column labels in fit order
pub fn feature_columns() -> [&'static str; FEATURE_COUNT] {
    Feature::ALL.map(Feature::column)
}

/// Model input row in fit order
///
/// There is no public constructor besides [`encode`]; every value of this type
/// carries exactly one set bit per one-hot group.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

/// Index of the first one-hot column (`Seasons_Autumn`)
const ONE_HOT_START: usize = 11;

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    /// The eight categorical columns, `Seasons_Autumn` through `FunctioningDay_Yes`
    pub fn one_hot_segment(&self) -> [f64; FEATURE_COUNT - ONE_HOT_START] {
        let mut segment = [0.0; FEATURE_COUNT - ONE_HOT_START];
        segment.copy_from_slice(&self.values[ONE_HOT_START..]);
        segment
    }

    /// `(feature, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.into_iter().zip(self.values.iter().copied())
    }

    pub fn to_named(&self) -> Vec<NamedFeature> {
        self.iter()
            .map(|(feature, value)| NamedFeature {
                name: feature.name(),
                column: feature.column(),
                value,
            })
            .collect()
    }
}

/// A single column of an encoded row, for display and logging
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedFeature {
    pub name: &'static str,
    pub column: &'static str,
    pub value: f64,
}

/// Map form input to the model's column layout
pub fn encode(raw: &RawInput) -> FeatureVector {
    let [autumn, spring, summer, winter] = raw.season.one_hot();
    let [holiday, no_holiday] = raw.holiday.one_hot();
    let [not_functioning, functioning] = raw.functioning_day.one_hot();

    FeatureVector {
        values: [
            f64::from(raw.hour),
            raw.temperature,
            raw.humidity,
            raw.wind_speed,
            raw.visibility,
            raw.dew_point_temperature,
            raw.solar_radiation,
            raw.rainfall,
            raw.snowfall,
            f64::from(raw.month),
            f64::from(raw.day),
            autumn,
            spring,
            summer,
            winter,
            holiday,
            no_holiday,
            not_functioning,
            functioning,
        ],
    }
}
