//! # Game Configuration
//!
//! The immutable description of one match, and the pure validation that
//! turns the setup collaborator's raw form into it.
//!
//! Validation never mutates shared state: every field check takes an
//! explicit `required` flag, so optional-while-typing and
//! required-on-start are two calls with different arguments.

use crate::primitives::{
    DEFAULT_BLACK_TEAM, DEFAULT_GAME_ID, DEFAULT_WHITE_TEAM, MIN_PERIOD_LENGTH, SECONDS_PER_MINUTE,
};
use crate::{GameId, UwhError};
use serde::{Deserialize, Serialize};

// =============================================================================
// OVERTIME MODE
// =============================================================================

/// Tie-breaking procedure applied when the second half ends level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OvertimeMode {
    /// The game may end in a draw.
    #[default]
    #[serde(rename = "No Overtime", alias = "none", alias = "no-overtime")]
    None,
    /// Two timed extra halves with breaks, then golden goal if still level.
    #[serde(rename = "Extra Time", alias = "extra-time", alias = "extra_time")]
    ExtraTime,
    /// Sudden death straight after the second half.
    #[serde(rename = "Golden Goal", alias = "golden-goal", alias = "golden_goal")]
    GoldenGoal,
}

impl OvertimeMode {
    /// Get the display name used by the setup form.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            OvertimeMode::None => "No Overtime",
            OvertimeMode::ExtraTime => "Extra Time",
            OvertimeMode::GoldenGoal => "Golden Goal",
        }
    }
}

impl std::str::FromStr for OvertimeMode {
    type Err = UwhError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "" | "no overtime" | "none" => Ok(OvertimeMode::None),
            "extra time" => Ok(OvertimeMode::ExtraTime),
            "golden goal" => Ok(OvertimeMode::GoldenGoal),
            _ => Err(UwhError::Config(format!(
                "'{}' is not an overtime procedure (expected No Overtime, Extra Time or Golden Goal)",
                s.trim()
            ))),
        }
    }
}

impl std::fmt::Display for OvertimeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// TIME UNIT
// =============================================================================

/// Unit of every configured duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Durations are minutes (a real match).
    #[default]
    Minutes,
    /// Durations are seconds (rehearsal).
    Seconds,
}

impl TimeUnit {
    /// Seconds in one configured unit.
    #[must_use]
    pub fn seconds(&self) -> u32 {
        match self {
            TimeUnit::Minutes => SECONDS_PER_MINUTE,
            TimeUnit::Seconds => 1,
        }
    }

    /// Short suffix for lengths ("min" / "s").
    #[must_use]
    pub fn suffix(&self) -> &'static str {
        match self {
            TimeUnit::Minutes => "min",
            TimeUnit::Seconds => "s",
        }
    }
}

impl std::str::FromStr for TimeUnit {
    type Err = UwhError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "min" | "minute" | "minutes" => Ok(TimeUnit::Minutes),
            "s" | "sec" | "second" | "seconds" => Ok(TimeUnit::Seconds),
            other => Err(UwhError::Config(format!("Unknown time unit '{}'", other))),
        }
    }
}

// =============================================================================
// GAME CONFIG
// =============================================================================

/// Durations of the extra-time procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraTime {
    /// Length of each extra half.
    pub half_duration: u32,
    /// Length of the break before and between the extra halves.
    pub break_duration: u32,
}

/// Configuration of one match. Created once at setup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    half_duration: u32,
    half_time_duration: u32,
    overtime: OvertimeMode,
    extra_time: Option<ExtraTime>,
    white_team: String,
    black_team: String,
    game_id: GameId,
    unit: TimeUnit,
}

impl GameConfig {
    /// Create a configuration, validating every duration.
    ///
    /// `extra_time` is required when `overtime` is `ExtraTime` and ignored
    /// otherwise.
    pub fn new(
        half_duration: u32,
        half_time_duration: u32,
        overtime: OvertimeMode,
        extra_time: Option<ExtraTime>,
    ) -> Result<Self, UwhError> {
        check_min("Time per half", half_duration)?;
        check_min("Half-Time", half_time_duration)?;

        let extra_time = match overtime {
            OvertimeMode::ExtraTime => {
                let extra = extra_time.ok_or_else(|| {
                    UwhError::Config(
                        "Extra time per half and Extra break are required for Extra Time"
                            .to_string(),
                    )
                })?;
                check_min("Extra time per half", extra.half_duration)?;
                check_min("Extra break", extra.break_duration)?;
                Some(extra)
            }
            OvertimeMode::None | OvertimeMode::GoldenGoal => None,
        };

        Ok(Self {
            half_duration,
            half_time_duration,
            overtime,
            extra_time,
            white_team: DEFAULT_WHITE_TEAM.to_string(),
            black_team: DEFAULT_BLACK_TEAM.to_string(),
            game_id: GameId(DEFAULT_GAME_ID),
            unit: TimeUnit::Minutes,
        })
    }

    /// Set team labels. Blank labels fall back to the defaults.
    #[must_use]
    pub fn with_teams(mut self, white: &str, black: &str) -> Self {
        self.white_team = label_or(white, DEFAULT_WHITE_TEAM);
        self.black_team = label_or(black, DEFAULT_BLACK_TEAM);
        self
    }

    /// Set the game number.
    #[must_use]
    pub fn with_game_id(mut self, game_id: GameId) -> Self {
        self.game_id = game_id;
        self
    }

    /// Set the unit of every duration.
    #[must_use]
    pub fn with_unit(mut self, unit: TimeUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Build a configuration from the raw setup form.
    ///
    /// All field errors are collected, so the operator sees every problem
    /// at once.
    pub fn from_setup(form: &SetupForm) -> Result<Self, UwhError> {
        let mut errors = Vec::new();

        let overtime = match form.overtime.as_deref().map(str::parse::<OvertimeMode>) {
            None => OvertimeMode::None,
            Some(Ok(mode)) => mode,
            Some(Err(e)) => {
                errors.push(message_of(e));
                OvertimeMode::None
            }
        };
        let unit = match form.unit.as_deref().map(str::parse::<TimeUnit>) {
            None => TimeUnit::Minutes,
            Some(Ok(unit)) => unit,
            Some(Err(e)) => {
                errors.push(message_of(e));
                TimeUnit::Minutes
            }
        };

        let needs_extra = overtime == OvertimeMode::ExtraTime;
        let mut field = |label: &str, raw: &Option<FieldValue>, required: bool| {
            let raw = raw.as_ref().map(FieldValue::to_raw);
            match validate_int(label, raw.as_deref(), required, MIN_PERIOD_LENGTH) {
                Ok(value) => value,
                Err(e) => {
                    errors.push(message_of(e));
                    None
                }
            }
        };

        let half = field("Time per half", &form.game_length, true);
        let half_time = field("Half-Time", &form.half_time_length, true);
        let extra_half = field("Extra time per half", &form.extra_time_length, needs_extra);
        let extra_break = field("Extra break", &form.extra_time_break, needs_extra);
        let game_id = field("Game number", &form.game_id, false);

        if !errors.is_empty() {
            return Err(UwhError::Config(errors.join("; ")));
        }

        let extra_time = match (extra_half, extra_break) {
            (Some(half_duration), Some(break_duration)) => Some(ExtraTime {
                half_duration,
                break_duration,
            }),
            _ => None,
        };

        let config = Self::new(
            half.unwrap_or_default(),
            half_time.unwrap_or_default(),
            overtime,
            extra_time,
        )?;

        Ok(config
            .with_teams(
                form.white_team.as_deref().unwrap_or_default(),
                form.black_team.as_deref().unwrap_or_default(),
            )
            .with_game_id(GameId(game_id.unwrap_or(DEFAULT_GAME_ID)))
            .with_unit(unit))
    }

    pub fn half_duration(&self) -> u32 {
        self.half_duration
    }

    pub fn half_time_duration(&self) -> u32 {
        self.half_time_duration
    }

    pub fn overtime(&self) -> OvertimeMode {
        self.overtime
    }

    pub fn extra_time(&self) -> Option<ExtraTime> {
        self.extra_time
    }

    pub fn white_team(&self) -> &str {
        &self.white_team
    }

    pub fn black_team(&self) -> &str {
        &self.black_team
    }

    pub fn game_id(&self) -> GameId {
        self.game_id
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Total length of the match in configured units.
    #[must_use]
    pub fn length(&self) -> GameLength {
        let regular = self
            .half_duration
            .saturating_mul(2)
            .saturating_add(self.half_time_duration);

        let overtime = match (self.overtime, self.extra_time) {
            (OvertimeMode::ExtraTime, Some(extra)) => OvertimeLength::UpTo(
                regular
                    .saturating_add(extra.half_duration.saturating_mul(2))
                    .saturating_add(extra.break_duration.saturating_mul(2)),
            ),
            (OvertimeMode::GoldenGoal, _) | (OvertimeMode::ExtraTime, None) => {
                OvertimeLength::OpenEnded
            }
            (OvertimeMode::None, _) => OvertimeLength::None,
        };

        GameLength {
            regular,
            overtime,
            unit: self.unit,
        }
    }
}

fn check_min(label: &str, value: u32) -> Result<(), UwhError> {
    if value < MIN_PERIOD_LENGTH {
        return Err(UwhError::Config(format!(
            "{} must be {} or above",
            label, MIN_PERIOD_LENGTH
        )));
    }
    Ok(())
}

fn label_or(label: &str, default: &str) -> String {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

fn message_of(error: UwhError) -> String {
    match error {
        UwhError::Config(msg) => msg,
        other => other.to_string(),
    }
}

// =============================================================================
// GAME LENGTH
// =============================================================================

/// How much longer than regular time the match can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OvertimeLength {
    /// No overtime: the match is exactly regular time.
    None,
    /// Extra time: the match lasts at most this long before golden goal.
    UpTo(u32),
    /// Golden goal: no upper bound.
    OpenEnded,
}

/// Total match length shown during setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLength {
    /// Two halves plus half-time.
    pub regular: u32,
    /// Worst case including overtime.
    pub overtime: OvertimeLength,
    /// Unit of both numbers.
    pub unit: TimeUnit,
}

impl std::fmt::Display for GameLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let suffix = self.unit.suffix();
        match self.overtime {
            OvertimeLength::None => write!(f, "{} {}", self.regular, suffix),
            OvertimeLength::UpTo(max) => write!(f, "{}-{} {}", self.regular, max, suffix),
            OvertimeLength::OpenEnded => write!(f, "{}+ {}", self.regular, suffix),
        }
    }
}

// =============================================================================
// SETUP FORM
// =============================================================================

/// A raw form value: typed files give integers, text inputs give strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Text(String),
}

impl FieldValue {
    /// The value as the text an operator would have typed.
    #[must_use]
    pub fn to_raw(&self) -> String {
        match self {
            FieldValue::Int(v) => v.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

/// Unvalidated output of the setup collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SetupForm {
    pub game_length: Option<FieldValue>,
    pub half_time_length: Option<FieldValue>,
    pub overtime: Option<String>,
    pub extra_time_length: Option<FieldValue>,
    pub extra_time_break: Option<FieldValue>,
    pub white_team: Option<String>,
    pub black_team: Option<String>,
    pub game_id: Option<FieldValue>,
    pub unit: Option<String>,
}

/// Validate one integer field.
///
/// - blank and `required` → error "X cannot be blank"
/// - blank and optional → `Ok(None)`
/// - not an integer → error "'v' is an invalid value for X"
/// - below `min` → error "X must be N or above"
pub fn validate_int(
    label: &str,
    raw: Option<&str>,
    required: bool,
    min: u32,
) -> Result<Option<u32>, UwhError> {
    let text = raw.map(str::trim).unwrap_or_default();

    if text.is_empty() {
        if required {
            return Err(UwhError::Config(format!("{} cannot be blank", label)));
        }
        return Ok(None);
    }

    let value: i64 = text
        .parse()
        .map_err(|_| UwhError::Config(format!("'{}' is an invalid value for {}", text, label)))?;

    if value < i64::from(min) {
        return Err(UwhError::Config(format!("{} must be {} or above", label, min)));
    }

    u32::try_from(value)
        .map(Some)
        .map_err(|_| UwhError::Config(format!("{} is too large", label)))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn form(half: &str, half_time: &str, overtime: &str) -> SetupForm {
        SetupForm {
            game_length: Some(half.into()),
            half_time_length: Some(half_time.into()),
            overtime: Some(overtime.to_string()),
            ..SetupForm::default()
        }
    }

    #[test]
    fn validate_blank_depends_on_required_flag() {
        assert!(validate_int("Time per half", Some(""), true, 1).is_err());
        assert_eq!(validate_int("Time per half", Some("  "), false, 1).expect("ok"), None);
        assert_eq!(validate_int("Time per half", None, false, 1).expect("ok"), None);
    }

    #[test]
    fn validate_rejects_non_integers_and_small_values() {
        let err = validate_int("Half-Time", Some("abc"), true, 1).expect_err("invalid");
        assert!(err.to_string().contains("'abc' is an invalid value for Half-Time"));

        let err = validate_int("Half-Time", Some("0"), true, 1).expect_err("too small");
        assert!(err.to_string().contains("Half-Time must be 1 or above"));

        assert_eq!(validate_int("Half-Time", Some(" 3 "), true, 1).expect("ok"), Some(3));
    }

    #[test]
    fn overtime_mode_parses_display_names() {
        assert_eq!("No Overtime".parse::<OvertimeMode>().expect("parse"), OvertimeMode::None);
        assert_eq!("extra-time".parse::<OvertimeMode>().expect("parse"), OvertimeMode::ExtraTime);
        assert_eq!("Golden Goal".parse::<OvertimeMode>().expect("parse"), OvertimeMode::GoldenGoal);
        assert!("penalties".parse::<OvertimeMode>().is_err());
    }

    #[test]
    fn extra_time_requires_extra_fields() {
        let result = GameConfig::from_setup(&form("10", "2", "Extra Time"));
        let err = result.expect_err("extra fields missing");
        let msg = err.to_string();
        assert!(msg.contains("Extra time per half cannot be blank"));
        assert!(msg.contains("Extra break cannot be blank"));

        assert!(GameConfig::new(10, 2, OvertimeMode::ExtraTime, None).is_err());
    }

    #[test]
    fn extra_fields_ignored_without_extra_time() {
        let mut f = form("10", "2", "Golden Goal");
        f.extra_time_length = Some("abc".into());
        // Optional fields are still validated when filled in.
        assert!(GameConfig::from_setup(&f).is_err());

        f.extra_time_length = None;
        let config = GameConfig::from_setup(&f).expect("valid");
        assert_eq!(config.extra_time(), None);
    }

    #[test]
    fn setup_defaults_apply() {
        let config = GameConfig::from_setup(&form("10", "2", "No Overtime")).expect("valid");
        assert_eq!(config.white_team(), DEFAULT_WHITE_TEAM);
        assert_eq!(config.black_team(), DEFAULT_BLACK_TEAM);
        assert_eq!(config.game_id(), GameId(DEFAULT_GAME_ID));
        assert_eq!(config.unit(), TimeUnit::Minutes);
    }

    #[test]
    fn setup_collects_every_error() {
        let err = GameConfig::from_setup(&SetupForm::default()).expect_err("blank form");
        let msg = err.to_string();
        assert!(msg.contains("Time per half cannot be blank"));
        assert!(msg.contains("Half-Time cannot be blank"));
    }

    #[test]
    fn game_length_display() {
        let plain = GameConfig::new(10, 2, OvertimeMode::None, None).expect("valid");
        assert_eq!(plain.length().to_string(), "22 min");

        let extra = GameConfig::new(
            10,
            2,
            OvertimeMode::ExtraTime,
            Some(ExtraTime {
                half_duration: 5,
                break_duration: 1,
            }),
        )
        .expect("valid");
        assert_eq!(extra.length().to_string(), "22-34 min");

        let golden = GameConfig::new(10, 2, OvertimeMode::GoldenGoal, None)
            .expect("valid")
            .with_unit(TimeUnit::Seconds);
        assert_eq!(golden.length().to_string(), "22+ s");
    }

    #[test]
    fn blank_team_labels_fall_back() {
        let config = GameConfig::new(10, 2, OvertimeMode::None, None)
            .expect("valid")
            .with_teams("  ", "NZL");
        assert_eq!(config.white_team(), DEFAULT_WHITE_TEAM);
        assert_eq!(config.black_team(), "NZL");
    }
}
