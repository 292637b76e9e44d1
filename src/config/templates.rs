//! Built-in sport templates. An event picks one by id; the external schema
//! service overlays it and custom drills are appended on top.
use crate::domain::Direction::{HigherIsBetter as Higher, LowerIsBetter as Lower};
use crate::domain::DrillCategory as Cat;
use crate::domain::DrillUnit as Unit;
use crate::domain::{Direction, DrillCategory, DrillDefinition, DrillUnit, WeightConfiguration};
use crate::errors::DrillError;

pub const DEFAULT_TEMPLATE_ID: &str = "football";

#[derive(Debug, Clone)]
pub struct Preset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub weights: Vec<(&'static str, f64)>,
}

impl Preset {
    fn new(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        weights: &[(&'static str, f64)],
    ) -> Self {
        Self {
            id,
            name,
            description,
            weights: weights.to_vec(),
        }
    }

    pub fn weight_configuration(&self) -> Result<WeightConfiguration, DrillError> {
        WeightConfiguration::new(self.weights.iter().map(|(k, w)| (k.to_string(), *w)))
    }
}

#[derive(Debug, Clone)]
pub struct SportTemplate {
    pub id: &'static str,
    pub sport: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub drills: Vec<DrillDefinition>,
    pub presets: Vec<Preset>,
}

impl SportTemplate {
    pub fn preset(&self, preset_id: &str) -> Option<&Preset> {
        self.presets
            .iter()
            .find(|p| p.id.eq_ignore_ascii_case(preset_id))
    }

    pub fn preset_weights(&self, preset_id: &str) -> Result<WeightConfiguration, DrillError> {
        self.preset(preset_id)
            .ok_or_else(|| DrillError::UnknownPreset {
                template: self.id.to_string(),
                preset: preset_id.to_string(),
            })?
            .weight_configuration()
    }
}

/// Looks a template up by id or by sport name, ignoring case.
pub fn find_template(id_or_sport: &str) -> Option<SportTemplate> {
    let wanted = id_or_sport.trim();
    if wanted.is_empty() {
        return None;
    }
    get_templates().into_iter().find(|t| {
        t.id.eq_ignore_ascii_case(wanted) || t.sport.eq_ignore_ascii_case(wanted)
    })
}

/// Template used when an event names none or an unknown one.
pub fn default_template() -> SportTemplate {
    football()
}

pub fn get_templates() -> Vec<SportTemplate> {
    vec![
        football(),
        soccer(),
        basketball(),
        baseball(),
        track(),
        volleyball(),
    ]
}

fn drill(
    key: &str,
    label: &str,
    unit: DrillUnit,
    category: DrillCategory,
    direction: Direction,
    weight: f64,
) -> DrillDefinition {
    DrillDefinition::builtin(key, label, unit, category, direction).with_default_weight(weight)
}

fn football() -> SportTemplate {
    SportTemplate {
        id: "football",
        sport: "Football",
        name: "Football Combine",
        description: "Traditional football combine drills",
        drills: vec![
            drill("40m_dash", "40-Yard Dash", Unit::Seconds, Cat::Speed, Lower, 0.3).with_range(3.0, 15.0),
            drill("vertical_jump", "Vertical Jump", Unit::Inches, Cat::Power, Higher, 0.2).with_range(0.0, 50.0),
            drill("catching", "Catching", Unit::Points, Cat::Skills, Higher, 0.15).with_range(0.0, 100.0),
            drill("throwing", "Throwing", Unit::Points, Cat::Skills, Higher, 0.15).with_range(0.0, 100.0),
            drill("agility", "Agility", Unit::Points, Cat::Agility, Higher, 0.2).with_range(0.0, 100.0),
        ],
        presets: vec![
            Preset::new("balanced", "Balanced", "Equal emphasis on all skills", &[
                ("40m_dash", 0.2), ("vertical_jump", 0.2), ("catching", 0.2), ("throwing", 0.2), ("agility", 0.2),
            ]),
            Preset::new("speed", "Speed Focused", "Emphasizes speed and athleticism", &[
                ("40m_dash", 0.4), ("vertical_jump", 0.3), ("catching", 0.1), ("throwing", 0.1), ("agility", 0.1),
            ]),
            Preset::new("skills", "Skills Focused", "Emphasizes catching and throwing", &[
                ("40m_dash", 0.1), ("vertical_jump", 0.1), ("catching", 0.35), ("throwing", 0.35), ("agility", 0.1),
            ]),
            Preset::new("athletic", "Athletic", "Emphasizes physical abilities", &[
                ("40m_dash", 0.25), ("vertical_jump", 0.25), ("catching", 0.15), ("throwing", 0.15), ("agility", 0.2),
            ]),
        ],
    }
}

fn soccer() -> SportTemplate {
    SportTemplate {
        id: "soccer",
        sport: "Soccer",
        name: "Soccer Combine",
        description: "Comprehensive soccer skills evaluation",
        drills: vec![
            drill("sprint_speed", "20m Sprint", Unit::Seconds, Cat::Speed, Lower, 0.15),
            drill("ball_control", "Ball Control", Unit::Points, Cat::Technical, Higher, 0.25),
            drill("passing_accuracy", "Passing Accuracy", Unit::Points, Cat::Technical, Higher, 0.25),
            drill("shooting_power", "Shooting Power", Unit::Mph, Cat::Technical, Higher, 0.15),
            drill("agility_cones", "Agility (Cones)", Unit::Seconds, Cat::Agility, Lower, 0.1),
            drill("endurance", "Endurance (Beep Test)", Unit::Level, Cat::Fitness, Higher, 0.1),
        ],
        presets: vec![
            Preset::new("balanced", "Balanced", "Equal emphasis on all areas", &[
                ("sprint_speed", 0.15), ("ball_control", 0.2), ("passing_accuracy", 0.2),
                ("shooting_power", 0.15), ("agility_cones", 0.15), ("endurance", 0.15),
            ]),
            Preset::new("technical", "Technical Focus", "Emphasizes ball skills and accuracy", &[
                ("sprint_speed", 0.05), ("ball_control", 0.35), ("passing_accuracy", 0.35),
                ("shooting_power", 0.15), ("agility_cones", 0.05), ("endurance", 0.05),
            ]),
        ],
    }
}

fn basketball() -> SportTemplate {
    SportTemplate {
        id: "basketball",
        sport: "Basketball",
        name: "Basketball Combine",
        description: "Basketball skills and athleticism evaluation",
        drills: vec![
            drill("lane_agility", "Lane Agility", Unit::Seconds, Cat::Agility, Lower, 0.15).with_range(8.0, 20.0),
            drill("vertical_jump", "Vertical Jump", Unit::Inches, Cat::Power, Higher, 0.2).with_range(0.0, 50.0),
            drill("free_throws", "Free Throw %", Unit::Percent, Cat::Shooting, Higher, 0.2).with_range(0.0, 100.0),
            drill("three_point", "3-Point Shooting %", Unit::Percent, Cat::Shooting, Higher, 0.2).with_range(0.0, 100.0),
            drill("dribbling", "Ball Handling", Unit::Points, Cat::Skills, Higher, 0.15).with_range(0.0, 100.0),
            drill("defensive_slide", "Defensive Slides", Unit::Seconds, Cat::Defense, Lower, 0.1).with_range(8.0, 20.0),
        ],
        presets: vec![
            Preset::new("balanced", "Balanced", "Balanced approach", &[
                ("lane_agility", 0.15), ("vertical_jump", 0.15), ("free_throws", 0.2),
                ("three_point", 0.2), ("dribbling", 0.15), ("defensive_slide", 0.15),
            ]),
            Preset::new("shooter", "Shooter Focus", "Emphasizes shooting abilities", &[
                ("lane_agility", 0.1), ("vertical_jump", 0.1), ("free_throws", 0.35),
                ("three_point", 0.35), ("dribbling", 0.05), ("defensive_slide", 0.05),
            ]),
            Preset::new("athleticism", "Athleticism", "Emphasizes physical attributes", &[
                ("lane_agility", 0.3), ("vertical_jump", 0.3), ("defensive_slide", 0.3),
                ("dribbling", 0.05), ("free_throws", 0.025), ("three_point", 0.025),
            ]),
            Preset::new("skill_focus", "Skill Focus", "Emphasizes ball handling and shooting", &[
                ("dribbling", 0.5), ("free_throws", 0.2), ("three_point", 0.2),
                ("lane_agility", 0.05), ("vertical_jump", 0.025), ("defensive_slide", 0.025),
            ]),
        ],
    }
}

fn baseball() -> SportTemplate {
    SportTemplate {
        id: "baseball",
        sport: "Baseball",
        name: "Baseball Combine",
        description: "Baseball skills and athletic evaluation",
        drills: vec![
            drill("sprint_60", "60-Yard Sprint", Unit::Seconds, Cat::Speed, Lower, 0.2),
            drill("exit_velocity", "Exit Velocity", Unit::Mph, Cat::Hitting, Higher, 0.3),
            drill("throwing_velocity", "Throwing Velocity", Unit::Mph, Cat::Throwing, Higher, 0.25),
            drill("fielding_accuracy", "Fielding Accuracy", Unit::Points, Cat::Fielding, Higher, 0.15),
            drill("pop_time", "Pop Time (Catchers)", Unit::Seconds, Cat::Catching, Lower, 0.1),
        ],
        presets: vec![
            Preset::new("balanced", "Balanced", "Balanced evaluation", &[
                ("sprint_60", 0.2), ("exit_velocity", 0.2), ("throwing_velocity", 0.2),
                ("fielding_accuracy", 0.2), ("pop_time", 0.2),
            ]),
            Preset::new("hitter", "Hitter Focus", "Emphasizes hitting abilities", &[
                ("sprint_60", 0.15), ("exit_velocity", 0.5), ("throwing_velocity", 0.15),
                ("fielding_accuracy", 0.15), ("pop_time", 0.05),
            ]),
        ],
    }
}

fn track() -> SportTemplate {
    SportTemplate {
        id: "track",
        sport: "Track & Field",
        name: "Track & Field",
        description: "Track and field athletic evaluation",
        drills: vec![
            drill("sprint_100", "100m Sprint", Unit::Seconds, Cat::Sprint, Lower, 0.25),
            drill("sprint_400", "400m Sprint", Unit::Seconds, Cat::Sprint, Lower, 0.15),
            drill("long_jump", "Long Jump", Unit::Feet, Cat::Field, Higher, 0.2),
            drill("high_jump", "High Jump", Unit::Feet, Cat::Field, Higher, 0.15),
            drill("shot_put", "Shot Put", Unit::Feet, Cat::Field, Higher, 0.15),
            drill("mile_time", "Mile Run", Unit::Minutes, Cat::Distance, Lower, 0.1),
        ],
        presets: vec![Preset::new("sprinter", "Sprinter Focus", "Short distance speed events", &[
            ("sprint_100", 0.45), ("sprint_400", 0.25), ("long_jump", 0.15),
            ("high_jump", 0.1), ("shot_put", 0.025), ("mile_time", 0.025),
        ])],
    }
}

fn volleyball() -> SportTemplate {
    SportTemplate {
        id: "volleyball",
        sport: "Volleyball",
        name: "Volleyball Combine",
        description: "Volleyball skills evaluation",
        drills: vec![
            drill("vertical_jump", "Vertical Jump", Unit::Inches, Cat::Power, Higher, 0.2),
            drill("approach_jump", "Approach Jump", Unit::Inches, Cat::Power, Higher, 0.2),
            drill("serving_accuracy", "Serving Accuracy", Unit::Points, Cat::Skills, Higher, 0.15),
            drill("passing_accuracy", "Passing Accuracy", Unit::Points, Cat::Skills, Higher, 0.15),
            drill("attack_power", "Attack Power", Unit::Mph, Cat::Offense, Higher, 0.15),
            drill("blocking_reach", "Blocking Reach", Unit::Inches, Cat::Defense, Higher, 0.15),
        ],
        presets: vec![Preset::new("hitter", "Hitter Focus", "Outside hitter/attacker focus", &[
            ("vertical_jump", 0.25), ("approach_jump", 0.3), ("serving_accuracy", 0.1),
            ("passing_accuracy", 0.1), ("attack_power", 0.2), ("blocking_reach", 0.05),
        ])],
    }
}
