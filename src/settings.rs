use std::collections::BTreeMap;

use anyhow::{Result, bail};

use crate::roster::Position;

/// Skills every team keeps; they cannot be removed.
pub const BASE_SKILLS: [&str; 5] = ["Speed", "Passing", "Defending", "Shooting", "Dribbling"];

fn default_positions() -> BTreeMap<Position, Vec<String>> {
    let catalog: [(Position, &[&str]); 4] = [
        (Position::Goalkeeper, &["GK"]),
        (Position::Defender, &["CB", "LB", "RB", "SW"]),
        (Position::Midfielder, &["CDM", "CM", "CAM", "LM", "RM"]),
        (Position::Forward, &["CF", "LW", "RW", "ST"]),
    ];
    catalog
        .into_iter()
        .map(|(pos, tags)| (pos, tags.iter().map(|t| t.to_string()).collect()))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingToggle {
    AutoFormation,
    BalanceByPosition,
    BalanceByRating,
}

#[derive(Debug, Clone)]
pub struct TeamSettings {
    pub team_name: String,
    pub description: String,
    pub skill_categories: Vec<String>,
    pub positions: BTreeMap<Position, Vec<String>>,
    pub auto_formation: bool,
    pub balance_by_position: bool,
    pub balance_by_rating: bool,
}

impl TeamSettings {
    pub fn new(team_name: impl Into<String>) -> Self {
        Self {
            team_name: team_name.into(),
            description: String::new(),
            skill_categories: BASE_SKILLS.iter().map(|s| s.to_string()).collect(),
            positions: default_positions(),
            auto_formation: true,
            balance_by_position: true,
            balance_by_rating: true,
        }
    }

    pub fn add_skill_category(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            bail!("skill name is empty");
        }
        if self.skill_categories.iter().any(|s| s == name) {
            bail!("skill {name} already exists");
        }
        self.skill_categories.push(name.to_string());
        Ok(())
    }

    pub fn remove_skill_category(&mut self, name: &str) -> Result<()> {
        if BASE_SKILLS.contains(&name) {
            bail!("{name} is a base skill and cannot be removed");
        }
        let before = self.skill_categories.len();
        self.skill_categories.retain(|s| s != name);
        if self.skill_categories.len() == before {
            bail!("unknown skill {name}");
        }
        Ok(())
    }

    pub fn reset_skills(&mut self) {
        self.skill_categories = BASE_SKILLS.iter().map(|s| s.to_string()).collect();
    }

    pub fn sub_positions(&self, position: Position) -> &[String] {
        self.positions
            .get(&position)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn add_sub_position(&mut self, position: Position, tag: &str) -> Result<()> {
        let tag = tag.trim();
        if tag.is_empty() {
            bail!("sub-position tag is empty");
        }
        let tags = self.positions.entry(position).or_default();
        if tags.iter().any(|t| t == tag) {
            bail!("{tag} already listed under {position}");
        }
        tags.push(tag.to_string());
        Ok(())
    }

    /// Every main position keeps at least one tag.
    pub fn remove_sub_position(&mut self, position: Position, tag: &str) -> Result<()> {
        let tags = self.positions.entry(position).or_default();
        if !tags.iter().any(|t| t == tag) {
            bail!("{tag} is not listed under {position}");
        }
        if tags.len() <= 1 {
            bail!("{position} needs at least one sub-position");
        }
        tags.retain(|t| t != tag);
        Ok(())
    }

    pub fn reset_positions(&mut self) {
        self.positions = default_positions();
    }

    pub fn is_enabled(&self, which: SettingToggle) -> bool {
        match which {
            SettingToggle::AutoFormation => self.auto_formation,
            SettingToggle::BalanceByPosition => self.balance_by_position,
            SettingToggle::BalanceByRating => self.balance_by_rating,
        }
    }

    pub fn toggle(&mut self, which: SettingToggle) -> bool {
        let flag = match which {
            SettingToggle::AutoFormation => &mut self.auto_formation,
            SettingToggle::BalanceByPosition => &mut self.balance_by_position,
            SettingToggle::BalanceByRating => &mut self.balance_by_rating,
        };
        *flag = !*flag;
        *flag
    }
}

pub fn toggle_label(which: SettingToggle) -> &'static str {
    match which {
        SettingToggle::AutoFormation => "Auto formation",
        SettingToggle::BalanceByPosition => "Balance by position",
        SettingToggle::BalanceByRating => "Balance by rating",
    }
}
