use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::formation::round_to_tenth;

/// Coarse role classification used for bucketing players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    /// Processing order of the formation engine.
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    pub fn index(self) -> usize {
        match self {
            Position::Goalkeeper => 0,
            Position::Defender => 1,
            Position::Midfielder => 2,
            Position::Forward => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Position::Goalkeeper => "Goalkeeper",
            Position::Defender => "Defender",
            Position::Midfielder => "Midfielder",
            Position::Forward => "Forward",
        }
    }

    pub fn short(self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DF",
            Position::Midfielder => "MF",
            Position::Forward => "FW",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Position {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let s = raw.trim().to_ascii_lowercase();
        match s.as_str() {
            "goalkeeper" | "goalkeepers" | "keeper" | "gk" | "골키퍼" => Ok(Position::Goalkeeper),
            "defender" | "defenders" | "df" | "def" | "수비수" => Ok(Position::Defender),
            "midfielder" | "midfielders" | "mf" | "mid" | "미드필더" => Ok(Position::Midfielder),
            "forward" | "forwards" | "fw" | "attacker" | "striker" | "공격수" => {
                Ok(Position::Forward)
            }
            _ => bail!("unknown position category {raw:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub main_position: Position,
    pub sub_positions: Vec<String>,
    pub overall_rating: f64,
    pub attending: bool,
    pub skills: BTreeMap<String, u8>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub join_date: Option<NaiveDate>,
    pub attendance_rate: u8,
    pub goals: u32,
    pub assists: u32,
}

impl Player {
    /// Minimal record with only the fields the formation engine reads.
    pub fn new(id: u32, name: impl Into<String>, main_position: Position, overall_rating: f64) -> Self {
        Self {
            id,
            name: name.into(),
            main_position,
            sub_positions: Vec::new(),
            overall_rating,
            attending: true,
            skills: BTreeMap::new(),
            phone: None,
            email: None,
            join_date: None,
            attendance_rate: 0,
            goals: 0,
            assists: 0,
        }
    }

    pub fn with_sub_positions(mut self, tags: &[&str]) -> Self {
        self.sub_positions = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn initial(&self) -> char {
        self.name.chars().next().unwrap_or('?')
    }
}

/// Mean of the skill scores, rounded to one decimal. 0 when no skill is scored.
pub fn overall_from_skills(skills: &BTreeMap<String, u8>) -> f64 {
    if skills.is_empty() {
        return 0.0;
    }
    let total: f64 = skills.values().map(|v| *v as f64).sum();
    round_to_tenth(total / skills.len() as f64)
}

/// Draft of a roster entry, filled in by the add-member form.
#[derive(Debug, Clone, Default)]
pub struct NewMember {
    pub name: String,
    pub main_position: Option<Position>,
    pub sub_positions: Vec<String>,
    pub skills: BTreeMap<String, u8>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub join_date: Option<NaiveDate>,
}

impl NewMember {
    pub fn add_sub_position(&mut self, tag: &str) {
        let tag = tag.trim();
        if tag.is_empty() || self.sub_positions.iter().any(|t| t == tag) {
            return;
        }
        self.sub_positions.push(tag.to_string());
    }

    pub fn remove_sub_position(&mut self, tag: &str) {
        self.sub_positions.retain(|t| t != tag);
    }

    /// Scores are clamped to the 1..=10 scale.
    pub fn set_skill(&mut self, category: &str, score: u8) {
        self.skills
            .insert(category.to_string(), score.clamp(1, 10));
    }
}

#[derive(Debug, Clone)]
pub struct Roster {
    players: Vec<Player>,
    next_id: u32,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Roster {
    pub fn new(players: Vec<Player>) -> Self {
        let next_id = players.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        Self { players, next_id }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Attending players in roster order; this is the formation engine's input.
    pub fn attending(&self) -> Vec<Player> {
        self.players.iter().filter(|p| p.attending).cloned().collect()
    }

    pub fn attending_count(&self) -> usize {
        self.players.iter().filter(|p| p.attending).count()
    }

    pub fn add_member(&mut self, draft: NewMember) -> Result<u32> {
        let name = draft.name.trim();
        if name.is_empty() {
            bail!("member name is required");
        }
        let Some(main_position) = draft.main_position else {
            bail!("main position is required for {name}");
        };

        let mut sub_positions: Vec<String> = Vec::new();
        for tag in draft.sub_positions {
            if !sub_positions.contains(&tag) {
                sub_positions.push(tag);
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        self.players.push(Player {
            id,
            name: name.to_string(),
            main_position,
            sub_positions,
            overall_rating: overall_from_skills(&draft.skills),
            attending: true,
            skills: draft.skills,
            phone: draft.phone.filter(|s| !s.trim().is_empty()),
            email: draft.email.filter(|s| !s.trim().is_empty()),
            join_date: draft.join_date,
            attendance_rate: 0,
            goals: 0,
            assists: 0,
        });
        Ok(id)
    }

    pub fn remove_member(&mut self, id: u32) -> bool {
        let before = self.players.len();
        self.players.retain(|p| p.id != id);
        self.players.len() != before
    }

    pub fn set_attending(&mut self, id: u32, attending: bool) -> bool {
        match self.players.iter_mut().find(|p| p.id == id) {
            Some(player) => {
                player.attending = attending;
                true
            }
            None => false,
        }
    }

    /// Flips the attending flag and returns the new value.
    pub fn toggle_attending(&mut self, id: u32) -> Option<bool> {
        let player = self.players.iter_mut().find(|p| p.id == id)?;
        player.attending = !player.attending;
        Some(player.attending)
    }
}

#[derive(Debug, Deserialize)]
struct PlayerRecord {
    id: u32,
    name: String,
    #[serde(alias = "mainPosition")]
    main_position: String,
    #[serde(default, alias = "subPositions")]
    sub_positions: Vec<String>,
    #[serde(default, alias = "overallRating")]
    overall_rating: Option<f64>,
    #[serde(default = "default_attending")]
    attending: bool,
    #[serde(default)]
    skills: BTreeMap<String, u8>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default, alias = "joinDate")]
    join_date: Option<NaiveDate>,
    #[serde(default, alias = "attendanceRate")]
    attendance_rate: u8,
    #[serde(default)]
    goals: u32,
    #[serde(default)]
    assists: u32,
}

fn default_attending() -> bool {
    true
}

impl TryFrom<PlayerRecord> for Player {
    type Error = anyhow::Error;

    fn try_from(rec: PlayerRecord) -> Result<Self> {
        let main_position = rec
            .main_position
            .parse::<Position>()
            .with_context(|| format!("player {} ({})", rec.id, rec.name))?;
        // An explicit rating wins; otherwise derive it from the skill sheet.
        let overall_rating = rec
            .overall_rating
            .unwrap_or_else(|| overall_from_skills(&rec.skills));
        if !overall_rating.is_finite() || overall_rating < 0.0 {
            bail!("player {} ({}) has invalid rating {overall_rating}", rec.id, rec.name);
        }
        Ok(Player {
            id: rec.id,
            name: rec.name,
            main_position,
            sub_positions: rec.sub_positions,
            overall_rating,
            attending: rec.attending,
            skills: rec.skills,
            phone: rec.phone,
            email: rec.email,
            join_date: rec.join_date,
            attendance_rate: rec.attendance_rate,
            goals: rec.goals,
            assists: rec.assists,
        })
    }
}

pub fn parse_roster_json(raw: &str) -> Result<Vec<Player>> {
    let records: Vec<PlayerRecord> =
        serde_json::from_str(raw).context("roster json is not a list of player records")?;
    let mut players = Vec::with_capacity(records.len());
    for rec in records {
        if players.iter().any(|p: &Player| p.id == rec.id) {
            bail!("duplicate player id {}", rec.id);
        }
        players.push(Player::try_from(rec)?);
    }
    Ok(players)
}

pub fn load_roster(path: &Path) -> Result<Vec<Player>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read roster {}", path.display()))?;
    parse_roster_json(&raw).with_context(|| format!("parse roster {}", path.display()))
}
