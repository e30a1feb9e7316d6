use serde::Serialize;

use crate::roster::{Player, Position};

/// Two squads and a bench for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormationResult {
    pub team_a: Vec<Player>,
    pub team_b: Vec<Player>,
    pub bench: Vec<Player>,
    pub is_complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormationStage {
    Empty,
    Formed,
    Finalized,
}

impl FormationResult {
    /// `Formed` requires at least one player on a team; a bench-only result
    /// (a single attendee) is still `Empty` and cannot be finalized.
    pub fn stage(&self) -> FormationStage {
        if self.is_complete {
            FormationStage::Finalized
        } else if self.has_teams() {
            FormationStage::Formed
        } else {
            FormationStage::Empty
        }
    }

    pub fn has_teams(&self) -> bool {
        !self.team_a.is_empty() || !self.team_b.is_empty()
    }

    pub fn total_players(&self) -> usize {
        self.team_a.len() + self.team_b.len() + self.bench.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    TeamA,
    TeamB,
    Bench,
}

/// Splits attending players into two teams and a bench.
///
/// Players are bucketed by main position and each bucket is sorted by rating,
/// highest first (stable, so equal ratings keep input order). Buckets are then
/// walked goalkeepers first, forwards last. While both teams have room the
/// bucket index decides the side (even to A, odd to B) so strong players
/// alternate; once one side is full the other takes the rest, and anything
/// left over goes to the bench.
///
/// Caller is responsible for filtering to attending players.
pub fn form_teams(players: &[Player]) -> FormationResult {
    let per_team = players.len() / 2;
    let mut result = FormationResult::default();

    for position in Position::ALL {
        for (i, player) in bucket_by_rating(players, position).into_iter().enumerate() {
            match pick_slot(i, result.team_a.len(), result.team_b.len(), per_team) {
                Slot::TeamA => result.team_a.push(player.clone()),
                Slot::TeamB => result.team_b.push(player.clone()),
                Slot::Bench => result.bench.push(player.clone()),
            }
        }
    }

    // Sub-positions are recorded on players but not used for any swap pass yet.
    result
}

fn bucket_by_rating(players: &[Player], position: Position) -> Vec<&Player> {
    let mut bucket: Vec<&Player> = players
        .iter()
        .filter(|p| p.main_position == position)
        .collect();
    bucket.sort_by(|a, b| b.overall_rating.total_cmp(&a.overall_rating));
    bucket
}

fn pick_slot(bucket_index: usize, a_len: usize, b_len: usize, per_team: usize) -> Slot {
    let a_open = a_len < per_team;
    let b_open = b_len < per_team;
    match (a_open, b_open) {
        (true, true) if bucket_index % 2 == 0 => Slot::TeamA,
        (true, true) => Slot::TeamB,
        (true, false) => Slot::TeamA,
        (false, true) => Slot::TeamB,
        (false, false) => Slot::Bench,
    }
}

pub fn reset_formation() -> FormationResult {
    FormationResult::default()
}

/// Marks a formed result as final. Contents are untouched.
///
/// With no players on either team there is nothing to finalize and the input
/// comes back unchanged.
pub fn complete_formation(current: &FormationResult) -> FormationResult {
    let mut next = current.clone();
    if current.has_teams() {
        next.is_complete = true;
    }
    next
}

pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Mean rating rounded to one decimal; 0 for an empty team.
pub fn average_rating(team: &[Player]) -> f64 {
    if team.is_empty() {
        return 0.0;
    }
    let total: f64 = team.iter().map(|p| p.overall_rating).sum();
    round_to_tenth(total / team.len() as f64)
}

pub fn position_count(team: &[Player], category: Position) -> usize {
    team.iter().filter(|p| p.main_position == category).count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadcountBalance {
    pub is_balanced: bool,
    pub difference: usize,
    pub team_a_count: usize,
    pub team_b_count: usize,
}

pub fn headcount_balance(team_a: &[Player], team_b: &[Player]) -> HeadcountBalance {
    let difference = team_a.len().abs_diff(team_b.len());
    HeadcountBalance {
        is_balanced: difference <= 1,
        difference,
        team_a_count: team_a.len(),
        team_b_count: team_b.len(),
    }
}

/// Player counts per category, indexed in `Position::ALL` order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionCounts([usize; 4]);

impl PositionCounts {
    pub fn of(players: &[Player]) -> Self {
        let mut counts = [0usize; 4];
        for p in players {
            counts[p.main_position.index()] += 1;
        }
        Self(counts)
    }

    pub fn get(&self, position: Position) -> usize {
        self.0[position.index()]
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BalanceReport {
    pub headcount: HeadcountBalance,
    pub team_a_rating: f64,
    pub team_b_rating: f64,
    pub rating_difference: f64,
    pub team_a_positions: PositionCounts,
    pub team_b_positions: PositionCounts,
}

pub fn balance_report(result: &FormationResult) -> BalanceReport {
    let team_a_rating = average_rating(&result.team_a);
    let team_b_rating = average_rating(&result.team_b);
    BalanceReport {
        headcount: headcount_balance(&result.team_a, &result.team_b),
        team_a_rating,
        team_b_rating,
        rating_difference: round_to_tenth((team_a_rating - team_b_rating).abs()),
        team_a_positions: PositionCounts::of(&result.team_a),
        team_b_positions: PositionCounts::of(&result.team_b),
    }
}

/// Overview of the attending pool before any split.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolSummary {
    pub total: usize,
    pub average_rating: f64,
    pub positions: PositionCounts,
}

pub fn position_summary(players: &[Player]) -> PoolSummary {
    PoolSummary {
        total: players.len(),
        average_rating: average_rating(players),
        positions: PositionCounts::of(players),
    }
}

#[cfg(test)]
mod tests {
    use super::{Slot, pick_slot, round_to_tenth};

    #[test]
    fn parity_decides_only_while_both_sides_have_room() {
        assert_eq!(pick_slot(0, 0, 0, 2), Slot::TeamA);
        assert_eq!(pick_slot(1, 1, 0, 2), Slot::TeamB);
        assert_eq!(pick_slot(1, 1, 2, 2), Slot::TeamA);
        assert_eq!(pick_slot(0, 2, 1, 2), Slot::TeamB);
        assert_eq!(pick_slot(0, 2, 2, 2), Slot::Bench);
    }

    #[test]
    fn zero_capacity_benches_everyone() {
        assert_eq!(pick_slot(0, 0, 0, 0), Slot::Bench);
    }

    #[test]
    fn rounding_keeps_one_decimal() {
        assert_eq!(round_to_tenth(6.86), 6.9);
        assert_eq!(round_to_tenth(7.04), 7.0);
    }
}
