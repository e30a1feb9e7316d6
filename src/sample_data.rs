use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use rand::Rng;

use crate::attendance::{MonthlyAttendance, PlayerSeasonStats};
use crate::roster::{Player, Position, overall_from_skills};
use crate::schedule::{Attendee, RsvpStatus, Session, SessionKind, SessionStatus};

pub const SAMPLE_TEAM_NAME: &str = "FC Bro";

pub const SAMPLE_SKILLS: [&str; 7] = [
    "Speed",
    "Passing",
    "Defending",
    "Shooting",
    "Dribbling",
    "Stamina",
    "Mental",
];

fn skill_sheet(scores: [u8; 7]) -> BTreeMap<String, u8> {
    SAMPLE_SKILLS
        .iter()
        .zip(scores)
        .map(|(name, score)| (name.to_string(), score))
        .collect()
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

/// Twelve attending players used by the dashboard when no roster file is set.
pub fn sample_roster() -> Vec<Player> {
    let mut players = vec![
        Player::new(1, "Kim Minsu", Position::Forward, 7.6).with_sub_positions(&["CF", "LW", "RW"]),
        Player::new(2, "Park Junho", Position::Midfielder, 7.7).with_sub_positions(&["CM", "CAM", "CDM"]),
        Player::new(3, "Lee Donghyun", Position::Defender, 7.0).with_sub_positions(&["CB", "RB", "LB"]),
        Player::new(4, "Choi Woojin", Position::Goalkeeper, 6.1).with_sub_positions(&["GK"]),
        Player::new(5, "Jung Woosung", Position::Forward, 7.2).with_sub_positions(&["CF", "RW"]),
        Player::new(6, "Han Jimin", Position::Midfielder, 6.8).with_sub_positions(&["CM", "LM"]),
        Player::new(7, "Song Minho", Position::Defender, 6.5).with_sub_positions(&["CB", "LB"]),
        Player::new(8, "Kim Taehyun", Position::Defender, 6.3).with_sub_positions(&["CB", "RB"]),
        Player::new(9, "Lee Junseok", Position::Midfielder, 6.9).with_sub_positions(&["CDM", "CM"]),
        Player::new(10, "Park Sungho", Position::Forward, 6.4).with_sub_positions(&["ST", "LW"]),
        Player::new(11, "Yoon Sangchul", Position::Defender, 6.0).with_sub_positions(&["RB", "CB"]),
        Player::new(12, "Jo Hyunwoo", Position::Goalkeeper, 5.8).with_sub_positions(&["GK"]),
    ];

    let profiles = [
        (1, [9, 7, 5, 9, 8, 8, 7], "010-1234-5678", "minsu@example.com", date(2024, 3, 15), 85, 12, 5),
        (2, [7, 9, 7, 6, 8, 9, 8], "010-2345-6789", "junho@example.com", date(2024, 1, 20), 92, 3, 8),
        (3, [6, 7, 9, 4, 6, 8, 9], "010-3456-7890", "donghyun@example.com", date(2023, 11, 10), 88, 1, 2),
        (4, [5, 6, 9, 3, 5, 7, 8], "010-4567-8901", "woojin@example.com", date(2024, 2, 5), 90, 0, 0),
    ];
    for (id, scores, phone, email, joined, rate, goals, assists) in profiles {
        if let Some(p) = players.iter_mut().find(|p| p.id == id) {
            p.skills = skill_sheet(scores);
            p.phone = Some(phone.to_string());
            p.email = Some(email.to_string());
            p.join_date = joined;
            p.attendance_rate = rate;
            p.goals = goals;
            p.assists = assists;
        }
    }
    players
}

fn clock(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
}

fn attendee(name: &str, status: RsvpStatus, position: Position, rating: f64) -> Attendee {
    Attendee {
        name: name.to_string(),
        status,
        position,
        rating,
    }
}

pub fn sample_schedule() -> Vec<Session> {
    use RsvpStatus::{Attending, NotAttending, Pending};

    let regulars = |gk: RsvpStatus, df: RsvpStatus| {
        vec![
            attendee("Kim Minsu", Attending, Position::Forward, 7.6),
            attendee("Park Junho", Attending, Position::Midfielder, 7.7),
            attendee("Lee Donghyun", df, Position::Defender, 7.0),
            attendee("Choi Woojin", gk, Position::Goalkeeper, 6.1),
        ]
    };

    let mut internal = regulars(Pending, Attending);
    internal.push(attendee("Jung Woosung", NotAttending, Position::Forward, 7.2));

    let sessions = [
        (
            1,
            "Monthly internal game",
            SessionKind::Internal,
            date(2025, 8, 15),
            (19, 0),
            (18, 30),
            "Jamsil Sports Complex, pitch 2",
            20,
            10,
            internal,
            "Monthly internal game. Please be on time for the gather.",
        ),
        (
            2,
            "A-Match vs FC Lightning",
            SessionKind::Match,
            date(2025, 8, 20),
            (18, 0),
            (17, 30),
            "Hangang Park pitch",
            25,
            10,
            regulars(Attending, Pending),
            "Friendly against FC Lightning.",
        ),
        (
            3,
            "Team training",
            SessionKind::Training,
            date(2025, 8, 12),
            (20, 0),
            (19, 45),
            "Olympic Park pitch",
            30,
            15,
            regulars(Attending, Pending),
            "Fundamentals session.",
        ),
    ];

    sessions
        .into_iter()
        .filter_map(
            |(id, title, kind, day, start, gather, location, quarter, rest, attendees, description)| {
                Some(Session {
                    id,
                    title: title.to_string(),
                    kind,
                    date: day?,
                    start: clock(start.0, start.1),
                    gather: clock(gather.0, gather.1),
                    location: location.to_string(),
                    quarter_minutes: quarter,
                    rest_minutes: rest,
                    status: SessionStatus::Upcoming,
                    attendees,
                    description: description.to_string(),
                })
            },
        )
        .collect()
}

pub fn sample_season_stats() -> Vec<PlayerSeasonStats> {
    let rows = [
        ("Kim Minsu", 95, 20, 12, 5, 7.6),
        ("Park Junho", 92, 19, 3, 8, 7.7),
        ("Lee Donghyun", 88, 18, 1, 2, 7.0),
        ("Choi Woojin", 90, 18, 0, 0, 6.1),
        ("Jung Woosung", 75, 15, 8, 3, 7.2),
        ("Han Jimin", 73, 14, 2, 6, 6.8),
        ("Song Minho", 71, 14, 0, 1, 6.5),
        ("Kim Taehyun", 69, 13, 1, 0, 6.3),
        ("Lee Junseok", 68, 13, 1, 4, 6.9),
        ("Park Sungho", 65, 12, 4, 1, 6.4),
    ];
    rows.into_iter()
        .map(|(name, attendance, matches, goals, assists, rating)| PlayerSeasonStats {
            name: name.to_string(),
            attendance,
            matches,
            goals,
            assists,
            overall_rating: rating,
        })
        .collect()
}

pub fn sample_monthly_attendance() -> Vec<MonthlyAttendance> {
    [
        ("Jan", 85),
        ("Feb", 78),
        ("Mar", 92),
        ("Apr", 88),
        ("May", 76),
        ("Jun", 82),
        ("Jul", 89),
        ("Aug", 91),
    ]
    .into_iter()
    .map(|(month, attendance)| MonthlyAttendance {
        month: month.to_string(),
        attendance,
    })
    .collect()
}

/// Synthetic attending roster with random positions and skill sheets.
pub fn random_roster<R: Rng>(rng: &mut R, size: usize) -> Vec<Player> {
    (0..size)
        .map(|i| {
            let position = Position::ALL[rng.gen_range(0..Position::ALL.len())];
            let mut scores = [0u8; 7];
            for score in &mut scores {
                *score = rng.gen_range(3..=10);
            }
            let skills = skill_sheet(scores);
            let mut player = Player::new(
                i as u32 + 1,
                format!("Player {}", i + 1),
                position,
                overall_from_skills(&skills),
            );
            player.skills = skills;
            player
        })
        .collect()
}
