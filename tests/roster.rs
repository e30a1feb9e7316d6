use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use squad_terminal::formation::{balance_report, form_teams};
use squad_terminal::roster::{NewMember, Position, Roster, load_roster, parse_roster_json};
use squad_terminal::sample_data::sample_roster;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn draft(name: &str, position: Option<Position>) -> NewMember {
    NewMember {
        name: name.to_string(),
        main_position: position,
        ..NewMember::default()
    }
}

#[test]
fn new_member_gets_next_id_and_derived_rating() {
    let mut roster = Roster::new(sample_roster());
    let mut member = draft("  Oh Seungwoo ", Some(Position::Defender));
    member.add_sub_position("CB");
    member.set_skill("Speed", 6);
    member.set_skill("Defending", 9);
    member.phone = Some("  ".to_string());
    member.join_date = NaiveDate::from_ymd_opt(2025, 3, 1);

    let id = roster.add_member(member).unwrap();
    assert_eq!(id, 13);

    let added = roster.get(id).unwrap();
    assert_eq!(added.name, "Oh Seungwoo");
    assert_eq!(added.overall_rating, 7.5);
    assert!(added.attending);
    assert_eq!(added.phone, None);
    assert_eq!(added.sub_positions, vec!["CB"]);
    assert_eq!(roster.attending_count(), 13);
}

#[test]
fn new_member_needs_name_and_position() {
    let mut roster = Roster::default();
    let err = roster.add_member(draft("   ", Some(Position::Forward))).unwrap_err();
    assert!(err.to_string().contains("name is required"));

    let err = roster.add_member(draft("Ana", None)).unwrap_err();
    assert!(err.to_string().contains("main position is required"));
    assert!(roster.is_empty());
}

#[test]
fn member_without_skills_rates_zero() {
    let mut roster = Roster::default();
    let id = roster.add_member(draft("Ana", Some(Position::Goalkeeper))).unwrap();
    assert_eq!(id, 1);
    assert_eq!(roster.get(id).unwrap().overall_rating, 0.0);
}

#[test]
fn attendance_flags_and_removal() {
    let mut roster = Roster::new(sample_roster());
    assert_eq!(roster.toggle_attending(4), Some(false));
    assert!(roster.set_attending(5, false));
    assert_eq!(roster.attending_count(), 10);
    assert!(roster.attending().iter().all(|p| p.id != 4 && p.id != 5));

    assert!(roster.remove_member(4));
    assert!(!roster.remove_member(4));
    assert_eq!(roster.toggle_attending(99), None);
    assert!(!roster.set_attending(99, true));
    assert_eq!(roster.len(), 11);
}

#[test]
fn json_roster_accepts_camel_case_fields() {
    let raw = r#"[
        {
            "id": 3,
            "name": "Lee Donghyun",
            "mainPosition": "Defender",
            "subPositions": ["CB", "RB"],
            "overallRating": 7.0,
            "joinDate": "2023-11-10",
            "attendanceRate": 88
        },
        {
            "id": 9,
            "name": "Ana",
            "main_position": "mf",
            "attending": false,
            "skills": {"Speed": 8, "Passing": 6}
        }
    ]"#;
    let players = parse_roster_json(raw).unwrap();

    assert_eq!(players.len(), 2);
    assert_eq!(players[0].main_position, Position::Defender);
    assert_eq!(players[0].sub_positions, vec!["CB", "RB"]);
    assert_eq!(players[0].join_date, NaiveDate::from_ymd_opt(2023, 11, 10));
    assert_eq!(players[0].attendance_rate, 88);
    assert!(players[0].attending);

    assert_eq!(players[1].main_position, Position::Midfielder);
    assert_eq!(players[1].overall_rating, 7.0);
    assert!(!players[1].attending);
}

#[test]
fn korean_position_labels_parse() {
    assert_eq!("골키퍼".parse::<Position>().unwrap(), Position::Goalkeeper);
    assert_eq!("수비수".parse::<Position>().unwrap(), Position::Defender);
    assert_eq!(" 미드필더 ".parse::<Position>().unwrap(), Position::Midfielder);
    assert_eq!("공격수".parse::<Position>().unwrap(), Position::Forward);

    let raw = r#"[{"id": 1, "name": "Kim Minsu", "mainPosition": "공격수", "overallRating": 7.6}]"#;
    let players = parse_roster_json(raw).unwrap();
    assert_eq!(players[0].main_position, Position::Forward);
}

#[test]
fn json_roster_rejects_unknown_positions() {
    let raw = r#"[{"id": 1, "name": "Ana", "mainPosition": "Sweeper", "overallRating": 6.0}]"#;
    let err = parse_roster_json(raw).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("player 1 (Ana)"), "{msg}");
    assert!(msg.contains("Sweeper"), "{msg}");
}

#[test]
fn json_roster_rejects_duplicates_and_bad_ratings() {
    let dup = r#"[
        {"id": 1, "name": "Ana", "mainPosition": "GK", "overallRating": 6.0},
        {"id": 1, "name": "Ben", "mainPosition": "FW", "overallRating": 6.0}
    ]"#;
    assert!(
        parse_roster_json(dup)
            .unwrap_err()
            .to_string()
            .contains("duplicate player id 1")
    );

    let negative = r#"[{"id": 1, "name": "Ana", "mainPosition": "GK", "overallRating": -1.0}]"#;
    assert!(parse_roster_json(negative).is_err());

    assert!(parse_roster_json(r#"{"id": 1}"#).is_err());
}

#[test]
fn sample_roster_is_fully_attending() {
    let roster = Roster::new(sample_roster());
    assert_eq!(roster.len(), 12);
    assert_eq!(roster.attending_count(), 12);
    let minsu = roster.get(1).unwrap();
    assert_eq!(minsu.initial(), 'K');
    assert_eq!(minsu.skills.len(), 7);
    assert_eq!(minsu.goals, 12);
}

#[test]
fn fixture_roster_loads_and_forms() {
    let players = load_roster(&fixture_path("roster.json")).expect("fixture should parse");
    assert_eq!(players.len(), 7);
    assert_eq!(players[1].overall_rating, 6.2);
    assert_eq!(players[2].main_position, Position::Defender);
    assert_eq!(players[6].main_position, Position::Forward);

    let roster = Roster::new(players);
    assert_eq!(roster.attending_count(), 6);

    let result = form_teams(&roster.attending());
    let team_a: Vec<u32> = result.team_a.iter().map(|p| p.id).collect();
    let team_b: Vec<u32> = result.team_b.iter().map(|p| p.id).collect();
    assert_eq!(team_a, vec![1, 2, 4]);
    assert_eq!(team_b, vec![3, 6, 7]);

    let report = balance_report(&result);
    assert_eq!(report.team_a_rating, 6.8);
    assert_eq!(report.team_b_rating, 6.7);
}

#[test]
fn fixture_file_is_plain_json() {
    let raw = fs::read_to_string(fixture_path("roster.json")).unwrap();
    assert_eq!(parse_roster_json(&raw).unwrap().len(), 7);
    assert!(load_roster(&fixture_path("missing.json")).is_err());
}
