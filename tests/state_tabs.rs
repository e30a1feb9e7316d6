use std::time::Duration;

use chrono::NaiveTime;

use squad_terminal::config::AppConfig;
use squad_terminal::formation::FormationStage;
use squad_terminal::roster::Position;
use squad_terminal::schedule::{RsvpStatus, SessionKind, SessionStatus};
use squad_terminal::settings::BASE_SKILLS;
use squad_terminal::state::{
    Action, AppState, PromptKind, Tab, ViewMode, apply_action, available_tabs, tab_label,
};

fn last_log(state: &AppState) -> &str {
    state.logs.back().map(String::as_str).unwrap_or("")
}

fn submit(state: &mut AppState, kind: PromptKind, text: &str) {
    apply_action(state, Action::OpenPrompt(kind));
    for c in text.chars() {
        apply_action(state, Action::PromptInput(c));
    }
    apply_action(state, Action::PromptSubmit);
}

fn rsvp_of(state: &AppState, name: &str) -> Option<RsvpStatus> {
    let session = state.selected_session()?;
    session.attendees.iter().find(|a| a.name == name).map(|a| a.status)
}

#[test]
fn tab_sets_per_mode() {
    assert_eq!(
        available_tabs(ViewMode::Player),
        &[Tab::Dashboard, Tab::Team, Tab::Schedule, Tab::Stats]
    );
    let manager = available_tabs(ViewMode::Manager);
    assert_eq!(manager.len(), 6);
    assert!(manager.contains(&Tab::Formation));
    assert!(manager.contains(&Tab::Settings));
    assert_eq!(tab_label(Tab::Stats), "Attendance");
}

#[test]
fn switching_to_player_mode_leaves_manager_tabs() {
    let mut state = AppState::new();
    assert_eq!(state.view_mode, ViewMode::Manager);
    apply_action(&mut state, Action::SelectTab(Tab::Formation));
    assert_eq!(state.tab, Tab::Formation);

    apply_action(&mut state, Action::ToggleViewMode);
    assert_eq!(state.view_mode, ViewMode::Player);
    assert_eq!(state.tab, Tab::Dashboard);
    assert_eq!(last_log(&state), "[INFO] View mode: PLAYER");

    apply_action(&mut state, Action::SelectTab(Tab::Schedule));
    apply_action(&mut state, Action::ToggleViewMode);
    assert_eq!(state.tab, Tab::Schedule);
}

#[test]
fn player_mode_cannot_open_manager_tabs() {
    let mut state = AppState::new();
    apply_action(&mut state, Action::ToggleViewMode);
    apply_action(&mut state, Action::SelectTab(Tab::Settings));

    assert_eq!(state.tab, Tab::Dashboard);
    assert_eq!(last_log(&state), "[WARN] Settings requires manager mode");
}

#[test]
fn tab_cycling_wraps_within_mode() {
    let mut state = AppState::new();
    apply_action(&mut state, Action::PrevTab);
    assert_eq!(state.tab, Tab::Settings);
    apply_action(&mut state, Action::NextTab);
    assert_eq!(state.tab, Tab::Dashboard);

    apply_action(&mut state, Action::ToggleViewMode);
    apply_action(&mut state, Action::PrevTab);
    assert_eq!(state.tab, Tab::Stats);
}

#[test]
fn manager_forms_and_finalizes_teams() {
    let mut state = AppState::new();
    apply_action(&mut state, Action::SelectTab(Tab::Formation));
    apply_action(&mut state, Action::AutoForm);

    assert_eq!(state.formation.stage(), FormationStage::Formed);
    assert_eq!(state.formation.team_a.len(), 6);
    assert_eq!(state.formation.team_b.len(), 6);
    assert!(last_log(&state).starts_with("[INFO] Formed teams from 12 attendees"));

    apply_action(&mut state, Action::CompleteFormation);
    assert!(state.formation.is_complete);
    assert_eq!(last_log(&state), "[INFO] Formation finalized");

    apply_action(&mut state, Action::CompleteFormation);
    assert_eq!(last_log(&state), "[INFO] Formation already finalized");
}

#[test]
fn re_forming_finalized_teams_clears_the_flag() {
    let mut state = AppState::new();
    apply_action(&mut state, Action::AutoForm);
    apply_action(&mut state, Action::CompleteFormation);
    apply_action(&mut state, Action::AutoForm);

    assert!(!state.formation.is_complete);
    assert!(
        state
            .logs
            .iter()
            .any(|l| l == "[INFO] Re-forming finalized teams")
    );
}

#[test]
fn finalizing_nothing_warns() {
    let mut state = AppState::new();
    apply_action(&mut state, Action::CompleteFormation);
    assert!(!state.formation.is_complete);
    assert_eq!(last_log(&state), "[WARN] No teams to finalize yet");
}

#[test]
fn reset_clears_teams() {
    let mut state = AppState::new();
    apply_action(&mut state, Action::AutoForm);
    apply_action(&mut state, Action::ResetFormation);
    assert_eq!(state.formation.stage(), FormationStage::Empty);
    assert_eq!(state.formation.total_players(), 0);
}

#[test]
fn player_mode_cannot_form_teams() {
    let mut state = AppState::new();
    apply_action(&mut state, Action::ToggleViewMode);
    apply_action(&mut state, Action::AutoForm);

    assert_eq!(state.formation.stage(), FormationStage::Empty);
    assert_eq!(last_log(&state), "[WARN] Team formation requires manager mode");
}

#[test]
fn auto_formation_setting_gates_forming() {
    let mut state = AppState::new();
    apply_action(&mut state, Action::SelectTab(Tab::Settings));
    // First toggle row is auto formation.
    apply_action(&mut state, Action::Activate);
    assert!(!state.settings.auto_formation);

    apply_action(&mut state, Action::AutoForm);
    assert_eq!(state.formation.stage(), FormationStage::Empty);
    assert_eq!(last_log(&state), "[WARN] Auto formation is turned off in settings");
}

#[test]
fn attendance_toggle_changes_the_formation_pool() {
    let mut state = AppState::new();
    apply_action(&mut state, Action::SelectTab(Tab::Team));
    apply_action(&mut state, Action::Activate);
    assert_eq!(state.roster.attending_count(), 11);
    assert_eq!(last_log(&state), "[INFO] Kim Minsu marked not attending");

    apply_action(&mut state, Action::AutoForm);
    assert_eq!(state.formation.team_a.len(), 5);
    assert_eq!(state.formation.team_b.len(), 5);
    assert_eq!(state.formation.bench.len(), 1);
    assert!(state.formation.total_players() == 11);
}

#[test]
fn schedule_rows_are_in_date_order_and_completion_marks_attended() {
    let mut state = AppState::new();
    let titles: Vec<&str> = state
        .schedule_rows()
        .iter()
        .map(|s| s.title.as_str())
        .collect();
    assert_eq!(
        titles,
        vec!["Team training", "Monthly internal game", "A-Match vs FC Lightning"]
    );

    apply_action(&mut state, Action::SelectTab(Tab::Schedule));
    apply_action(&mut state, Action::Activate);
    let training = state.selected_session().expect("selected session");
    assert_eq!(training.status, SessionStatus::Completed);
    assert!(
        training
            .attendees
            .iter()
            .all(|a| a.status != RsvpStatus::Attending)
    );
    assert_eq!(training.attendance().attending, 3);
}

#[test]
fn selection_stops_at_list_bounds() {
    let mut state = AppState::new();
    apply_action(&mut state, Action::SelectTab(Tab::Team));
    apply_action(&mut state, Action::SelectPrev);
    assert_eq!(state.roster_selected, 0);
    for _ in 0..40 {
        apply_action(&mut state, Action::SelectNext);
    }
    assert_eq!(state.roster_selected, state.roster.len() - 1);
}

#[test]
fn menu_picks_a_tab() {
    let mut state = AppState::new();
    apply_action(&mut state, Action::ToggleMenu);
    assert!(state.menu_open);
    assert_eq!(state.menu_selected, 0);

    apply_action(&mut state, Action::SelectNext);
    apply_action(&mut state, Action::SelectNext);
    apply_action(&mut state, Action::Activate);
    assert!(!state.menu_open);
    assert_eq!(state.tab, Tab::Schedule);
}

#[test]
fn console_keeps_the_latest_entries() {
    let mut state = AppState::new();
    for i in 0..250 {
        apply_action(&mut state, Action::Log(format!("[INFO] line {i}")));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("[INFO] line 50"));
    assert_eq!(last_log(&state), "[INFO] line 249");
}

#[test]
fn config_applies_mode_and_team_name() {
    let cfg = AppConfig {
        view_mode: ViewMode::Player,
        team_name: "Sunday League".to_string(),
        tick: Duration::from_millis(100),
        ..AppConfig::default()
    };
    let state = AppState::from_config(&cfg).expect("state from sample data");
    assert_eq!(state.view_mode, ViewMode::Player);
    assert_eq!(state.settings.team_name, "Sunday League");
    assert_eq!(state.roster.len(), 12);
}

#[test]
fn config_loads_roster_file() {
    let mut path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");

    let cfg = AppConfig {
        roster_path: Some(path.join("roster.json")),
        ..AppConfig::default()
    };
    let state = AppState::from_config(&cfg).unwrap();
    assert_eq!(state.roster.len(), 7);
    assert_eq!(state.roster.attending_count(), 6);
    assert!(last_log(&state).starts_with("[INFO] Loaded 7 players from"));

    let missing = AppConfig {
        roster_path: Some(path.join("missing.json")),
        ..AppConfig::default()
    };
    assert!(AppState::from_config(&missing).is_err());
}

#[test]
fn rsvp_cycles_for_the_selected_attendee() {
    let mut state = AppState::new();
    apply_action(&mut state, Action::SelectTab(Tab::Schedule));
    assert_eq!(state.selected_session().unwrap().title, "Team training");

    apply_action(&mut state, Action::CycleRsvp);
    assert_eq!(rsvp_of(&state, "Kim Minsu"), Some(RsvpStatus::NotAttending));
    assert_eq!(last_log(&state), "[INFO] Kim Minsu: Absent");

    apply_action(&mut state, Action::SelectAttendeeNext);
    apply_action(&mut state, Action::SelectAttendeeNext);
    apply_action(&mut state, Action::CycleRsvp);
    assert_eq!(rsvp_of(&state, "Lee Donghyun"), Some(RsvpStatus::Attending));

    for _ in 0..10 {
        apply_action(&mut state, Action::SelectAttendeeNext);
    }
    assert_eq!(state.attendee_selected, 3);
    apply_action(&mut state, Action::SelectNext);
    assert_eq!(state.attendee_selected, 0);
}

#[test]
fn players_reply_but_completed_sessions_are_locked() {
    let mut state = AppState::new();
    apply_action(&mut state, Action::SelectTab(Tab::Schedule));
    apply_action(&mut state, Action::ToggleViewMode);
    assert_eq!(state.tab, Tab::Schedule);

    apply_action(&mut state, Action::CycleRsvp);
    assert_eq!(rsvp_of(&state, "Kim Minsu"), Some(RsvpStatus::NotAttending));

    apply_action(&mut state, Action::ToggleViewMode);
    apply_action(&mut state, Action::Activate);
    apply_action(&mut state, Action::CycleRsvp);
    assert_eq!(rsvp_of(&state, "Kim Minsu"), Some(RsvpStatus::NotAttending));
    assert_eq!(last_log(&state), "[WARN] Team training is already completed");
}

#[test]
fn manager_removes_the_selected_member() {
    let mut state = AppState::new();
    apply_action(&mut state, Action::SelectTab(Tab::Team));
    apply_action(&mut state, Action::SelectNext);
    apply_action(&mut state, Action::RemoveMember);

    assert_eq!(state.roster.len(), 11);
    assert!(state.roster.get(2).is_none());
    assert_eq!(last_log(&state), "[INFO] Removed Park Junho from the roster");

    for _ in 0..20 {
        apply_action(&mut state, Action::SelectNext);
    }
    apply_action(&mut state, Action::RemoveMember);
    assert_eq!(state.roster.len(), 10);
    assert_eq!(state.roster_selected, 9);

    apply_action(&mut state, Action::ToggleViewMode);
    apply_action(&mut state, Action::SelectTab(Tab::Team));
    apply_action(&mut state, Action::RemoveMember);
    assert_eq!(state.roster.len(), 10);
    assert_eq!(last_log(&state), "[WARN] Removing members requires manager mode");
}

#[test]
fn everyone_attending_restores_the_pool() {
    let mut state = AppState::new();
    apply_action(&mut state, Action::SelectTab(Tab::Team));
    apply_action(&mut state, Action::Activate);
    apply_action(&mut state, Action::SelectNext);
    apply_action(&mut state, Action::Activate);
    assert_eq!(state.roster.attending_count(), 10);

    apply_action(&mut state, Action::MarkAllAttending);
    assert_eq!(state.roster.attending_count(), 12);
    assert_eq!(last_log(&state), "[INFO] Everyone marked attending (2 changed)");
}

#[test]
fn settings_resets_restore_catalogs() {
    let mut state = AppState::new();
    apply_action(&mut state, Action::SelectTab(Tab::Settings));

    submit(&mut state, PromptKind::AddSkill, "Heading");
    assert!(state.settings.skill_categories.iter().any(|s| s == "Heading"));
    assert_eq!(last_log(&state), "[INFO] Skill Heading added");
    apply_action(&mut state, Action::ResetSkills);
    assert_eq!(state.settings.skill_categories, BASE_SKILLS.to_vec());
    assert_eq!(last_log(&state), "[INFO] Skill categories reset");

    submit(&mut state, PromptKind::AddSubPosition, "df LWB");
    assert!(state.settings.sub_positions(Position::Defender).iter().any(|t| t == "LWB"));
    submit(&mut state, PromptKind::RemoveSubPosition, "GK GK");
    assert!(last_log(&state).contains("needs at least one sub-position"));
    apply_action(&mut state, Action::PromptCancel);

    apply_action(&mut state, Action::ResetPositions);
    assert_eq!(state.settings.sub_positions(Position::Defender), ["CB", "LB", "RB", "SW"]);
    assert_eq!(last_log(&state), "[INFO] Position catalog reset");
}

#[test]
fn prompt_adds_a_member_and_keeps_bad_input() {
    let mut state = AppState::new();
    apply_action(&mut state, Action::SelectTab(Tab::Team));

    submit(&mut state, PromptKind::NewMember, "Oh Seungwoo, 수비수, CB LB");
    assert!(state.prompt.is_none());
    let added = state.roster.get(13).expect("new member");
    assert_eq!(added.name, "Oh Seungwoo");
    assert_eq!(added.main_position, Position::Defender);
    assert_eq!(added.sub_positions, vec!["CB", "LB"]);
    assert_eq!(last_log(&state), "[INFO] Added Oh Seungwoo as #13");

    submit(&mut state, PromptKind::NewMember, "Ana, sweeper");
    assert_eq!(state.roster.len(), 13);
    assert!(last_log(&state).starts_with("[WARN] unknown position category"));
    let prompt = state.prompt.as_ref().expect("prompt stays open");
    assert_eq!(prompt.buffer, "Ana, sweeper");

    apply_action(&mut state, Action::PromptBackspace);
    assert_eq!(state.prompt.as_ref().unwrap().buffer, "Ana, sweepe");
    apply_action(&mut state, Action::PromptCancel);
    assert!(state.prompt.is_none());
}

#[test]
fn prompt_schedules_a_session() {
    let mut state = AppState::new();
    apply_action(&mut state, Action::SelectTab(Tab::Schedule));
    submit(&mut state, PromptKind::NewSession, "Cup tie, 2025-09-01, 00:10, Riverside, match");

    assert_eq!(last_log(&state), "[INFO] Scheduled Cup tie");
    let session = state.schedule.get(4).expect("new session");
    assert_eq!(session.kind, SessionKind::Match);
    assert_eq!(session.location, "Riverside");
    assert_eq!(session.gather, NaiveTime::MIN);

    submit(&mut state, PromptKind::NewSession, "Cup tie, tomorrow, 19:00");
    assert_eq!(state.schedule.sessions().len(), 4);
    assert!(last_log(&state).starts_with("[WARN] invalid date"));
}

#[test]
fn player_mode_cannot_edit() {
    let mut state = AppState::new();
    apply_action(&mut state, Action::ToggleViewMode);

    apply_action(&mut state, Action::OpenPrompt(PromptKind::NewMember));
    assert!(state.prompt.is_none());
    assert_eq!(last_log(&state), "[WARN] Editing requires manager mode");

    apply_action(&mut state, Action::ResetSkills);
    assert_eq!(last_log(&state), "[WARN] Changing settings requires manager mode");
    apply_action(&mut state, Action::MarkAllAttending);
    assert_eq!(last_log(&state), "[WARN] Editing attendance requires manager mode");
}
