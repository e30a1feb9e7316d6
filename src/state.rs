use std::collections::VecDeque;

use anyhow::{Result, bail};
use chrono::NaiveDate;

use crate::attendance::{MonthlyAttendance, PlayerSeasonStats};
use crate::config::AppConfig;
use crate::formation::{
    FormationResult, FormationStage, PoolSummary, complete_formation, form_teams,
    position_summary, reset_formation,
};
use crate::roster::{NewMember, Player, Position, Roster, load_roster};
use crate::sample_data::{
    SAMPLE_SKILLS, SAMPLE_TEAM_NAME, sample_monthly_attendance, sample_roster, sample_schedule,
    sample_season_stats,
};
use crate::schedule::{NewSession, Schedule, Session, SessionStatus, rsvp_label};
use crate::settings::{SettingToggle, TeamSettings, toggle_label};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Player,
    Manager,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Team,
    Schedule,
    Formation,
    Stats,
    Settings,
}

const PLAYER_TABS: &[Tab] = &[Tab::Dashboard, Tab::Team, Tab::Schedule, Tab::Stats];
const MANAGER_TABS: &[Tab] = &[
    Tab::Dashboard,
    Tab::Team,
    Tab::Schedule,
    Tab::Formation,
    Tab::Stats,
    Tab::Settings,
];

/// Tabs reachable in each view mode, in display order.
pub fn available_tabs(mode: ViewMode) -> &'static [Tab] {
    match mode {
        ViewMode::Player => PLAYER_TABS,
        ViewMode::Manager => MANAGER_TABS,
    }
}

pub const SETTING_TOGGLES: [SettingToggle; 3] = [
    SettingToggle::AutoFormation,
    SettingToggle::BalanceByPosition,
    SettingToggle::BalanceByRating,
];

/// Free-text edits entered through the prompt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    NewMember,
    NewSession,
    AddSkill,
    RemoveSkill,
    AddSubPosition,
    RemoveSubPosition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub buffer: String,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub tab: Tab,
    pub view_mode: ViewMode,
    pub help_overlay: bool,
    pub menu_open: bool,
    pub menu_selected: usize,
    pub roster: Roster,
    pub roster_selected: usize,
    pub schedule: Schedule,
    pub schedule_selected: usize,
    pub attendee_selected: usize,
    pub season_stats: Vec<PlayerSeasonStats>,
    pub monthly_attendance: Vec<MonthlyAttendance>,
    pub settings: TeamSettings,
    pub settings_selected: usize,
    pub formation: FormationResult,
    pub prompt: Option<Prompt>,
    pub logs: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_roster(sample_roster())
    }

    pub fn with_roster(players: Vec<Player>) -> Self {
        let mut settings = TeamSettings::new(SAMPLE_TEAM_NAME);
        settings.description = "Passionate amateur football club".to_string();
        settings.skill_categories = SAMPLE_SKILLS.iter().map(|s| s.to_string()).collect();
        Self {
            tab: Tab::Dashboard,
            view_mode: ViewMode::Manager,
            help_overlay: false,
            menu_open: false,
            menu_selected: 0,
            roster: Roster::new(players),
            roster_selected: 0,
            schedule: Schedule::new(sample_schedule()),
            schedule_selected: 0,
            attendee_selected: 0,
            season_stats: sample_season_stats(),
            monthly_attendance: sample_monthly_attendance(),
            settings,
            settings_selected: 0,
            formation: FormationResult::default(),
            prompt: None,
            logs: VecDeque::new(),
        }
    }

    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let mut state = match &cfg.roster_path {
            Some(path) => {
                let players = load_roster(path)?;
                let count = players.len();
                let mut state = Self::with_roster(players);
                state.push_log(format!(
                    "[INFO] Loaded {count} players from {}",
                    path.display()
                ));
                state
            }
            None => Self::new(),
        };
        state.view_mode = cfg.view_mode;
        state.settings.team_name = cfg.team_name.clone();
        Ok(state)
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn tabs(&self) -> &'static [Tab] {
        available_tabs(self.view_mode)
    }

    pub fn is_manager(&self) -> bool {
        self.view_mode == ViewMode::Manager
    }

    pub fn select_tab(&mut self, tab: Tab) {
        if self.tabs().contains(&tab) {
            self.tab = tab;
        } else {
            self.push_log(format!("[WARN] {} requires manager mode", tab_label(tab)));
        }
    }

    pub fn next_tab(&mut self) {
        let tabs = self.tabs();
        let idx = tabs.iter().position(|t| *t == self.tab).unwrap_or(0);
        self.tab = tabs[(idx + 1) % tabs.len()];
    }

    pub fn prev_tab(&mut self) {
        let tabs = self.tabs();
        let idx = tabs.iter().position(|t| *t == self.tab).unwrap_or(0);
        self.tab = tabs[(idx + tabs.len() - 1) % tabs.len()];
    }

    pub fn toggle_view_mode(&mut self) {
        self.view_mode = match self.view_mode {
            ViewMode::Player => ViewMode::Manager,
            ViewMode::Manager => ViewMode::Player,
        };
        if !self.tabs().contains(&self.tab) {
            self.tab = Tab::Dashboard;
        }
        self.menu_selected = self.menu_selected.min(self.tabs().len() - 1);
        self.push_log(format!(
            "[INFO] View mode: {}",
            view_mode_label(self.view_mode)
        ));
    }

    /// Sessions in calendar order; the schedule tab indexes into this list.
    pub fn schedule_rows(&self) -> Vec<&Session> {
        let mut rows: Vec<&Session> = self.schedule.sessions().iter().collect();
        rows.sort_by(|a, b| a.date.cmp(&b.date).then(a.start.cmp(&b.start)));
        rows
    }

    pub fn selected_player(&self) -> Option<&Player> {
        self.roster.players().get(self.roster_selected)
    }

    pub fn selected_session(&self) -> Option<&Session> {
        self.schedule_rows().get(self.schedule_selected).copied()
    }

    pub fn selected_toggle(&self) -> SettingToggle {
        SETTING_TOGGLES[self.settings_selected.min(SETTING_TOGGLES.len() - 1)]
    }

    pub fn next_session(&self, today: NaiveDate) -> Option<&Session> {
        self.schedule.next_session(today)
    }

    pub fn attending_summary(&self) -> PoolSummary {
        position_summary(&self.roster.attending())
    }

    pub fn select_next(&mut self) {
        if self.menu_open {
            let len = self.tabs().len();
            self.menu_selected = (self.menu_selected + 1).min(len - 1);
            return;
        }
        match self.tab {
            Tab::Team => {
                let len = self.roster.len();
                if len > 0 {
                    self.roster_selected = (self.roster_selected + 1).min(len - 1);
                }
            }
            Tab::Schedule => {
                let len = self.schedule.sessions().len();
                if len > 0 {
                    self.schedule_selected = (self.schedule_selected + 1).min(len - 1);
                    self.attendee_selected = 0;
                }
            }
            Tab::Settings => {
                self.settings_selected = (self.settings_selected + 1).min(SETTING_TOGGLES.len() - 1);
            }
            Tab::Dashboard | Tab::Formation | Tab::Stats => {}
        }
    }

    pub fn select_prev(&mut self) {
        if self.menu_open {
            self.menu_selected = self.menu_selected.saturating_sub(1);
            return;
        }
        match self.tab {
            Tab::Team => self.roster_selected = self.roster_selected.saturating_sub(1),
            Tab::Schedule => {
                self.schedule_selected = self.schedule_selected.saturating_sub(1);
                self.attendee_selected = 0;
            }
            Tab::Settings => self.settings_selected = self.settings_selected.saturating_sub(1),
            Tab::Dashboard | Tab::Formation | Tab::Stats => {}
        }
    }

    pub fn clamp_selection(&mut self) {
        self.roster_selected = self.roster_selected.min(self.roster.len().saturating_sub(1));
        self.schedule_selected = self
            .schedule_selected
            .min(self.schedule.sessions().len().saturating_sub(1));
        let attendees = self.selected_session().map_or(0, |s| s.attendees.len());
        self.attendee_selected = self.attendee_selected.min(attendees.saturating_sub(1));
    }

    pub fn select_attendee_next(&mut self) {
        let len = self.selected_session().map_or(0, |s| s.attendees.len());
        if len > 0 {
            self.attendee_selected = (self.attendee_selected + 1).min(len - 1);
        }
    }

    pub fn select_attendee_prev(&mut self) {
        self.attendee_selected = self.attendee_selected.saturating_sub(1);
    }

    fn require_manager(&mut self, what: &str) -> bool {
        if self.is_manager() {
            return true;
        }
        self.push_log(format!("[WARN] {what} requires manager mode"));
        false
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    SelectTab(Tab),
    NextTab,
    PrevTab,
    ToggleViewMode,
    ToggleHelp,
    ToggleMenu,
    SelectNext,
    SelectPrev,
    /// Context action for the current tab (or menu pick when the menu is open).
    Activate,
    AutoForm,
    ResetFormation,
    CompleteFormation,
    RemoveMember,
    MarkAllAttending,
    SelectAttendeeNext,
    SelectAttendeePrev,
    /// Steps the selected attendee's reply: pending, attending, absent.
    CycleRsvp,
    ResetSkills,
    ResetPositions,
    OpenPrompt(PromptKind),
    PromptInput(char),
    PromptBackspace,
    PromptCancel,
    PromptSubmit,
    Log(String),
}

pub fn apply_action(state: &mut AppState, action: Action) {
    match action {
        Action::SelectTab(tab) => state.select_tab(tab),
        Action::NextTab => state.next_tab(),
        Action::PrevTab => state.prev_tab(),
        Action::ToggleViewMode => state.toggle_view_mode(),
        Action::ToggleHelp => state.help_overlay = !state.help_overlay,
        Action::ToggleMenu => {
            state.menu_open = !state.menu_open;
            if state.menu_open {
                state.menu_selected = state
                    .tabs()
                    .iter()
                    .position(|t| *t == state.tab)
                    .unwrap_or(0);
            }
        }
        Action::SelectNext => state.select_next(),
        Action::SelectPrev => state.select_prev(),
        Action::Activate => activate(state),
        Action::AutoForm => auto_form(state),
        Action::ResetFormation => {
            if !state.require_manager("Formation reset") {
                return;
            }
            state.formation = reset_formation();
            state.push_log("[INFO] Formation reset");
        }
        Action::CompleteFormation => {
            if !state.require_manager("Finalizing teams") {
                return;
            }
            match state.formation.stage() {
                FormationStage::Empty => state.push_log("[WARN] No teams to finalize yet"),
                FormationStage::Finalized => state.push_log("[INFO] Formation already finalized"),
                FormationStage::Formed => {
                    state.formation = complete_formation(&state.formation);
                    state.push_log("[INFO] Formation finalized");
                }
            }
        }
        Action::RemoveMember => remove_member(state),
        Action::MarkAllAttending => {
            if !state.require_manager("Editing attendance") {
                return;
            }
            let absent: Vec<u32> = state
                .roster
                .players()
                .iter()
                .filter(|p| !p.attending)
                .map(|p| p.id)
                .collect();
            for id in &absent {
                state.roster.set_attending(*id, true);
            }
            state.push_log(format!(
                "[INFO] Everyone marked attending ({} changed)",
                absent.len()
            ));
        }
        Action::SelectAttendeeNext => state.select_attendee_next(),
        Action::SelectAttendeePrev => state.select_attendee_prev(),
        Action::CycleRsvp => cycle_rsvp(state),
        Action::ResetSkills => {
            if !state.require_manager("Changing settings") {
                return;
            }
            state.settings.reset_skills();
            state.push_log("[INFO] Skill categories reset");
        }
        Action::ResetPositions => {
            if !state.require_manager("Changing settings") {
                return;
            }
            state.settings.reset_positions();
            state.push_log("[INFO] Position catalog reset");
        }
        Action::OpenPrompt(kind) => {
            if !state.require_manager("Editing") {
                return;
            }
            state.menu_open = false;
            state.prompt = Some(Prompt {
                kind,
                buffer: String::new(),
            });
        }
        Action::PromptInput(c) => {
            if let Some(prompt) = state.prompt.as_mut() {
                prompt.buffer.push(c);
            }
        }
        Action::PromptBackspace => {
            if let Some(prompt) = state.prompt.as_mut() {
                prompt.buffer.pop();
            }
        }
        Action::PromptCancel => state.prompt = None,
        Action::PromptSubmit => submit_prompt(state),
        Action::Log(msg) => state.push_log(msg),
    }
}

fn remove_member(state: &mut AppState) {
    if !state.require_manager("Removing members") {
        return;
    }
    let Some((id, name)) = state.selected_player().map(|p| (p.id, p.name.clone())) else {
        return;
    };
    if state.roster.remove_member(id) {
        state.clamp_selection();
        state.push_log(format!("[INFO] Removed {name} from the roster"));
    }
}

fn cycle_rsvp(state: &mut AppState) {
    let Some(session) = state.selected_session() else {
        return;
    };
    if session.status == SessionStatus::Completed {
        let title = session.title.clone();
        state.push_log(format!("[WARN] {title} is already completed"));
        return;
    }
    let Some(attendee) = session.attendees.get(state.attendee_selected) else {
        return;
    };
    let (id, name, next) = (session.id, attendee.name.clone(), attendee.status.cycle());
    if state.schedule.set_rsvp(id, &name, next) {
        state.push_log(format!("[INFO] {name}: {}", rsvp_label(next)));
    }
}

fn submit_prompt(state: &mut AppState) {
    let Some(prompt) = state.prompt.take() else {
        return;
    };
    match run_prompt(state, prompt.kind, prompt.buffer.trim()) {
        Ok(msg) => state.push_log(format!("[INFO] {msg}")),
        Err(err) => {
            state.push_log(format!("[WARN] {err:#}"));
            // Keep the text so it can be corrected.
            state.prompt = Some(prompt);
        }
    }
}

fn run_prompt(state: &mut AppState, kind: PromptKind, input: &str) -> Result<String> {
    match kind {
        PromptKind::NewMember => {
            let draft = parse_new_member(input)?;
            let name = draft.name.trim().to_string();
            let id = state.roster.add_member(draft)?;
            Ok(format!("Added {name} as #{id}"))
        }
        PromptKind::NewSession => {
            let draft = parse_new_session(input)?;
            let title = draft.title.trim().to_string();
            state.schedule.add_session(draft)?;
            Ok(format!("Scheduled {title}"))
        }
        PromptKind::AddSkill => {
            state.settings.add_skill_category(input)?;
            Ok(format!("Skill {input} added"))
        }
        PromptKind::RemoveSkill => {
            state.settings.remove_skill_category(input)?;
            Ok(format!("Skill {input} removed"))
        }
        PromptKind::AddSubPosition => {
            let (position, tag) = parse_position_tag(input)?;
            state.settings.add_sub_position(position, tag)?;
            Ok(format!("{tag} added to {position}"))
        }
        PromptKind::RemoveSubPosition => {
            let (position, tag) = parse_position_tag(input)?;
            state.settings.remove_sub_position(position, tag)?;
            Ok(format!("{tag} removed from {position}"))
        }
    }
}

/// `name, position[, tags...]`; tags may be split by commas or spaces.
fn parse_new_member(input: &str) -> Result<NewMember> {
    let mut fields = input.split(',').map(str::trim);
    let name = fields.next().unwrap_or_default().to_string();
    let main_position = match fields.next().filter(|f| !f.is_empty()) {
        Some(raw) => Some(raw.parse::<Position>()?),
        None => None,
    };
    let mut draft = NewMember {
        name,
        main_position,
        ..NewMember::default()
    };
    for tag in fields.flat_map(str::split_whitespace) {
        draft.add_sub_position(tag);
    }
    Ok(draft)
}

/// `title, YYYY-MM-DD, HH:MM[, location[, kind]]`.
fn parse_new_session(input: &str) -> Result<NewSession> {
    let fields: Vec<&str> = input.split(',').map(str::trim).collect();
    let field = |i: usize| fields.get(i).copied().unwrap_or_default().to_string();
    let mut draft = NewSession {
        title: field(0),
        date: field(1),
        start: field(2),
        location: field(3),
        ..NewSession::default()
    };
    if let Some(kind) = fields.get(4).filter(|k| !k.is_empty()) {
        draft.kind = kind.parse()?;
    }
    Ok(draft)
}

/// `position tag`, e.g. `DF LWB`.
fn parse_position_tag(input: &str) -> Result<(Position, &str)> {
    let mut parts = input.split_whitespace();
    let (Some(position), Some(tag)) = (parts.next(), parts.next()) else {
        bail!("expected a position and a tag, e.g. \"DF LWB\"");
    };
    Ok((position.parse()?, tag))
}

fn activate(state: &mut AppState) {
    if state.menu_open {
        let tabs = state.tabs();
        if let Some(tab) = tabs.get(state.menu_selected).copied() {
            state.tab = tab;
        }
        state.menu_open = false;
        return;
    }
    match state.tab {
        Tab::Team => {
            if !state.require_manager("Editing attendance") {
                return;
            }
            let Some((id, name)) = state.selected_player().map(|p| (p.id, p.name.clone())) else {
                return;
            };
            if let Some(attending) = state.roster.toggle_attending(id) {
                let label = if attending { "attending" } else { "not attending" };
                state.push_log(format!("[INFO] {name} marked {label}"));
            }
        }
        Tab::Schedule => {
            if !state.require_manager("Closing a session") {
                return;
            }
            let Some((id, title)) = state.selected_session().map(|s| (s.id, s.title.clone())) else {
                return;
            };
            if state.schedule.mark_completed(id) {
                state.push_log(format!("[INFO] {title} marked completed"));
            }
        }
        Tab::Settings => {
            if !state.require_manager("Changing settings") {
                return;
            }
            let which = state.selected_toggle();
            let on = state.settings.toggle(which);
            state.push_log(format!(
                "[INFO] {}: {}",
                toggle_label(which),
                if on { "on" } else { "off" }
            ));
        }
        Tab::Formation => auto_form(state),
        Tab::Dashboard | Tab::Stats => {}
    }
}

fn auto_form(state: &mut AppState) {
    if !state.require_manager("Team formation") {
        return;
    }
    if !state.settings.auto_formation {
        state.push_log("[WARN] Auto formation is turned off in settings");
        return;
    }
    let was_final = state.formation.is_complete;
    let attending = state.roster.attending();
    state.formation = form_teams(&attending);
    if was_final {
        state.push_log("[INFO] Re-forming finalized teams");
    }
    state.push_log(format!(
        "[INFO] Formed teams from {} attendees: A {} / B {} / bench {}",
        attending.len(),
        state.formation.team_a.len(),
        state.formation.team_b.len(),
        state.formation.bench.len()
    ));
}

pub fn tab_label(tab: Tab) -> &'static str {
    match tab {
        Tab::Dashboard => "Dashboard",
        Tab::Team => "Team",
        Tab::Schedule => "Schedule",
        Tab::Formation => "Formation",
        Tab::Stats => "Attendance",
        Tab::Settings => "Settings",
    }
}

pub fn prompt_label(kind: PromptKind) -> &'static str {
    match kind {
        PromptKind::NewMember => "New member (name, position, tags)",
        PromptKind::NewSession => "New session (title, YYYY-MM-DD, HH:MM, location, kind)",
        PromptKind::AddSkill => "Add skill",
        PromptKind::RemoveSkill => "Remove skill",
        PromptKind::AddSubPosition => "Add sub-position (position tag)",
        PromptKind::RemoveSubPosition => "Remove sub-position (position tag)",
    }
}

pub fn view_mode_label(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::Player => "PLAYER",
        ViewMode::Manager => "MANAGER",
    }
}
