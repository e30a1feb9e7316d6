use std::io;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{
    Bar, BarChart, BarGroup, Block, Borders, Clear, Gauge, Paragraph, Tabs, Wrap,
};

use squad_terminal::attendance::{
    PlayerSeasonStats, attendance_distribution, average_attendance, high_attendance, low_attendance, monthly_trend,
    top_attendance,
};
use squad_terminal::config::AppConfig;
use squad_terminal::formation::{PositionCounts, balance_report};
use squad_terminal::roster::{Player, Position};
use squad_terminal::schedule::{Session, SessionStatus, kind_label, rsvp_label};
use squad_terminal::settings::toggle_label;
use squad_terminal::state::{
    Action, AppState, PromptKind, SETTING_TOGGLES, Tab, ViewMode, apply_action, prompt_label,
    tab_label, view_mode_label,
};

struct App {
    state: AppState,
    should_quit: bool,
    tick_rate: Duration,
    today: NaiveDate,
}

impl App {
    fn new(state: AppState, tick_rate: Duration) -> Self {
        Self {
            state,
            should_quit: false,
            tick_rate,
            today: Local::now().date_naive(),
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        let Some(action) = self.action_for(key) else {
            return;
        };
        apply_action(&mut self.state, action);
    }

    fn action_for(&mut self, key: KeyEvent) -> Option<Action> {
        let state = &self.state;
        // An open prompt owns the keyboard.
        if state.prompt.is_some() {
            return match key.code {
                KeyCode::Esc => Some(Action::PromptCancel),
                KeyCode::Enter => Some(Action::PromptSubmit),
                KeyCode::Backspace => Some(Action::PromptBackspace),
                KeyCode::Char(c) => Some(Action::PromptInput(c)),
                _ => None,
            };
        }
        let action = match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return None;
            }
            KeyCode::Esc if state.help_overlay => Action::ToggleHelp,
            KeyCode::Esc if state.menu_open => Action::ToggleMenu,
            KeyCode::Char(c @ '1'..='6') => {
                let idx = c as usize - '1' as usize;
                Action::SelectTab(*state.tabs().get(idx)?)
            }
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => Action::NextTab,
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => Action::PrevTab,
            KeyCode::Char('j') | KeyCode::Down => Action::SelectNext,
            KeyCode::Char('k') | KeyCode::Up => Action::SelectPrev,
            KeyCode::Char(' ') | KeyCode::Enter => Action::Activate,
            KeyCode::Char('v') | KeyCode::Char('V') => Action::ToggleViewMode,
            KeyCode::Char('m') | KeyCode::Char('M') => Action::ToggleMenu,
            KeyCode::Char('?') => Action::ToggleHelp,
            KeyCode::Char('f') if state.tab == Tab::Formation => Action::AutoForm,
            KeyCode::Char('r') if state.tab == Tab::Formation => Action::ResetFormation,
            KeyCode::Char('c') if state.tab == Tab::Formation => Action::CompleteFormation,
            KeyCode::Char('n') if state.tab == Tab::Team => Action::OpenPrompt(PromptKind::NewMember),
            KeyCode::Char('d') if state.tab == Tab::Team => Action::RemoveMember,
            KeyCode::Char('a') if state.tab == Tab::Team => Action::MarkAllAttending,
            KeyCode::Char('n') if state.tab == Tab::Schedule => {
                Action::OpenPrompt(PromptKind::NewSession)
            }
            KeyCode::Char('a') if state.tab == Tab::Schedule => Action::CycleRsvp,
            KeyCode::Char(']') if state.tab == Tab::Schedule => Action::SelectAttendeeNext,
            KeyCode::Char('[') if state.tab == Tab::Schedule => Action::SelectAttendeePrev,
            KeyCode::Char('+') if state.tab == Tab::Settings => Action::OpenPrompt(PromptKind::AddSkill),
            KeyCode::Char('-') if state.tab == Tab::Settings => {
                Action::OpenPrompt(PromptKind::RemoveSkill)
            }
            KeyCode::Char('t') if state.tab == Tab::Settings => {
                Action::OpenPrompt(PromptKind::AddSubPosition)
            }
            KeyCode::Char('x') if state.tab == Tab::Settings => {
                Action::OpenPrompt(PromptKind::RemoveSubPosition)
            }
            KeyCode::Char('s') if state.tab == Tab::Settings => Action::ResetSkills,
            KeyCode::Char('p') if state.tab == Tab::Settings => Action::ResetPositions,
            _ => return None,
        };
        Some(action)
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = AppConfig::from_env();
    let state = AppState::from_config(&config)
        .map_err(|err| io::Error::other(format!("{err:#}")))?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(state, config.tick);
    app.state.push_log("[INFO] Dashboard ready");
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        app.state.clamp_selection();
        terminal.draw(|f| ui(f, app))?;

        let timeout = app
            .tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= app.tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let state = &app.state;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    render_header(frame, chunks[0], state);

    match state.tab {
        Tab::Dashboard => render_dashboard(frame, chunks[1], state, app.today),
        Tab::Team => render_team(frame, chunks[1], state),
        Tab::Schedule => render_schedule(frame, chunks[1], state),
        Tab::Formation => render_formation(frame, chunks[1], state),
        Tab::Stats => render_stats(frame, chunks[1], state),
        Tab::Settings => render_settings(frame, chunks[1], state),
    }

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = match &state.prompt {
        Some(prompt) => Paragraph::new(format!(
            "{}: {}_  (Enter save | Esc cancel)",
            prompt_label(prompt.kind),
            prompt.buffer
        ))
        .style(Style::default().fg(Color::Yellow)),
        None => Paragraph::new(footer_text(state)).style(Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(footer, chunks[3]);

    if state.menu_open {
        render_menu_overlay(frame, frame.size(), state);
    }
    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(2)])
        .split(area);

    let mode_style = match state.view_mode {
        ViewMode::Manager => Style::default().fg(Color::Green),
        ViewMode::Player => Style::default().fg(Color::Cyan),
    };
    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", state.settings.team_name),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("| Team dashboard | "),
        Span::styled(format!("[{}]", view_mode_label(state.view_mode)), mode_style),
    ]);
    frame.render_widget(Paragraph::new(title), rows[0]);

    let tabs = state.tabs();
    let titles: Vec<String> = tabs
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{} {}", i + 1, tab_label(*t)))
        .collect();
    let selected = tabs.iter().position(|t| *t == state.tab).unwrap_or(0);
    let bar = Tabs::new(titles)
        .select(selected)
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(bar, rows[1]);
}

fn footer_text(state: &AppState) -> String {
    let common = "1-6 Tab | h/l Prev/Next | v Mode | m Menu | ? Help | q Quit";
    let local = match state.tab {
        Tab::Team if state.is_manager() => {
            "j/k Move | Space Toggle attending | a All attending | n New | d Remove"
        }
        Tab::Team => "j/k Move",
        Tab::Schedule if state.is_manager() => {
            "j/k Move | [/] Attendee | a RSVP | Space Mark completed | n New"
        }
        Tab::Schedule => "j/k Move | [/] Attendee | a RSVP",
        Tab::Formation => "f Auto-form | r Reset | c Finalize",
        Tab::Settings => "j/k Move | Space Toggle | +/- Skill | t/x Tag | s/p Reset",
        Tab::Dashboard | Tab::Stats => "",
    };
    if local.is_empty() {
        common.to_string()
    } else {
        format!("{local} | {common}")
    }
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn position_color(position: Position) -> Color {
    match position {
        Position::Goalkeeper => Color::Yellow,
        Position::Defender => Color::Blue,
        Position::Midfielder => Color::Green,
        Position::Forward => Color::Red,
    }
}

fn player_line(player: &Player, selected: bool) -> Line<'static> {
    let prefix = if selected { "> " } else { "  " };
    let tags = player
        .sub_positions
        .iter()
        .take(2)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    let mut line = Line::from(vec![
        Span::raw(format!("{prefix}{:<16}", player.name)),
        Span::styled(
            format!("{:<3}", player.main_position.short()),
            Style::default().fg(position_color(player.main_position)),
        ),
        Span::raw(format!(" {:>4.1}  {tags}", player.overall_rating)),
    ]);
    if selected {
        line = line.style(Style::default().bg(Color::DarkGray));
    }
    line
}

fn position_counts_text(counts: &PositionCounts) -> String {
    Position::ALL
        .iter()
        .map(|p| format!("{} {}", p.short(), counts.get(*p)))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn format_session_time(session: &Session) -> String {
    format!(
        "{} {} (gather {})",
        session.date.format("%Y-%m-%d %a"),
        session.start.format("%H:%M"),
        session.gather.format("%H:%M")
    )
}

fn render_dashboard(frame: &mut Frame, area: Rect, state: &AppState, today: NaiveDate) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Length(3), Constraint::Min(1)])
        .split(columns[0]);

    let next = state
        .next_session(today)
        .or_else(|| state.schedule.upcoming().into_iter().next());
    match next {
        Some(session) => {
            let stats = session.attendance();
            let mut lines = vec![
                format!("{} [{}]", session.title, kind_label(session.kind)),
                format_session_time(session),
                session.location.clone(),
                format!(
                    "Quarters {} min | Rest {} min",
                    session.quarter_minutes, session.rest_minutes
                ),
                format!("Replies: {}/{} attending", stats.attending, stats.total),
            ];
            if state.is_manager() {
                lines.push("Open the Formation tab to split the squad".to_string());
            }
            let info = Paragraph::new(lines.join("\n"))
                .block(Block::default().title("Next Session").borders(Borders::ALL));
            frame.render_widget(info, left[0]);

            let gauge = Gauge::default()
                .block(Block::default().borders(Borders::ALL))
                .gauge_style(Style::default().fg(Color::Green))
                .percent(stats.percentage.min(100) as u16);
            frame.render_widget(gauge, left[1]);
        }
        None => {
            let empty = Paragraph::new("No upcoming sessions")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().title("Next Session").borders(Borders::ALL));
            frame.render_widget(empty, left[0]);
        }
    }

    let top = top_attendance(&state.season_stats, 3)
        .into_iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {:<16} {:>3}%  {} sessions", i + 1, s.name, s.attendance, s.matches))
        .collect::<Vec<_>>();
    let top_text = if top.is_empty() {
        "No attendance data".to_string()
    } else {
        top.join("\n")
    };
    let leaders = Paragraph::new(top_text)
        .block(Block::default().title("Attendance Leaders").borders(Borders::ALL));
    frame.render_widget(leaders, left[2]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(1)])
        .split(columns[1]);

    let avg = average_attendance(&state.season_stats);
    let totals = format!(
        "Members: {}\nAttending next session: {}\nAverage attendance: {avg}%",
        state.roster.len(),
        state.roster.attending_count()
    );
    frame.render_widget(
        Paragraph::new(totals).block(Block::default().title("Team").borders(Borders::ALL)),
        right[0],
    );

    let formation = &state.formation;
    let recent = if formation.is_complete {
        let report = balance_report(formation);
        let names = |team: &[Player]| {
            team.iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let mut lines = vec![
            format!("Team A ({}) avg {:.1}", formation.team_a.len(), report.team_a_rating),
            names(&formation.team_a),
            String::new(),
            format!("Team B ({}) avg {:.1}", formation.team_b.len(), report.team_b_rating),
            names(&formation.team_b),
        ];
        if !formation.bench.is_empty() {
            lines.push(String::new());
            lines.push(format!("Bench ({}): {}", formation.bench.len(), names(&formation.bench)));
        }
        lines.join("\n")
    } else {
        "No finalized formation".to_string()
    };
    let recent = Paragraph::new(recent)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Latest Teams").borders(Borders::ALL));
    frame.render_widget(recent, right[1]);
}

fn render_team(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(40)])
        .split(area);

    let list_block = Block::default()
        .title(format!("Roster ({} members)", state.roster.len()))
        .borders(Borders::ALL);
    let inner = list_block.inner(columns[0]);
    frame.render_widget(list_block, columns[0]);

    let players = state.roster.players();
    if players.is_empty() {
        let empty = Paragraph::new("Roster is empty").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
    } else {
        let visible = inner.height as usize;
        let (start, end) = visible_range(state.roster_selected, players.len(), visible);
        let lines: Vec<Line> = players[start..end]
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let mut line = player_line(p, start + i == state.roster_selected);
                if !p.attending {
                    line = line.style(Style::default().fg(Color::DarkGray));
                }
                line
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    let detail = match state.selected_player() {
        Some(p) => player_detail_text(p, state),
        None => "No member selected".to_string(),
    };
    let detail = Paragraph::new(detail)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Member").borders(Borders::ALL));
    frame.render_widget(detail, columns[1]);
}

fn player_detail_text(player: &Player, state: &AppState) -> String {
    let mut lines = vec![
        format!("{} ({})", player.name, player.initial()),
        format!(
            "{} | {}",
            player.main_position.label(),
            player.sub_positions.join(", ")
        ),
        format!("Overall: {:.1}", player.overall_rating),
        format!(
            "Attending: {}",
            if player.attending { "yes" } else { "no" }
        ),
    ];
    if player.attendance_rate > 0 || player.goals > 0 || player.assists > 0 {
        lines.push(format!(
            "Season: {}% attendance | {}G {}A",
            player.attendance_rate, player.goals, player.assists
        ));
    }
    if !player.skills.is_empty() {
        lines.push(String::new());
        // Settings order first; anything else the sheet carries afterwards.
        for category in &state.settings.skill_categories {
            if let Some(score) = player.skills.get(category) {
                lines.push(format!("{category:<10} {score:>2} {}", "#".repeat(*score as usize)));
            }
        }
        for (category, score) in &player.skills {
            if !state.settings.skill_categories.contains(category) {
                lines.push(format!("{category:<10} {score:>2} {}", "#".repeat(*score as usize)));
            }
        }
    }
    if state.is_manager() {
        lines.push(String::new());
        if let Some(phone) = &player.phone {
            lines.push(format!("Phone: {phone}"));
        }
        if let Some(email) = &player.email {
            lines.push(format!("Email: {email}"));
        }
        if let Some(joined) = player.join_date {
            lines.push(format!("Joined: {}", joined.format("%Y-%m-%d")));
        }
    }
    lines.join("\n")
}

fn render_schedule(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let rows = state.schedule_rows();
    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let selected = i == state.schedule_selected;
            let prefix = if selected { "> " } else { "  " };
            let stats = s.attendance();
            let status = match s.status {
                SessionStatus::Upcoming => "UPCOMING",
                SessionStatus::Completed => "DONE",
            };
            let text = format!(
                "{prefix}{} {:<9} {:<28} {}/{} {status}",
                s.date.format("%m-%d"),
                kind_label(s.kind),
                s.title,
                stats.attending,
                stats.total
            );
            let style = if selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Line::styled(text, style)
        })
        .collect();
    let list = if lines.is_empty() {
        Paragraph::new("No sessions scheduled").style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(lines)
    };
    frame.render_widget(
        list.block(Block::default().title("Sessions").borders(Borders::ALL)),
        columns[0],
    );

    let detail = match state.selected_session() {
        Some(s) => session_detail_text(s, state.attendee_selected),
        None => "No session selected".to_string(),
    };
    let detail = Paragraph::new(detail)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Session").borders(Borders::ALL));
    frame.render_widget(detail, columns[1]);
}

fn session_detail_text(session: &Session, cursor: usize) -> String {
    let stats = session.attendance();
    let mut lines = vec![
        format!("{} [{}]", session.title, kind_label(session.kind)),
        format_session_time(session),
        session.location.clone(),
        format!(
            "Quarters {} min | Rest {} min",
            session.quarter_minutes, session.rest_minutes
        ),
        format!(
            "Attendance {}/{} ({}%)",
            stats.attending, stats.total, stats.percentage
        ),
        String::new(),
    ];
    for (i, a) in session.attendees.iter().enumerate() {
        lines.push(format!(
            "{}{:<16} {:<3} {:>4.1} {}",
            if i == cursor { "> " } else { "  " },
            a.name,
            a.position.short(),
            a.rating,
            rsvp_label(a.status)
        ));
    }
    if !session.description.is_empty() {
        lines.push(String::new());
        lines.push(session.description.clone());
    }
    lines.join("\n")
}

fn render_formation(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(6),
        ])
        .split(area);

    let pool = state.attending_summary();
    let overview = format!(
        "{} attending | avg {:.1} | {}",
        pool.total,
        pool.average_rating,
        position_counts_text(&pool.positions)
    );
    frame.render_widget(
        Paragraph::new(overview).block(Block::default().title("Attendees").borders(Borders::ALL)),
        rows[0],
    );

    let formation = &state.formation;
    let report = balance_report(formation);
    let teams = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    let done = if formation.is_complete { " ✓" } else { "" };
    render_team_panel(
        frame,
        teams[0],
        &format!("Team A ({}) avg {:.1}{done}", formation.team_a.len(), report.team_a_rating),
        &formation.team_a,
        Color::Blue,
    );
    render_team_panel(
        frame,
        teams[1],
        &format!("Team B ({}) avg {:.1}{done}", formation.team_b.len(), report.team_b_rating),
        &formation.team_b,
        Color::Red,
    );

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[2]);

    let analysis = if formation.has_teams() {
        let head = report.headcount;
        let mark = if head.is_balanced { "OK" } else { "UNEVEN" };
        format!(
            "Headcount A {} / B {} (diff {}) {mark}\nRating A {:.1} / B {:.1} (diff {:.1})\nA: {}\nB: {}",
            head.team_a_count,
            head.team_b_count,
            head.difference,
            report.team_a_rating,
            report.team_b_rating,
            report.rating_difference,
            position_counts_text(&report.team_a_positions),
            position_counts_text(&report.team_b_positions),
        )
    } else {
        "Press f to auto-form teams".to_string()
    };
    frame.render_widget(
        Paragraph::new(analysis).block(Block::default().title("Balance").borders(Borders::ALL)),
        bottom[0],
    );

    let bench = if formation.bench.is_empty() {
        "Nobody on the bench".to_string()
    } else {
        formation
            .bench
            .iter()
            .map(|p| format!("{} {} {:.1}", p.name, p.main_position.short(), p.overall_rating))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let status = if formation.is_complete {
        "Finalized; teams can still be re-formed"
    } else {
        "Draft"
    };
    frame.render_widget(
        Paragraph::new(format!("{bench}\n\n{status}"))
            .block(Block::default().title("Bench").borders(Borders::ALL)),
        bottom[1],
    );
}

fn render_team_panel(frame: &mut Frame, area: Rect, title: &str, team: &[Player], color: Color) {
    let block = Block::default()
        .title(Span::styled(title.to_string(), Style::default().fg(color)))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if team.is_empty() {
        let empty = Paragraph::new("Auto-form to build this team")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }
    let counts = PositionCounts::of(team);
    let mut lines = vec![Line::styled(
        position_counts_text(&counts),
        Style::default().fg(Color::DarkGray),
    )];
    lines.extend(team.iter().map(|p| player_line(p, false)));
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_stats(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(6)])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(rows[0]);

    let avg = average_attendance(&state.season_stats);
    let trend = match monthly_trend(&state.monthly_attendance) {
        Some(delta) => format!("{delta:+} pts vs last month"),
        None => "No monthly trend".to_string(),
    };
    frame.render_widget(
        Paragraph::new(format!("{avg}%\n{trend}"))
            .block(Block::default().title("Average Attendance").borders(Borders::ALL)),
        top[0],
    );

    let names = |list: Vec<&PlayerSeasonStats>| {
        if list.is_empty() {
            return "None".to_string();
        }
        list.iter()
            .map(|s| format!("{:<16} {:>3}%", s.name, s.attendance))
            .collect::<Vec<_>>()
            .join("\n")
    };
    frame.render_widget(
        Paragraph::new(names(high_attendance(&state.season_stats)))
            .block(Block::default().title("90%+").borders(Borders::ALL)),
        top[1],
    );
    let low_title = if state.is_manager() {
        "Below 70% (follow up)"
    } else {
        "Below 70%"
    };
    frame.render_widget(
        Paragraph::new(names(low_attendance(&state.season_stats)))
            .block(Block::default().title(low_title).borders(Borders::ALL)),
        top[2],
    );

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);

    let monthly: Vec<Bar> = state
        .monthly_attendance
        .iter()
        .map(|m| {
            Bar::default()
                .value(m.attendance as u64)
                .label(Line::from(m.month.clone()))
                .style(Style::default().fg(Color::Green))
        })
        .collect();
    let monthly_chart = BarChart::default()
        .block(Block::default().title("Monthly Attendance %").borders(Borders::ALL))
        .data(BarGroup::default().bars(&monthly))
        .bar_width(4)
        .bar_gap(1)
        .max(100);
    frame.render_widget(monthly_chart, charts[0]);

    let dist = attendance_distribution(&state.season_stats);
    let colors = [Color::Green, Color::Blue, Color::Yellow, Color::Red];
    let buckets: Vec<Bar> = dist
        .buckets()
        .into_iter()
        .zip(colors)
        .map(|((label, count), color)| {
            Bar::default()
                .value(count as u64)
                .label(Line::from(label))
                .style(Style::default().fg(color))
        })
        .collect();
    let dist_chart = BarChart::default()
        .block(Block::default().title("Distribution").borders(Borders::ALL))
        .data(BarGroup::default().bars(&buckets))
        .bar_width(6)
        .bar_gap(1);
    frame.render_widget(dist_chart, charts[1]);
}

fn render_settings(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(columns[0]);

    let settings = &state.settings;
    let info = format!(
        "Name: {}\nAbout: {}\nSkills: {}",
        settings.team_name,
        settings.description,
        settings.skill_categories.join(", ")
    );
    frame.render_widget(
        Paragraph::new(info)
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Team").borders(Borders::ALL)),
        left[0],
    );

    let toggles: Vec<Line> = SETTING_TOGGLES
        .iter()
        .enumerate()
        .map(|(i, which)| {
            let on = settings.is_enabled(*which);
            let selected = i == state.settings_selected;
            let prefix = if selected { "> " } else { "  " };
            let text = format!("{prefix}[{}] {}", if on { "x" } else { " " }, toggle_label(*which));
            let style = if selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Line::styled(text, style)
        })
        .collect();
    frame.render_widget(
        Paragraph::new(toggles).block(Block::default().title("Formation").borders(Borders::ALL)),
        left[1],
    );

    let catalog = Position::ALL
        .iter()
        .map(|p| format!("{:<11} {}", p.label(), settings.sub_positions(*p).join(" ")))
        .collect::<Vec<_>>()
        .join("\n");
    frame.render_widget(
        Paragraph::new(catalog).block(Block::default().title("Positions").borders(Borders::ALL)),
        columns[1],
    );
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_menu_overlay(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup_area = centered_rect(30, 50, area);
    frame.render_widget(Clear, popup_area);

    let mut lines = vec![
        Line::from(format!("Mode: {} (v to switch)", view_mode_label(state.view_mode))),
        Line::from(""),
    ];
    for (i, tab) in state.tabs().iter().enumerate() {
        let selected = i == state.menu_selected;
        let prefix = if selected { "> " } else { "  " };
        let style = if selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::styled(format!("{prefix}{}", tab_label(*tab)), style));
    }
    let menu = Paragraph::new(lines).block(Block::default().title("Menu").borders(Borders::ALL));
    frame.render_widget(menu, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 80, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Team Dashboard - Help",
        "",
        "Global:",
        "  1-6          Jump to tab",
        "  h/l, Tab     Previous / next tab",
        "  v            Switch player / manager mode",
        "  m            Menu",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Lists:",
        "  j/k or ↑/↓   Move",
        "  Space/Enter  Toggle attending / complete session / toggle setting",
        "",
        "Team (manager):",
        "  n / d / a    New member / remove / everyone attending",
        "",
        "Schedule:",
        "  [ / ]        Previous / next attendee",
        "  a            Cycle RSVP",
        "  n            New session (manager)",
        "",
        "Settings (manager):",
        "  + / -        Add / remove skill",
        "  t / x        Add / remove sub-position",
        "  s / p        Reset skills / positions",
        "",
        "Formation (manager):",
        "  f            Auto-form teams from attendees",
        "  r            Reset",
        "  c            Finalize",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
