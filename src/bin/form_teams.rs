use std::path::PathBuf;

use anyhow::Context;
use rand::SeedableRng;
use rand::rngs::StdRng;

use squad_terminal::config::AppConfig;
use squad_terminal::formation::{BalanceReport, FormationResult, balance_report, form_teams};
use squad_terminal::roster::{Player, Roster, load_roster};
use squad_terminal::sample_data::{random_roster, sample_roster};

#[derive(serde::Serialize)]
struct JsonReport<'a> {
    source: String,
    attending: usize,
    formation: &'a FormationResult,
    team_a_rating: f64,
    team_b_rating: f64,
    rating_difference: f64,
    headcount_difference: usize,
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let (players, source) = load_players()?;
    let attending = Roster::new(players).attending();
    let result = form_teams(&attending);
    let report = balance_report(&result);

    if has_flag("--json") {
        let out = JsonReport {
            source,
            attending: attending.len(),
            formation: &result,
            team_a_rating: report.team_a_rating,
            team_b_rating: report.team_b_rating,
            rating_difference: report.rating_difference,
            headcount_difference: report.headcount.difference,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Roster: {source} ({} attending)", attending.len());
    print_team("Team A", &result.team_a, Some(report.team_a_rating));
    print_team("Team B", &result.team_b, Some(report.team_b_rating));
    if !result.bench.is_empty() {
        print_team("Bench", &result.bench, None);
    }
    print_balance(&report);
    Ok(())
}

fn load_players() -> anyhow::Result<(Vec<Player>, String)> {
    if let Some(size) = parse_usize_arg("--random") {
        let seed = parse_usize_arg("--seed").unwrap_or(7) as u64;
        let mut rng = StdRng::seed_from_u64(seed);
        return Ok((random_roster(&mut rng, size), format!("random (seed {seed})")));
    }

    let path = parse_roster_arg().or_else(|| AppConfig::from_env().roster_path);
    match path {
        Some(path) => {
            let players = load_roster(&path)
                .with_context(|| format!("loading roster {}", path.display()))?;
            Ok((players, path.display().to_string()))
        }
        None => Ok((sample_roster(), "sample".to_string())),
    }
}

fn print_team(title: &str, players: &[Player], avg: Option<f64>) {
    match avg {
        Some(avg) => println!("\n{title} ({}) avg {avg:.1}", players.len()),
        None => println!("\n{title} ({})", players.len()),
    }
    for p in players {
        println!(
            "  {:<18} {:<3} {:>4.1}",
            p.name,
            p.main_position.short(),
            p.overall_rating
        );
    }
}

fn print_balance(report: &BalanceReport) {
    let head = report.headcount;
    println!(
        "\nHeadcount: {} vs {} (diff {}, {})",
        head.team_a_count,
        head.team_b_count,
        head.difference,
        if head.is_balanced { "balanced" } else { "uneven" }
    );
    println!(
        "Rating: {:.1} vs {:.1} (diff {:.1})",
        report.team_a_rating, report.team_b_rating, report.rating_difference
    );
}

/// First positional argument or `--roster`.
fn parse_roster_arg() -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix("--roster=") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == "--roster"
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(PathBuf::from(next));
        }
    }
    args.iter()
        .enumerate()
        .find(|(idx, arg)| {
            !arg.starts_with("--")
                && !matches!(
                    idx.checked_sub(1).and_then(|prev| args.get(prev)).map(String::as_str),
                    Some("--roster" | "--random" | "--seed")
                )
        })
        .map(|(_, arg)| PathBuf::from(arg))
}

fn parse_usize_arg(name: &str) -> Option<usize> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&format!("{name}="))
            && let Ok(v) = raw.trim().parse::<usize>()
        {
            return Some(v);
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && let Ok(v) = next.trim().parse::<usize>()
        {
            return Some(v);
        }
    }
    None
}

fn has_flag(name: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == name)
}
