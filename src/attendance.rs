//! Season-level attendance figures for the stats tab.

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSeasonStats {
    pub name: String,
    /// Attendance rate in percent.
    pub attendance: u8,
    pub matches: u32,
    pub goals: u32,
    pub assists: u32,
    pub overall_rating: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyAttendance {
    pub month: String,
    pub attendance: u8,
}

pub const HIGH_ATTENDANCE: u8 = 90;
pub const LOW_ATTENDANCE: u8 = 70;

pub fn average_attendance(stats: &[PlayerSeasonStats]) -> u32 {
    if stats.is_empty() {
        return 0;
    }
    let total: u32 = stats.iter().map(|s| s.attendance as u32).sum();
    (total as f64 / stats.len() as f64).round() as u32
}

pub fn high_attendance(stats: &[PlayerSeasonStats]) -> Vec<&PlayerSeasonStats> {
    stats
        .iter()
        .filter(|s| s.attendance >= HIGH_ATTENDANCE)
        .collect()
}

pub fn low_attendance(stats: &[PlayerSeasonStats]) -> Vec<&PlayerSeasonStats> {
    stats
        .iter()
        .filter(|s| s.attendance < LOW_ATTENDANCE)
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceDistribution {
    pub ninety_plus: usize,
    pub eighties: usize,
    pub seventies: usize,
    pub below_seventy: usize,
}

impl AttendanceDistribution {
    pub fn buckets(&self) -> [(&'static str, usize); 4] {
        [
            ("90%+", self.ninety_plus),
            ("80-89%", self.eighties),
            ("70-79%", self.seventies),
            ("<70%", self.below_seventy),
        ]
    }
}

pub fn attendance_distribution(stats: &[PlayerSeasonStats]) -> AttendanceDistribution {
    let mut dist = AttendanceDistribution::default();
    for s in stats {
        match s.attendance {
            90.. => dist.ninety_plus += 1,
            80..=89 => dist.eighties += 1,
            70..=79 => dist.seventies += 1,
            _ => dist.below_seventy += 1,
        }
    }
    dist
}

/// Highest attendance first; equal rates keep their listed order.
pub fn top_attendance(stats: &[PlayerSeasonStats], n: usize) -> Vec<&PlayerSeasonStats> {
    let mut sorted: Vec<&PlayerSeasonStats> = stats.iter().collect();
    sorted.sort_by(|a, b| b.attendance.cmp(&a.attendance));
    sorted.truncate(n);
    sorted
}

/// Change between the last two months, in percentage points.
pub fn monthly_trend(series: &[MonthlyAttendance]) -> Option<i32> {
    let [.., prev, last] = series else {
        return None;
    };
    Some(last.attendance as i32 - prev.attendance as i32)
}
