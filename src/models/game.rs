use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub season: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game {
    pub id: i64,
    pub team_id: i64,
    pub season: String,
    pub date: NaiveDate,  // ⇔ games.date (TEXT "YYYY-MM-DD")
    pub opponent: String,
    pub team_score: Option<u32>,
    pub opponent_score: Option<u32>,
    pub completed: bool,
}

impl Game {
    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// `2025-06-14 vs Hawks (W 5-3)`
    pub fn label(&self) -> String {
        let result = match (self.team_score, self.opponent_score) {
            (Some(us), Some(them)) => {
                let wl = match us.cmp(&them) {
                    std::cmp::Ordering::Greater => "W",
                    std::cmp::Ordering::Less => "L",
                    std::cmp::Ordering::Equal => "T",
                };
                format!(" ({wl} {us}-{them})")
            }
            _ => String::new(),
        };
        format!("{} vs {}{}", self.date_str(), self.opponent, result)
    }
}
